use average::Estimate;
use printq_model::queue::Submission;
use printq_model::sim::{Action, ScriptedAction, TextSink};
use printq_model::{Sim, SimConfig};
use rand::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = SimConfig::default();
    let script = bernoulli_script(200, 0.4, 0.6, 0.8, 0);
    let horizon = 200 + config.scheduler.max_wait_time + 5;

    let sim = Sim::new(script, config, TextSink::new(std::io::stdout()))?;
    let report = sim.run(horizon)?;

    let waits = report
        .printed
        .iter()
        .map(|done| (done.printed_at - done.job.arrival_time) as f64);
    println!("Printed {} jobs", report.printed.len());
    println!("Average queue wait: {:.2} ticks", avg(waits));
    println!("Discarded printouts: {}", report.discarded.len());
    println!("Still queued at end: {}", report.still_queued);

    let mut per_user: Vec<_> = report.printed_per_user.iter().collect();
    per_user.sort();
    for (user, count) in per_user {
        println!("  {user}: {count} printed");
    }
    Ok(())
}

// Random print-room workload: each tick may submit a job, occasionally the
// printer runs, and collections lag a few ticks behind.
fn bernoulli_script(
    ticks: u64,
    p_submit: f64,
    p_print: f64,
    p_collect: f64,
    seed: u64,
) -> Vec<ScriptedAction> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut script = Vec::new();
    let mut submitted = 0u64;
    let mut printed_guess = Vec::new();

    for t in 0..ticks {
        if rng.random::<f64>() < p_submit {
            let user = format!("user-{}", rng.random_range(0..5));
            let job = format!("job-{submitted}");
            let priority = rng.random_range(0..10);
            script.push(ScriptedAction::new(
                t,
                Action::Submit(Submission::new(user, job.clone(), priority)),
            ));
            submitted += 1;
            printed_guess.push(job);
        }

        if rng.random::<f64>() < p_print {
            script.push(ScriptedAction::new(t, Action::Print));
        }

        // Collect a random known job a little later; misses are no-ops.
        if rng.random::<f64>() < p_collect && !printed_guess.is_empty() {
            let idx = rng.random_range(0..printed_guess.len());
            let job_id = printed_guess[idx].clone();
            script.push(ScriptedAction::new(t + 2, Action::Collect { job_id }));
        }

        if t % 50 == 49 {
            script.push(ScriptedAction::new(t, Action::Render));
        }
    }

    script
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<average::Mean>().estimate()
}
