use rustc_hash::FxHashMap;
use slotmap::SecondaryMap;

use super::render::RenderSink;
use super::script::{Action, ScriptedAction};
use crate::config::{ConfigError, SimConfig};
use crate::core::{EntityId, TickScheduler, Ticks};
use crate::queue::{AgingPriorityQueue, PrintJob};

#[derive(Debug, Clone)]
pub struct CompletedJob {
    pub job: PrintJob,
    pub printed_at: Ticks,
}

#[derive(Debug)]
pub struct SimReport {
    pub printed: Vec<CompletedJob>,
    pub discarded: Vec<String>,
    pub printed_per_user: FxHashMap<String, u64>,
    pub still_queued: usize,
    pub ticks: Ticks,
}

/// Print-room simulation: scripted submissions feed the aging queue, printed
/// jobs wait in an output tray modeled by the tick scheduler, and uncollected
/// printouts are discarded once they overstay. Both components tick once per
/// step; neither depends on the other.
pub struct Sim<R: RenderSink> {
    pub scheduler: TickScheduler,
    pub queue: AgingPriorityQueue,
    sink: R,
    script: Vec<ScriptedAction>,
    cursor: usize,
    // job_id <-> tray entity, in both directions
    tray: FxHashMap<String, EntityId>,
    tray_jobs: SecondaryMap<EntityId, String>,
    printed: Vec<CompletedJob>,
    discarded: Vec<String>,
    printed_per_user: FxHashMap<String, u64>,
    reminder_after: Ticks,
}

impl<R: RenderSink> Sim<R> {
    pub fn new(
        mut script: Vec<ScriptedAction>,
        config: SimConfig,
        sink: R,
    ) -> Result<Self, ConfigError> {
        // Stable: actions authored for the same tick keep their order.
        script.sort_by_key(|action| action.at);

        Ok(Self {
            scheduler: TickScheduler::new(config.scheduler),
            queue: AgingPriorityQueue::new(config.queue)?,
            sink,
            script,
            cursor: 0,
            tray: FxHashMap::default(),
            tray_jobs: SecondaryMap::new(),
            printed: Vec::new(),
            discarded: Vec::new(),
            printed_per_user: FxHashMap::default(),
            reminder_after: config.reminder_after,
        })
    }

    pub fn run(mut self, horizon: Ticks) -> anyhow::Result<SimReport> {
        for _ in 0..horizon {
            self.step()?;
        }
        Ok(SimReport {
            printed: self.printed,
            discarded: self.discarded,
            printed_per_user: self.printed_per_user,
            still_queued: self.queue.len(),
            ticks: self.queue.now(),
        })
    }

    pub fn step(&mut self) -> anyhow::Result<()> {
        let now = self.queue.now();

        // Apply every scripted action due at this tick, then advance both
        // clocks by one.
        while self.cursor < self.script.len() && self.script[self.cursor].at <= now {
            let action = self.script[self.cursor].action.clone();
            self.cursor += 1;
            self.apply(action)?;
        }

        self.queue.tick();
        let summary = self.scheduler.tick()?;

        for entity in summary.evicted {
            if let Some(job_id) = self.tray_jobs.remove(entity) {
                self.tray.remove(&job_id);
                tracing::warn!(job = %job_id, now, "uncollected printout discarded");
                self.discarded.push(job_id);
            }
        }
        Ok(())
    }

    fn apply(&mut self, action: Action) -> anyhow::Result<()> {
        match action {
            Action::Submit(sub) => {
                self.queue.enqueue(sub.user_id, sub.job_id, sub.priority);
            }
            Action::SubmitBatch(subs) => {
                self.queue.enqueue_batch(subs);
            }
            Action::Print => match self.queue.dequeue() {
                Some(job) => self.print_job(job),
                None => tracing::info!(now = self.queue.now(), "no job available to print"),
            },
            Action::Collect { job_id } => {
                if let Some(entity) = self.tray.remove(&job_id) {
                    self.scheduler.withdraw(entity);
                    self.tray_jobs.remove(entity);
                    tracing::info!(job = %job_id, "printout collected");
                }
            }
            Action::Render => {
                let snapshot = self.queue.snapshot();
                self.sink.render(self.queue.now(), &snapshot)?;
            }
        }
        Ok(())
    }

    fn print_job(&mut self, job: PrintJob) {
        let printed_at = self.queue.now();
        let entity = self.scheduler.admit(i64::from(job.priority));
        self.tray.insert(job.job_id.clone(), entity);
        self.tray_jobs.insert(entity, job.job_id.clone());

        let reminder_job = job.job_id.clone();
        self.scheduler
            .schedule_at(self.scheduler.now() + self.reminder_after, move || {
                tracing::info!(job = %reminder_job, "printout awaiting pickup");
                Ok(())
            });

        *self
            .printed_per_user
            .entry(job.user_id.clone())
            .or_insert(0) += 1;
        tracing::info!(job = %job.job_id, user = %job.user_id, printed_at, "printed job");
        self.printed.push(CompletedJob { job, printed_at });
    }

    pub fn tray_len(&self) -> usize {
        self.tray.len()
    }
}
