use std::io::Write;

use crate::core::Ticks;
use crate::queue::JobSnapshot;

/// Presentation contract: a sink renders a read-only snapshot on demand and
/// never mutates scheduler state.
pub trait RenderSink {
    fn render(&mut self, now: Ticks, jobs: &[JobSnapshot]) -> anyhow::Result<()>;
}

pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> RenderSink for TextSink<W> {
    fn render(&mut self, now: Ticks, jobs: &[JobSnapshot]) -> anyhow::Result<()> {
        writeln!(self.out, "=== queue status [tick {now}] ({} jobs) ===", jobs.len())?;
        if jobs.is_empty() {
            writeln!(self.out, "queue is empty")?;
            return Ok(());
        }
        for (idx, job) in jobs.iter().enumerate() {
            writeln!(
                self.out,
                "{:>3}. job {} | user {} | priority {} | waiting {}",
                idx + 1,
                job.job_id,
                job.user_id,
                job.priority,
                job.wait_time
            )?;
        }
        Ok(())
    }
}

pub struct NullSink;

impl RenderSink for NullSink {
    fn render(&mut self, _now: Ticks, _jobs: &[JobSnapshot]) -> anyhow::Result<()> {
        Ok(())
    }
}
