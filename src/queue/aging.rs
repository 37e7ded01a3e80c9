use super::job::{JobSnapshot, PrintJob, Priority, Submission};
use crate::config::{ConfigError, QueueConfig};
use crate::core::Ticks;

/// Priority queue of print jobs with periodic priority aging. The queue owns
/// its own clock: `tick()` is the single source of time for its jobs.
pub struct AgingPriorityQueue {
    // Sorted by (priority, arrival_time); the order is re-derived after every
    // mutation, never maintained incrementally.
    jobs: Vec<PrintJob>,
    aging_interval: Ticks,
    tick_counter: Ticks,
    now: Ticks,
}

impl AgingPriorityQueue {
    pub fn new(config: QueueConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            jobs: Vec::new(),
            aging_interval: config.aging_interval,
            tick_counter: 0,
            now: 0,
        })
    }

    pub fn enqueue(
        &mut self,
        user_id: impl Into<String>,
        job_id: impl Into<String>,
        priority: Priority,
    ) {
        let job = PrintJob {
            user_id: user_id.into(),
            job_id: job_id.into(),
            priority,
            arrival_time: self.now,
        };
        tracing::debug!(
            user = %job.user_id,
            job = %job.job_id,
            priority,
            now = self.now,
            "enqueued print job"
        );
        self.jobs.push(job);
        self.resort();
    }

    pub fn enqueue_batch(&mut self, submissions: impl IntoIterator<Item = Submission>) -> usize {
        let mut accepted = 0;
        for sub in submissions {
            self.jobs.push(PrintJob {
                user_id: sub.user_id,
                job_id: sub.job_id,
                priority: sub.priority,
                arrival_time: self.now,
            });
            accepted += 1;
        }
        if accepted > 0 {
            self.resort();
        }
        tracing::debug!(accepted, now = self.now, "batch submission");
        accepted
    }

    /// `None` on an empty queue is a defined state, not a fault.
    pub fn dequeue(&mut self) -> Option<PrintJob> {
        if self.jobs.is_empty() {
            return None;
        }
        let job = self.jobs.remove(0);
        tracing::debug!(job = %job.job_id, now = self.now, "dequeued head job");
        Some(job)
    }

    pub fn tick(&mut self) {
        self.now = self.now.saturating_add(1);
        self.tick_counter += 1;
        if self.tick_counter >= self.aging_interval {
            self.tick_counter = 0;
            self.apply_aging();
        }
    }

    // Every job steps one unit toward the top of the inverted scale; jobs
    // already at 0 stay there.
    fn apply_aging(&mut self) {
        for job in &mut self.jobs {
            job.priority = job.priority.saturating_sub(1);
        }
        self.resort();
        tracing::debug!(now = self.now, jobs = self.jobs.len(), "applied aging pass");
    }

    // Stable sort: earlier arrival (longer wait) wins ties, and insertion
    // order breaks full ties.
    fn resort(&mut self) {
        self.jobs
            .sort_by_key(|job| (job.priority, job.arrival_time));
    }

    pub fn wait_time(&self, job: &PrintJob) -> Ticks {
        self.now.saturating_sub(job.arrival_time)
    }

    pub fn snapshot(&self) -> Vec<JobSnapshot> {
        self.jobs
            .iter()
            .map(|job| JobSnapshot {
                user_id: job.user_id.clone(),
                job_id: job.job_id.clone(),
                priority: job.priority,
                wait_time: self.wait_time(job),
            })
            .collect()
    }

    pub fn now(&self) -> Ticks {
        self.now
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
