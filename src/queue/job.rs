use crate::core::Ticks;

/// Inverted scale: lower numeric value wins.
pub type Priority = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    pub user_id: String,
    pub job_id: String,
    pub priority: Priority,
    pub arrival_time: Ticks,
}

/// A job submission before it carries queue-owned timing state.
#[derive(Debug, Clone)]
pub struct Submission {
    pub user_id: String,
    pub job_id: String,
    pub priority: Priority,
}

impl Submission {
    pub fn new(
        user_id: impl Into<String>,
        job_id: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            job_id: job_id.into(),
            priority,
        }
    }
}

/// Read-only view handed to presentation sinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSnapshot {
    pub user_id: String,
    pub job_id: String,
    pub priority: Priority,
    pub wait_time: Ticks,
}
