use thiserror::Error;

use super::state::Ticks;

/// An opaque unit of work with an absolute-tick deadline. The scheduler calls
/// `fire` exactly once, synchronously, during the release phase of the first
/// tick where `deadline <= now`. Failures propagate uncaught.
pub trait TimedEvent {
    fn deadline(&self) -> Ticks;

    fn fire(self: Box<Self>) -> anyhow::Result<()>;
}

#[derive(Debug, Error)]
#[error("event with deadline {deadline} failed during release at tick {now}")]
pub struct EventError {
    pub deadline: Ticks,
    pub now: Ticks,
    #[source]
    pub source: anyhow::Error,
}

// Closure adapter so callers can schedule without defining an event type.
pub(crate) struct DeferredAction<F> {
    pub deadline: Ticks,
    pub action: F,
}

impl<F> TimedEvent for DeferredAction<F>
where
    F: FnOnce() -> anyhow::Result<()>,
{
    fn deadline(&self) -> Ticks {
        self.deadline
    }

    fn fire(self: Box<Self>) -> anyhow::Result<()> {
        (self.action)()
    }
}
