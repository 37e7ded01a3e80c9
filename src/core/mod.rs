pub mod driver;
pub mod event;
pub mod observer;
pub mod state;

pub use driver::{TickScheduler, TickSummary};
pub use event::{EventError, TimedEvent};
pub use state::{Deadline, EntityId, EventKey, SchedState, Ticks, WaitingEntity};
