pub mod config;
pub mod core;
pub mod queue;
pub mod sim;

pub use config::{QueueConfig, SchedConfig, SimConfig};
pub use crate::core::{TickScheduler, TimedEvent};
pub use queue::AgingPriorityQueue;
pub use sim::{RenderSink, Sim};
