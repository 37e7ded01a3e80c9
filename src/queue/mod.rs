pub mod aging;
pub mod job;

pub use aging::AgingPriorityQueue;
pub use job::{JobSnapshot, PrintJob, Priority, Submission};
