use crate::core::Ticks;
use crate::queue::Submission;

#[derive(Debug, Clone)]
pub enum Action {
    Submit(Submission),
    SubmitBatch(Vec<Submission>),
    /// Dequeue the head job and move it to the output tray.
    Print,
    /// Pick up a printout from the tray. Idempotent if already gone.
    Collect { job_id: String },
    /// On-demand status render.
    Render,
}

#[derive(Debug, Clone)]
pub struct ScriptedAction {
    pub at: Ticks,
    pub action: Action,
}

impl ScriptedAction {
    pub fn new(at: Ticks, action: Action) -> Self {
        Self { at, action }
    }
}
