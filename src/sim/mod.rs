pub mod driver;
pub mod render;
pub mod script;

pub use driver::{CompletedJob, Sim, SimReport};
pub use render::{NullSink, RenderSink, TextSink};
pub use script::{Action, ScriptedAction};
