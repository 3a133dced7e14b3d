//! Pipeline orchestration - three-level concurrent fan-out over
//! accounts, folders, and pages

mod progress;
mod runner;

pub use progress::ProgressTracker;
pub use runner::PipelineRunner;
