//! Command-line workflow: orchestration and action outputs

pub mod orchestration;
pub mod outputs;

pub use orchestration::{run_release_workflow, ReleaseWorkflowArgs, WorkflowResult};
pub use outputs::ActionOutputs;
