//! Workflow definition engine: graph model, lint rules, analysis, simulation,
//! translation to and from Pimcore configuration, and the publish gate.

pub mod analysis;
pub mod lint;
pub mod model;
pub mod publish;
pub mod simulation;
pub mod translate;

pub use model::{Place, Transition, Workflow, WorkflowEdit};
