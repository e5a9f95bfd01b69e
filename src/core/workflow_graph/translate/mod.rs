//! Conversion between the workflow model and its external forms: the Pimcore
//! YAML configuration and the JSON model document.
//!
//! `export` followed by `import` gives back the same definition (see
//! [`Workflow::same_definition`](crate::core::workflow_graph::model::Workflow::same_definition))
//! for any workflow whose support strategy is fully populated.

pub mod config;
pub mod document;
pub mod export;
pub mod guard;
pub mod import;

pub use document::{from_json, import_file, to_json, DocumentFormat};
pub use export::{to_config, to_document, to_yaml};
pub use import::{from_config, from_yaml, import_issues};
