//! In-memory workflow graph: places, transitions and the workflow that owns them.
//!
//! Transitions refer to places by name only. Renaming a place is an explicit
//! [`WorkflowEdit::RenamePlace`]; nothing rewrites references behind the caller's back.

mod guard;
pub mod lenient;
mod name_map;
mod place;
mod support;
mod transition;
mod workflow;

pub use guard::{Guard, GuardInput, GuardNote, LegacyGuard};
pub use name_map::{NameMap, Named};
pub use place::{PermissionRule, Place};
pub use support::{
    MarkingStore, MarkingStoreType, PublicationStateChange, SupportStrategy, WorkflowStatus,
    WorkflowType,
};
pub use transition::{NotificationSetting, Transition, TransitionNotes};
pub use workflow::{Workflow, WorkflowEdit};
