//! Domain stores for Tessera.
//!
//! This crate provides:
//! - [`FieldSource`] / [`Record`] - The decoder interface stores populate from
//! - [`AccountStore`] - Accounts and the custom fields they describe
//! - [`UserStore`] - Users and suggested users
//! - [`CustomFieldStore`] - Custom field metadata and request bookkeeping
//! - [`WorkflowStore`] - Workflows and their custom statuses
//! - [`FolderStore`] - The folder tree
//! - [`TaskStore`] - Tasks with assignees, custom field values and sub-tasks
//! - [`AppState`] - Owns one of each store
//!
//! Every store follows the same population shape: reset, decode records one
//! by one into arenas, index each completed record, then resolve
//! cross-references once the batch is indexed.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod accounts;
pub mod custom_fields;
pub mod decode;
pub mod folders;
pub mod state;
pub mod tasks;
pub mod users;
pub mod workflows;

pub use accounts::{Account, AccountStore};
pub use custom_fields::{CustomField, CustomFieldKind, CustomFieldStore};
pub use decode::{FieldSource, FieldValue, Record, Value};
pub use folders::{Folder, FolderStore};
pub use state::AppState;
pub use tasks::{CustomFieldValue, Task, TaskStore};
pub use users::{User, UserStore};
pub use workflows::{CustomStatus, StatusGroup, Workflow, WorkflowStore};
