//! Application state: one instance of every store.
//!
//! The decoder layer populates through `&mut AppState` and the query layer
//! reads through `&AppState`; there is no global state.

use tessera_foundation::{ExternalId, Result, StoreConfig};

use crate::accounts::AccountStore;
use crate::custom_fields::{CustomField, CustomFieldStore};
use crate::decode::FieldSource;
use crate::folders::{Folder, FolderStore};
use crate::tasks::{Task, TaskStore};
use crate::users::{User, UserStore};
use crate::workflows::{CustomStatus, WorkflowStore};

/// Every domain store, built from one [`StoreConfig`].
#[derive(Debug)]
pub struct AppState {
    config: StoreConfig,
    accounts: AccountStore,
    users: UserStore,
    custom_fields: CustomFieldStore,
    workflows: WorkflowStore,
    folders: FolderStore,
    tasks: TaskStore,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl AppState {
    /// Creates empty stores sized from `config`.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            accounts: AccountStore::new(&config),
            users: UserStore::new(&config),
            custom_fields: CustomFieldStore::new(&config),
            workflows: WorkflowStore::new(&config),
            folders: FolderStore::new(&config),
            tasks: TaskStore::new(&config),
            config,
        }
    }

    /// The configuration the stores were built from.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The account store.
    #[must_use]
    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    /// Replaces the account set, appending the custom fields each account
    /// describes to the custom field store.
    ///
    /// # Errors
    ///
    /// Propagates [`AccountStore::populate`] errors.
    pub fn populate_accounts<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
        I::Item: FieldSource,
    {
        self.accounts.populate(records, &mut self.custom_fields)
    }

    /// The user store.
    #[must_use]
    pub fn users(&self) -> &UserStore {
        &self.users
    }

    /// The user store, mutably.
    pub fn users_mut(&mut self) -> &mut UserStore {
        &mut self.users
    }

    /// The custom field store.
    #[must_use]
    pub fn custom_fields(&self) -> &CustomFieldStore {
        &self.custom_fields
    }

    /// The custom field store, mutably.
    pub fn custom_fields_mut(&mut self) -> &mut CustomFieldStore {
        &mut self.custom_fields
    }

    /// The workflow store.
    #[must_use]
    pub fn workflows(&self) -> &WorkflowStore {
        &self.workflows
    }

    /// The workflow store, mutably.
    pub fn workflows_mut(&mut self) -> &mut WorkflowStore {
        &mut self.workflows
    }

    /// The folder store.
    #[must_use]
    pub fn folders(&self) -> &FolderStore {
        &self.folders
    }

    /// The folder store, mutably.
    pub fn folders_mut(&mut self) -> &mut FolderStore {
        &mut self.folders
    }

    /// The task store.
    #[must_use]
    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    /// The task store, mutably.
    pub fn tasks_mut(&mut self) -> &mut TaskStore {
        &mut self.tasks
    }

    /// Replaces the task set, then queues a description request for every
    /// custom field the tasks reference that is neither described nor
    /// already requested. Returns the number of ids queued.
    ///
    /// # Errors
    ///
    /// Propagates [`TaskStore::populate`] errors; nothing is queued then.
    pub fn populate_tasks<I>(&mut self, records: I) -> Result<usize>
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
        I::Item: FieldSource,
    {
        self.tasks.populate(records)?;

        let mut queued = 0;
        for task in self.tasks.iter() {
            for value in self.tasks.custom_field_values(task)? {
                if self.custom_fields.find(value.field_id).is_none()
                    && self.custom_fields.queue_request(value.field_id)
                {
                    queued += 1;
                }
            }
        }
        Ok(queued)
    }

    /// The workflow status of `task`.
    #[must_use]
    pub fn status_of(&self, task: &Task) -> Option<&CustomStatus> {
        self.workflows.find_status(task.custom_status_id?)
    }

    /// Users responsible for `task` that are known to the user store.
    ///
    /// # Errors
    ///
    /// Returns an error if `task` was issued by an earlier pass.
    pub fn assignees_of(&self, task: &Task) -> Result<Vec<&User>> {
        Ok(self
            .tasks
            .assignees(task)?
            .iter()
            .filter_map(|&id| self.users.find(id))
            .collect())
    }

    /// Folders `task` is filed under that are known to the folder store.
    ///
    /// # Errors
    ///
    /// Returns an error if `task` was issued by an earlier pass.
    pub fn folders_of(&self, task: &Task) -> Result<Vec<&Folder>> {
        Ok(self
            .tasks
            .parent_folders(task)?
            .iter()
            .filter_map(|&id| self.folders.find(id))
            .collect())
    }

    /// Described custom fields of `task`, paired with the task's raw values.
    ///
    /// # Errors
    ///
    /// Returns an error if `task` was issued by an earlier pass.
    pub fn custom_fields_of(&self, task: &Task) -> Result<Vec<(&CustomField, &str)>> {
        Ok(self
            .tasks
            .custom_field_values(task)?
            .iter()
            .filter_map(|value| {
                self.custom_fields
                    .find(value.field_id)
                    .map(|field| (field, value.value.as_str()))
            })
            .collect())
    }

    /// Finds a task by id.
    #[must_use]
    pub fn find_task(&self, id: ExternalId) -> Option<&Task> {
        self.tasks.find(id)
    }

    /// Empties every store.
    pub fn clear(&mut self) {
        self.accounts.clear();
        self.users.clear();
        self.custom_fields.clear();
        self.workflows.clear();
        self.folders.clear();
        self.tasks.clear();
    }
}
