//! Tasks and their variable-length fields.
//!
//! Each task references four slices in auxiliary arenas: parent folder ids,
//! assignee ids, custom field values and sub-task ids. After the batch is
//! indexed, every sub-task that was found gets a link back to its parent.

use log::debug;
use tessera_foundation::{ExternalId, Result, StoreConfig};
use tessera_storage::{Arena, Entity, EntityStore, RelativeRef};

use crate::decode::{FieldSource, FieldValue, Record, finish_record, in_record};

const STORE: &str = "tasks";

/// The value a task holds for one custom field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomFieldValue {
    /// The custom field.
    pub field_id: ExternalId,
    /// Raw value as sent by the service.
    pub value: String,
}

/// A task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    /// Identifier.
    pub id: ExternalId,
    /// Display title.
    pub title: String,
    /// Folders the task is filed under.
    pub parent_folder_ids: RelativeRef<ExternalId>,
    /// Responsible users.
    pub assignees: RelativeRef<ExternalId>,
    /// Custom field values.
    pub custom_field_values: RelativeRef<CustomFieldValue>,
    /// Sub-task ids as listed, including ones not in the current batch.
    pub sub_task_ids: RelativeRef<ExternalId>,
    /// Workflow status.
    pub custom_status_id: Option<ExternalId>,
    /// Parent task, when the parent is in the current batch.
    pub parent_task: Option<RelativeRef<Task>>,
}

impl Entity for Task {
    fn id(&self) -> ExternalId {
        self.id
    }
}

/// Tasks indexed by id, with parent links resolved after each pass.
#[derive(Debug)]
pub struct TaskStore {
    tasks: EntityStore<Task>,
    folder_ids: Arena<ExternalId>,
    assignees: Arena<ExternalId>,
    field_values: Arena<CustomFieldValue>,
    sub_task_ids: Arena<ExternalId>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

impl TaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        let auxiliary = config.auxiliary_initial_capacity;
        Self {
            tasks: EntityStore::with_config(config),
            folder_ids: Arena::with_initial_capacity(auxiliary),
            assignees: Arena::with_initial_capacity(auxiliary),
            field_values: Arena::with_initial_capacity(auxiliary),
            sub_task_ids: Arena::with_initial_capacity(auxiliary),
        }
    }

    /// Replaces the whole task set.
    ///
    /// # Errors
    ///
    /// Returns an error if a task or custom field value has no `id` or a known
    /// key carries a value of the wrong shape. The store is left empty.
    pub fn populate<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
        I::Item: FieldSource,
    {
        let records = records.into_iter();
        self.reset(records.len());

        for (position, record) in records.enumerate() {
            if let Err(err) = self.add_task(&record) {
                self.reset(0);
                return Err(in_record(err, STORE, position));
            }
        }

        if let Err(err) = self.link_sub_tasks() {
            self.reset(0);
            return Err(err);
        }
        Ok(())
    }

    fn reset(&mut self, expected: usize) {
        self.tasks.begin_pass(expected);
        self.folder_ids.soft_reset();
        self.assignees.soft_reset();
        self.field_values.soft_reset();
        self.sub_task_ids.soft_reset();
    }

    fn add_task(&mut self, source: &impl FieldSource) -> Result<()> {
        let Self {
            folder_ids,
            assignees,
            field_values,
            sub_task_ids,
            ..
        } = &mut *self;
        let mut id = None;
        let mut title = String::new();
        let mut custom_status_id = None;
        let mut parents = None;
        let mut responsible = None;
        let mut values = None;
        let mut sub_tasks = None;

        let visited = source.for_each_field(&mut |key: &str, value: FieldValue<'_>| {
            if value.is_null() {
                return Ok(());
            }
            match key {
                "id" => id = Some(value.as_id(key)?),
                "title" => title = value.as_str(key)?.to_owned(),
                "customStatusId" => custom_status_id = Some(value.as_id(key)?),
                "parentIds" => parents = Some(push_ids(folder_ids, value.as_ids(key)?)),
                "responsibleIds" => responsible = Some(push_ids(assignees, value.as_ids(key)?)),
                "subTaskIds" => sub_tasks = Some(push_ids(sub_task_ids, value.as_ids(key)?)),
                "customFields" => {
                    values = Some(decode_field_values(field_values, value.as_objects(key)?)?);
                }
                _ => {}
            }
            Ok(())
        });
        let id = finish_record(visited, id)?;

        let task = Task {
            id,
            title,
            parent_folder_ids: parents.unwrap_or_else(|| self.folder_ids.relative(0, 0)),
            assignees: responsible.unwrap_or_else(|| self.assignees.relative(0, 0)),
            custom_field_values: values.unwrap_or_else(|| self.field_values.relative(0, 0)),
            sub_task_ids: sub_tasks.unwrap_or_else(|| self.sub_task_ids.relative(0, 0)),
            custom_status_id,
            parent_task: None,
        };
        self.tasks.insert(task)?;
        Ok(())
    }

    fn link_sub_tasks(&mut self) -> Result<()> {
        let mut matched = 0usize;
        let mut skipped = 0usize;

        for position in 0..self.tasks.len() {
            let Some(parent) = self.tasks.slot_at(position) else {
                break;
            };
            let (parent_id, sub_ids) = {
                let task = self.tasks.get(parent)?;
                (task.id, task.sub_task_ids)
            };

            for &sub_id in sub_ids.resolve_slice(&self.sub_task_ids)? {
                if sub_id == parent_id {
                    skipped += 1;
                    continue;
                }
                match self.tasks.lookup_mut(sub_id) {
                    Some(child) => {
                        child.parent_task = Some(parent);
                        matched += 1;
                    }
                    None => skipped += 1,
                }
            }
        }

        debug!(
            "{STORE}: populated {} records, {matched} sub-task links matched, {skipped} skipped",
            self.tasks.len()
        );
        Ok(())
    }

    /// Finds a task by id.
    #[must_use]
    pub fn find(&self, id: ExternalId) -> Option<&Task> {
        self.tasks.lookup(id)
    }

    /// Folder ids `task` is filed under.
    ///
    /// # Errors
    ///
    /// Returns an error if `task` was issued by an earlier pass.
    pub fn parent_folders(&self, task: &Task) -> Result<&[ExternalId]> {
        task.parent_folder_ids.resolve_slice(&self.folder_ids)
    }

    /// User ids responsible for `task`.
    ///
    /// # Errors
    ///
    /// Returns an error if `task` was issued by an earlier pass.
    pub fn assignees(&self, task: &Task) -> Result<&[ExternalId]> {
        task.assignees.resolve_slice(&self.assignees)
    }

    /// Custom field values of `task`.
    ///
    /// # Errors
    ///
    /// Returns an error if `task` was issued by an earlier pass.
    pub fn custom_field_values(&self, task: &Task) -> Result<&[CustomFieldValue]> {
        task.custom_field_values.resolve_slice(&self.field_values)
    }

    /// Sub-tasks of `task` present in the current batch, in listed order.
    ///
    /// # Errors
    ///
    /// Returns an error if `task` was issued by an earlier pass.
    pub fn sub_tasks(&self, task: &Task) -> Result<Vec<&Task>> {
        let ids = task.sub_task_ids.resolve_slice(&self.sub_task_ids)?;
        Ok(ids
            .iter()
            .filter(|&&id| id != task.id)
            .filter_map(|&id| self.find(id))
            .collect())
    }

    /// The parent of `task`, when it was in the same batch.
    #[must_use]
    pub fn parent_of(&self, task: &Task) -> Option<&Task> {
        self.tasks.get(task.parent_task?).ok()
    }

    /// Tasks filed under `folder`, in population order.
    pub fn in_folder(&self, folder: ExternalId) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |task| {
            self.parent_folders(task)
                .is_ok_and(|folders| folders.contains(&folder))
        })
    }

    /// All tasks in population order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if no task is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drops every task.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.folder_ids.clear();
        self.assignees.clear();
        self.field_values.clear();
        self.sub_task_ids.clear();
    }
}

fn push_ids(arena: &mut Arena<ExternalId>, ids: &[i64]) -> RelativeRef<ExternalId> {
    let start = arena.len();
    for &id in ids {
        arena.push(ExternalId(id));
    }
    arena.relative(start, ids.len())
}

fn decode_field_values(
    arena: &mut Arena<CustomFieldValue>,
    records: &[Record],
) -> Result<RelativeRef<CustomFieldValue>> {
    let slice = arena.reserve_relative(records.len());
    for (i, record) in records.iter().enumerate() {
        *slice.get_mut(arena, i)? = decode_field_value(record)?;
    }
    Ok(slice)
}

fn decode_field_value(source: &impl FieldSource) -> Result<CustomFieldValue> {
    let mut id = None;
    let mut field_value = CustomFieldValue::default();

    let visited = source.for_each_field(&mut |key: &str, value: FieldValue<'_>| {
        match (key, value) {
            ("id", value) if !value.is_null() => id = Some(value.as_id(key)?),
            ("value", FieldValue::Str(text)) => field_value.value = text.to_owned(),
            ("value", FieldValue::Int(n)) => field_value.value = n.to_string(),
            ("value", FieldValue::Bool(b)) => field_value.value = b.to_string(),
            _ => {}
        }
        Ok(())
    });

    field_value.field_id = finish_record(visited, id)?;
    Ok(field_value)
}
