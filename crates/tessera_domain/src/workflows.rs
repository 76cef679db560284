//! Workflows and their custom statuses.
//!
//! Each workflow owns a contiguous slice of statuses in a shared auxiliary
//! arena. Statuses are also indexed by their own id so a task's
//! `customStatusId` resolves in one lookup.

use log::debug;
use tessera_foundation::{ExternalId, Result, StoreConfig, hash_id};
use tessera_storage::{Arena, Entity, EntityStore, IdIndex, InsertOutcome, RelativeRef};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::decode::{FieldSource, FieldValue, Record, finish_record, in_record};

const STORE: &str = "workflows";

/// Opaque black, used for colour names outside the palette.
pub const UNKNOWN_COLOR: u32 = 0xFF00_0000;

/// Maps a palette colour name to ARGB.
#[must_use]
pub fn palette_color(name: &str) -> Option<u32> {
    let argb = match name {
        "Red" => 0xFFE9_1E63,
        "Blue" => 0xFF21_96F3,
        "Gray" => 0xFF9E_9E9E,
        "Brown" => 0xFF79_5548,
        "Green" => 0xFF8B_C34A,
        "Yellow" => 0xFFFF_EB3B,
        "Purple" => 0xFF9C_27B0,
        "Orange" => 0xFFFF_9800,
        "Indigo" => 0xFF67_3AB7,
        "DarkBlue" => 0xFF3F_51B5,
        "DarkCyan" => 0xFF00_9688,
        "Turquoise" => 0xFF00_BCD4,
        "YellowGreen" => 0xFFCD_DC39,
        _ => return None,
    };
    Some(argb)
}

/// The lifecycle group a status belongs to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StatusGroup {
    /// Missing or unrecognised.
    #[default]
    Invalid,
    /// Work in progress.
    Active,
    /// Done.
    Completed,
    /// Postponed.
    Deferred,
    /// Abandoned.
    Cancelled,
}

impl StatusGroup {
    /// Parses the wire name of a group. Unknown names map to `Invalid`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "Active" => Self::Active,
            "Completed" => Self::Completed,
            "Deferred" => Self::Deferred,
            "Cancelled" => Self::Cancelled,
            _ => Self::Invalid,
        }
    }

    /// Colour used by statuses of this group that carry no colour of their own.
    #[must_use]
    pub fn default_color(self) -> u32 {
        match self {
            Self::Active => 0xFF21_96F3,
            Self::Completed => 0xFF8B_C34A,
            Self::Deferred | Self::Cancelled => 0xFF9E_9E9E,
            Self::Invalid => UNKNOWN_COLOR,
        }
    }
}

/// A workflow status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomStatus {
    /// Identifier.
    pub id: ExternalId,
    /// Display name.
    pub name: String,
    /// Lifecycle group.
    pub group: StatusGroup,
    /// ARGB colour.
    pub color: u32,
    /// Position within the owning workflow.
    pub natural_index: u32,
    /// Hidden from pickers.
    pub is_hidden: bool,
    /// Owning workflow.
    pub workflow: ExternalId,
}

/// A workflow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Workflow {
    /// Identifier.
    pub id: ExternalId,
    /// Display name.
    pub name: String,
    /// Statuses in workflow order.
    pub statuses: RelativeRef<CustomStatus>,
}

impl Entity for Workflow {
    fn id(&self) -> ExternalId {
        self.id
    }
}

/// Workflows, their statuses, and a status index.
#[derive(Debug)]
pub struct WorkflowStore {
    workflows: EntityStore<Workflow>,
    statuses: Arena<CustomStatus>,
    status_index: IdIndex<ExternalId, RelativeRef<CustomStatus>>,
}

impl Default for WorkflowStore {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

impl WorkflowStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            workflows: EntityStore::with_config(config),
            statuses: Arena::with_initial_capacity(config.auxiliary_initial_capacity),
            status_index: IdIndex::new(),
        }
    }

    /// Replaces every workflow and status.
    ///
    /// # Errors
    ///
    /// Returns an error if a workflow or status has no `id` or a known key
    /// carries a value of the wrong shape. The store is left empty.
    pub fn populate<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
        I::Item: FieldSource,
    {
        let records = records.into_iter();
        self.reset(records.len());

        for (position, record) in records.enumerate() {
            if let Err(err) = self.add_workflow(&record) {
                self.reset(0);
                return Err(in_record(err, STORE, position));
            }
        }

        debug!(
            "{STORE}: populated {} workflows, {} statuses",
            self.workflows.len(),
            self.status_count()
        );
        Ok(())
    }

    fn reset(&mut self, expected: usize) {
        self.workflows.begin_pass(expected);
        self.statuses.soft_reset();
        self.status_index.clear();
    }

    fn add_workflow(&mut self, source: &impl FieldSource) -> Result<()> {
        let statuses = &mut self.statuses;
        let mut id = None;
        let mut name = String::new();
        let mut slice = None;

        let visited = source.for_each_field(&mut |key: &str, value: FieldValue<'_>| {
            if value.is_null() {
                return Ok(());
            }
            match key {
                "id" => id = Some(value.as_id(key)?),
                "name" => name = value.as_str(key)?.to_owned(),
                "customStatuses" => {
                    slice = Some(decode_statuses(statuses, value.as_objects(key)?)?);
                }
                _ => {}
            }
            Ok(())
        });
        let id = finish_record(visited, id)?;

        let slice = match slice {
            Some(slice) => slice,
            None => self.statuses.reserve_relative(0),
        };
        for status in slice.resolve_slice_mut(&mut self.statuses)? {
            status.workflow = id;
        }

        let (_, outcome) = self.workflows.insert(Workflow {
            id,
            name,
            statuses: slice,
        })?;
        match outcome {
            InsertOutcome::Inserted => {
                index_statuses(&mut self.status_index, &self.statuses, slice)?;
            }
            // The replaced record's statuses must stop resolving.
            InsertOutcome::Replaced => self.rebuild_status_index()?,
        }
        Ok(())
    }

    fn rebuild_status_index(&mut self) -> Result<()> {
        self.status_index.clear();
        for workflow in self.workflows.iter() {
            index_statuses(&mut self.status_index, &self.statuses, workflow.statuses)?;
        }
        Ok(())
    }

    /// Finds a workflow by id.
    #[must_use]
    pub fn find(&self, id: ExternalId) -> Option<&Workflow> {
        self.workflows.lookup(id)
    }

    /// Finds a status by id.
    #[must_use]
    pub fn find_status(&self, id: ExternalId) -> Option<&CustomStatus> {
        let status = self.status_index.get(&id, hash_id(id))?;
        status.resolve(&self.statuses).ok()
    }

    /// A workflow's statuses in workflow order.
    ///
    /// # Errors
    ///
    /// Returns an error if `workflow` was issued by an earlier pass.
    pub fn statuses_of(&self, workflow: &Workflow) -> Result<&[CustomStatus]> {
        workflow.statuses.resolve_slice(&self.statuses)
    }

    /// The workflow that owns `status`.
    #[must_use]
    pub fn workflow_of(&self, status: &CustomStatus) -> Option<&Workflow> {
        self.find(status.workflow)
    }

    /// All workflows in population order.
    pub fn iter(&self) -> impl Iterator<Item = &Workflow> {
        self.workflows.iter()
    }

    /// Number of workflows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    /// Returns true if no workflow is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }

    /// Number of statuses across all workflows.
    #[must_use]
    pub fn status_count(&self) -> usize {
        self.workflows.iter().map(|workflow| workflow.statuses.len()).sum()
    }

    /// Drops every workflow and status.
    pub fn clear(&mut self) {
        self.workflows.clear();
        self.statuses.clear();
        self.status_index.clear();
    }
}

fn index_statuses(
    index: &mut IdIndex<ExternalId, RelativeRef<CustomStatus>>,
    statuses: &Arena<CustomStatus>,
    slice: RelativeRef<CustomStatus>,
) -> Result<()> {
    for i in 0..slice.len() {
        let status_ref = statuses.relative(slice.offset() + i, 1);
        let status_id = status_ref.resolve(statuses)?.id;
        index.insert(status_id, hash_id(status_id), status_ref);
    }
    Ok(())
}

/// Reserves one status slot per record and decodes each into place.
fn decode_statuses(
    statuses: &mut Arena<CustomStatus>,
    records: &[Record],
) -> Result<RelativeRef<CustomStatus>> {
    let slice = statuses.reserve_relative(records.len());
    for (i, record) in records.iter().enumerate() {
        let natural_index = u32::try_from(i).unwrap_or(u32::MAX);
        *slice.get_mut(statuses, i)? = decode_status(record, natural_index)?;
    }
    Ok(slice)
}

fn decode_status(source: &impl FieldSource, natural_index: u32) -> Result<CustomStatus> {
    let mut id = None;
    let mut color = None;
    let mut status = CustomStatus {
        natural_index,
        ..CustomStatus::default()
    };

    let visited = source.for_each_field(&mut |key: &str, value: FieldValue<'_>| {
        if value.is_null() {
            return Ok(());
        }
        match key {
            "id" => id = Some(value.as_id(key)?),
            "name" => status.name = value.as_str(key)?.to_owned(),
            "group" => status.group = StatusGroup::from_name(value.as_str(key)?),
            "hidden" => status.is_hidden = value.as_bool(key)?,
            "color" => {
                let name = value.as_str(key)?;
                color = Some(palette_color(name).unwrap_or_else(|| {
                    debug!("unknown status colour {name:?}");
                    UNKNOWN_COLOR
                }));
            }
            _ => {}
        }
        Ok(())
    });

    status.id = finish_record(visited, id)?;
    status.color = color.unwrap_or_else(|| status.group.default_color());
    Ok(status)
}
