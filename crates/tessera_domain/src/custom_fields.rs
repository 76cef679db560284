//! Custom field metadata and the request queue for fields not yet described.
//!
//! Field descriptions arrive piecemeal: a task references a custom field id,
//! the id is queued, a batch request goes out, and the answer is appended
//! here. Population therefore never resets the store.

use log::debug;
use tessera_foundation::{ExternalId, IdHash, Result, StoreConfig, hash_id};
use tessera_storage::{Entity, EntityStore, IdIndex};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::decode::{FieldSource, FieldValue, finish_record, in_record};

const STORE: &str = "custom fields";

/// The value type of a custom field.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CustomFieldKind {
    /// Unknown or unsupported type.
    #[default]
    None,
    /// Free text.
    Text,
    /// One of a fixed set of options.
    DropDown,
    /// A number.
    Numeric,
    /// A monetary amount.
    Currency,
    /// A percentage.
    Percentage,
    /// A date.
    Date,
    /// A duration.
    Duration,
    /// A yes/no flag.
    Checkbox,
    /// A list of users.
    Contacts,
}

impl CustomFieldKind {
    /// Parses the wire name of a field type. Unknown names map to `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "Text" => Self::Text,
            "DropDown" => Self::DropDown,
            "Numeric" => Self::Numeric,
            "Currency" => Self::Currency,
            "Percentage" => Self::Percentage,
            "Date" => Self::Date,
            "Duration" => Self::Duration,
            "Checkbox" => Self::Checkbox,
            "Contacts" => Self::Contacts,
            _ => Self::None,
        }
    }
}

/// A custom field description.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomField {
    /// Identifier.
    pub id: ExternalId,
    /// Display title.
    pub title: String,
    /// Value type.
    pub kind: CustomFieldKind,
}

impl Entity for CustomField {
    fn id(&self) -> ExternalId {
        self.id
    }
}

/// Custom field descriptions plus request bookkeeping.
#[derive(Debug)]
pub struct CustomFieldStore {
    fields: EntityStore<CustomField>,
    /// `false` while queued, `true` once requested.
    requests: IdIndex<ExternalId, bool>,
    queue: Vec<ExternalId>,
}

impl Default for CustomFieldStore {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

impl CustomFieldStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            fields: EntityStore::with_config(config),
            requests: IdIndex::new(),
            queue: Vec::new(),
        }
    }

    /// Appends field descriptions. A repeated id overwrites the earlier
    /// description.
    ///
    /// # Errors
    ///
    /// Returns an error if a record has no `id` or a known key carries a value
    /// of the wrong shape. Records before the failing one stay stored.
    pub fn populate<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: FieldSource,
    {
        let mut added = 0usize;
        for (position, record) in records.into_iter().enumerate() {
            let field = decode_field(&record).map_err(|err| in_record(err, STORE, position))?;
            self.fields.insert(field)?;
            added += 1;
        }

        debug!(
            "{STORE}: appended {added} records, {} total",
            self.fields.len()
        );
        Ok(())
    }

    /// Finds a field by id.
    #[must_use]
    pub fn find(&self, id: ExternalId) -> Option<&CustomField> {
        self.fields.lookup(id)
    }

    /// Finds a field by id with a precomputed hash.
    #[must_use]
    pub fn find_hashed(&self, id: ExternalId, hash: IdHash) -> Option<&CustomField> {
        self.fields.lookup_hashed(id, hash)
    }

    /// Returns true once a description for `id` has been requested.
    #[must_use]
    pub fn is_requested(&self, id: ExternalId) -> bool {
        self.requests.get(&id, hash_id(id)).copied().unwrap_or(false)
    }

    /// Records that a description for `id` has been requested.
    pub fn mark_requested(&mut self, id: ExternalId) {
        self.requests.insert(id, hash_id(id), true);
    }

    /// Queues `id` for the next request unless it is already requested or
    /// queued. Returns true if it was queued.
    pub fn queue_request(&mut self, id: ExternalId) -> bool {
        let hash = hash_id(id);
        if self.requests.contains(&id, hash) {
            return false;
        }
        self.requests.insert(id, hash, false);
        self.queue.push(id);
        true
    }

    /// Drains the pending queue, marking every drained id as requested.
    pub fn take_request_queue(&mut self) -> Vec<ExternalId> {
        let queue = std::mem::take(&mut self.queue);
        for &id in &queue {
            self.mark_requested(id);
        }
        queue
    }

    /// Ids waiting for the next request.
    #[must_use]
    pub fn pending_requests(&self) -> &[ExternalId] {
        &self.queue
    }

    /// All fields in the order they first arrived.
    pub fn iter(&self) -> impl Iterator<Item = &CustomField> {
        self.fields.iter()
    }

    /// Number of described fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field is described.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Drops every description and all request bookkeeping.
    pub fn clear(&mut self) {
        self.fields.clear();
        self.requests.clear();
        self.queue.clear();
    }
}

fn decode_field(source: &impl FieldSource) -> Result<CustomField> {
    let mut id = None;
    let mut field = CustomField::default();

    let visited = source.for_each_field(&mut |key: &str, value: FieldValue<'_>| {
        if value.is_null() {
            return Ok(());
        }
        match key {
            "id" => id = Some(value.as_id(key)?),
            "title" => field.title = value.as_str(key)?.to_owned(),
            "type" => field.kind = CustomFieldKind::from_name(value.as_str(key)?),
            _ => {}
        }
        Ok(())
    });

    field.id = finish_record(visited, id)?;
    Ok(field)
}
