//! Accounts.
//!
//! An account record carries the descriptions of the account's custom
//! fields. Those are appended to the [`CustomFieldStore`] while the account
//! is decoded, so fields are described before any task references them.

use log::debug;
use tessera_foundation::{ExternalId, Result, StoreConfig};
use tessera_storage::{Entity, EntityStore};

use crate::custom_fields::CustomFieldStore;
use crate::decode::{FieldSource, FieldValue, finish_record, in_record};

const STORE: &str = "accounts";

/// An account the signed-in user belongs to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Account {
    /// Identifier.
    pub id: ExternalId,
    /// Number of custom fields the account record described.
    pub custom_field_count: usize,
}

impl Entity for Account {
    fn id(&self) -> ExternalId {
        self.id
    }
}

/// Accounts indexed by id.
#[derive(Debug)]
pub struct AccountStore {
    accounts: EntityStore<Account>,
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

impl AccountStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            accounts: EntityStore::with_config(config),
        }
    }

    /// Replaces the account set and appends each account's `customFields`
    /// to `custom_fields`.
    ///
    /// # Errors
    ///
    /// Returns an error if an account or one of its custom fields has no `id`
    /// or a known key carries a value of the wrong shape. The account store
    /// is left empty; custom fields appended before the failure stay stored.
    pub fn populate<I>(&mut self, records: I, custom_fields: &mut CustomFieldStore) -> Result<()>
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
        I::Item: FieldSource,
    {
        let records = records.into_iter();
        self.accounts.begin_pass(records.len());

        for (position, record) in records.enumerate() {
            let inserted = decode_account(&record, custom_fields)
                .and_then(|account| self.accounts.insert(account));
            if let Err(err) = inserted {
                self.accounts.begin_pass(0);
                return Err(in_record(err, STORE, position));
            }
        }

        debug!(
            "{STORE}: populated {} records, {} custom fields known",
            self.accounts.len(),
            custom_fields.len()
        );
        Ok(())
    }

    /// Finds an account by id.
    #[must_use]
    pub fn find(&self, id: ExternalId) -> Option<&Account> {
        self.accounts.lookup(id)
    }

    /// The account from the last record of the latest pass.
    #[must_use]
    pub fn current(&self) -> Option<&Account> {
        self.accounts.iter().next_back()
    }

    /// All accounts in population order.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if no account is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Drops every account.
    pub fn clear(&mut self) {
        self.accounts.clear();
    }
}

fn decode_account(
    source: &impl FieldSource,
    custom_fields: &mut CustomFieldStore,
) -> Result<Account> {
    let mut id = None;
    let mut custom_field_count = 0;

    let visited = source.for_each_field(&mut |key: &str, value: FieldValue<'_>| {
        if value.is_null() {
            return Ok(());
        }
        match key {
            "id" => id = Some(value.as_id(key)?),
            "customFields" => {
                let fields = value.as_objects(key)?;
                custom_fields.populate(fields)?;
                custom_field_count = fields.len();
            }
            _ => {}
        }
        Ok(())
    });

    Ok(Account {
        id: finish_record(visited, id)?,
        custom_field_count,
    })
}
