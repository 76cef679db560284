//! Users and suggested users.

use log::debug;
use tessera_foundation::{ExternalId, Result, StoreConfig};
use tessera_storage::{Arena, Entity, EntityStore};

use crate::decode::{FieldSource, FieldValue, finish_record, in_record};

const STORE: &str = "users";

/// A user account.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct User {
    /// Identifier.
    pub id: ExternalId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Location of the avatar image.
    pub avatar_url: String,
    /// True for the signed-in user.
    pub is_me: bool,
}

impl User {
    /// First and last name joined with a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, _) => self.last_name.clone(),
        }
    }
}

impl Entity for User {
    fn id(&self) -> ExternalId {
        self.id
    }
}

/// Users, indexed by id, plus the unindexed list of suggested users.
///
/// The signed-in user is the first record seen with `me: true` in either
/// list. It stays fixed across later passes until [`UserStore::clear`].
#[derive(Debug)]
pub struct UserStore {
    users: EntityStore<User>,
    suggested: Arena<User>,
    me: Option<ExternalId>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

impl UserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            users: EntityStore::with_config(config),
            suggested: Arena::with_initial_capacity(config.auxiliary_initial_capacity),
            me: None,
        }
    }

    /// Replaces the user set.
    ///
    /// # Errors
    ///
    /// Returns an error if a record has no `id` or a known key carries a value
    /// of the wrong shape. The store is left empty.
    pub fn populate<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
        I::Item: FieldSource,
    {
        let records = records.into_iter();
        self.users.begin_pass(records.len());

        let mut me = None;
        for (position, record) in records.enumerate() {
            let user = match decode_user(&record) {
                Ok(user) => user,
                Err(err) => {
                    self.users.begin_pass(0);
                    return Err(in_record(err, STORE, position));
                }
            };
            if user.is_me && me.is_none() {
                me = Some(user.id);
            }
            if let Err(err) = self.users.insert(user) {
                self.users.begin_pass(0);
                return Err(in_record(err, STORE, position));
            }
        }
        self.me = self.me.or(me);

        debug!("{STORE}: populated {} records", self.users.len());
        Ok(())
    }

    /// Replaces the suggested user list. Suggested users are not indexed.
    ///
    /// # Errors
    ///
    /// Same as [`UserStore::populate`]; the suggested list is left empty.
    pub fn populate_suggested<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: FieldSource,
    {
        self.suggested.soft_reset();

        let mut me = None;
        for (position, record) in records.into_iter().enumerate() {
            let user = match decode_user(&record) {
                Ok(user) => user,
                Err(err) => {
                    self.suggested.soft_reset();
                    return Err(in_record(err, "suggested users", position));
                }
            };
            if user.is_me && me.is_none() {
                me = Some(user.id);
            }
            self.suggested.push(user);
        }
        self.me = self.me.or(me);

        Ok(())
    }

    /// Finds a user by id.
    #[must_use]
    pub fn find(&self, id: ExternalId) -> Option<&User> {
        self.users.lookup(id)
    }

    /// Identifier of the signed-in user, once seen.
    #[must_use]
    pub fn me_id(&self) -> Option<ExternalId> {
        self.me
    }

    /// The signed-in user, from the indexed list or else the suggested list.
    #[must_use]
    pub fn me(&self) -> Option<&User> {
        let id = self.me?;
        self.users
            .lookup(id)
            .or_else(|| self.suggested.iter().find(|user| user.id == id))
    }

    /// Suggested users in the order received.
    #[must_use]
    pub fn suggested(&self) -> &[User] {
        self.suggested.as_slice()
    }

    /// All indexed users in population order.
    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }

    /// Number of indexed users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns true if no users are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Drops every user and forgets the signed-in user.
    pub fn clear(&mut self) {
        self.users.clear();
        self.suggested.clear();
        self.me = None;
    }
}

fn decode_user(source: &impl FieldSource) -> Result<User> {
    let mut id = None;
    let mut user = User::default();

    let visited = source.for_each_field(&mut |key: &str, value: FieldValue<'_>| {
        if value.is_null() {
            return Ok(());
        }
        match key {
            "id" => id = Some(value.as_id(key)?),
            "firstName" => user.first_name = value.as_str(key)?.to_owned(),
            "lastName" => user.last_name = value.as_str(key)?.to_owned(),
            "avatarUrl" => user.avatar_url = value.as_str(key)?.to_owned(),
            "me" => user.is_me = value.as_bool(key)?,
            _ => {}
        }
        Ok(())
    });

    user.id = finish_record(visited, id)?;
    Ok(user)
}
