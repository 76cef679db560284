//! The folder tree.
//!
//! Folders arrive as a flat list where each folder names its children by id,
//! and a child may appear before or after its parent. Population runs in two
//! passes:
//!
//! 1. Store every folder, reserve a child slot per listed child id, and
//!    remember each `(parent, child)` pair.
//! 2. Once the whole list is indexed, resolve each pair and fill the parent's
//!    next child slot. Pairs naming an unknown folder are skipped.

use log::debug;
use tessera_foundation::{ExternalId, Result, StoreConfig};
use tessera_storage::{Arena, Entity, EntityStore, RelativeRef};

use crate::decode::{FieldSource, FieldValue, finish_record, in_record};

const STORE: &str = "folders";

/// Scope value that marks the workspace root.
const ROOT_SCOPE: &str = "WsRoot";

/// A child slot. Slots past [`Folder::child_count`] stay empty.
pub type ChildSlot = Option<RelativeRef<Folder>>;

/// A folder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Folder {
    /// Identifier.
    pub id: ExternalId,
    /// Display title.
    pub title: String,
    /// Starred by the signed-in user.
    pub is_starred: bool,
    /// The workspace root.
    pub is_root: bool,
    /// One slot per child id listed in the payload.
    pub children: RelativeRef<ChildSlot>,
    /// Number of leading slots that hold a resolved child.
    pub child_count: usize,
}

impl Entity for Folder {
    fn id(&self) -> ExternalId {
        self.id
    }
}

#[derive(Copy, Clone, Debug)]
struct ParentChildPair {
    parent: ExternalId,
    child: ExternalId,
    /// Slots of the parent record that listed this child.
    slots: RelativeRef<ChildSlot>,
}

/// Folders indexed by id, with child links resolved after each pass.
#[derive(Debug)]
pub struct FolderStore {
    folders: EntityStore<Folder>,
    children: Arena<ChildSlot>,
    pairs: Arena<ParentChildPair>,
    root: Option<RelativeRef<Folder>>,
}

impl Default for FolderStore {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

impl FolderStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            folders: EntityStore::with_config(config),
            children: Arena::with_initial_capacity(config.auxiliary_initial_capacity),
            pairs: Arena::with_initial_capacity(config.auxiliary_initial_capacity),
            root: None,
        }
    }

    /// Replaces the folder tree.
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
        self.reset(records.len());

        for (position, record) in records.enumerate() {
            if let Err(err) = self.add_folder(&record) {
                self.reset(0);
                return Err(in_record(err, STORE, position));
            }
        }

        if let Err(err) = self.link_children() {
            self.reset(0);
            return Err(err);
        }
        Ok(())
    }

    fn reset(&mut self, expected: usize) {
        self.folders.begin_pass(expected);
        self.children.soft_reset();
        self.pairs.soft_reset();
        self.root = None;
    }

    fn add_folder(&mut self, source: &impl FieldSource) -> Result<()> {
        let children = &mut self.children;
        let pairs = &mut self.pairs;
        let first_pair = pairs.len();
        let mut id = None;
        let mut title = String::new();
        let mut is_starred = false;
        let mut is_root = false;
        let mut slots = None;

        let visited = source.for_each_field(&mut |key: &str, value: FieldValue<'_>| {
            if value.is_null() {
                return Ok(());
            }
            match key {
                "id" => id = Some(value.as_id(key)?),
                "title" => title = value.as_str(key)?.to_owned(),
                "scope" => is_root = value.as_str(key)? == ROOT_SCOPE,
                "starred" => is_starred = value.as_bool(key)?,
                "childIds" => {
                    let child_ids = value.as_ids(key)?;
                    let reserved = children.reserve_relative(child_ids.len());
                    for &child in child_ids {
                        pairs.push(ParentChildPair {
                            parent: ExternalId::default(),
                            child: ExternalId(child),
                            slots: reserved,
                        });
                    }
                    slots = Some(reserved);
                }
                _ => {}
            }
            Ok(())
        });
        let id = finish_record(visited, id)?;

        // `childIds` may precede `id`
        for pair in &mut self.pairs.as_mut_slice()[first_pair..] {
            pair.parent = id;
        }

        let children = match slots {
            Some(slots) => slots,
            None => self.children.reserve_relative(0),
        };
        let (slot, _) = self.folders.insert(Folder {
            id,
            title,
            is_starred,
            is_root,
            children,
            child_count: 0,
        })?;
        if is_root {
            self.root = Some(slot);
        } else if self.root == Some(slot) {
            self.root = None;
        }
        Ok(())
    }

    fn link_children(&mut self) -> Result<()> {
        let mut matched = 0usize;
        let mut skipped = 0usize;

        for pair in self.pairs.iter() {
            let (Some(parent), Some(child)) = (
                self.folders.lookup_ref(pair.parent),
                self.folders.lookup_ref(pair.child),
            ) else {
                skipped += 1;
                continue;
            };

            let folder = self.folders.get_mut(parent)?;
            // Pairs listed by a record that a later duplicate replaced.
            if folder.children != pair.slots || folder.child_count >= folder.children.len() {
                skipped += 1;
                continue;
            }
            *folder.children.get_mut(&mut self.children, folder.child_count)? = Some(child);
            folder.child_count += 1;
            matched += 1;
        }

        debug!(
            "{STORE}: populated {} records, {matched} child links matched, {skipped} skipped",
            self.folders.len()
        );
        Ok(())
    }

    /// Finds a folder by id.
    #[must_use]
    pub fn find(&self, id: ExternalId) -> Option<&Folder> {
        self.folders.lookup(id)
    }

    /// The workspace root, if the last pass contained one.
    #[must_use]
    pub fn root(&self) -> Option<&Folder> {
        self.folders.get(self.root?).ok()
    }

    /// Starred folders in population order.
    pub fn starred(&self) -> impl Iterator<Item = &Folder> {
        self.folders.iter().filter(|folder| folder.is_starred)
    }

    /// Resolved children of `folder`, in the order the payload listed them.
    ///
    /// # Errors
    ///
    /// Returns an error if `folder` was issued by an earlier pass.
    pub fn children(&self, folder: &Folder) -> Result<Vec<&Folder>> {
        let slots = folder.children.resolve_slice(&self.children)?;
        slots[..folder.child_count]
            .iter()
            .flatten()
            .map(|&child| self.folders.get(child))
            .collect()
    }

    /// All folders in population order.
    pub fn iter(&self) -> impl Iterator<Item = &Folder> {
        self.folders.iter()
    }

    /// Number of folders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    /// Returns true if no folder is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Drops every folder.
    pub fn clear(&mut self) {
        self.folders.clear();
        self.children.clear();
        self.pairs.clear();
        self.root = None;
    }
}
