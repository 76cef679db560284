//! Integration tests for the decoder interface
//!
//! Tests that stores accept any `FieldSource`, not just `Record`.

use proptest::prelude::*;
use tessera_domain::{FieldSource, FieldValue, FolderStore, UserStore};
use tessera_foundation::{ExternalId, Result};

/// A hand-built source, the shape a streaming tokenizer would hand over.
struct FolderRow {
    id: i64,
    title: &'static str,
    children: Vec<i64>,
}

impl FieldSource for FolderRow {
    fn for_each_field(
        &self,
        visit: &mut dyn FnMut(&str, FieldValue<'_>) -> Result<()>,
    ) -> Result<()> {
        visit("childIds", FieldValue::Ids(&self.children))?;
        visit("ignored", FieldValue::Bool(true))?;
        visit("title", FieldValue::Str(self.title))?;
        visit("id", FieldValue::Int(self.id))
    }
}

struct BrokenSource;

impl FieldSource for BrokenSource {
    fn for_each_field(
        &self,
        visit: &mut dyn FnMut(&str, FieldValue<'_>) -> Result<()>,
    ) -> Result<()> {
        visit("id", FieldValue::Str("not a number"))
    }
}

// =============================================================================
// Custom Sources
// =============================================================================

#[test]
fn custom_source_populates_folders() {
    let rows = vec![
        FolderRow {
            id: 1,
            title: "Parent",
            children: vec![2],
        },
        FolderRow {
            id: 2,
            title: "Child",
            children: vec![],
        },
    ];

    let mut store = FolderStore::default();
    store.populate(&rows).unwrap();

    let parent = store.find(ExternalId(1)).unwrap();
    let children = store.children(parent).unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].title, "Child");
}

#[test]
fn wrong_value_shape_reports_key() {
    let mut store = UserStore::default();
    let err = store.populate([BrokenSource]).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("id"));
    assert!(msg.contains("integer"));
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn every_listed_known_child_is_linked(child_count in 0usize..40, unknown in 0usize..10) {
        let mut listed: Vec<i64> = (0..child_count as i64).map(|i| i + 100).collect();
        listed.extend((0..unknown as i64).map(|i| -1 - i));

        let mut rows = vec![FolderRow { id: 1, title: "Root", children: listed }];
        rows.extend((0..child_count as i64).map(|i| FolderRow {
            id: i + 100,
            title: "Leaf",
            children: vec![],
        }));

        let mut store = FolderStore::default();
        store.populate(&rows).unwrap();

        let root = store.find(ExternalId(1)).unwrap();
        prop_assert_eq!(root.child_count, child_count);
        prop_assert_eq!(root.children.len(), child_count + unknown);
        prop_assert_eq!(store.children(root).unwrap().len(), child_count);
    }
}
