//! Integration tests for domain stores
//!
//! Tests full population passes through `AppState` and the links between stores.

use tessera_domain::{AppState, CustomFieldKind, Record, StatusGroup};
use tessera_foundation::{ErrorKind, ExternalId, StoreConfig};

fn folders() -> Vec<Record> {
    vec![
        Record::new()
            .int("id", 1)
            .str("title", "Workspace")
            .str("scope", "WsRoot")
            .ids("childIds", [2, 3]),
        Record::new()
            .int("id", 2)
            .str("title", "Marketing")
            .bool("starred", true)
            .ids("childIds", [4]),
        Record::new().int("id", 3).str("title", "Engineering"),
        Record::new()
            .int("id", 4)
            .str("title", "Campaigns")
            .bool("starred", true),
    ]
}

fn workflows() -> Vec<Record> {
    vec![Record::new().int("id", 50).str("name", "Default").objects(
        "customStatuses",
        vec![
            Record::new().int("id", 51).str("name", "New").str("group", "Active"),
            Record::new()
                .int("id", 52)
                .str("name", "Shipped")
                .str("group", "Completed")
                .str("color", "DarkCyan"),
        ],
    )]
}

fn tasks() -> Vec<Record> {
    vec![
        Record::new()
            .int("id", 500)
            .str("title", "Launch")
            .ids("parentIds", [2])
            .ids("responsibleIds", [7])
            .ids("subTaskIds", [501])
            .int("customStatusId", 51)
            .objects(
                "customFields",
                vec![Record::new().int("id", 80).str("value", "High")],
            ),
        Record::new()
            .int("id", 501)
            .str("title", "Write copy")
            .ids("parentIds", [2, 4])
            .int("customStatusId", 52),
    ]
}

fn populated() -> AppState {
    let mut state = AppState::new(StoreConfig::default());
    state.folders_mut().populate(folders()).unwrap();
    state.workflows_mut().populate(workflows()).unwrap();
    state
        .users_mut()
        .populate(vec![
            Record::new().int("id", 7).str("firstName", "Kim").bool("me", true),
        ])
        .unwrap();
    state
        .custom_fields_mut()
        .populate(vec![
            Record::new()
                .int("id", 80)
                .str("title", "Priority")
                .str("type", "DropDown"),
        ])
        .unwrap();
    state.populate_tasks(tasks()).unwrap();
    state
}

// =============================================================================
// Folder Tree
// =============================================================================

#[test]
fn folder_tree_links() {
    let state = populated();
    let folders = state.folders();

    let root = folders.root().unwrap();
    let top: Vec<_> = folders
        .children(root)
        .unwrap()
        .iter()
        .map(|f| f.title.clone())
        .collect();
    assert_eq!(top, vec!["Marketing", "Engineering"]);

    let starred: Vec<_> = folders.starred().map(|f| f.id).collect();
    assert_eq!(starred, vec![ExternalId(2), ExternalId(4)]);
}

// =============================================================================
// Tasks
// =============================================================================

#[test]
fn task_links_across_stores() {
    let state = populated();
    let launch = state.find_task(ExternalId(500)).unwrap();
    let copy = state.find_task(ExternalId(501)).unwrap();

    assert_eq!(state.tasks().parent_of(copy).unwrap().id, ExternalId(500));
    assert_eq!(state.status_of(launch).unwrap().name, "New");
    assert_eq!(state.status_of(copy).unwrap().color, 0xFF00_9688);
    assert_eq!(
        state.status_of(copy).unwrap().group,
        StatusGroup::Completed
    );
    assert_eq!(state.assignees_of(launch).unwrap()[0].first_name, "Kim");

    let fields = state.custom_fields_of(launch).unwrap();
    assert_eq!(fields[0].0.kind, CustomFieldKind::DropDown);
    assert_eq!(fields[0].1, "High");

    let filed: Vec<_> = state.folders_of(copy).unwrap().iter().map(|f| f.id).collect();
    assert_eq!(filed, vec![ExternalId(2), ExternalId(4)]);
}

#[test]
fn described_fields_are_not_queued() {
    let state = populated();
    assert!(state.custom_fields().pending_requests().is_empty());
}

#[test]
fn signed_in_user() {
    let state = populated();
    assert_eq!(state.users().me().unwrap().id, ExternalId(7));
}

// =============================================================================
// Repopulation
// =============================================================================

#[test]
fn repopulating_tasks_leaves_other_stores_alone() {
    let mut state = populated();
    state
        .populate_tasks(vec![Record::new().int("id", 600).str("title", "Next")])
        .unwrap();

    assert!(state.find_task(ExternalId(500)).is_none());
    assert!(state.find_task(ExternalId(600)).is_some());
    assert_eq!(state.folders().len(), 4);
    assert_eq!(state.workflows().status_count(), 2);
}

#[test]
fn failed_pass_reports_position_and_empties_store() {
    let mut state = populated();
    let mut batch = tasks();
    batch.push(Record::new().str("title", "No id"));

    let err = state.populate_tasks(batch).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingField("id")));
    let context = err.context.unwrap();
    assert_eq!(context.store, Some("tasks"));
    assert_eq!(context.record, Some(2));
    assert!(state.tasks().is_empty());
}
