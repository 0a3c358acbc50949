use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use std::collections::HashSet;
use taskpad_core::db::{open_db, open_db_in_memory};
use taskpad_core::{
    Interaction, PageSurface, PersistError, RepoError, RepoResult, SlotRepository,
    SqliteSlotRepository, Task, TaskApp, TaskId, TaskPersistence, TaskStore, ViewRenderer,
    DEFAULT_SLOT_KEY,
};

/// Slot backend that fails every call, like a full or disabled storage area.
struct UnavailableSlots;

impl SlotRepository for UnavailableSlots {
    fn read_slot(&self, _key: &str) -> RepoResult<Option<String>> {
        Err(RepoError::Unavailable("storage disabled".to_string()))
    }

    fn write_slot(&self, _key: &str, _value: &str) -> RepoResult<()> {
        Err(RepoError::Unavailable("quota exceeded".to_string()))
    }

    fn clear_slot(&self, _key: &str) -> RepoResult<()> {
        Ok(())
    }
}

/// Interaction that accepts every prompt and ignores alerts.
struct AcceptAll;

impl Interaction for AcceptAll {
    fn alert(&mut self, _message: &str) {}

    fn confirm(&mut self, _message: &str) -> bool {
        true
    }
}

fn sample_tasks() -> Vec<Task> {
    let mut store = TaskStore::new();
    store.add("write report").unwrap();
    let done = store.add("buy milk").unwrap();
    store.add("<b>bold</b> & \"quoted\"").unwrap();
    store.toggle(&done);
    store.tasks().to_vec()
}

#[test]
fn save_then_load_returns_equal_collection_in_order() {
    let conn = open_db_in_memory().unwrap();
    let persistence = TaskPersistence::new(SqliteSlotRepository::new(&conn));
    let tasks = sample_tasks();

    persistence.save(&tasks);

    assert_eq!(persistence.load(), tasks);
}

#[test]
fn tasks_survive_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskpad.sqlite3");
    let tasks = sample_tasks();

    {
        let conn = open_db(&path).unwrap();
        TaskPersistence::new(SqliteSlotRepository::new(&conn)).save(&tasks);
    }

    let conn = open_db(&path).unwrap();
    let loaded = TaskPersistence::new(SqliteSlotRepository::new(&conn)).load();
    assert_eq!(loaded, tasks);
}

#[test]
fn missing_slot_loads_empty() {
    let conn = open_db_in_memory().unwrap();
    let persistence = TaskPersistence::new(SqliteSlotRepository::new(&conn));

    assert!(persistence.load().is_empty());
    assert!(persistence.try_load().unwrap().is_none());
}

#[test]
fn corrupt_slot_loads_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);
    repo.write_slot(DEFAULT_SLOT_KEY, "{not json").unwrap();
    let persistence = TaskPersistence::new(&repo);

    assert!(persistence.load().is_empty());
    assert!(matches!(persistence.try_load(), Err(PersistError::Decode(_))));
}

#[test]
fn wrong_shape_slot_loads_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);
    repo.write_slot(DEFAULT_SLOT_KEY, r#"{"tasks": []}"#).unwrap();

    assert!(TaskPersistence::new(&repo).load().is_empty());
}

#[test]
fn slot_keys_are_isolated() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);
    let work = TaskPersistence::with_key(&repo, "work");
    let home = TaskPersistence::with_key(&repo, "home");

    work.save(&sample_tasks());

    assert_eq!(work.load().len(), 3);
    assert!(home.load().is_empty());
}

#[test]
fn storage_failures_are_swallowed() {
    let persistence = TaskPersistence::new(UnavailableSlots);

    persistence.save(&sample_tasks());
    assert!(persistence.load().is_empty());
    assert!(matches!(persistence.try_save(&[]), Err(PersistError::Repo(_))));
}

#[test]
fn wire_format_uses_slot_field_names() {
    let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
    let task = Task::with_id(TaskId::from("1714552200000"), "buy milk", created_at).unwrap();

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["id"], "1714552200000");
    assert_eq!(json["text"], "buy milk");
    assert_eq!(json["completed"], false);
    assert_eq!(json["createdAt"], "2024-05-01T08:30:00Z");

    let decoded: Task = serde_json::from_value(json).unwrap();
    assert_eq!(decoded.created_at, created_at);
}

#[test]
fn repeated_ids_from_clock_based_slots_keep_every_task() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);
    repo.write_slot(
        DEFAULT_SLOT_KEY,
        r#"[
            {"id":"1700000000000","text":"first twin","completed":false,"createdAt":"2023-11-14T22:13:20.000Z"},
            {"id":"1700000000000","text":"second twin","completed":true,"createdAt":"2023-11-14T22:13:20.000Z"},
            {"id":"1699999990000","text":"older task","completed":false,"createdAt":"2023-11-14T22:13:10.000Z"}
        ]"#,
    )
    .unwrap();

    let mut app = TaskApp::start(
        TaskPersistence::new(&repo),
        ViewRenderer::new(PageSurface::new()),
    );
    assert_eq!(app.store().tasks().len(), 3);
    app.add("new", &mut AcceptAll).unwrap();

    let stored = TaskPersistence::new(&repo).load();
    let texts: Vec<_> = stored.iter().map(|task| task.text.as_str()).collect();
    assert_eq!(texts, vec!["new", "first twin", "second twin", "older task"]);
    assert_eq!(stored[1].id.as_str(), "1700000000000");
    assert!(stored[2].completed);
    let unique: HashSet<_> = stored.iter().map(|task| task.id.clone()).collect();
    assert_eq!(unique.len(), stored.len());
}

fn task_collection() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(
        (
            "[ \t]{0,3}[\\p{L}\\p{N}<>&\"' ]{0,12}[\\p{L}\\p{N}][ \t\n]{0,3}",
            any::<bool>(),
            0i64..4_102_444_800,
            0u32..1_000_000_000,
        ),
        0..12,
    )
    .prop_map(|records| {
        records
            .into_iter()
            .enumerate()
            .map(|(index, (text, completed, secs, nanos))| {
                let created_at = Utc.timestamp_opt(secs, nanos).unwrap();
                let mut task =
                    Task::with_id(TaskId::from(format!("id-{index}")), &text, created_at).unwrap();
                task.completed = completed;
                task
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn load_after_save_returns_the_same_collection(tasks in task_collection()) {
        let conn = open_db_in_memory().unwrap();
        let persistence = TaskPersistence::new(SqliteSlotRepository::new(&conn));

        persistence.save(&tasks);

        prop_assert_eq!(persistence.load(), tasks);
    }

    #[test]
    fn non_json_slot_text_loads_empty(raw in "[a-zA-Z<#;!][^\\[]{0,40}") {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteSlotRepository::new(&conn);
        repo.write_slot(DEFAULT_SLOT_KEY, &raw).unwrap();
        let persistence = TaskPersistence::new(&repo);

        prop_assert!(persistence.load().is_empty());
        prop_assert!(matches!(persistence.try_load(), Err(PersistError::Decode(_))));
    }
}
