//! End-to-end flows over the on-disk JSON store.
//!
//! No network access: completion calls are pointed at an unset key, so only
//! the offline operations and the failure path of `send_message` run here.

use pilot_core::config::PilotConfig;
use pilot_core::error::PilotError;
use pilot_core::migrate::IMPORT_FOLDER_NAME;
use pilot_core::model::{PrinciplesInput, Session};
use pilot_core::service::{FolderInput, PromptInput};
use pilot_core::PilotService;

fn service_in(dir: &std::path::Path) -> PilotService {
    let mut config = PilotConfig::default_config();
    config.storage.data_dir = dir.join("data").display().to_string();
    config.llm.env_var = Some("PILOT_TEST_KEY_NEVER_SET".into());
    PilotService::from_config(&config)
}

fn read_json(path: std::path::PathBuf) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_init_creates_data_files() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(dir.path());
    assert_eq!(service.init().await.unwrap(), 0);

    for name in ["sessions.json", "folders.json", "principles.json"] {
        assert_eq!(read_json(dir.path().join("data").join(name)), serde_json::json!([]));
    }
    assert!(!dir.path().join("data/drafts.json").exists());
}

#[tokio::test]
async fn test_migration_runs_once_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(
        data.join("drafts.json"),
        r#"[{"id":"1","text":"Explain recursion to a child","createdAt":"2024-02-10T08:30:00.000Z"},
            {"id":"2","text":"List five dinner ideas"}]"#,
    )
    .unwrap();

    assert_eq!(service_in(dir.path()).init().await.unwrap(), 2);
    assert!(!data.join("drafts.json").exists());
    assert!(data.join("drafts.json.migrated").exists());

    // second startup
    assert_eq!(service_in(dir.path()).init().await.unwrap(), 0);

    let folders = read_json(data.join("folders.json"));
    let folders = folders.as_array().unwrap();
    assert_eq!(folders.len(), 1);
    assert_eq!(folders[0]["name"], IMPORT_FOLDER_NAME);
    assert_eq!(folders[0]["parentId"], serde_json::Value::Null);
    assert_eq!(folders[0]["prompts"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_session_lifecycle_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(dir.path());
    service.init().await.unwrap();

    let session = service.create_session().await.unwrap();
    let err = service.send_message(&session.id, "hello").await.unwrap_err();
    assert!(matches!(err, PilotError::Config(_)));

    service.set_archived(&session.id, true).await.unwrap();
    assert!(service.list_sessions().await.unwrap().is_empty());

    let stored: Vec<Session> = serde_json::from_value(read_json(
        dir.path().join("data").join("sessions.json"),
    ))
    .unwrap();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].archived);
    assert!(stored[0].messages.is_empty());
}

#[tokio::test]
async fn test_library_and_principles_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(dir.path());
    service.init().await.unwrap();

    let folder = service
        .save_folder(&FolderInput {
            name: Some("Writing".into()),
            ..Default::default()
        })
        .await
        .unwrap()
        .folder;
    service
        .add_prompt(
            &folder.id,
            &PromptInput {
                title: Some("Editor".into()),
                content: Some("Edit for tone".into()),
            },
        )
        .await
        .unwrap();
    service
        .save_principles(&PrinciplesInput::Text("Be direct\n\n".into()))
        .await
        .unwrap();

    // a fresh service sees the same data
    let reopened = service_in(dir.path());
    let folders = reopened.list_folders().await.unwrap();
    assert_eq!(folders[0].prompts[0].title, "Editor");
    assert_eq!(reopened.get_principles().await.unwrap(), vec!["Be direct"]);
}

#[tokio::test]
async fn test_corrupt_sessions_file_reads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(dir.path());
    service.init().await.unwrap();
    std::fs::write(dir.path().join("data/sessions.json"), "[{broken").unwrap();

    assert!(service.list_sessions().await.unwrap().is_empty());
}
