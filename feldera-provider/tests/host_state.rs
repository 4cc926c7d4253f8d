//! Host flows that keep the local state file in step with the mock API.

mod common;

use feldera_mock::StatusCode;
use feldera_provider::{
    apply_state, destroy_state, import_state, refresh_state, DestroyOutcome, HostError, Plan,
    ProviderError, ResourceReconciler, StateFile,
};
use tempfile::TempDir;
use uuid::Uuid;

use common::{declared, program_config, TestEnv};

fn state_file(dir: &TempDir) -> StateFile {
    StateFile::new(dir.path().join("program.state.json"))
}

async fn raw(file: &StateFile) -> String {
    tokio::fs::read_to_string(file.path()).await.unwrap()
}

// =============================================================================
// Apply
// =============================================================================

#[tokio::test]
async fn test_apply_state_persists_result() {
    let env = TestEnv::spawn().await;
    let dir = TempDir::new().unwrap();
    let file = state_file(&dir);

    let outcome = apply_state(&env.reconciler, &program_config("orders"), &file)
        .await
        .unwrap();
    assert_eq!(outcome.plan, Plan::Create);
    assert_eq!(file.load().await.unwrap(), Some(outcome.state.clone()));

    let again = apply_state(&env.reconciler, &program_config("orders"), &file)
        .await
        .unwrap();
    assert_eq!(again.plan, Plan::NoOp);
    assert_eq!(env.server.state.program_count().await, 1);

    env.shutdown();
}

// =============================================================================
// Refresh
// =============================================================================

#[tokio::test]
async fn test_refresh_state_failure_leaves_file_unchanged() {
    let env = TestEnv::spawn().await;
    let dir = TempDir::new().unwrap();
    let file = state_file(&dir);
    apply_state(&env.reconciler, &program_config("flaky"), &file)
        .await
        .unwrap();
    let before = raw(&file).await;

    env.server
        .state
        .fail_next(StatusCode::INTERNAL_SERVER_ERROR)
        .await;
    let err = refresh_state(&env.reconciler, &file).await.unwrap_err();
    assert!(matches!(&err, HostError::Provider(e) if e.status() == Some(500)));
    assert_eq!(raw(&file).await, before);

    env.shutdown();
}

#[tokio::test]
async fn test_refresh_state_corrects_drift() {
    let env = TestEnv::spawn().await;
    let dir = TempDir::new().unwrap();
    let file = state_file(&dir);
    let outcome = apply_state(&env.reconciler, &program_config("drifting"), &file)
        .await
        .unwrap();

    let id = Uuid::parse_str(outcome.state.id.as_deref().unwrap()).unwrap();
    if let Some(program) = env.server.state.inner.write().await.programs.get_mut(&id) {
        program.description = "edited elsewhere".to_string();
        program.version += 1;
    }

    let refreshed = refresh_state(&env.reconciler, &file).await.unwrap().unwrap();
    assert_eq!(refreshed.description.as_deref(), Some("edited elsewhere"));
    assert_eq!(file.load().await.unwrap(), Some(refreshed));

    env.shutdown();
}

#[tokio::test]
async fn test_refresh_state_removes_file_when_program_vanished() {
    let env = TestEnv::spawn().await;
    let dir = TempDir::new().unwrap();
    let file = state_file(&dir);
    let outcome = apply_state(&env.reconciler, &program_config("vanishing"), &file)
        .await
        .unwrap();
    env.reconciler.delete(&outcome.state).await.unwrap();

    assert_eq!(refresh_state(&env.reconciler, &file).await.unwrap(), None);
    assert!(!file.path().exists());

    env.shutdown();
}

// =============================================================================
// Destroy
// =============================================================================

#[tokio::test]
async fn test_destroy_state_deletes_and_removes_file() {
    let env = TestEnv::spawn().await;
    let dir = TempDir::new().unwrap();
    let file = state_file(&dir);
    apply_state(&env.reconciler, &program_config("doomed"), &file)
        .await
        .unwrap();

    let outcome = destroy_state(&env.reconciler, &file).await.unwrap();
    assert_eq!(outcome, DestroyOutcome::Deleted);
    assert!(!file.path().exists());
    assert_eq!(env.server.state.program_count().await, 0);

    env.shutdown();
}

#[tokio::test]
async fn test_destroy_state_already_gone_removes_file() {
    let env = TestEnv::spawn().await;
    let dir = TempDir::new().unwrap();
    let file = state_file(&dir);
    let outcome = apply_state(&env.reconciler, &program_config("gone"), &file)
        .await
        .unwrap();
    env.reconciler.delete(&outcome.state).await.unwrap();

    let outcome = destroy_state(&env.reconciler, &file).await.unwrap();
    assert_eq!(outcome, DestroyOutcome::AlreadyGone);
    assert!(!file.path().exists());

    env.shutdown();
}

#[tokio::test]
async fn test_destroy_state_failure_keeps_file() {
    let env = TestEnv::spawn().await;
    let dir = TempDir::new().unwrap();
    let file = state_file(&dir);
    apply_state(&env.reconciler, &program_config("sticky"), &file)
        .await
        .unwrap();
    let before = raw(&file).await;

    env.server
        .state
        .fail_next(StatusCode::INTERNAL_SERVER_ERROR)
        .await;
    let err = destroy_state(&env.reconciler, &file).await.unwrap_err();
    assert!(matches!(
        err,
        HostError::Provider(ProviderError::Client { .. })
    ));
    assert_eq!(raw(&file).await, before);
    assert_eq!(env.server.state.program_count().await, 1);

    env.shutdown();
}

#[tokio::test]
async fn test_destroy_state_without_state_is_noop() {
    let env = TestEnv::spawn().await;
    let dir = TempDir::new().unwrap();
    let file = state_file(&dir);

    let outcome = destroy_state(&env.reconciler, &file).await.unwrap();
    assert_eq!(outcome, DestroyOutcome::NoState);
    assert_eq!(env.server.state.request_count(), 0);

    env.shutdown();
}

// =============================================================================
// Import
// =============================================================================

#[tokio::test]
async fn test_import_state_writes_remote_program() {
    let env = TestEnv::spawn().await;
    let dir = TempDir::new().unwrap();
    let file = state_file(&dir);
    let existing = env
        .server
        .state
        .insert_program("legacy", "made by hand", "SELECT 1;")
        .await;

    let id = existing.program_id.to_string();
    let state = import_state(&env.reconciler, &format!(" {} ", id), &file)
        .await
        .unwrap();
    assert_eq!(state.id.as_deref(), Some(id.as_str()));
    assert_eq!(state.name.as_deref(), Some("legacy"));
    assert_eq!(state.version, Some(1));
    assert_eq!(file.load().await.unwrap(), Some(state));

    env.shutdown();
}

#[tokio::test]
async fn test_import_state_refuses_to_overwrite() {
    let env = TestEnv::spawn().await;
    let dir = TempDir::new().unwrap();
    let file = state_file(&dir);
    let managed = env.reconciler.create(&declared("managed")).await.unwrap();
    file.save(&managed).await.unwrap();
    let before = raw(&file).await;
    let requests = env.server.state.request_count();

    let err = import_state(&env.reconciler, managed.id.as_deref().unwrap(), &file)
        .await
        .unwrap_err();
    assert!(matches!(err, HostError::StateExists(ref path) if path == file.path()));
    assert_eq!(raw(&file).await, before);
    assert_eq!(env.server.state.request_count(), requests);

    env.shutdown();
}
