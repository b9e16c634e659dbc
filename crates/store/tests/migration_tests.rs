//! Tests for copying the command table between stores.

mod common;

use comandos_core::CommandInput;
use comandos_store::{CommandStore, copy_commands};
use common::{TestStore, postgres_or_skip, sample_inputs};
use std::sync::Arc;

async fn seeded_source() -> TestStore {
    let source = TestStore::new().await.expect("source store");
    for input in sample_inputs() {
        source.store.create_command(&input).await.unwrap();
    }
    source
}

async fn inputs_in_id_order(store: &Arc<dyn CommandStore>) -> Vec<CommandInput> {
    store
        .list_commands_by_id()
        .await
        .unwrap()
        .into_iter()
        .map(|row| comandos_core::Command::from(row).to_input())
        .collect()
}

#[tokio::test]
async fn test_copy_replaces_target_contents() {
    let source = seeded_source().await;
    let target = TestStore::new().await.unwrap();
    for _ in 0..3 {
        target
            .store
            .create_command(&CommandInput::new("stale"))
            .await
            .unwrap();
    }

    let report = copy_commands(source.store.as_ref(), target.store.as_ref())
        .await
        .unwrap();

    assert_eq!(report.read, sample_inputs().len() as u64);
    assert_eq!(report.truncated, 3);
    assert_eq!(report.inserted, report.read);
    assert_eq!(
        inputs_in_id_order(&target.store).await,
        inputs_in_id_order(&source.store).await
    );
    assert!(!target.store.list_topics().await.unwrap().contains(&"stale".to_string()));
}

#[tokio::test]
async fn test_copy_restarts_target_ids() {
    let source = seeded_source().await;
    let target = TestStore::new().await.unwrap();
    let stale = target
        .store
        .create_command(&CommandInput::new("stale"))
        .await
        .unwrap();
    target.store.delete_command(stale.id).await.unwrap();

    copy_commands(source.store.as_ref(), target.store.as_ref())
        .await
        .unwrap();

    let ids: Vec<i32> = target
        .store
        .list_commands_by_id()
        .await
        .unwrap()
        .into_iter()
        .map(|row| row.id)
        .collect();
    let expected: Vec<i32> = (1..=sample_inputs().len() as i32).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_empty_source_leaves_target_untouched() {
    let source = TestStore::new().await.unwrap();
    let target = TestStore::new().await.unwrap();
    target
        .store
        .create_command(&CommandInput::new("keep"))
        .await
        .unwrap();

    let report = copy_commands(source.store.as_ref(), target.store.as_ref())
        .await
        .unwrap();

    assert!(report.is_noop());
    assert_eq!(report.inserted, 0);
    assert_eq!(target.store.count_commands().await.unwrap(), 1);
}

#[tokio::test]
async fn test_copy_is_repeatable() {
    let source = seeded_source().await;
    let target = TestStore::new().await.unwrap();

    copy_commands(source.store.as_ref(), target.store.as_ref())
        .await
        .unwrap();
    let report = copy_commands(source.store.as_ref(), target.store.as_ref())
        .await
        .unwrap();

    assert_eq!(report.truncated, sample_inputs().len() as u64);
    assert_eq!(
        target.store.count_commands().await.unwrap(),
        sample_inputs().len() as u64
    );
}

#[tokio::test]
async fn test_copy_sqlite_to_postgres() {
    let Some(postgres) = postgres_or_skip().await else {
        return;
    };
    let source = seeded_source().await;
    let target = postgres.store();

    let report = copy_commands(source.store.as_ref(), target.as_ref())
        .await
        .unwrap();

    assert_eq!(report.inserted, sample_inputs().len() as u64);
    assert_eq!(
        inputs_in_id_order(&target).await,
        inputs_in_id_order(&source.store).await
    );
}

#[tokio::test]
async fn test_failed_insert_aborts_and_keeps_earlier_rows() {
    let source = seeded_source().await;
    let target = TestStore::new().await.unwrap();
    target
        .store
        .create_command(&CommandInput::new("stale"))
        .await
        .unwrap();
    sqlx::query(
        r#"
        CREATE TRIGGER reject_powershell BEFORE INSERT ON comandos
        WHEN NEW.topico = 'PowerShell'
        BEGIN
            SELECT RAISE(ABORT, 'PowerShell rows are rejected');
        END
        "#,
    )
    .execute(target.pool())
    .await
    .unwrap();

    let failing_row = sample_inputs()
        .iter()
        .position(|input| input.topico == "PowerShell")
        .unwrap();

    let err = copy_commands(source.store.as_ref(), target.store.as_ref())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("PowerShell rows are rejected"));

    // The target was cleared, then every row before the failing one landed.
    let copied = inputs_in_id_order(&target.store).await;
    assert_eq!(copied.len(), failing_row);
    assert_eq!(copied, sample_inputs()[..failing_row].to_vec());
    assert!(!target.store.list_topics().await.unwrap().contains(&"stale".to_string()));
}
