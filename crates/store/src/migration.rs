//! One-shot copy of the command table from one store into another.
//!
//! The target table is emptied first and rows are then inserted one at a
//! time, each receiving a fresh ID from the target. The first failing insert
//! aborts the job; rows inserted before it stay in the target.

use crate::error::StoreResult;
use crate::store::CommandStore;
use comandos_core::CommandInput;

/// Outcome of a copy run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Rows read from the source.
    pub read: u64,
    /// Rows removed from the target before inserting.
    pub truncated: u64,
    /// Rows inserted into the target.
    pub inserted: u64,
}

impl MigrationReport {
    /// True when the source was empty and the target was left untouched.
    pub fn is_noop(&self) -> bool {
        self.read == 0
    }
}

/// Replace the contents of `target` with every command in `source`.
pub async fn copy_commands(
    source: &dyn CommandStore,
    target: &dyn CommandStore,
) -> StoreResult<MigrationReport> {
    let rows = source.list_commands_by_id().await?;
    let mut report = MigrationReport {
        read: rows.len() as u64,
        ..Default::default()
    };

    if rows.is_empty() {
        tracing::info!("Source store is empty, nothing to migrate");
        return Ok(report);
    }
    tracing::info!(rows = report.read, "Read commands from source store");

    report.truncated = target.truncate_commands().await?;
    tracing::info!(rows = report.truncated, "Target table cleared");

    for row in rows {
        let input = CommandInput {
            topico: row.topico,
            nome: row.nome,
            categoria: row.categoria,
            definicao: row.definicao,
            comando_exemplo: row.comando_exemplo,
            explicacao_pratica: row.explicacao_pratica,
            dicas_de_uso: row.dicas_de_uso,
        };
        if let Err(e) = target.create_command(&input).await {
            tracing::error!(
                source_id = row.id,
                inserted = report.inserted,
                error = %e,
                "Insert into target store failed, aborting migration"
            );
            return Err(e);
        }
        report.inserted += 1;
    }

    tracing::info!(rows = report.inserted, "Migration finished");
    Ok(report)
}
