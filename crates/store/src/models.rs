//! Database models mapping to the command table.

use comandos_core::Command;
use sqlx::FromRow;

/// Row of the `comandos` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CommandRow {
    pub id: i32,
    pub topico: String,
    pub nome: Option<String>,
    pub categoria: Option<String>,
    pub definicao: Option<String>,
    pub comando_exemplo: Option<String>,
    pub explicacao_pratica: Option<String>,
    pub dicas_de_uso: Option<String>,
}

impl From<CommandRow> for Command {
    fn from(row: CommandRow) -> Self {
        Self {
            id: row.id,
            topico: row.topico,
            nome: row.nome,
            categoria: row.categoria,
            definicao: row.definicao,
            comando_exemplo: row.comando_exemplo,
            explicacao_pratica: row.explicacao_pratica,
            dicas_de_uso: row.dicas_de_uso,
        }
    }
}
