//! Command repository trait.

use crate::error::StoreResult;
use crate::models::CommandRow;
use async_trait::async_trait;
use comandos_core::{Command, CommandInput, GroupedCommands, group_by_topic};

/// Wrap a filter value for a substring match.
///
/// `%` and `_` inside `value` are passed through and act as wildcards.
pub fn contains_pattern(value: &str) -> String {
    format!("%{value}%")
}

/// Treat an empty filter the same as no filter.
pub(crate) fn non_empty(filter: Option<&str>) -> Option<&str> {
    filter.filter(|value| !value.is_empty())
}

/// Repository for the command table.
///
/// Name and topic filters are case-insensitive substring matches on both
/// backends.
#[async_trait]
pub trait CommandRepo: Send + Sync {
    /// List commands ordered by `(topico, nome)`, optionally filtered by name.
    async fn list_commands(&self, name_filter: Option<&str>) -> StoreResult<Vec<CommandRow>>;

    /// List commands whose topic contains `topic`, optionally filtered by name.
    async fn list_commands_by_topic(
        &self,
        topic: &str,
        name_filter: Option<&str>,
    ) -> StoreResult<Vec<CommandRow>>;

    /// Distinct topics in ascending order.
    async fn list_topics(&self) -> StoreResult<Vec<String>>;

    /// Every command ordered by `(topico, id)`.
    async fn list_commands_by_topic_and_id(&self) -> StoreResult<Vec<CommandRow>>;

    /// Every command ordered by `id`.
    async fn list_commands_by_id(&self) -> StoreResult<Vec<CommandRow>>;

    /// Get a command by ID.
    async fn get_command(&self, id: i32) -> StoreResult<Option<CommandRow>>;

    /// Count all commands.
    async fn count_commands(&self) -> StoreResult<u64>;

    /// Insert a command; the store assigns the ID.
    async fn create_command(&self, input: &CommandInput) -> StoreResult<CommandRow>;

    /// Overwrite every writable field of an existing command.
    /// Returns `NotFound` if no row has this ID.
    async fn update_command(&self, id: i32, input: &CommandInput) -> StoreResult<CommandRow>;

    /// Delete a command by ID. Returns `NotFound` if no row has this ID.
    async fn delete_command(&self, id: i32) -> StoreResult<()>;

    /// Remove every command and reset ID assignment. Returns rows removed.
    async fn truncate_commands(&self) -> StoreResult<u64>;

    /// All commands partitioned by topic.
    async fn grouped_by_topic(&self) -> StoreResult<GroupedCommands> {
        let rows = self.list_commands_by_topic_and_id().await?;
        Ok(group_by_topic(rows.into_iter().map(Command::from)))
    }
}
