//! Grouped-by-topic view of the command table.

use crate::command::{Command, GroupedCommand};
use std::collections::BTreeMap;

/// Commands partitioned by topic. Keys iterate in ascending order.
pub type GroupedCommands = BTreeMap<String, Vec<GroupedCommand>>;

/// Partition commands into topic buckets.
///
/// Each bucket keeps the order in which its commands were yielded, so callers
/// pass rows already sorted by `(topico, id)`.
pub fn group_by_topic(commands: impl IntoIterator<Item = Command>) -> GroupedCommands {
    let mut grouped = GroupedCommands::new();
    for command in commands {
        let (topic, item) = command.split_topic();
        grouped.entry(topic).or_default().push(item);
    }
    grouped
}
