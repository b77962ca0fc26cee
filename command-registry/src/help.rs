//! Help text formatting.

use std::sync::Arc;

use crate::command::Command;

/// Returned verbatim when nothing is left to show.
pub const NO_COMMANDS: &str = "No commands available.";

/// Pagination for [`crate::CommandRegistry::show_help`].
///
/// With `limit` the footer reads `Page X of Y (M total commands)`; with only a non-zero
/// `offset` it reads `Showing N of M commands`; with neither there is no footer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HelpOptions {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl HelpOptions {
    pub fn page(limit: usize, offset: usize) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }
}

/// Formats already-filtered commands. Sorts by name and drops repeated names.
pub(crate) fn format_help(mut commands: Vec<Arc<Command>>, options: HelpOptions) -> String {
    commands.sort_by(|a, b| a.name().cmp(b.name()));
    commands.dedup_by(|a, b| a.name() == b.name());

    let total = commands.len();
    let offset = options.offset.unwrap_or(0);

    let (shown, footer): (Vec<&Arc<Command>>, Option<String>) = match options.limit {
        Some(limit) if limit > 0 => {
            let shown: Vec<_> = commands.iter().skip(offset).take(limit).collect();
            let current = offset / limit + 1;
            let pages = total.div_ceil(limit);
            let footer = format!("Page {} of {} ({} total commands)", current, pages, total);
            (shown, Some(footer))
        }
        _ if offset > 0 => {
            let shown: Vec<_> = commands.iter().skip(offset).collect();
            let footer = format!("Showing {} of {} commands", shown.len(), total);
            (shown, Some(footer))
        }
        _ => (commands.iter().collect(), None),
    };

    if shown.is_empty() {
        return NO_COMMANDS.to_string();
    }

    let body = shown
        .iter()
        .map(|c| format!("• {}: {}", c.name(), c.description()))
        .collect::<Vec<_>>()
        .join("\n");

    match footer {
        Some(footer) => format!("{}\n\n{}", body, footer),
        None => body,
    }
}
