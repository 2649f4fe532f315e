//! Terminal rendering of panel state.

use std::io::{self, Write};

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use dtk_core::{NotificationLevel, NotificationSink, Query, SearchPhase, SearchState};
use dtk_panels::memes::Meme;
use dtk_panels::{PanelItem, PanelKind, TriggerMode};

/// One-line summary of a panel's state.
pub fn status_line<T>(noun: &str, state: &SearchState<T>) -> String {
    let query = state.query().map(Query::as_str).unwrap_or_default();
    match state.phase() {
        SearchPhase::Idle => format!("[idle] type to search {noun}"),
        SearchPhase::Debouncing => format!("[debouncing] \"{query}\""),
        SearchPhase::Loading => format!("[loading] searching {noun} for \"{query}\""),
        SearchPhase::Success => format!(
            "[success] {} {noun} for \"{query}\"",
            state.items().len()
        ),
        SearchPhase::Empty => format!("[empty] no {noun} for \"{query}\""),
        SearchPhase::Error => {
            let reason = state.last_error().map_or("error", |kind| kind.label());
            format!("[error] {reason} while searching {noun} for \"{query}\"")
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

/// Table of panel items with a leading row number.
pub fn items_table<T: PanelItem>(items: &[T]) -> Table {
    let mut table = Table::new();
    let mut headers = vec![header_cell("#")];
    headers.extend(T::headers().iter().copied().map(header_cell));
    table.set_header(headers);
    apply_table_style(&mut table);

    for (index, item) in items.iter().enumerate() {
        let mut row = vec![Cell::new(index + 1).fg(Color::DarkGrey)];
        row.extend(item.row().into_iter().map(Cell::new));
        table.add_row(row);
    }
    table
}

/// Table of the panel catalog.
pub fn panels_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell(""),
        header_cell("Panel"),
        header_cell("Title"),
        header_cell("Trigger"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);

    for kind in PanelKind::ALL {
        let trigger = match kind.trigger() {
            TriggerMode::Debounced => "as you type",
            TriggerMode::Immediate => "on submit",
        };
        table.add_row(vec![
            Cell::new(kind.icon()),
            Cell::new(kind.slug()).fg(Color::Cyan),
            Cell::new(kind.title()),
            Cell::new(trigger),
            Cell::new(kind.description()),
        ]);
    }
    table
}

/// Lines describing a composed meme.
pub fn meme_lines(template_name: &str, meme: &Meme) -> Vec<String> {
    let mut lines = vec![format!("Template: {template_name}")];
    lines.extend(
        meme.captions
            .iter()
            .enumerate()
            .map(|(index, caption)| format!("Caption {}: {caption}", index + 1)),
    );
    lines.push(format!("Image: {}", meme.image_url));
    lines.push(format!("Hash: {}", meme.hash));
    lines
}

/// Prefix shown before a notification of `level`.
pub fn notification_prefix(level: NotificationLevel) -> &'static str {
    match level {
        NotificationLevel::Success => "✔",
        NotificationLevel::Info => "ℹ",
        NotificationLevel::Warning => "⚠",
        NotificationLevel::Error => "✖",
    }
}

/// Notification sink printing toasts to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalSink;

impl NotificationSink for TerminalSink {
    fn notify(&self, level: NotificationLevel, message: &str) {
        tracing::debug!(level = %level, "{message}");
        let mut stderr = io::stderr().lock();
        // Nothing sensible to do when stderr is gone.
        let _ = writeln!(stderr, "{} {message}", notification_prefix(level));
    }
}
