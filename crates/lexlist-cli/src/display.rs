//! Card display for listing records.
//!
//! Renders each record as a header line keyed by the record's id, followed
//! by its labelled fields. Long values are cut so one card stays readable.

use lexlist_core::ListItem;

const MAX_VALUE_CHARS: usize = 160;
const LABEL_WIDTH: usize = 10;

// ── Public API ──

/// Print one record as a card.
pub fn print_card<T: ListItem>(position: usize, item: &T) {
    println!("{}", format_card(position, item));
}

/// Print the closing summary for a listing run.
pub fn print_summary(listing: &str, loaded: usize, total: Option<u64>, has_more: bool) {
    match total {
        Some(total) => println!("--- {loaded} of {total} {listing} loaded ---"),
        None if has_more => println!("--- {loaded} {listing} loaded, more available ---"),
        None => println!("--- {loaded} {listing} loaded ---"),
    }
}

// ── Card rendering ──

pub fn format_card<T: ListItem>(position: usize, item: &T) -> String {
    let mut out = format!("=== {}. {} ===", position, item.key());
    for (label, value) in item.card() {
        if value.trim().is_empty() {
            continue;
        }
        out.push('\n');
        out.push_str(&format!("  {:<LABEL_WIDTH$} {}", label, truncate(&value)));
    }
    out
}

fn truncate(value: &str) -> String {
    let count = value.chars().count();
    if count <= MAX_VALUE_CHARS {
        return value.to_string();
    }
    let head: String = value.chars().take(MAX_VALUE_CHARS).collect();
    format!("{head}... (+{} chars)", count - MAX_VALUE_CHARS)
}
