//! Plain terminal output.
//!
//! Every line is emitted on the [`PRINT_TARGET`] tracing target, so it goes
//! through the spinner-aware writer and obeys the same quiet filters as logs.

use std::fmt::Display;

use colored::*;
use riskmap_common::log::PRINT_TARGET;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::terminal::colors;

pub const TOTAL_WIDTH: usize = 64;
const TREE_KEY_WIDTH: usize = 9;

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

pub fn blank() {
    print("");
}

/// Pads `text` on both sides with `fill` up to [`TOTAL_WIDTH`] visible columns.
/// ANSI color codes in `text` do not count toward its width.
fn centered(text: &str, fill: &str) -> String {
    let pad: usize = TOTAL_WIDTH.saturating_sub(console::measure_text_width(text));
    let left: usize = pad / 2;
    format!(
        "{}{}{}",
        fill.repeat(left).color(colors::SEPARATOR),
        text,
        fill.repeat(pad - left).color(colors::SEPARATOR)
    )
}

/// Key, dot leader up to `key_width` columns, colon.
fn leader(key: &str, key_width: usize) -> String {
    let dots: String = ".".repeat(key_width.saturating_sub(key.width()));
    format!(
        "{}{}",
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR)
    )
}

pub fn banner(hidden: bool) {
    if hidden {
        return;
    }
    let title = format!("⟦ RISKMAP v{} ⟧", env!("CARGO_PKG_VERSION"));
    print(&centered(&title.bright_green().bold().to_string(), "═"));
}

pub fn header(title: &str, q_level: u8) {
    if q_level > 0 {
        return;
    }
    let title = format!("⟦ {} ⟧", title.to_uppercase());
    print(&centered(&title.bright_green().to_string(), "─"));
}

pub fn rule() {
    print(&"═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR).to_string());
}

pub fn status(msg: &str) {
    print(&format!("{} {}", ">".color(colors::SEPARATOR), msg.color(colors::TEXT_DEFAULT)));
}

/// `> key....: value` with the colon aligned one column past `key_width`.
pub fn aligned_line(key: &str, value: impl Display, key_width: usize) {
    print(&format!(
        "{} {}{} {}",
        ">".color(colors::SEPARATOR),
        key.color(colors::PRIMARY),
        leader(key, key_width + 1),
        value
    ));
}

fn tree_lines(root: &str, rows: &[(String, ColoredString)]) -> Vec<String> {
    let mut lines: Vec<String> = Vec::with_capacity(rows.len() + 1);
    lines.push(format!("{} {}", "●".color(colors::ACCENT), root.color(colors::PRIMARY)));

    for (i, (key, value)) in rows.iter().enumerate() {
        let branch: &str = if i + 1 == rows.len() { "└─" } else { "├─" };
        lines.push(format!(
            " {} {}{} {}",
            branch.color(colors::SEPARATOR),
            key.color(colors::TEXT_DEFAULT),
            leader(key, TREE_KEY_WIDTH),
            value
        ));
    }
    lines
}

/// One root line with its rows hanging below it.
pub fn tree(root: &str, rows: &[(String, ColoredString)]) {
    for line in tree_lines(root, rows) {
        print(&line);
    }
}

pub fn centerln(msg: &str) {
    print(&centered(msg, " "));
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
