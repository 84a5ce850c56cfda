//! Plain-terminal rendering of a query panel
//!
//! Used by the one-shot `ask` command. The TUI has its own widgets.

use colored::Colorize;

use crate::api::SourceCitation;
use crate::panel::{QueryPanel, RequestStatus};

/// Default wrap width when the terminal width is unknown
pub const DEFAULT_WIDTH: usize = 80;

/// Render the panel's displayable parts as text.
///
/// `styled` turns on ANSI colors; tests and pipes pass `false`.
pub fn render_panel(panel: &QueryPanel, width: usize, styled: bool) -> String {
    let width = width.max(20);
    let mut out = Vec::new();

    match panel.status() {
        RequestStatus::Idle => {}
        RequestStatus::Loading => out.push(paint("Processing...", styled, |s| s.dimmed().to_string())),
        RequestStatus::Failed => {
            if let Some(error) = panel.error() {
                out.push(format!(
                    "{} {}",
                    paint("✗", styled, |s| s.red().bold().to_string()),
                    error
                ));
            }
        }
        RequestStatus::Succeeded => {}
    }

    if let Some(answer) = panel.visible_answer() {
        let mut heading = paint("Answer", styled, |s| s.cyan().bold().to_string());
        if let Some(time) = panel.query_time() {
            heading.push_str(&format!("  ({})", time));
        }
        out.push(heading);
        out.extend(wrap_markup(answer, width));

        if panel.shows_citations() {
            out.push(String::new());
            out.extend(render_sources(panel.visible_sources(), panel.sources_visible(), width, styled));
        }
    }

    let mut text = out.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

fn render_sources(
    sources: &[SourceCitation],
    visible: bool,
    width: usize,
    styled: bool,
) -> Vec<String> {
    let verb = if visible { "Sources" } else { "View Sources" };
    let mut lines = vec![paint(&format!("{} ({})", verb, sources.len()), styled, |s| {
        s.yellow().to_string()
    })];

    if !visible {
        return lines;
    }

    for (index, source) in sources.iter().enumerate() {
        lines.push(format!(
            "  {}. {}  {}",
            index + 1,
            paint(&source.file_name, styled, |s| s.bold().to_string()),
            paint(
                &format!("Relevance: {}", source.relevance_label()),
                styled,
                |s| s.dimmed().to_string()
            ),
        ));
        for line in wrap(&source.text, width.saturating_sub(6).max(10)) {
            lines.push(format!("     │ {}", line));
        }
    }
    lines
}

fn paint(text: &str, styled: bool, style: impl Fn(&str) -> String) -> String {
    if styled {
        style(text)
    } else {
        text.to_string()
    }
}

/// Wrap lightweight markup: blank lines separate paragraphs, list items keep
/// their marker and indent continuation lines under it.
pub fn wrap_markup(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for raw in text.lines() {
        let line = raw.trim_end();
        if line.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let marker_len = list_marker_len(line);
        if marker_len == 0 {
            lines.extend(wrap(line, width));
            continue;
        }

        let (marker, rest) = line.split_at(marker_len);
        let indent = " ".repeat(marker.chars().count());
        let body_width = width.saturating_sub(indent.len()).max(10);
        for (i, wrapped) in wrap(rest, body_width).into_iter().enumerate() {
            let prefix = if i == 0 { marker } else { indent.as_str() };
            lines.push(format!("{}{}", prefix, wrapped));
        }
    }
    lines
}

/// Byte length of a leading `- `, `* ` or `12. ` marker (with its indent)
fn list_marker_len(line: &str) -> usize {
    let indent = line.len() - line.trim_start().len();
    let rest = &line[indent..];

    if rest.starts_with("- ") || rest.starts_with("* ") {
        return indent + 2;
    }

    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 && rest[digits..].starts_with(". ") {
        return indent + digits + 2;
    }
    0
}

/// Greedy word wrap on character counts
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
