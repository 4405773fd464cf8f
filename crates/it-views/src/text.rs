//! Terminal backend
//!
//! Lays a [`RenderedList`] out as aligned text. Badges get a 24-bit ANSI
//! colored dot when color is enabled; widths are measured on the plain text
//! so escape codes never skew alignment.

use it_core::Color;

use crate::list::{Cell, HeaderCell, RenderedList};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DOT: char = '●';
const COLUMN_GAP: &str = "  ";
/// Titles longer than this are cut with an ellipsis
const MAX_CELL_WIDTH: usize = 48;

/// Plain or colored text output
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    color: bool,
    /// Prefix rows with their 1-based number
    numbered: bool,
}

impl TextRenderer {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            numbered: false,
        }
    }

    pub fn numbered(mut self) -> Self {
        self.numbered = true;
        self
    }

    pub fn render(&self, list: &RenderedList) -> String {
        match list {
            RenderedList::Placeholder(message) => format!("{}\n", message),
            RenderedList::Table(table) => {
                let header_texts: Vec<String> = table.headers.iter().map(header_text).collect();
                let row_texts: Vec<Vec<String>> = table
                    .rows
                    .iter()
                    .map(|row| row.cells.iter().map(cell_text).collect())
                    .collect();

                let mut widths: Vec<usize> = header_texts.iter().map(|h| width(h)).collect();
                for row in &row_texts {
                    for (i, text) in row.iter().enumerate() {
                        if let Some(w) = widths.get_mut(i) {
                            *w = (*w).max(width(text));
                        }
                    }
                }
                let number_width = table.rows.len().to_string().len();

                let mut out = String::new();
                if self.numbered {
                    out.push_str(&" ".repeat(number_width + 2));
                }
                let header_line: Vec<String> = header_texts
                    .iter()
                    .zip(&widths)
                    .map(|(text, w)| pad(text, *w))
                    .collect();
                if self.color {
                    out.push_str(BOLD);
                }
                out.push_str(header_line.join(COLUMN_GAP).trim_end());
                if self.color {
                    out.push_str(RESET);
                }
                out.push('\n');

                for (index, (row, texts)) in table.rows.iter().zip(&row_texts).enumerate() {
                    if self.numbered {
                        out.push_str(&format!("{:>w$}. ", index + 1, w = number_width));
                    }
                    let cells: Vec<String> = row
                        .cells
                        .iter()
                        .zip(texts)
                        .zip(&widths)
                        .map(|((cell, text), w)| self.styled(cell, text, *w))
                        .collect();
                    out.push_str(cells.join(COLUMN_GAP).trim_end());
                    out.push('\n');
                }
                out
            }
        }
    }

    /// A single badge, e.g. for detail views and filter listings
    pub fn badge(&self, label: &str, color: Option<&Color>) -> String {
        match color.and_then(|c| c.rgb()) {
            Some((r, g, b)) if self.color => {
                format!("\x1b[38;2;{};{};{}m{}{} {}", r, g, b, DOT, RESET, label)
            }
            _ => format!("{} {}", DOT, label),
        }
    }

    fn styled(&self, cell: &Cell, text: &str, w: usize) -> String {
        match cell {
            Cell::Badge(badge) => {
                let padding = w.saturating_sub(width(text));
                format!("{}{}", self.badge(&truncate(&badge.label), badge.color.as_ref()), " ".repeat(padding))
            }
            _ => pad(text, w),
        }
    }
}

fn header_text(header: &HeaderCell) -> String {
    match header.indicator {
        Some(direction) => format!("{} {}", header.caption, direction.arrow()),
        None => header.caption.to_string(),
    }
}

/// Plain cell text used for width computation
fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Badge(badge) => format!("{} {}", DOT, truncate(&badge.label)),
        other => truncate(other.plain()),
    }
}

fn truncate(text: &str) -> String {
    if width(text) <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
    cut.push('…');
    cut
}

fn width(text: &str) -> usize {
    text.chars().count()
}

fn pad(text: &str, w: usize) -> String {
    format!("{}{}", text, " ".repeat(w.saturating_sub(width(text))))
}
