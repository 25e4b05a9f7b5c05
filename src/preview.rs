//! Monospace preview of a rendered buffer.
//!
//! Lays each paragraph out the way a text view would apply its
//! [`Style::LeadingMargin`]: the first line starts at `first`, wrapped lines
//! at `rest`. Units are converted to columns with a fixed ratio.

use crate::buffer::{RichTextBuffer, Style};
use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewOptions {
    /// Line width in columns.
    pub width: usize,
    /// Device-independent units per column.
    pub units_per_column: i32,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            width: 60,
            units_per_column: 10,
        }
    }
}

impl From<&Config> for PreviewOptions {
    fn from(config: &Config) -> Self {
        Self {
            width: config.preview.width,
            units_per_column: config.preview.units_per_column,
        }
    }
}

impl PreviewOptions {
    fn columns(&self, units: i32) -> usize {
        let columns = units.max(0) / self.units_per_column.max(1);
        (columns as usize).min(self.width.saturating_sub(1))
    }
}

pub fn preview(buf: &RichTextBuffer, options: &PreviewOptions) -> String {
    let mut out = String::new();
    let mut start = 0;

    for (i, paragraph) in buf.text().split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let (first, rest) = margin_at(buf, start);
        layout_paragraph(
            paragraph,
            options.columns(first),
            options.columns(rest),
            options.width.max(1),
            &mut out,
        );
        start += paragraph.len() + 1;
    }

    out
}

/// Margin of the innermost indentation covering `offset`.
fn margin_at(buf: &RichTextBuffer, offset: usize) -> (i32, i32) {
    buf.annotations()
        .iter()
        .filter(|a| a.range().contains(&offset))
        .filter_map(|a| match a.style {
            Style::LeadingMargin { first, rest } => Some((a.start, a.end, first, rest)),
            _ => None,
        })
        .max_by_key(|&(start, end, ..)| (start, std::cmp::Reverse(end)))
        .map_or((0, 0), |(.., first, rest)| (first, rest))
}

fn layout_paragraph(text: &str, first: usize, rest: usize, width: usize, out: &mut String) {
    let mut indent = first;
    let mut line = String::new();
    let mut line_len = 0;
    let mut wrapped = false;

    for word in text.split(' ') {
        let word_len = word.chars().count();
        if line_len > 0 && line_len + 1 + word_len > width - indent {
            flush_line(indent, &mut line, out);
            line_len = 0;
            indent = rest;
            wrapped = true;
        }
        if wrapped && line_len == 0 && word.is_empty() {
            continue;
        }
        if line_len > 0 {
            line.push(' ');
            line_len += 1;
        }
        for ch in word.chars() {
            if line_len == width - indent {
                flush_line(indent, &mut line, out);
                line_len = 0;
                indent = rest;
                wrapped = true;
            }
            line.push(ch);
            line_len += 1;
        }
    }

    let trimmed = line.trim_end();
    if !trimmed.is_empty() {
        out.extend(std::iter::repeat_n(' ', indent));
        out.push_str(trimmed);
    }
}

/// Emit a full line followed by a newline.
fn flush_line(indent: usize, line: &mut String, out: &mut String) {
    out.extend(std::iter::repeat_n(' ', indent));
    out.push_str(line.trim_end());
    out.push('\n');
    line.clear();
}
