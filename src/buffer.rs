use std::ops::Range;

use serde::Serialize;

/// Formatting attached to a range of a [`RichTextBuffer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Style {
    /// Paragraph indentation: the first line starts at `first`, wrapped
    /// continuation lines at `rest`. Both in device-independent units.
    LeadingMargin { first: i32, rest: i32 },
    Bold,
    Italic,
    Link { url: String },
}

/// A style applied over `[start, end)`, in byte offsets into the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub start: usize,
    pub end: usize,
    #[serde(flatten)]
    pub style: Style,
}

impl Annotation {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Append-only text with styles attached to ranges after the fact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RichTextBuffer {
    text: String,
    annotations: Vec<Annotation>,
}

impl RichTextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Length of the text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn last_char(&self) -> Option<char> {
        self.text.chars().next_back()
    }

    pub fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    pub fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    /// Attach `style` over `range`. The range is clamped to the text.
    pub fn annotate(&mut self, range: Range<usize>, style: Style) {
        let end = range.end.min(self.text.len());
        let start = range.start.min(end);
        debug_assert!(self.text.is_char_boundary(start) && self.text.is_char_boundary(end));
        self.annotations.push(Annotation { start, end, style });
    }

    /// Append a line break unless the text is empty or already ends with one.
    pub fn ensure_paragraph_boundary(&mut self) {
        match self.last_char() {
            None | Some('\n') => {}
            Some(_) => self.text.push('\n'),
        }
    }

    /// Remove the last character, shrinking annotations that reached past it.
    /// Annotations left empty are dropped.
    pub fn pop(&mut self) -> Option<char> {
        let ch = self.text.pop()?;
        let len = self.text.len();
        self.annotations.retain_mut(|a| {
            a.end = a.end.min(len);
            a.start = a.start.min(len);
            a.start < a.end
        });
        Some(ch)
    }

    /// Iterate over the styles covering byte offset `at`.
    pub fn styles_at(&self, at: usize) -> impl Iterator<Item = &Style> {
        self.annotations
            .iter()
            .filter(move |a| a.range().contains(&at))
            .map(|a| &a.style)
    }
}
