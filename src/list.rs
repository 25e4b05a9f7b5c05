//! List layout for renderers whose text model has no notion of lists.
//!
//! `ul`/`ol`/`li` tags are intercepted and turned into marker text plus a
//! [`Style::LeadingMargin`] per item: the first line is pulled back by the
//! marker width so the marker hangs left of the text, and wrapped lines
//! align under the text.

use crate::buffer::{RichTextBuffer, Style};
use crate::metrics::MarkerMetrics;

pub const BASE_INDENT: i32 = 20;
pub const DEFAULT_BULLET: &str = "•";

/// State of one open `ul`/`ol`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListContext {
    pub ordered: bool,
    /// Last ordinal emitted; -1 for unordered lists.
    pub index: i32,
    /// Cumulative indentation of this level.
    pub indent: i32,
    /// Where the open item's marker starts, if an item is open.
    pub item_start: Option<usize>,
}

/// Tracks nested lists while a parser feeds it tag events.
#[derive(Debug, Clone)]
pub struct ListLayoutBuilder {
    metrics: MarkerMetrics,
    base_indent: i32,
    bullet: String,
    stack: Vec<ListContext>,
}

impl Default for ListLayoutBuilder {
    fn default() -> Self {
        Self::new(MarkerMetrics::default())
    }
}

impl ListLayoutBuilder {
    pub fn new(metrics: MarkerMetrics) -> Self {
        Self {
            metrics,
            base_indent: BASE_INDENT,
            bullet: DEFAULT_BULLET.to_string(),
            stack: Vec::new(),
        }
    }

    /// Per-level indentation. Clamped to at least one unit so nested items
    /// always sit further in than their parent.
    pub fn with_base_indent(mut self, base_indent: i32) -> Self {
        self.base_indent = base_indent.max(1);
        self
    }

    pub fn with_bullet(mut self, bullet: impl Into<String>) -> Self {
        self.bullet = bullet.into();
        self
    }

    /// Number of lists currently open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The innermost open list.
    pub fn current(&self) -> Option<&ListContext> {
        self.stack.last()
    }

    /// Feed one tag event. Returns `false` if the tag isn't a list tag.
    ///
    /// Mismatched nesting is absorbed: closes without a matching open do
    /// nothing.
    pub fn on_tag(&mut self, opening: bool, tag: &str, buf: &mut RichTextBuffer) -> bool {
        if tag.eq_ignore_ascii_case("li") {
            if opening {
                self.open_item(buf);
            } else {
                self.close_item(buf);
            }
        } else if tag.eq_ignore_ascii_case("ol") || tag.eq_ignore_ascii_case("ul") {
            if opening {
                self.open_list(tag.eq_ignore_ascii_case("ol"), buf);
            } else {
                self.close_list(buf);
            }
        } else {
            return false;
        }
        true
    }

    fn open_list(&mut self, ordered: bool, buf: &mut RichTextBuffer) {
        let parent_indent = match self.stack.last() {
            Some(parent) => parent.indent,
            None => {
                if !buf.is_empty() {
                    buf.push('\n');
                }
                0
            }
        };
        self.stack.push(ListContext {
            ordered,
            index: if ordered { 0 } else { -1 },
            indent: parent_indent + self.base_indent + self.metrics.width(ordered),
            item_start: None,
        });
    }

    fn close_list(&mut self, buf: &mut RichTextBuffer) {
        buf.ensure_paragraph_boundary();
        let Some(list) = self.stack.pop() else {
            // Already at the root: terminate the block like an outermost list
            tracing::debug!(target: "htmllabel::list", "list close without open list");
            buf.push('\n');
            return;
        };
        if list.item_start.is_some() {
            tracing::debug!(target: "htmllabel::list", "list closed with an item still open");
        }
        if self.stack.is_empty() {
            buf.push('\n');
        }
    }

    fn open_item(&mut self, buf: &mut RichTextBuffer) {
        let Some(list) = self.stack.last_mut() else {
            tracing::debug!(target: "htmllabel::list", "li outside of a list");
            return;
        };
        buf.ensure_paragraph_boundary();
        list.item_start = Some(buf.len());
        if list.ordered {
            list.index += 1;
            buf.push_str(&format!("{}. ", list.index));
        } else {
            buf.push_str(&self.bullet);
            buf.push_str("  ");
        }
    }

    fn close_item(&mut self, buf: &mut RichTextBuffer) {
        let Some(list) = self.stack.last_mut() else {
            tracing::debug!(target: "htmllabel::list", "li close outside of a list");
            return;
        };
        let Some(start) = list.item_start.take() else {
            tracing::debug!(target: "htmllabel::list", "li close without open item");
            return;
        };
        buf.ensure_paragraph_boundary();
        let marker = self.metrics.width(list.ordered);
        buf.annotate(
            start..buf.len(),
            Style::LeadingMargin {
                first: list.indent - marker,
                rest: list.indent,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Annotation;

    enum Ev {
        Open(&'static str),
        Close(&'static str),
        Text(&'static str),
    }

    use Ev::*;

    fn run(builder: &mut ListLayoutBuilder, buf: &mut RichTextBuffer, events: &[Ev]) {
        for ev in events {
            match ev {
                Open(tag) => {
                    builder.on_tag(true, tag, buf);
                }
                Close(tag) => {
                    builder.on_tag(false, tag, buf);
                }
                Text(text) => buf.push_str(text),
            }
        }
    }

    fn layout(events: &[Ev]) -> RichTextBuffer {
        let mut buf = RichTextBuffer::new();
        run(&mut ListLayoutBuilder::default(), &mut buf, events);
        buf
    }

    fn margins(buf: &RichTextBuffer) -> Vec<(usize, usize, i32, i32)> {
        buf.annotations()
            .iter()
            .filter_map(|a| match a.style {
                Style::LeadingMargin { first, rest } => Some((a.start, a.end, first, rest)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn ordered_list() {
        let buf = layout(&[
            Open("ol"),
            Open("li"),
            Text("A"),
            Close("li"),
            Open("li"),
            Text("B"),
            Close("li"),
            Close("ol"),
        ]);
        assert_eq!(buf.text(), "1. A\n2. B\n\n");
        // 20 base + 40 ordered marker
        assert_eq!(margins(&buf), vec![(0, 5, 20, 60), (5, 10, 20, 60)]);
    }

    #[test]
    fn unordered_list() {
        let buf = layout(&[Open("ul"), Open("li"), Text("X"), Close("li"), Close("ul")]);
        assert_eq!(buf.text(), "•  X\n\n");
        assert_eq!(margins(&buf), vec![(0, "•  X\n".len(), 20, 50)]);
    }

    #[test]
    fn nested_indent_grows_by_base_plus_marker() {
        let buf = layout(&[
            Open("ul"),
            Open("li"),
            Text("X"),
            Close("li"),
            Open("ul"),
            Open("li"),
            Text("Y"),
            Close("li"),
            Close("ul"),
            Close("ul"),
        ]);
        let m = margins(&buf);
        assert_eq!(m.len(), 2);
        assert_eq!(m[1].3 - m[0].3, BASE_INDENT + 30);
        assert_eq!(m[1].2 - m[0].2, BASE_INDENT + 30);
        assert_eq!(buf.text(), "•  X\n•  Y\n\n");
    }

    #[test]
    fn indent_formula_for_mixed_nesting() {
        let metrics = MarkerMetrics::new(33, 11);
        let mut builder = ListLayoutBuilder::new(metrics).with_base_indent(7);
        let mut buf = RichTextBuffer::new();
        let kinds = [true, false, true, true, false];
        let mut expected = 0;
        let mut last = 0;
        for ordered in kinds {
            builder.on_tag(true, if ordered { "ol" } else { "ul" }, &mut buf);
            expected += 7 + metrics.width(ordered);
            let indent = builder.current().unwrap().indent;
            assert_eq!(indent, expected);
            assert!(indent > last);
            last = indent;
        }
        assert_eq!(builder.depth(), kinds.len());
    }

    #[test]
    fn non_positive_settings_still_indent_deeper() {
        let metrics = MarkerMetrics::new(-40, -30);
        let mut builder = ListLayoutBuilder::new(metrics).with_base_indent(-20);
        let mut buf = RichTextBuffer::new();
        let mut last = 0;
        for tag in ["ul", "ol", "ul"] {
            builder.on_tag(true, tag, &mut buf);
            let indent = builder.current().unwrap().indent;
            assert!(indent > last);
            last = indent;
        }
    }

    #[test]
    fn numbering_restarts_per_list() {
        let buf = layout(&[
            Open("ol"),
            Open("li"),
            Text("a"),
            Open("ol"),
            Open("li"),
            Text("b"),
            Close("li"),
            Open("li"),
            Text("c"),
            Close("li"),
            Close("ol"),
            Close("li"),
            Open("li"),
            Text("d"),
            Close("li"),
            Close("ol"),
            Open("ol"),
            Open("li"),
            Text("e"),
            Close("li"),
            Close("ol"),
        ]);
        assert_eq!(buf.text(), "1. a\n1. b\n2. c\n2. d\n\n\n1. e\n\n");
    }

    #[test]
    fn unmatched_item_close_is_noop() {
        let mut buf = RichTextBuffer::new();
        buf.push_str("text");
        let mut builder = ListLayoutBuilder::default();
        builder.on_tag(false, "li", &mut buf);
        assert_eq!(buf.text(), "text");
        assert!(buf.annotations().is_empty());

        builder.on_tag(true, "ul", &mut buf);
        let before = buf.clone();
        builder.on_tag(false, "li", &mut buf);
        assert_eq!(buf, before);
    }

    #[test]
    fn unmatched_list_close_acts_as_root_close() {
        let mut buf = RichTextBuffer::new();
        buf.push_str("text");
        let mut builder = ListLayoutBuilder::default();
        builder.on_tag(false, "ul", &mut buf);
        assert_eq!(builder.depth(), 0);
        assert_eq!(buf.text(), "text\n\n");
        assert!(buf.annotations().is_empty());

        builder.on_tag(false, "ol", &mut buf);
        assert_eq!(builder.depth(), 0);
        assert_eq!(buf.text(), "text\n\n\n");
    }

    #[test]
    fn list_after_text_starts_new_paragraph() {
        let mut buf = RichTextBuffer::new();
        buf.push_str("intro");
        run(
            &mut ListLayoutBuilder::default(),
            &mut buf,
            &[Open("ul"), Open("li"), Text("x"), Close("li"), Close("ul")],
        );
        assert_eq!(buf.text(), "intro\n•  x\n\n");
        assert_eq!(margins(&buf)[0].0, "intro\n".len());
    }

    #[test]
    fn tags_are_case_insensitive() {
        let buf = layout(&[Open("OL"), Open("Li"), Text("A"), Close("LI"), Close("oL")]);
        assert_eq!(buf.text(), "1. A\n\n");
    }

    #[test]
    fn other_tags_are_ignored() {
        let mut buf = RichTextBuffer::new();
        let mut builder = ListLayoutBuilder::default();
        assert!(!builder.on_tag(true, "b", &mut buf));
        assert!(!builder.on_tag(true, "ulc", &mut buf));
        assert!(builder.on_tag(true, "ul", &mut buf));
        assert_eq!(builder.depth(), 1);
    }

    #[test]
    fn li_outside_list_is_ignored() {
        let buf = layout(&[Open("li"), Text("loose"), Close("li")]);
        assert_eq!(buf.text(), "loose");
        assert!(buf.annotations().is_empty());
    }

    #[test]
    fn custom_bullet() {
        let mut buf = RichTextBuffer::new();
        let mut builder = ListLayoutBuilder::default().with_bullet("-");
        run(&mut builder, &mut buf, &[Open("ul"), Open("li"), Text("x"), Close("li")]);
        assert_eq!(buf.text(), "-  x\n");
        assert_eq!(
            buf.annotations(),
            &[Annotation {
                start: 0,
                end: 5,
                style: Style::LeadingMargin { first: 20, rest: 50 },
            }]
        );
    }
}
