use crate::buffer::{RichTextBuffer, Style};
use crate::config::Config;
use crate::event::{Tag, TagEvent};
use crate::list::{ListLayoutBuilder, BASE_INDENT, DEFAULT_BULLET};
use crate::metrics::MarkerMetrics;

/// Layout knobs that don't depend on a font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub base_indent: i32,
    pub bullet: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            base_indent: BASE_INDENT,
            bullet: DEFAULT_BULLET.to_string(),
        }
    }
}

impl From<&Config> for RenderOptions {
    fn from(config: &Config) -> Self {
        Self {
            base_indent: config.list.base_indent,
            bullet: config.list.bullet.clone(),
        }
    }
}

/// Render tag events into a rich-text buffer.
///
/// Never fails: unknown tags are skipped and mismatched closes ignored.
pub fn render<'a>(
    events: impl IntoIterator<Item = TagEvent<'a>>,
    metrics: MarkerMetrics,
    options: &RenderOptions,
) -> RichTextBuffer {
    let mut buf = RichTextBuffer::new();
    let mut state = RenderState {
        lists: ListLayoutBuilder::new(metrics)
            .with_base_indent(options.base_indent)
            .with_bullet(options.bullet.as_str()),
        inline_stack: Vec::new(),
        marker_end: None,
    };

    for event in events {
        process_event(event, &mut state, &mut buf);
    }

    // Close formatting left open by truncated markup
    let end = buf.len();
    for open in state.inline_stack.drain(..).rev() {
        open.finish(end, &mut buf);
    }

    // The block model leaves one newline behind the last block
    if buf.last_char() == Some('\n') {
        buf.pop();
    }

    buf
}

struct RenderState {
    lists: ListLayoutBuilder,
    // Stack for nested formatting (bold, italic, links)
    inline_stack: Vec<OpenInline>,
    // Buffer length right after the latest item marker
    marker_end: Option<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum InlineKind {
    Bold,
    Italic,
    Link,
}

struct OpenInline {
    kind: InlineKind,
    start: usize,
    url: Option<String>,
}

impl OpenInline {
    fn finish(self, end: usize, buf: &mut RichTextBuffer) {
        if self.start >= end {
            return;
        }
        let style = match self.kind {
            InlineKind::Bold => Style::Bold,
            InlineKind::Italic => Style::Italic,
            InlineKind::Link => match self.url {
                Some(url) => Style::Link { url },
                // Links without a target render as plain text
                None => return,
            },
        };
        buf.annotate(self.start..end, style);
    }
}

const INLINE_TAGS: [(&str, InlineKind); 5] = [
    ("b", InlineKind::Bold),
    ("strong", InlineKind::Bold),
    ("i", InlineKind::Italic),
    ("em", InlineKind::Italic),
    ("a", InlineKind::Link),
];

fn inline_kind(name: &str) -> Option<InlineKind> {
    INLINE_TAGS
        .iter()
        .find(|(tag, _)| tag.eq_ignore_ascii_case(name))
        .map(|&(_, kind)| kind)
}

fn is_block(name: &str) -> bool {
    name.eq_ignore_ascii_case("p") || name.eq_ignore_ascii_case("div")
}

fn process_event(event: TagEvent<'_>, state: &mut RenderState, buf: &mut RichTextBuffer) {
    match event {
        TagEvent::Text(text) => push_text(&text, buf),

        TagEvent::Open(Tag { name, href }) => {
            if state.lists.on_tag(true, &name, buf) {
                if name.eq_ignore_ascii_case("li") {
                    state.marker_end = Some(buf.len());
                }
            } else if let Some(kind) = inline_kind(&name) {
                state.inline_stack.push(OpenInline {
                    kind,
                    start: buf.len(),
                    url: href.map(|url| url.into_owned()),
                });
            } else if name.eq_ignore_ascii_case("br") {
                buf.push('\n');
            } else if is_block(&name) {
                // A paragraph directly inside an item stays on the marker's line
                if state.marker_end != Some(buf.len()) {
                    buf.ensure_paragraph_boundary();
                }
            } else {
                tracing::trace!(tag = %name, "skipping unsupported tag");
            }
        }

        TagEvent::Close(name) => {
            if state.lists.on_tag(false, &name, buf) {
                state.marker_end = None;
            } else if let Some(kind) = inline_kind(&name) {
                match state.inline_stack.iter().rposition(|open| open.kind == kind) {
                    Some(i) => {
                        let open = state.inline_stack.remove(i);
                        open.finish(buf.len(), buf);
                    }
                    None => tracing::debug!(tag = %name, "close without matching open"),
                }
            } else if is_block(&name) {
                buf.ensure_paragraph_boundary();
            }
        }
    }
}

/// Append text, collapsing ASCII whitespace runs the way an HTML renderer
/// does. Whitespace at the start of a line or after a space is dropped.
fn push_text(text: &str, buf: &mut RichTextBuffer) {
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_ascii_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            push_space(buf);
            pending_space = false;
        }
        buf.push(ch);
    }
    if pending_space {
        push_space(buf);
    }
}

fn push_space(buf: &mut RichTextBuffer) {
    match buf.last_char() {
        None | Some(' ' | '\n') => {}
        Some(_) => buf.push(' '),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::scan_html;

    fn render_default(html: &str) -> RichTextBuffer {
        render(scan_html(html), MarkerMetrics::default(), &RenderOptions::default())
    }

    #[test]
    fn ordered_list_scenario() {
        let buf = render_default("<ol><li>A</li><li>B</li></ol>");
        assert_eq!(buf.text(), "1. A\n2. B\n");
        let margin = Style::LeadingMargin { first: 20, rest: 60 };
        assert_eq!(buf.annotations().len(), 2);
        assert_eq!(buf.annotations()[0].range(), 0..5);
        assert_eq!(buf.annotations()[1].range(), 5..10);
        assert!(buf.annotations().iter().all(|a| a.style == margin));
    }

    #[test]
    fn nested_list_scenario() {
        let buf = render_default("<ul><li>X</li><ul><li>Y</li></ul></ul>");
        let rest: Vec<i32> = buf
            .annotations()
            .iter()
            .map(|a| match a.style {
                Style::LeadingMargin { rest, .. } => rest,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(rest, vec![50, 100]);
        assert_eq!(rest[1] - rest[0], BASE_INDENT + MarkerMetrics::default().unordered);
    }

    #[test]
    fn source_whitespace_is_collapsed() {
        let buf = render_default("<ul>\n  <li>One\n    two</li>\n  <li>Three</li>\n</ul>\n");
        assert_eq!(buf.text(), "•  One two\n•  Three\n");
    }

    #[test]
    fn text_before_and_after_list() {
        let buf = render_default("Intro<ul><li>x</li></ul>Outro");
        assert_eq!(buf.text(), "Intro\n•  x\n\nOutro");
    }

    #[test]
    fn inline_styles() {
        let buf = render_default("a <b>bold</b> <i>it</i> <a href=\"https://e.x\">link</a>");
        assert_eq!(buf.text(), "a bold it link");
        let styles: Vec<_> = buf
            .annotations()
            .iter()
            .map(|a| (&buf.text()[a.range()], a.style.clone()))
            .collect();
        assert_eq!(
            styles,
            vec![
                ("bold", Style::Bold),
                ("it", Style::Italic),
                ("link", Style::Link { url: "https://e.x".into() }),
            ]
        );
    }

    #[test]
    fn styles_inside_list_items() {
        let buf = render_default("<ol><li><b>Bold</b> item</li></ol>");
        assert_eq!(buf.text(), "1. Bold item\n");
        let bold = buf.annotations().iter().find(|a| a.style == Style::Bold).unwrap();
        assert_eq!(&buf.text()[bold.range()], "Bold");
    }

    #[test]
    fn link_without_href_is_plain() {
        let buf = render_default("<a>plain</a>");
        assert_eq!(buf.text(), "plain");
        assert!(buf.annotations().is_empty());
    }

    #[test]
    fn misnested_inline_tags() {
        let buf = render_default("<b>x<i>y</b>z</i></b>");
        assert_eq!(buf.text(), "xyz");
        let ranges: Vec<_> = buf.annotations().iter().map(|a| a.range()).collect();
        assert_eq!(ranges, vec![0..2, 1..3]);
    }

    #[test]
    fn unclosed_inline_runs_to_end() {
        let buf = render_default("<b>open");
        assert_eq!(buf.annotations()[0].range(), 0..4);
    }

    #[test]
    fn breaks_and_paragraphs() {
        let buf = render_default("<p>one<br>two</p><p>three</p>");
        assert_eq!(buf.text(), "one\ntwo\nthree");
    }

    #[test]
    fn paragraph_inside_item_keeps_marker_line() {
        let buf = render_default("<ul><li><p>para</p></li></ul>");
        assert_eq!(buf.text(), "•  para\n");
    }

    #[test]
    fn unmatched_closes_are_harmless() {
        let buf = render_default("</li></ol></b>text</ul>");
        assert_eq!(buf.text(), "\ntext\n");
        assert!(buf.annotations().is_empty());
    }

    #[test]
    fn unknown_tags_keep_their_text() {
        let buf = render_default("<span style=\"x\">in</span> <font>side</font>");
        assert_eq!(buf.text(), "in side");
    }

    #[test]
    fn tag_names_are_case_insensitive() {
        let events = vec![
            TagEvent::Open(Tag::new("P")),
            TagEvent::Open(Tag::new("B")),
            TagEvent::Text("x".into()),
            TagEvent::Close("B".into()),
            TagEvent::Open(Tag::new("BR")),
            TagEvent::Open(Tag::new("EM")),
            TagEvent::Text("y".into()),
            TagEvent::Close("Em".into()),
            TagEvent::Close("P".into()),
            TagEvent::Open(Tag::new("Div")),
            TagEvent::Text("z".into()),
        ];
        let buf = render(events, MarkerMetrics::default(), &RenderOptions::default());
        assert_eq!(buf.text(), "x\ny\nz");
        let styles: Vec<_> = buf
            .annotations()
            .iter()
            .map(|a| (&buf.text()[a.range()], a.style.clone()))
            .collect();
        assert_eq!(styles, vec![("x", Style::Bold), ("y", Style::Italic)]);
    }

    #[test]
    fn custom_options() {
        let options = RenderOptions {
            base_indent: 5,
            bullet: "*".into(),
        };
        let buf = render(scan_html("<ul><li>x</li></ul>"), MarkerMetrics::new(10, 10), &options);
        assert_eq!(buf.text(), "*  x\n");
        assert_eq!(
            buf.annotations()[0].style,
            Style::LeadingMargin { first: 5, rest: 15 }
        );
    }
}
