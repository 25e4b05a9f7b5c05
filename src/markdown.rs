use std::borrow::Cow;

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag as MdTag, TagEnd};

use crate::event::{scan_html, Tag, TagEvent};

/// Lower markdown onto the tag events the HTML path produces, so both go
/// through the same renderer.
pub fn markdown_events(markdown: &str) -> Vec<TagEvent<'_>> {
    let parser = Parser::new_ext(markdown, Options::empty());
    let mut events = Vec::new();

    for event in parser {
        lower_event(event, &mut events);
    }

    events
}

fn cow(s: CowStr<'_>) -> Cow<'_, str> {
    match s {
        CowStr::Borrowed(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.into_string()),
    }
}

fn open(name: &'static str) -> TagEvent<'static> {
    TagEvent::Open(Tag::new(name))
}

fn close(name: &'static str) -> TagEvent<'static> {
    TagEvent::Close(Cow::Borrowed(name))
}

fn lower_event<'a>(event: Event<'a>, out: &mut Vec<TagEvent<'a>>) {
    match event {
        Event::Start(MdTag::Paragraph) => out.push(open("p")),
        Event::End(TagEnd::Paragraph) => out.push(close("p")),

        // Headings render as a bold paragraph
        Event::Start(MdTag::Heading { .. }) => {
            out.push(open("p"));
            out.push(open("b"));
        }
        Event::End(TagEnd::Heading(_)) => {
            out.push(close("b"));
            out.push(close("p"));
        }

        Event::Start(MdTag::List(first_item)) => {
            out.push(open(if first_item.is_some() { "ol" } else { "ul" }));
        }
        Event::End(TagEnd::List(ordered)) => {
            out.push(close(if ordered { "ol" } else { "ul" }));
        }
        Event::Start(MdTag::Item) => out.push(open("li")),
        Event::End(TagEnd::Item) => out.push(close("li")),

        Event::Start(MdTag::Strong) => out.push(open("b")),
        Event::End(TagEnd::Strong) => out.push(close("b")),
        Event::Start(MdTag::Emphasis) => out.push(open("i")),
        Event::End(TagEnd::Emphasis) => out.push(close("i")),

        Event::Start(MdTag::Link { dest_url, .. }) => {
            out.push(TagEvent::Open(Tag::new("a").with_href(cow(dest_url))));
        }
        Event::End(TagEnd::Link) => out.push(close("a")),

        Event::Text(text) | Event::Code(text) => out.push(TagEvent::Text(cow(text))),
        Event::SoftBreak => out.push(TagEvent::Text(Cow::Borrowed(" "))),
        Event::HardBreak => out.push(open("br")),

        // Inline markup embedded in the markdown goes through the HTML scanner
        Event::InlineHtml(html) | Event::Html(html) => match html {
            CowStr::Borrowed(html) => out.extend(scan_html(html)),
            other => {
                for event in scan_html(&other) {
                    out.push(event.into_owned());
                }
            }
        },

        // Ignore other events
        _ => {}
    }
}
