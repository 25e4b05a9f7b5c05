//! Tag events and a lenient scanner producing them from HTML fragments.
//!
//! The scanner is not an HTML parser: there is no tree construction, no
//! implied end tags and no error recovery beyond "treat it as text". It is
//! enough to drive the renderer over label-sized markup.
//!
//! Supported tag-name characters (ASCII only): `[A-Za-z0-9:_-]`.

use std::borrow::Cow;

/// An opening tag. Only the attributes the renderer uses are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    /// Lowercased tag name.
    pub name: Cow<'a, str>,
    pub href: Option<Cow<'a, str>>,
}

impl<'a> Tag<'a> {
    pub fn new(name: impl Into<Cow<'a, str>>) -> Self {
        Self {
            name: name.into(),
            href: None,
        }
    }

    pub fn with_href(mut self, href: impl Into<Cow<'a, str>>) -> Self {
        self.href = Some(href.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagEvent<'a> {
    Open(Tag<'a>),
    /// Lowercased tag name.
    Close(Cow<'a, str>),
    /// Text with character references already decoded.
    Text(Cow<'a, str>),
}

impl TagEvent<'_> {
    pub fn into_owned(self) -> TagEvent<'static> {
        fn own(s: Cow<'_, str>) -> Cow<'static, str> {
            Cow::Owned(s.into_owned())
        }
        match self {
            TagEvent::Open(tag) => TagEvent::Open(Tag {
                name: own(tag.name),
                href: tag.href.map(own),
            }),
            TagEvent::Close(name) => TagEvent::Close(own(name)),
            TagEvent::Text(text) => TagEvent::Text(own(text)),
        }
    }
}

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

/// Scan an HTML fragment into tag events.
pub fn scan_html(input: &str) -> HtmlScanner<'_> {
    HtmlScanner {
        input,
        pos: 0,
        pending_close: None,
    }
}

pub struct HtmlScanner<'a> {
    input: &'a str,
    pos: usize,
    // Close event owed for a self-closing tag like `<br/>`.
    pending_close: Option<Cow<'a, str>>,
}

impl<'a> Iterator for HtmlScanner<'a> {
    type Item = TagEvent<'a>;

    fn next(&mut self) -> Option<TagEvent<'a>> {
        if let Some(name) = self.pending_close.take() {
            return Some(TagEvent::Close(name));
        }
        let input = self.input;
        while self.pos < input.len() {
            let rest = &input[self.pos..];
            if !rest.starts_with('<') {
                let end = rest.find('<').unwrap_or(rest.len());
                self.pos += end;
                return Some(TagEvent::Text(decode_entities(&rest[..end])));
            }
            if rest.starts_with(COMMENT_START) {
                self.pos += match rest[COMMENT_START.len()..].find(COMMENT_END) {
                    Some(i) => COMMENT_START.len() + i + COMMENT_END.len(),
                    None => rest.len(),
                };
                continue;
            }
            if rest.starts_with("<!") || rest.starts_with("<?") {
                // doctype / processing instruction
                self.pos += rest.find('>').map_or(rest.len(), |i| i + 1);
                continue;
            }
            match scan_tag(rest) {
                Some((consumed, event, self_closing)) => {
                    self.pos += consumed;
                    if self_closing {
                        if let TagEvent::Open(tag) = &event {
                            self.pending_close = Some(tag.name.clone());
                        }
                    }
                    return Some(event);
                }
                None => {
                    // A lone `<` is literal text up to the next candidate tag.
                    let end = rest[1..].find('<').map_or(rest.len(), |i| i + 1);
                    self.pos += end;
                    return Some(TagEvent::Text(decode_entities(&rest[..end])));
                }
            }
        }
        None
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b':' | b'_' | b'-')
}

fn lowercase(name: &str) -> Cow<'_, str> {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(name.to_ascii_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

/// Scan a tag at the start of `input` (which begins with `<`). Returns bytes
/// consumed, the event, and whether the tag was self-closing.
fn scan_tag(input: &str) -> Option<(usize, TagEvent<'_>, bool)> {
    let bytes = input.as_bytes();
    let closing = bytes.get(1) == Some(&b'/');
    let name_start = if closing { 2 } else { 1 };
    if !bytes.get(name_start)?.is_ascii_alphabetic() {
        return None;
    }
    let mut i = name_start;
    while i < bytes.len() && is_name_byte(bytes[i]) {
        i += 1;
    }
    let name = lowercase(&input[name_start..i]);

    let mut href = None;
    let mut self_closing = false;
    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        match bytes.get(i)? {
            b'>' => {
                i += 1;
                break;
            }
            b'/' => {
                self_closing = true;
                i += 1;
                continue;
            }
            _ => {}
        }
        self_closing = false;
        let attr_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            i += 1;
        }
        let attr = &input[attr_start..i];
        if attr.is_empty() {
            // stray `=`
            i += 1;
            continue;
        }
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if bytes.get(i) != Some(&b'=') {
            continue;
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let value = match bytes.get(i)? {
            quote @ (b'"' | b'\'') => {
                let start = i + 1;
                let len = input[start..].find(*quote as char)?;
                i = start + len + 1;
                &input[start..start + len]
            }
            _ => {
                let start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    i += 1;
                }
                &input[start..i]
            }
        };
        if attr.eq_ignore_ascii_case("href") {
            href = Some(decode_entities(value));
        }
    }

    let event = if closing {
        TagEvent::Close(name)
    } else {
        TagEvent::Open(Tag { name, href })
    };
    Some((i, event, self_closing && !closing))
}

/// Decode character references. Unknown references are kept as written.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match rest.find(';').and_then(|semi| Some((decode_reference(&rest[1..semi])?, semi))) {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code);
    }
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "bull" => '•',
        _ => return None,
    })
}
