//! Text-cleaning helpers shared by the block and inline parsers: unescaping, URL/title
//! cleaning, whitespace normalization, and link-label normalization.

use crate::ctype::{isspace, ispunct};
use crate::entity;

/// Removes backslashes preceding ASCII punctuation, in place.
pub fn unescape(v: &mut String) {
    let mut r = 0;
    let mut sz = v.len();

    while r < sz {
        if v.as_bytes()[r] == b'\\' && r + 1 < sz && ispunct(v.as_bytes()[r + 1]) {
            v.remove(r);
            sz -= 1;
        }
        if r >= sz {
            break;
        }
        r += 1;
    }
}

/// Whether an extended-autolink match (distilled spec §4.3.8) was a bare email or a URL-like
/// scheme; email autolinks gain a synthetic `mailto:` prefix on their destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutolinkType {
    Uri,
    Email,
}

pub fn clean_autolink(url: &str, kind: AutolinkType) -> String {
    let mut url_string = trim_slice(url).to_string();

    if url_string.is_empty() {
        return url_string;
    }

    let mut buf = String::new();
    if kind == AutolinkType::Email {
        buf += "mailto:";
    }

    buf += &entity::unescape_html(&url_string);
    url_string.clear();
    buf
}

/// Collapses runs of ASCII whitespace to a single space, per the "Normalized label" rule's
/// internal-whitespace-collapsing clause (distilled spec §3) and also used for code span literal
/// cleanup (newlines become spaces there too, handled separately in `parser/inlines.rs`).
pub fn normalize_whitespace(v: &str) -> String {
    let mut last_char_was_space = false;
    let mut r = String::new();

    for c in v.chars() {
        if (c as u32) < 0x80 && isspace(c as u8) {
            if !last_char_was_space {
                r.push(' ');
                last_char_was_space = true;
            }
        } else {
            r.push(c);
            last_char_was_space = false;
        }
    }

    r
}

pub fn remove_trailing_blank_lines(line: &mut String) {
    if line.is_empty() {
        return;
    }

    let mut i = line.len() - 1;
    loop {
        let c = line.as_bytes()[i];

        if c != b' ' && c != b'\t' && !is_line_end_char(c) {
            break;
        }

        if i == 0 {
            line.clear();
            return;
        }

        i -= 1;
    }

    for j in i..line.len() {
        let c = line.as_bytes()[j];

        if !is_line_end_char(c) {
            continue;
        }

        line.truncate(j);
        break;
    }
}

pub fn is_line_end_char(ch: u8) -> bool {
    matches!(ch, 10 | 13)
}

pub fn is_space_or_tab(ch: u8) -> bool {
    matches!(ch, 9 | 32)
}

/// Strips a run of trailing `#` characters from an ATX heading line, per distilled spec §4.2
/// step 4 ("emit heading with trailing `#` run stripped and trimmed").
pub fn chop_trailing_hashtags(line: &mut String) {
    rtrim(line);

    if line.is_empty() {
        return;
    }

    let orig_n = line.len() - 1;
    let mut n = orig_n;

    while line.as_bytes()[n] == b'#' {
        if n == 0 {
            return;
        }
        n -= 1;
    }

    if n != orig_n && is_space_or_tab(line.as_bytes()[n]) {
        line.truncate(n);
        rtrim(line);
    }
}

pub fn rtrim(line: &mut String) {
    let mut len = line.len();
    while len > 0 && isspace(line.as_bytes()[len - 1]) {
        line.pop();
        len -= 1;
    }
}

pub fn ltrim(line: &mut String) {
    while !line.is_empty() && isspace(line.as_bytes()[0]) {
        line.remove(0);
    }
}

pub fn trim(line: &mut String) {
    ltrim(line);
    rtrim(line);
}

pub fn trim_slice(mut i: &str) -> &str {
    while !i.is_empty() && isspace(i.as_bytes()[0]) {
        i = &i[1..];
    }
    while !i.is_empty() && isspace(i.as_bytes()[i.len() - 1]) {
        i = &i[..i.len() - 1];
    }
    i
}

/// Cleans a link/image destination: strips surrounding `<...>`, entity-decodes, then unescapes
/// backslash-escaped punctuation (distilled spec §4.3.5's inline-link-destination handling).
pub fn clean_url(url: &str) -> String {
    let url = trim_slice(url);

    if url.is_empty() {
        return String::new();
    }

    let bytes = url.as_bytes();
    let mut b = if bytes[0] == b'<' && bytes[url.len() - 1] == b'>' {
        entity::unescape_html(&url[1..url.len() - 1])
    } else {
        entity::unescape_html(url)
    };

    unescape(&mut b);
    b
}

/// Cleans a link/image title: strips one layer of matching `'...'`, `(...)`, or `"..."` quoting,
/// entity-decodes, then unescapes.
pub fn clean_title(title: &str) -> String {
    if title.is_empty() {
        return String::new();
    }

    let bytes = title.as_bytes();
    let first = bytes[0];
    let last = bytes[title.len() - 1];

    let mut b = if (first == b'\'' && last == b'\'')
        || (first == b'(' && last == b')')
        || (first == b'"' && last == b'"')
    {
        entity::unescape_html(&title[1..title.len() - 1])
    } else {
        entity::unescape_html(title)
    };

    unescape(&mut b);
    b
}

pub fn is_blank(s: &str) -> bool {
    for &c in s.as_bytes() {
        match c {
            10 | 13 => return true,
            32 | 9 => (),
            _ => return false,
        }
    }
    true
}

/// Normalizes a link-reference or footnote label per distilled spec §3: trim, collapse internal
/// whitespace runs to a single space, and full Unicode case-fold (which maps `U+1E9E` to `"ss"`,
/// matching the spec's called-out special case, since full case folding is defined that way).
pub fn normalize_reference_label(i: &str) -> String {
    let i = trim_slice(i);
    let mut collapsed = String::with_capacity(i.len());
    let mut last_was_whitespace = false;
    for c in i.chars() {
        if c.is_whitespace() {
            if !last_was_whitespace {
                last_was_whitespace = true;
                collapsed.push(' ');
            }
        } else {
            last_was_whitespace = false;
            collapsed.push(c);
        }
    }
    caseless::default_case_fold_str(&collapsed)
}
