//! Hand-rolled byte-level scanners for the constructs the block and inline parsers need to
//! recognize at the start of a line or inline span: ATX/setext headings, thematic breaks, fence
//! markers, HTML block boundaries, footnote-definition labels, autolink schemes, raw HTML tags,
//! and the safe-mode dangerous-URL check.
//!
//! Each scanner takes the remaining bytes of a line (or inline span) and returns the number of
//! bytes of *match*, not including any trailing content the caller still needs to process --
//! callers combine these with their own indent/offset bookkeeping.

use crate::ctype::isspace;

/// `^#{1,6}([ \t].*|\s*)$` -- returns the byte offset of the first non-`#`, non-leading-space
/// character if the construct is a valid ATX heading opener; i.e. "is this a run of 1-6 `#`
/// followed by either nothing, or by a space/tab".
pub fn atx_heading_start(line: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < line.len() && line[i] == b'#' {
        i += 1;
    }
    if i == 0 || i > 6 {
        return None;
    }
    if i == line.len() {
        return Some(i);
    }
    if line[i] == b' ' || line[i] == b'\t' {
        return Some(i);
    }
    None
}

pub enum SetextChar {
    Equals,
    Hyphen,
}

/// `^(=+|-+) *$`
pub fn setext_heading_line(line: &[u8]) -> Option<SetextChar> {
    if line.is_empty() {
        return None;
    }
    let c = line[0];
    if c != b'=' && c != b'-' {
        return None;
    }
    let mut i = 0;
    while i < line.len() && line[i] == c {
        i += 1;
    }
    while i < line.len() && (line[i] == b' ' || line[i] == b'\t') {
        i += 1;
    }
    if i != line.len() {
        return None;
    }
    Some(if c == b'=' {
        SetextChar::Equals
    } else {
        SetextChar::Hyphen
    })
}

/// `^ {0,3}([*_-])( *\1){2,} *$` (after leading indent has already been stripped by the caller).
pub fn thematic_break(line: &[u8]) -> Option<usize> {
    if line.is_empty() {
        return None;
    }
    let c = line[0];
    if c != b'*' && c != b'-' && c != b'_' {
        return None;
    }
    let mut count = 0;
    let mut i = 0;
    while i < line.len() {
        match line[i] {
            ch if ch == c => count += 1,
            b' ' | b'\t' => {}
            _ => return None,
        }
        i += 1;
    }
    if count >= 3 {
        Some(line.len())
    } else {
        None
    }
}

/// Matches a fence-opening run of backticks or tildes (length >= 3), returning
/// `(fence_char, length, offset of info string)`.
pub fn open_code_fence(line: &[u8]) -> Option<(u8, usize)> {
    if line.is_empty() {
        return None;
    }
    let c = line[0];
    if c != b'`' && c != b'~' {
        return None;
    }
    let mut i = 0;
    while i < line.len() && line[i] == c {
        i += 1;
    }
    if i < 3 {
        return None;
    }
    // A backtick fence's info string may not itself contain a backtick.
    if c == b'`' && line[i..].contains(&b'`') {
        return None;
    }
    Some((c, i))
}

/// Matches a fence-closing run: `^ {0,3}(\`{3,}|~{3,}) *$` with at least `fence_length`
/// characters of the same kind as the opening fence.
pub fn close_code_fence(line: &[u8], fence_char: u8, fence_length: usize) -> bool {
    let mut i = 0;
    while i < line.len() && line[i] == fence_char {
        i += 1;
    }
    if i < 3 || i < fence_length {
        return false;
    }
    while i < line.len() && (line[i] == b' ' || line[i] == b'\t') {
        i += 1;
    }
    i == line.len()
}

/// Classifies an HTML block opener at the start of a line into one of CommonMark's seven types
/// (distilled spec §4.2.9). Type 7 is checked separately via `html_block_start_7` since it is
/// only a valid opener when not interrupting a paragraph.
pub fn html_block_start(line: &[u8]) -> Option<u8> {
    if line.is_empty() || line[0] != b'<' {
        return None;
    }

    let rest = &line[1..];
    let lower: Vec<u8> = rest
        .iter()
        .take(10)
        .map(|b| b.to_ascii_lowercase())
        .collect();

    const TYPE1_TAGS: [&[u8]; 4] = [b"script", b"pre", b"style", b"textarea"];
    for tag in TYPE1_TAGS.iter() {
        if starts_with_tag_boundary(&lower, tag) {
            return Some(1);
        }
    }

    if rest.starts_with(b"!--") {
        return Some(2);
    }
    if rest.first() == Some(&b'?') {
        return Some(3);
    }
    if !rest.is_empty() && rest[0] == b'!' && rest.get(1).map_or(false, |b| b.is_ascii_uppercase()) {
        return Some(4);
    }
    if rest.starts_with(b"![CDATA[") {
        return Some(5);
    }

    const TYPE6_TAGS: [&[u8]; 62] = [
        b"address", b"article", b"aside", b"base", b"basefont", b"blockquote", b"body", b"caption",
        b"center", b"col", b"colgroup", b"dd", b"details", b"dialog", b"dir", b"div", b"dl", b"dt",
        b"fieldset", b"figcaption", b"figure", b"footer", b"form", b"frame", b"frameset", b"h1",
        b"h2", b"h3", b"h4", b"h5", b"h6", b"head", b"header", b"hr", b"html", b"iframe", b"legend",
        b"li", b"link", b"main", b"menu", b"menuitem", b"nav", b"noframes", b"ol", b"optgroup",
        b"option", b"p", b"param", b"search", b"section", b"summary", b"table", b"tbody", b"td",
        b"tfoot", b"th", b"thead", b"title", b"tr", b"track", b"ul",
    ];
    let mut j = 0;
    if j < rest.len() && rest[j] == b'/' {
        j += 1;
    }
    let tag_start = j;
    while j < rest.len() && (rest[j].is_ascii_alphanumeric() || rest[j] == b'-') {
        j += 1;
    }
    if j > tag_start {
        let tag_lower = rest[tag_start..j].to_ascii_lowercase();
        if TYPE6_TAGS.iter().any(|t| *t == tag_lower.as_slice()) {
            let boundary_ok = j == rest.len()
                || isspace(rest[j])
                || rest[j] == b'>'
                || (rest[j] == b'/' && rest.get(j + 1) == Some(&b'>'));
            if boundary_ok {
                return Some(6);
            }
        }
    }

    None
}

fn starts_with_tag_boundary(lower: &[u8], tag: &[u8]) -> bool {
    if !lower.starts_with(tag) {
        return false;
    }
    match lower.get(tag.len()) {
        None => true,
        Some(&b) => isspace(b) || b == b'>' || b == b'/',
    }
}

/// Type 7: any complete, well-formed open or closing tag (and nothing else) on the line.
pub fn html_block_start_7(line: &[u8]) -> bool {
    match html_tag(line) {
        Some(n) => {
            let rest = &line[n..];
            rest.iter().all(|&b| b == b' ' || b == b'\t')
        }
        None => false,
    }
}

pub fn html_block_end_1(line: &[u8]) -> bool {
    contains_ci(line, b"</script>") || contains_ci(line, b"</pre>") || contains_ci(line, b"</style>")
}

pub fn html_block_end_2(line: &[u8]) -> bool {
    contains(line, b"-->")
}

pub fn html_block_end_3(line: &[u8]) -> bool {
    contains(line, b"?>")
}

pub fn html_block_end_4(line: &[u8]) -> bool {
    line.contains(&b'>')
}

pub fn html_block_end_5(line: &[u8]) -> bool {
    contains(line, b"]]>")
}

fn contains(hay: &[u8], needle: &[u8]) -> bool {
    hay.windows(needle.len()).any(|w| w == needle)
}

fn contains_ci(hay: &[u8], needle: &[u8]) -> bool {
    let lower: Vec<u8> = hay.iter().map(|b| b.to_ascii_lowercase()).collect();
    contains(&lower, needle)
}

/// `\[\^([^\]]{1,999})\]:` -- returns the byte length consumed (up to and including the `:`) if
/// the line starts with a footnote-definition label.
pub fn footnote_definition(line: &[u8]) -> Option<usize> {
    if line.first() != Some(&b'[') || line.get(1) != Some(&b'^') {
        return None;
    }
    let mut i = 2;
    let mut len = 0;
    while i < line.len() && line[i] != b']' && len < 999 {
        if line[i] == b'\\' && i + 1 < line.len() && matches!(line[i + 1], b'[' | b']' | b'\\') {
            i += 2;
        } else {
            i += 1;
        }
        len += 1;
    }
    if len == 0 || i >= line.len() || line[i] != b']' {
        return None;
    }
    i += 1;
    if line.get(i) == Some(&b':') {
        Some(i + 1)
    } else {
        None
    }
}

/// `[A-Za-z][A-Za-z0-9+.-]{1,31}` immediately followed by `:` -- an autolink URI scheme.
pub fn scheme(line: &[u8]) -> Option<usize> {
    if line.is_empty() || !line[0].is_ascii_alphabetic() {
        return None;
    }
    let mut i = 1;
    while i < line.len() && i <= 32 {
        match line[i] {
            b':' if i >= 2 => return Some(i),
            b if b.is_ascii_alphanumeric() || b == b'+' || b == b'.' || b == b'-' => i += 1,
            _ => return None,
        }
    }
    None
}

/// The full `scheme:…` span inside `<…>`, up to (not including) the closing `>`.
pub fn autolink_uri(line: &[u8]) -> Option<usize> {
    let scheme_len = scheme(line)?;
    let mut i = scheme_len + 1;
    while i < line.len() {
        match line[i] {
            b'>' => return Some(i),
            b' ' | b'\t' | b'\n' | b'<' => return None,
            _ => i += 1,
        }
    }
    None
}

/// A conservative RFC-5322-subset email autolink body, up to (not including) the closing `>`.
pub fn autolink_email(line: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < line.len() && is_email_local_char(line[i]) {
        i += 1;
    }
    if i == 0 || i >= line.len() || line[i] != b'@' {
        return None;
    }
    i += 1;

    let label = |bytes: &[u8], mut j: usize| -> Option<usize> {
        let start = j;
        if j >= bytes.len() || !(bytes[j].is_ascii_alphanumeric()) {
            return None;
        }
        j += 1;
        while j < bytes.len() && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'-') {
            j += 1;
        }
        if bytes[j - 1] == b'-' {
            return None;
        }
        let _ = start;
        Some(j)
    };

    let mut j = label(line, i)?;
    let mut saw_dot = false;
    loop {
        if j < line.len() && line[j] == b'.' {
            let next = label(line, j + 1);
            match next {
                Some(n) => {
                    saw_dot = true;
                    j = n;
                }
                None => break,
            }
        } else {
            break;
        }
    }
    if !saw_dot {
        return None;
    }
    if line.get(j) == Some(&b'>') {
        Some(j)
    } else {
        None
    }
}

fn is_email_local_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b".!#$%&'*+/=?^_`{|}~-".as_bytes().contains(&b)
}

/// Recognizes a raw HTML open tag, close tag, comment, processing instruction, CDATA section,
/// or declaration, starting with `<`. Returns the total length matched (including delimiters).
pub fn html_tag(line: &[u8]) -> Option<usize> {
    if line.first() != Some(&b'<') {
        return None;
    }

    if line.starts_with(b"<!--") {
        // `<!---->` and `<!--->` are valid per distilled spec §4.3.4.
        let rest = &line[4..];
        if rest.starts_with(b"->") {
            return Some(6);
        }
        let mut i = 0;
        while i + 2 < rest.len() {
            if &rest[i..i + 3] == b"-->" {
                return Some(4 + i + 3);
            }
            i += 1;
        }
        return None;
    }

    if line.starts_with(b"<?") {
        let rest = &line[2..];
        let end = find(rest, b"?>")?;
        return Some(2 + end + 2);
    }

    if line.starts_with(b"<![CDATA[") {
        let rest = &line[9..];
        let end = find(rest, b"]]>")?;
        return Some(9 + end + 3);
    }

    if line.len() > 2 && line[1] == b'!' && line[2].is_ascii_uppercase() {
        let end = line.iter().position(|&b| b == b'>')?;
        return Some(end + 1);
    }

    let mut i = 1;
    let closing = line.get(1) == Some(&b'/');
    if closing {
        i = 2;
    }

    let name_start = i;
    while i < line.len() && (line[i].is_ascii_alphanumeric() || line[i] == b'-') {
        i += 1;
    }
    if i == name_start {
        return None;
    }

    if closing {
        while i < line.len() && isspace(line[i]) {
            i += 1;
        }
        return if line.get(i) == Some(&b'>') { Some(i + 1) } else { None };
    }

    loop {
        while i < line.len() && isspace(line[i]) {
            i += 1;
        }
        if line.get(i) == Some(&b'/') && line.get(i + 1) == Some(&b'>') {
            return Some(i + 2);
        }
        if line.get(i) == Some(&b'>') {
            return Some(i + 1);
        }

        let attr_start = i;
        while i < line.len() && (line[i].is_ascii_alphanumeric() || matches!(line[i], b'_' | b':' | b'-')) {
            i += 1;
        }
        if i == attr_start {
            return None;
        }

        while i < line.len() && isspace(line[i]) {
            i += 1;
        }
        if line.get(i) == Some(&b'=') {
            i += 1;
            while i < line.len() && isspace(line[i]) {
                i += 1;
            }
            match line.get(i) {
                Some(&q @ b'"') | Some(&q @ b'\'') => {
                    i += 1;
                    let start = i;
                    while i < line.len() && line[i] != q {
                        i += 1;
                    }
                    if i >= line.len() {
                        return None;
                    }
                    let _ = start;
                    i += 1;
                }
                Some(_) => {
                    let start = i;
                    while i < line.len() && !isspace(line[i]) && line[i] != b'>' {
                        i += 1;
                    }
                    if i == start {
                        return None;
                    }
                }
                None => return None,
            }
        }
    }
}

fn find(hay: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || hay.len() < needle.len() {
        return None;
    }
    (0..=hay.len() - needle.len()).find(|&i| &hay[i..i + needle.len()] == needle)
}

/// Conservative deny-list used by the renderer's safe-mode / `escape_href` URL scrubbing:
/// flags `javascript:`, `vbscript:`, `file:`, and `data:` (other than `data:image/...`) schemes.
pub fn dangerous_url(url: &str) -> Option<usize> {
    let lower = url.to_ascii_lowercase();
    const BANNED: [&str; 3] = ["javascript:", "vbscript:", "file:"];
    for scheme in BANNED.iter() {
        if lower.starts_with(scheme) {
            return Some(scheme.len());
        }
    }
    if lower.starts_with("data:") && !lower.starts_with("data:image/") {
        return Some(5);
    }
    None
}

/// Recognizes `[...]` forming the host part of an IPv6 literal URL at the start of `url`, for
/// `escape_href`'s "leave `[`/`]` unescaped around an IPv6 address" rule.
pub fn ipv6_url_start(url: &str) -> Option<usize> {
    ipv6_url_start_impl(url, &["http://", "https://"])
}

pub fn ipv6_relaxed_url_start(url: &str) -> Option<usize> {
    ipv6_url_start_impl(url, &[])
}

fn ipv6_url_start_impl(url: &str, schemes: &[&str]) -> Option<usize> {
    let after_scheme = if schemes.is_empty() {
        let colon_slashslash = url.find("://")?;
        colon_slashslash + 3
    } else {
        let matched = schemes.iter().find(|s| url.starts_with(**s))?;
        matched.len()
    };

    let bytes = url.as_bytes();
    if bytes.get(after_scheme) != Some(&b'[') {
        return None;
    }
    let close = bytes[after_scheme..].iter().position(|&b| b == b']')?;
    Some(after_scheme + close + 1)
}

