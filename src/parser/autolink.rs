//! GFM extended autolinks (distilled spec §4.3.8): bare `www.` hosts, `http`/`https`/`ftp`(`s`)
//! URLs, and bare emails, turned into `Link` nodes by walking the already-built `Text` nodes of
//! a paragraph/heading/table-cell after the main inline pass has run.

use crate::ctype::{isalnum, isspace};
use crate::nodes::{AstNode, NodeLink, NodeValue};
use typed_arena::Arena;

const WWW_SCHEME_REPLACEMENT: &str = "http://";

/// Walks every `Text` descendant of `node` not already inside a `Link`/`Image`/`Code`, looking
/// for autolinkable substrings and splitting matches out into new `Link` nodes.
pub(crate) fn process_autolinks<'a>(arena: &'a Arena<AstNode<'a>>, node: &'a AstNode<'a>) {
    let mut child = node.first_child();
    while let Some(c) = child {
        let next = c.next_sibling();
        match c.data.borrow().value {
            NodeValue::Link(..) | NodeValue::Image(..) | NodeValue::Code(..) | NodeValue::HtmlInline(..) => {}
            NodeValue::Text(..) => process_text_node(arena, c),
            _ => process_autolinks(arena, c),
        }
        child = next;
    }
}

fn process_text_node<'a>(arena: &'a Arena<AstNode<'a>>, text_node: &'a AstNode<'a>) {
    let (contents, no_smart) = match text_node.data.borrow().value {
        NodeValue::Text(ref s, no_smart) => (s.clone(), no_smart),
        _ => return,
    };

    let mut i = 0;
    let bytes = contents.as_bytes();
    let mut last_split = 0;
    let mut matches: Vec<(usize, usize, NodeLink)> = Vec::new();

    while i < bytes.len() {
        if let Some((end, link)) = try_match(&contents, i) {
            matches.push((i, end, link));
            i = end;
        } else {
            i += 1;
        }
    }

    if matches.is_empty() {
        return;
    }

    let start_line = text_node.data.borrow().start_line;
    let start_column = text_node.data.borrow().start_column;

    for (start, end, link) in matches {
        if start > last_split {
            insert_text_before(arena, text_node, &contents[last_split..start], start_line, start_column, no_smart);
        }
        let link_text = &contents[start..end];
        let display = link.url.strip_prefix(WWW_SCHEME_REPLACEMENT).unwrap_or(link_text);
        let display = if link.url.starts_with("mailto:") { link_text } else { display };
        let link_node = arena.alloc(AstNode::new(crate::nodes::make_block(
            NodeValue::Link(link),
            start_line,
            start_column,
        )));
        let text_child = arena.alloc(AstNode::new(crate::nodes::make_block(
            NodeValue::Text(display.to_string(), false),
            start_line,
            start_column,
        )));
        link_node.append(text_child);
        text_node.insert_before(link_node);
        last_split = end;
    }

    if last_split < contents.len() {
        insert_text_before(arena, text_node, &contents[last_split..], start_line, start_column, no_smart);
    }
    text_node.detach();
}

fn insert_text_before<'a>(
    arena: &'a Arena<AstNode<'a>>,
    anchor: &'a AstNode<'a>,
    text: &str,
    start_line: usize,
    start_column: usize,
    no_smart: bool,
) {
    if text.is_empty() {
        return;
    }
    let node = arena.alloc(AstNode::new(crate::nodes::make_block(
        NodeValue::Text(text.to_string(), no_smart),
        start_line,
        start_column,
    )));
    anchor.insert_before(node);
}

fn try_match(contents: &str, i: usize) -> Option<(usize, NodeLink)> {
    email_match(contents, i)
        .or_else(|| url_scheme_match(contents, i))
        .or_else(|| www_match(contents, i))
}

fn word_boundary_before(contents: &str, i: usize) -> bool {
    match contents[..i].chars().next_back() {
        None => true,
        Some(c) => !(c.is_alphanumeric() || c == '_' || c == '/' || c == '@' || c == '.'),
    }
}

fn url_scheme_match(contents: &str, i: usize) -> Option<(usize, NodeLink)> {
    const SCHEMES: &[&str] = &["http://", "https://", "ftp://", "ftps://"];
    if !word_boundary_before(contents, i) {
        return None;
    }
    let rest = &contents[i..];
    let scheme = SCHEMES.iter().find(|s| rest.starts_with(*s))?;
    let host_start = i + scheme.len();
    if host_start >= contents.len() || isspace(contents.as_bytes()[host_start]) {
        return None;
    }
    let end = scan_link_body(contents, host_start)?;
    if end <= host_start {
        return None;
    }
    let url = trim_trailing_punctuation(&contents[i..end]);
    let end = i + url.len();
    Some((
        end,
        NodeLink {
            url: url.to_string(),
            title: String::new(),
        },
    ))
}

fn www_match(contents: &str, i: usize) -> Option<(usize, NodeLink)> {
    if !word_boundary_before(contents, i) {
        return None;
    }
    let rest = &contents[i..];
    if !rest.starts_with("www.") {
        return None;
    }
    let end = scan_link_body(contents, i)?;
    let url_text = trim_trailing_punctuation(&contents[i..end]);
    if !url_text.contains('.') || url_text.len() <= "www.".len() {
        return None;
    }
    let end = i + url_text.len();
    Some((
        end,
        NodeLink {
            url: format!("{}{}", WWW_SCHEME_REPLACEMENT, url_text),
            title: String::new(),
        },
    ))
}

/// Scans forward from `start` over everything that could plausibly be part of a URL (no
/// whitespace, `<`, or `>`), tracking paren balance so a trailing `)` that closes an opening `(`
/// earlier in the matched text is kept, per GFM's "balanced parens aren't link-enders" rule.
fn scan_link_body(contents: &str, start: usize) -> Option<usize> {
    let bytes = contents.as_bytes();
    let mut i = start;
    let mut paren_depth: i32 = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if isspace(b) || b == b'<' || b == b'>' {
            break;
        }
        match b {
            b'(' => paren_depth += 1,
            b')' => {
                if paren_depth == 0 {
                    break;
                }
                paren_depth -= 1;
            }
            _ => {}
        }
        i += utf8_len(b);
    }
    if i == start {
        None
    } else {
        Some(i)
    }
}

fn utf8_len(b: u8) -> usize {
    if b & 0x80 == 0 {
        1
    } else if b & 0xE0 == 0xC0 {
        2
    } else if b & 0xF0 == 0xE0 {
        3
    } else if b & 0xF8 == 0xF0 {
        4
    } else {
        1
    }
}

/// Strips trailing punctuation GFM excludes from an autolink match: trailing `?!.,:*_~'"`, an
/// unmatched trailing `)`, and a trailing HTML entity-looking `&...;` is left for the inline
/// entity decoder rather than swallowed into the URL.
fn trim_trailing_punctuation(s: &str) -> &str {
    let mut end = s.len();
    loop {
        let prev_end = end;
        let trimmed = &s[..end];
        if let Some(c) = trimmed.chars().next_back() {
            if matches!(c, '?' | '!' | '.' | ',' | ':' | '*' | '_' | '~' | '\'' | '"') {
                end -= c.len_utf8();
                continue;
            }
            if c == ';' {
                if let Some(amp) = trimmed.rfind('&') {
                    if trimmed[amp..].chars().skip(1).all(|c| isalnum(c as u8) || c == '#') {
                        end = amp;
                        continue;
                    }
                }
            }
        }
        if end == prev_end {
            break;
        }
    }
    &s[..end]
}

fn email_match(contents: &str, i: usize) -> Option<(usize, NodeLink)> {
    if !word_boundary_before(contents, i) {
        return None;
    }
    let bytes = contents.as_bytes();
    let local_start = i;
    let mut j = i;
    while j < bytes.len() && is_email_local_char(bytes[j]) {
        j += 1;
    }
    if j == local_start || bytes.get(j) != Some(&b'@') {
        return None;
    }
    let at = j;
    j += 1;
    let domain_start = j;
    let mut last_label_end = domain_start;
    let mut saw_dot = false;
    loop {
        let label_start = j;
        while j < bytes.len() && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'-') {
            j += 1;
        }
        if j == label_start {
            break;
        }
        last_label_end = j;
        if bytes.get(j) == Some(&b'.') {
            saw_dot = true;
            j += 1;
        } else {
            break;
        }
    }
    if !saw_dot || last_label_end == domain_start {
        return None;
    }
    let email = &contents[local_start..last_label_end];
    Some((
        last_label_end,
        NodeLink {
            url: format!("mailto:{}", email),
            title: String::new(),
        },
    ))
    .filter(|_| at > local_start)
}

fn is_email_local_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'+' | b'-' | b'_')
}
