//! Renders the AST built by `parser` as HTML (distilled spec §4.4).

mod context;

use std::fmt::{self, Write};

use crate::character_set::character_set;
use crate::ctype::isspace;
use crate::nodes::{AstNode, ListType, NodeCodeBlock, NodeValue, TableAlignment};
use crate::parser::Options;
use crate::scanners;

pub use context::Context;

/// Renders `root` as HTML under `options`, writing into `output`.
pub fn format_document<'a>(root: &'a AstNode<'a>, options: &Options, output: &mut dyn Write) -> fmt::Result {
    let mut context = Context::new(output, options);
    apply_smart_punctuation_if_enabled(root, options);
    render_node(&mut context, root)?;
    context.finish()
}

/// Smart punctuation (distilled spec §4.4) is applied as a renderer-level pass over `Text` node
/// contents immediately before walking the tree, rather than during inline parsing: the AST stays
/// a faithful parse of the literal source, and only the rendered text is transformed.
fn apply_smart_punctuation_if_enabled<'a>(root: &'a AstNode<'a>, options: &Options) {
    if !options.render.smart {
        return;
    }
    let mut prev_char: Option<char> = None;
    walk_text_nodes(root, &mut prev_char);
}

/// An opaque, non-whitespace placeholder standing in for rendered content this pass can't see
/// through (inline code, raw HTML, an image) so the quote/dash decision for whatever follows
/// isn't made from a character that's no longer adjacent in the actual output.
const OPAQUE_INLINE_CHAR: char = '\u{E000}';

fn walk_text_nodes<'a>(node: &'a AstNode<'a>, prev_char: &mut Option<char>) {
    {
        let mut data = node.data.borrow_mut();
        match data.value {
            NodeValue::Text(ref mut s, no_smart) => {
                if !no_smart {
                    *s = smarten(s, prev_char);
                }
                *prev_char = s.chars().last().or(*prev_char);
            }
            NodeValue::SoftBreak | NodeValue::LineBreak => *prev_char = Some(' '),
            NodeValue::Code(_) | NodeValue::HtmlInline(_) => *prev_char = Some(OPAQUE_INLINE_CHAR),
            _ => {}
        }
    }
    for child in node.children() {
        walk_text_nodes(child, prev_char);
    }
    if matches!(node.data.borrow().value, NodeValue::Image(_)) {
        *prev_char = Some(OPAQUE_INLINE_CHAR);
    }
}

/// Straight quotes to curly, `--` runs to en/em dashes, `...` to an ellipsis.
///
/// Quote direction is decided bidirectionally (the character before *and* after), the same
/// technique `parser/inlines.rs`'s emphasis resolver uses for flanking: a quote preceded by
/// whitespace or an opening bracket opens; otherwise it closes. `)'s`/`]'s` is special-cased to an
/// apostrophe even though `)`/`]` aren't themselves alphanumeric, since a bracket directly
/// followed by a contraction/possessive reads as one.
fn smarten(s: &str, prev_char: &mut Option<char>) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '-' => {
                let mut run_len = 1;
                let mut lookahead = chars.clone();
                while lookahead.peek() == Some(&'-') {
                    run_len += 1;
                    lookahead.next();
                }
                if run_len == 1 {
                    out.push('-');
                } else {
                    for _ in 1..run_len {
                        chars.next();
                    }
                    let (em_count, en_count) = decompose_dash_run(run_len);
                    for _ in 0..em_count {
                        out.push('\u{2014}');
                    }
                    for _ in 0..en_count {
                        out.push('\u{2013}');
                    }
                }
                *prev_char = Some('-');
            }
            '.' if chars.peek() == Some(&'.') => {
                let mut lookahead = chars.clone();
                lookahead.next();
                if lookahead.peek() == Some(&'.') {
                    chars.next();
                    chars.next();
                    out.push('\u{2026}');
                } else {
                    out.push('.');
                }
                *prev_char = Some('.');
            }
            '"' | '\'' => {
                let next = chars.peek().copied();
                let open = quote_opens(*prev_char, next, c);
                out.push(match (c, open) {
                    ('"', true) => '\u{201C}',
                    ('"', false) => '\u{201D}',
                    (_, true) => '\u{2018}',
                    (_, false) => '\u{2019}',
                });
                *prev_char = Some(c);
            }
            _ => {
                out.push(c);
                *prev_char = Some(c);
            }
        }
    }
    out
}

/// Decomposes a run of `run_len` (>= 2) consecutive hyphens into em/en dashes: divisible by 3
/// becomes all em-dashes, divisible by 2 becomes all en-dashes, remainder 1 replaces one em-dash
/// with two en-dashes, remainder 2 peels off a single trailing en-dash.
fn decompose_dash_run(run_len: usize) -> (usize, usize) {
    if run_len % 3 == 0 {
        (run_len / 3, 0)
    } else if run_len % 2 == 0 {
        (0, run_len / 2)
    } else if run_len % 3 == 1 {
        ((run_len - 4) / 3, 2)
    } else {
        ((run_len - 2) / 3, 1)
    }
}

fn quote_opens(before: Option<char>, after: Option<char>, quote_char: char) -> bool {
    let after_alnum = after.map(|c| c.is_alphanumeric()).unwrap_or(false);
    if quote_char == '\'' && matches!(before, Some(')') | Some(']')) && after_alnum {
        return false;
    }
    let before_space = before.map(|c| c.is_whitespace()).unwrap_or(true);
    let before_open_delim = before.map(|c| "([{".contains(c)).unwrap_or(false);
    before_space || before_open_delim
}

fn render_node<'a>(context: &mut Context, node: &'a AstNode<'a>) -> fmt::Result {
    let value = node.data.borrow().value.clone();
    match value {
        NodeValue::Document => render_children(context, node),
        NodeValue::BlockQuote => {
            context.cr()?;
            context.write_str("<blockquote>\n")?;
            render_children(context, node)?;
            context.cr()?;
            context.write_str("</blockquote>\n")
        }
        NodeValue::List(ref nl) => render_list(context, node, nl),
        NodeValue::Item(ref nl) => render_item(context, node, nl, None),
        NodeValue::TaskItem(ref nl, checked) => render_item(context, node, nl, Some(checked)),
        NodeValue::CodeBlock(ref cb) => render_code_block(context, cb),
        NodeValue::HtmlBlock(ref literal) => render_html_block(context, literal),
        NodeValue::Paragraph => render_paragraph(context, node),
        NodeValue::Heading(ref h) => {
            context.cr()?;
            write!(context, "<h{}>", h.level)?;
            render_children(context, node)?;
            write!(context, "</h{}>\n", h.level)
        }
        NodeValue::ThematicBreak => {
            context.cr()?;
            context.write_str("<hr />\n")
        }
        NodeValue::Table(ref aligns) => render_table(context, node, aligns),
        NodeValue::TableRow(header) => render_table_row(context, node, header),
        NodeValue::TableCell => render_table_cell(context, node),
        NodeValue::FootnoteDefinition(ref nfd) => render_footnote_definition(context, node, nfd),

        NodeValue::Text(ref s, _) => context.escape(s),
        NodeValue::SoftBreak => {
            let softbreak = context.options.render.softbreak.clone();
            context.write_str(&softbreak)
        }
        NodeValue::LineBreak => context.write_str("<br />\n"),
        NodeValue::Code(ref literal) => {
            context.write_str("<code>")?;
            context.escape(literal)?;
            context.write_str("</code>")
        }
        NodeValue::HtmlInline(ref literal) => render_inline_html(context, literal),
        NodeValue::Emph => {
            context.write_str("<em>")?;
            render_children(context, node)?;
            context.write_str("</em>")
        }
        NodeValue::Strong => {
            context.write_str("<strong>")?;
            render_children(context, node)?;
            context.write_str("</strong>")
        }
        NodeValue::Strikethrough => {
            context.write_str("<del>")?;
            render_children(context, node)?;
            context.write_str("</del>")
        }
        NodeValue::Link(ref link) => {
            context.write_str("<a href=\"")?;
            if context.options.render.safe && dangerous_url(&link.url) {
                context.write_str("")?;
            } else {
                context.escape_href(&link.url)?;
            }
            context.write_str("\"")?;
            if !link.title.is_empty() {
                context.write_str(" title=\"")?;
                context.escape(&link.title)?;
                context.write_str("\"")?;
            }
            context.write_str(">")?;
            render_children(context, node)?;
            context.write_str("</a>")
        }
        NodeValue::Image(ref link) => {
            context.write_str("<img src=\"")?;
            if context.options.render.safe && dangerous_url(&link.url) {
                context.write_str("")?;
            } else {
                context.escape_href(&link.url)?;
            }
            context.write_str("\" alt=\"")?;
            render_children_as_plain_text(context, node)?;
            context.write_str("\"")?;
            if !link.title.is_empty() {
                context.write_str(" title=\"")?;
                context.escape(&link.title)?;
                context.write_str("\"")?;
            }
            context.write_str(" />")
        }
        NodeValue::FootnoteReference(ref nfr) => render_footnote_reference(context, nfr),
    }
}

fn render_children<'a>(context: &mut Context, node: &'a AstNode<'a>) -> fmt::Result {
    for child in node.children() {
        render_node(context, child)?;
    }
    Ok(())
}

/// Renders `node`'s descendants as plain escaped text, dropping all markup — used for an
/// `<img alt="...">` attribute, which cannot itself contain elements.
fn render_children_as_plain_text<'a>(context: &mut Context, node: &'a AstNode<'a>) -> fmt::Result {
    for child in node.children() {
        match child.data.borrow().value {
            NodeValue::Text(ref s, _) | NodeValue::Code(ref s) => context.escape(s)?,
            _ => render_children_as_plain_text(context, child)?,
        }
    }
    Ok(())
}

fn render_paragraph<'a>(context: &mut Context, node: &'a AstNode<'a>) -> fmt::Result {
    let tight = node
        .parent()
        .and_then(|p| match p.data.borrow().value {
            NodeValue::Item(ref nl) | NodeValue::TaskItem(ref nl, _) => Some(nl.tight),
            _ => None,
        })
        .unwrap_or(false);

    if tight {
        render_children(context, node)
    } else {
        context.cr()?;
        context.write_str("<p>")?;
        render_children(context, node)?;
        context.write_str("</p>\n")
    }
}

fn render_list<'a>(context: &mut Context, node: &'a AstNode<'a>, nl: &crate::nodes::NodeList) -> fmt::Result {
    context.cr()?;
    match nl.list_type {
        ListType::Bullet => context.write_str("<ul>\n")?,
        ListType::Ordered if nl.start == 1 => context.write_str("<ol>\n")?,
        ListType::Ordered => write!(context, "<ol start=\"{}\">\n", nl.start)?,
    }
    render_children(context, node)?;
    match nl.list_type {
        ListType::Bullet => context.write_str("</ul>\n"),
        ListType::Ordered => context.write_str("</ol>\n"),
    }
}

fn render_item<'a>(
    context: &mut Context,
    node: &'a AstNode<'a>,
    _nl: &crate::nodes::NodeList,
    checked: Option<bool>,
) -> fmt::Result {
    context.cr()?;
    context.write_str("<li>")?;
    if let Some(is_checked) = checked {
        // Attribute order (`checked`, `disabled`, `type`) is fixed to match the scenario in
        // distilled spec §8 literally, rather than the alphabetical order a generic
        // attribute-map writer would otherwise produce.
        if is_checked {
            context.write_str("<input checked=\"\" disabled=\"\" type=\"checkbox\" /> ")?;
        } else {
            context.write_str("<input disabled=\"\" type=\"checkbox\" /> ")?;
        }
    }
    render_children(context, node)?;
    context.write_str("</li>\n")
}

fn render_code_block(context: &mut Context, cb: &NodeCodeBlock) -> fmt::Result {
    context.cr()?;
    let first_tag = cb.info.split_whitespace().next().unwrap_or("");
    if first_tag.is_empty() {
        context.write_str("<pre><code>")?;
    } else {
        context.write_str("<pre><code class=\"language-")?;
        context.escape(first_tag)?;
        context.write_str("\"")?;
        if context.options.render.full_info_string {
            let rest = cb.info[first_tag.len()..].trim_start();
            if !rest.is_empty() {
                context.write_str(" data-meta=\"")?;
                context.escape(rest)?;
                context.write_str("\"")?;
            }
        }
        context.write_str(">")?;
    }
    context.escape(&cb.literal)?;
    context.write_str("</code></pre>\n")
}

fn render_html_block(context: &mut Context, literal: &str) -> fmt::Result {
    context.cr()?;
    if context.options.render.safe {
        context.write_str("<!-- raw HTML omitted -->\n")
    } else if context.options.render.tagfilter {
        tagfilter_block(context, literal)?;
        Ok(())
    } else {
        context.write_str(literal)
    }
}

fn render_inline_html(context: &mut Context, literal: &str) -> fmt::Result {
    if context.options.render.safe {
        context.write_str("<!-- raw HTML omitted -->")
    } else if context.options.render.tagfilter && tagfilter(literal) {
        context.write_str("&lt;")?;
        context.write_str(&literal[1..])
    } else {
        context.write_str(literal)
    }
}

fn render_table<'a>(context: &mut Context, node: &'a AstNode<'a>, aligns: &[TableAlignment]) -> fmt::Result {
    context.cr()?;
    context.write_str("<table>\n")?;
    let mut first = true;
    for row in node.children() {
        if first {
            context.write_str("<thead>\n")?;
            render_node(context, row)?;
            context.write_str("</thead>\n")?;
            if row.next_sibling().is_some() {
                context.write_str("<tbody>\n")?;
            }
            first = false;
        } else {
            render_node(context, row)?;
        }
    }
    if !first {
        context.write_str("</tbody>\n")?;
    }
    context.write_str("</table>\n")?;
    let _ = aligns;
    Ok(())
}

fn render_table_row<'a>(context: &mut Context, node: &'a AstNode<'a>, _header: bool) -> fmt::Result {
    context.write_str("<tr>\n")?;
    render_children(context, node)?;
    context.write_str("</tr>\n")
}

fn render_table_cell<'a>(context: &mut Context, node: &'a AstNode<'a>) -> fmt::Result {
    let header = node
        .parent()
        .map(|r| matches!(r.data.borrow().value, NodeValue::TableRow(true)))
        .unwrap_or(false);
    let align = table_column_alignment(node);
    let tag = if header { "th" } else { "td" };
    context.write_str("<")?;
    context.write_str(tag)?;
    match align {
        TableAlignment::None => {}
        _ if context.options.render.table_prefer_style_attributes => {
            let value = match align {
                TableAlignment::Left => "left",
                TableAlignment::Right => "right",
                TableAlignment::Center => "center",
                TableAlignment::None => unreachable!(),
            };
            write!(context, " style=\"text-align: {}\"", value)?;
        }
        _ => {
            let value = match align {
                TableAlignment::Left => "left",
                TableAlignment::Right => "right",
                TableAlignment::Center => "center",
                TableAlignment::None => unreachable!(),
            };
            write!(context, " align=\"{}\"", value)?;
        }
    }
    context.write_str(">")?;
    render_inline_cell_content(context, node)?;
    context.write_str("</")?;
    context.write_str(tag)?;
    context.write_str(">\n")
}

fn render_inline_cell_content<'a>(context: &mut Context, node: &'a AstNode<'a>) -> fmt::Result {
    if node.first_child().is_none() {
        context.escape(&node.data.borrow().content.clone())
    } else {
        render_children(context, node)
    }
}

fn table_column_alignment<'a>(cell: &'a AstNode<'a>) -> TableAlignment {
    let row = match cell.parent() {
        Some(r) => r,
        None => return TableAlignment::None,
    };
    let table = match row.parent() {
        Some(t) => t,
        None => return TableAlignment::None,
    };
    let idx = cell
        .previous_sibling()
        .map(|_| cell_index(cell))
        .unwrap_or(0);
    match table.data.borrow().value {
        NodeValue::Table(ref aligns) => aligns.get(idx).copied().unwrap_or(TableAlignment::None),
        _ => TableAlignment::None,
    }
}

fn cell_index<'a>(cell: &'a AstNode<'a>) -> usize {
    let mut idx = 0;
    let mut cur = cell.previous_sibling();
    while let Some(c) = cur {
        idx += 1;
        cur = c.previous_sibling();
    }
    idx
}

fn render_footnote_definition<'a>(
    context: &mut Context,
    node: &'a AstNode<'a>,
    nfd: &crate::nodes::NodeFootnoteDefinition,
) -> fmt::Result {
    if nfd.total_references == 0 {
        return Ok(());
    }
    if context.footnote_ix == context.written_footnote_ix {
        context.cr()?;
        context.write_str("<section class=\"footnotes\" data-footnotes>\n<ol>\n")?;
    }
    context.written_footnote_ix += 1;
    write!(context, "<li id=\"fn-{}\">\n", encode_anchor(&nfd.name))?;
    for (i, child) in node.children().enumerate() {
        if i == 0 {
            // Inline the backref into the last paragraph's closing tag, matching the source's
            // layout rather than appending a trailing `<p>` of its own.
            render_footnote_first_block(context, child, nfd)?;
        } else {
            render_node(context, child)?;
        }
    }
    context.write_str("</li>\n")
}

fn render_footnote_first_block<'a>(
    context: &mut Context,
    block: &'a AstNode<'a>,
    nfd: &crate::nodes::NodeFootnoteDefinition,
) -> fmt::Result {
    if matches!(block.data.borrow().value, NodeValue::Paragraph) {
        context.write_str("<p>")?;
        render_children(context, block)?;
        put_footnote_backref(context, nfd)?;
        context.write_str("</p>\n")
    } else {
        render_node(context, block)?;
        put_footnote_backref(context, nfd)
    }
}

fn put_footnote_backref(context: &mut Context, nfd: &crate::nodes::NodeFootnoteDefinition) -> fmt::Result {
    for i in 0..nfd.total_references {
        let ref_suffix = if i == 0 {
            String::new()
        } else {
            format!("-{}", i + 1)
        };
        let superscript = if i == 0 {
            String::new()
        } else {
            format!("{}", i + 1)
        };
        write!(
            context,
            " <a href=\"#fnref-{name}{ref_suffix}\" class=\"footnote-backref\" data-footnote-backref data-footnote-backref-idx=\"{idx}{ref_suffix}\" aria-label=\"Back to reference {idx}{ref_suffix}\">\u{21A9}{superscript}</a>",
            name = encode_anchor(&nfd.name),
            ref_suffix = ref_suffix,
            idx = context.written_footnote_ix,
            superscript = superscript,
        )?;
    }
    Ok(())
}

fn render_footnote_reference(context: &mut Context, nfr: &crate::nodes::NodeFootnoteReference) -> fmt::Result {
    context.footnote_ix += 1;
    let count = context.footnote_ref_counts.entry(nfr.name.clone()).or_insert(0);
    *count += 1;
    let ref_num = *count;
    let ref_suffix = if ref_num <= 1 {
        String::new()
    } else {
        format!("-{}", ref_num)
    };
    write!(
        context,
        "<sup class=\"footnote-ref\"><a href=\"#fn-{name}\" id=\"fnref-{name}{ref_suffix}\" data-footnote-ref>{ix}</a></sup>",
        name = encode_anchor(&nfr.name),
        ref_suffix = ref_suffix,
        ix = context.footnote_ix,
    )
}

/// Percent-encodes a footnote label for use in an anchor id, preserving the *original* (not
/// normalized) label text per distilled spec §9's "known source behaviour worth preserving".
fn encode_anchor(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for b in label.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

fn tagfilter(literal: &str) -> bool {
    let bytes = literal.as_bytes();

    static TAGFILTER_BLACKLIST: [&str; 9] = [
        "title", "textarea", "style", "xmp", "iframe", "noembed", "noframes", "script", "plaintext",
    ];

    if bytes.len() < 3 || bytes[0] != b'<' {
        return false;
    }

    let mut i = 1;
    if bytes[i] == b'/' {
        i += 1;
    }

    let lc = literal[i..].to_lowercase();
    for t in TAGFILTER_BLACKLIST.iter() {
        if lc.starts_with(t) {
            let j = i + t.len();
            return j < bytes.len()
                && (isspace(bytes[j]) || bytes[j] == b'>' || (bytes[j] == b'/' && bytes.len() >= j + 2 && bytes[j + 1] == b'>'));
        }
    }

    false
}

fn tagfilter_block(output: &mut dyn Write, buffer: &str) -> fmt::Result {
    let bytes = buffer.as_bytes();
    let matcher = jetscii::bytes!(b'<');

    let mut offset = 0;
    while let Some(i) = matcher.find(&bytes[offset..]) {
        output.write_str(&buffer[offset..offset + i])?;
        if tagfilter(&buffer[offset + i..]) {
            output.write_str("&lt;")?;
        } else {
            output.write_str("<")?;
        }
        offset += i + 1;
    }
    output.write_str(&buffer[offset..])?;
    Ok(())
}

/// True if `input` would be considered a dangerous URL in safe mode.
pub fn dangerous_url(input: &str) -> bool {
    scanners::dangerous_url(input).is_some()
}

/// Writes `buffer` to `output`, escaping `"`, `&`, `<`, `>` for use in free HTML text.
pub fn escape(output: &mut dyn Write, buffer: &str) -> fmt::Result {
    let bytes = buffer.as_bytes();
    let matcher = jetscii::bytes!(b'"', b'&', b'<', b'>');

    let mut offset = 0;
    while let Some(i) = matcher.find(&bytes[offset..]) {
        let esc: &str = match bytes[offset + i] {
            b'"' => "&quot;",
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            _ => unreachable!(),
        };
        output.write_str(&buffer[offset..offset + i])?;
        output.write_str(esc)?;
        offset += i + 1;
    }
    output.write_str(&buffer[offset..])?;
    Ok(())
}

/// Writes `buffer` to `output`, escaping in a manner appropriate for URLs in HTML attributes. See
/// the GitHub cmark-gfm `houdini_href_e.c` rationale for the specific safe-character set chosen.
pub fn escape_href(output: &mut dyn Write, buffer: &str, relaxed_ipv6: bool) -> fmt::Result {
    const HREF_SAFE: [bool; 256] = character_set!(
        b"-_.+!*(),%#@?=;:/,+$~",
        b"abcdefghijklmnopqrstuvwxyz",
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789"
    );

    let bytes = buffer.as_bytes();
    let size = buffer.len();
    let mut i = 0;

    let possible_ipv6_url_end = if relaxed_ipv6 {
        scanners::ipv6_relaxed_url_start(buffer)
    } else {
        scanners::ipv6_url_start(buffer)
    };
    if let Some(ipv6_url_end) = possible_ipv6_url_end {
        output.write_str(&buffer[0..ipv6_url_end])?;
        i = ipv6_url_end;
    }

    while i < size {
        let org = i;
        while i < size && HREF_SAFE[bytes[i] as usize] {
            i += 1;
        }

        if i > org {
            output.write_str(&buffer[org..i])?;
        }

        if i >= size {
            break;
        }

        match bytes[i] {
            b'&' => output.write_str("&amp;")?,
            b'\'' => output.write_str("&#x27;")?,
            _ => write!(output, "%{:02X}", bytes[i])?,
        }

        i += 1;
    }

    Ok(())
}

/// Writes an opening HTML tag, escaping attribute values automatically.
pub fn write_opening_tag<K: AsRef<str>, V: AsRef<str>>(
    output: &mut dyn Write,
    tag: &str,
    attributes: impl IntoIterator<Item = (K, V)>,
) -> fmt::Result {
    write!(output, "<{tag}")?;
    for (attr, val) in attributes {
        write!(output, " {}=\"", attr.as_ref())?;
        escape(output, val.as_ref())?;
        output.write_str("\"")?;
    }
    output.write_str(">")?;
    Ok(())
}
