//! The block parser: a line-driven state machine that walks the currently-open containers
//! (document → blockquotes → list items → …) for each input line, closes containers the line no
//! longer matches, opens new ones the line starts, and appends content to whichever leaf block
//! is currently accepting lines (distilled spec §4.2).

mod autolink;
pub mod inlines;
mod options;
mod table;

pub use options::{ExtensionOptions, Options, ParseOptions, RenderOptions};

use std::cell::RefCell;
use std::collections::HashMap;

use typed_arena::Arena;

use crate::ctype::isspace;
use crate::nodes::{
    make_block, Ast, AstNode, ListDelimType, ListType, NodeCodeBlock, NodeFootnoteDefinition,
    NodeHeading, NodeList, NodeValue,
};
use crate::scanners;
use crate::strings;

/// A resolved link-reference-definition entry (distilled spec §3's "Link reference definitions"
/// side table).
#[derive(Debug, Clone)]
pub struct Reference {
    pub url: String,
    pub title: String,
}

/// A resolved footnote-definition entry (distilled spec §3's "Footnote definitions" side table).
/// Holds a pointer into the arena so the inline phase can bump `total_references` in place.
pub struct FootnoteDefinition<'a> {
    pub node: &'a AstNode<'a>,
}

pub struct Parser<'a, 'o> {
    arena: &'a Arena<AstNode<'a>>,
    pub(crate) options: &'o Options,

    root: &'a AstNode<'a>,

    line_number: usize,
    offset: usize,
    column: usize,
    first_nonspace: usize,
    first_nonspace_column: usize,
    indent: usize,
    blank: bool,
    partially_consumed_tab: bool,

    pub(crate) refmap: HashMap<String, Reference>,
    pub(crate) footnotes: HashMap<String, FootnoteDefinition<'a>>,
}

/// Parses `input` under `options`, returning the document root and running the inline phase
/// (distilled spec §6's combined `parse` entry point).
pub fn parse<'a>(arena: &'a Arena<AstNode<'a>>, input: &str, options: &Options) -> &'a AstNode<'a> {
    let mut parser = Parser::new(arena, options);
    parser.feed(input);
    parser.finish()
}

impl<'a, 'o> Parser<'a, 'o> {
    fn new(arena: &'a Arena<AstNode<'a>>, options: &'o Options) -> Self {
        let root = arena.alloc(AstNode::new(RefCell::new(Ast::new(
            NodeValue::Document,
            1,
            1,
        ))));
        Parser {
            arena,
            options,
            root,
            line_number: 0,
            offset: 0,
            column: 0,
            first_nonspace: 0,
            first_nonspace_column: 0,
            indent: 0,
            blank: false,
            partially_consumed_tab: false,
            refmap: HashMap::new(),
            footnotes: HashMap::new(),
        }
    }

    fn feed(&mut self, input: &str) {
        let normalized = input.replace("\r\n", "\n").replace('\r', "\n");
        let mut lines: Vec<&str> = normalized.split('\n').collect();
        if normalized.ends_with('\n') {
            lines.pop();
        }
        for line in lines {
            self.line_number += 1;
            self.process_line(line);
        }
    }

    fn finish(mut self) -> &'a AstNode<'a> {
        self.finalize_document();
        let root = self.root;
        let refmap = self.refmap;
        let footnotes = self.footnotes;
        inlines::process_document(self.arena, root, self.options, &refmap, &footnotes);
        root
    }

    fn add_child(
        &mut self,
        parent: &'a AstNode<'a>,
        value: NodeValue,
        start_column: usize,
    ) -> &'a AstNode<'a> {
        let child = self
            .arena
            .alloc(AstNode::new(make_block(value, self.line_number, start_column)));
        parent.append(child);
        child
    }

    // -- low-level line scanning, mirroring cmark's column/tab bookkeeping --------------------

    fn find_first_nonspace(&mut self, line: &[u8]) {
        self.first_nonspace = self.offset;
        self.first_nonspace_column = self.column;
        let mut chars_to_tab = 4 - (self.first_nonspace_column % 4);
        while let Some(&c) = line.get(self.first_nonspace) {
            match c {
                b' ' => {
                    self.first_nonspace += 1;
                    self.first_nonspace_column += 1;
                    chars_to_tab -= 1;
                    if chars_to_tab == 0 {
                        chars_to_tab = 4;
                    }
                }
                b'\t' => {
                    self.first_nonspace += 1;
                    self.first_nonspace_column += chars_to_tab;
                    chars_to_tab = 4;
                }
                _ => break,
            }
        }
        self.indent = self.first_nonspace_column - self.column;
        self.blank = self.first_nonspace >= line.len();
    }

    /// Consumes `count` columns of leading whitespace from `self.offset` onward, expanding a
    /// straddled tab into spaces for the remainder (distilled spec §4.1's `removeIndent`).
    fn advance_offset(&mut self, line: &[u8], mut count: usize, columns: bool) {
        while count > 0 {
            match line.get(self.offset) {
                Some(b'\t') => {
                    let chars_to_tab = 4 - (self.column % 4);
                    if columns {
                        self.partially_consumed_tab = chars_to_tab > count;
                        let chars_to_advance = chars_to_tab.min(count);
                        self.column += chars_to_advance;
                        self.offset += if self.partially_consumed_tab { 0 } else { 1 };
                        count -= chars_to_advance;
                    } else {
                        self.column += chars_to_tab;
                        self.offset += 1;
                        count -= 1;
                    }
                }
                Some(_) => {
                    self.offset += 1;
                    self.column += 1;
                    count -= 1;
                }
                None => break,
            }
        }
    }

    /// Returns the remainder of `line` after stripping already-consumed offset/indent, with a
    /// straddled tab (if `advance_offset` left one partially consumed) rendered as spaces.
    fn rest_of_line(&self, line: &str) -> String {
        let mut out = String::new();
        if self.partially_consumed_tab {
            let chars_to_tab = 4 - ((self.column.max(1) - 1) % 4);
            for _ in 0..chars_to_tab {
                out.push(' ');
            }
        }
        if self.offset < line.len() {
            out.push_str(&line[self.offset..]);
        }
        out
    }

    // -- main per-line dispatch ----------------------------------------------------------------

    fn process_line(&mut self, raw_line: &str) {
        self.offset = 0;
        self.column = 0;
        self.partially_consumed_tab = false;

        let line_bytes = raw_line.as_bytes();
        self.find_first_nonspace(line_bytes);

        let mut container = self.root;
        let mut all_matched = true;
        loop {
            let is_blockquote = matches!(container.data.borrow().value, NodeValue::BlockQuote);
            let cont = if is_blockquote {
                self.try_continue_blockquote(line_bytes)
            } else {
                true
            };
            if !cont {
                all_matched = false;
                break;
            }
            match container.last_child() {
                Some(c) if c.data.borrow().open => container = c,
                _ => break,
            }
        }

        if !all_matched {
            container = self.finalize_to(container);
        }

        self.open_new_blocks(container, raw_line);
    }

    /// Closes every open block strictly below `target`, making `target` the innermost open
    /// container again.
    fn finalize_to(&mut self, target: &'a AstNode<'a>) -> &'a AstNode<'a> {
        if let Some(mut node) = self.deepest_open(self.root) {
            while !std::ptr::eq(node, target) {
                let parent = node.parent().unwrap_or(self.root);
                self.finalize(node);
                node = parent;
            }
        }
        target
    }

    fn deepest_open(&self, from: &'a AstNode<'a>) -> Option<&'a AstNode<'a>> {
        let mut cur = from;
        let mut found = None;
        loop {
            match cur.last_child() {
                Some(c) if c.data.borrow().open => {
                    found = Some(c);
                    cur = c;
                }
                _ => break,
            }
        }
        found
    }

    fn try_continue_blockquote(&mut self, bytes: &[u8]) -> bool {
        if self.indent >= 4 {
            return false;
        }
        if bytes.get(self.first_nonspace) != Some(&b'>') {
            return false;
        }
        self.advance_offset(bytes, self.first_nonspace + 1 - self.offset, false);
        if matches!(bytes.get(self.offset), Some(&b' ') | Some(&b'\t')) {
            self.advance_offset(bytes, 1, true);
        }
        self.find_first_nonspace(bytes);
        true
    }

    fn open_new_blocks(&mut self, mut container: &'a AstNode<'a>, raw_line: &str) {
        let bytes = raw_line.as_bytes();
        let in_verbatim_block = matches!(
            container.data.borrow().value,
            NodeValue::CodeBlock(..) | NodeValue::HtmlBlock(..)
        );

        if in_verbatim_block {
            self.find_first_nonspace(bytes);
            if let Some(parent) = self.continue_verbatim_block(container, raw_line) {
                self.open_new_blocks(parent, raw_line);
            }
            return;
        }

        {
            loop {
                self.find_first_nonspace(bytes);

                if self.indent >= 4 {
                    break;
                }

                if bytes.get(self.first_nonspace) == Some(&b'>') {
                    self.advance_offset(bytes, self.first_nonspace + 1 - self.offset, false);
                    if matches!(bytes.get(self.offset), Some(&b' ') | Some(&b'\t')) {
                        self.advance_offset(bytes, 1, true);
                    }
                    container =
                        self.add_child(container, NodeValue::BlockQuote, self.first_nonspace_column + 1);
                    continue;
                }

                if self.options.extension.footnotes {
                    if let Some(consumed) = scanners::footnote_definition(&bytes[self.first_nonspace..]) {
                        let label = String::from_utf8_lossy(
                            &bytes[self.first_nonspace + 2..self.first_nonspace + consumed - 2],
                        )
                        .into_owned();
                        self.advance_offset(bytes, self.first_nonspace + consumed - self.offset, false);
                        while matches!(bytes.get(self.offset), Some(&b' ') | Some(&b'\t')) {
                            self.advance_offset(bytes, 1, true);
                        }
                        let fnd = self.add_child(
                            container,
                            NodeValue::FootnoteDefinition(NodeFootnoteDefinition {
                                name: label.clone(),
                                total_references: 0,
                            }),
                            self.first_nonspace_column + 1,
                        );
                        let key = strings::normalize_reference_label(&label);
                        self.footnotes
                            .entry(key)
                            .or_insert(FootnoteDefinition { node: fnd });
                        container = fnd;
                        continue;
                    }
                }

                if let Some((marker_type, start, delim, bullet_char, content_col)) =
                    parse_list_marker(bytes, self.first_nonspace, self.first_nonspace_column)
                {
                    let in_open_paragraph = matches!(container.data.borrow().value, NodeValue::Paragraph)
                        && !container.data.borrow().content.is_empty();
                    if in_open_paragraph && marker_type == ListType::Ordered && start != 1 {
                        break;
                    }
                    // A `1.`/`-` marker that directly interrupts a paragraph is still accepted
                    // (CommonMark allows list interruption except for the ordered/non-1 case
                    // above), so we fall through to actually opening the list/item either way.
                    let list_data = NodeList {
                        list_type: marker_type,
                        bullet_char,
                        start,
                        delimiter: delim,
                        tight: true,
                    };
                    let needs_new_list = match container.data.borrow().value.list_data() {
                        Some(existing) => {
                            existing.list_type != list_data.list_type
                                || existing.bullet_char != list_data.bullet_char
                                || existing.delimiter != list_data.delimiter
                        }
                        None => true,
                    };
                    let list_parent = if needs_new_list {
                        self.add_child(
                            container,
                            NodeValue::List(list_data.clone()),
                            self.first_nonspace_column + 1,
                        )
                    } else {
                        container.parent().unwrap_or(container)
                    };
                    self.advance_offset(bytes, content_col - self.first_nonspace_column, true);
                    container = self.add_child(list_parent, NodeValue::Item(list_data), content_col + 1);
                    continue;
                }

                break;
            }
        }

        self.find_first_nonspace(bytes);

        if self.blank {
            self.close_open_paragraph(container);
            return;
        }

        if !matches!(container.data.borrow().value, NodeValue::CodeBlock(..) | NodeValue::HtmlBlock(..)) {
            if scanners::thematic_break(&bytes[self.first_nonspace..]).is_some() {
                if self.maybe_setext_heading(container, bytes) {
                    return;
                }
                self.close_open_paragraph(container);
                self.add_child(container, NodeValue::ThematicBreak, self.first_nonspace_column + 1);
                return;
            }

            if let Some(n) = scanners::atx_heading_start(&bytes[self.first_nonspace..]) {
                self.close_open_paragraph(container);
                let hashes = &bytes[self.first_nonspace..self.first_nonspace + n];
                let level = hashes.iter().take_while(|&&b| b == b'#').count().min(6) as u8;
                let mut text =
                    String::from_utf8_lossy(&bytes[self.first_nonspace + n..]).into_owned();
                strings::trim(&mut text);
                strings::chop_trailing_hashtags(&mut text);
                let heading = self.add_child(
                    container,
                    NodeValue::Heading(NodeHeading { level, setext: false }),
                    self.first_nonspace_column + 1,
                );
                heading.data.borrow_mut().content = text;
                return;
            }

            if let Some((fence_char, fence_len)) = scanners::open_code_fence(&bytes[self.first_nonspace..]) {
                self.close_open_paragraph(container);
                let info_raw =
                    String::from_utf8_lossy(&bytes[self.first_nonspace + fence_len..]).into_owned();
                let mut info = info_raw.trim().to_string();
                strings::unescape(&mut info);
                info = crate::entity::unescape_html(&info);
                self.add_child(
                    container,
                    NodeValue::CodeBlock(NodeCodeBlock {
                        fenced: true,
                        fence_char,
                        fence_length: fence_len,
                        fence_offset: self.indent,
                        info,
                        literal: String::new(),
                    }),
                    self.first_nonspace_column + 1,
                );
                return;
            }

            if self.indent >= 4 && !matches!(container.data.borrow().value, NodeValue::Paragraph) {
                let rest = self.rest_of_line(raw_line);
                let dedented = dedent_columns(&rest, 4);
                let block = self.add_child(
                    container,
                    NodeValue::CodeBlock(NodeCodeBlock {
                        fenced: false,
                        fence_char: 0,
                        fence_length: 0,
                        fence_offset: 0,
                        info: String::new(),
                        literal: String::new(),
                    }),
                    self.first_nonspace_column + 1,
                );
                let mut data = block.data.borrow_mut();
                if let NodeValue::CodeBlock(ref mut cb) = data.value {
                    cb.literal.push_str(&dedented);
                    cb.literal.push('\n');
                }
                return;
            }

            if let Some(html_type) = scanners::html_block_start(&bytes[self.first_nonspace..]) {
                self.close_open_paragraph(container);
                let rest = self.rest_of_line(raw_line);
                let block = self.add_child(
                    container,
                    NodeValue::HtmlBlock(format!("{}\n", rest)),
                    self.first_nonspace_column + 1,
                );
                block.data.borrow_mut().start_line = html_type as usize;
                return;
            }
            if !matches!(container.data.borrow().value, NodeValue::Paragraph)
                && scanners::html_block_start_7(&bytes[self.first_nonspace..])
            {
                self.close_open_paragraph(container);
                let rest = self.rest_of_line(raw_line);
                let block = self.add_child(
                    container,
                    NodeValue::HtmlBlock(format!("{}\n", rest)),
                    self.first_nonspace_column + 1,
                );
                block.data.borrow_mut().start_line = 7;
                return;
            }

            if self.options.extension.table {
                let is_para = matches!(container.data.borrow().value, NodeValue::Paragraph);
                if is_para {
                    let rest = self.rest_of_line(raw_line);
                    let prior = container.data.borrow().content.clone();
                    if table::looks_like_table_start(&prior, &rest) {
                        if let Some(new_table) = table::try_open(self, container, &prior, &rest) {
                            container = new_table;
                            self.append_row_content(raw_line);
                            return;
                        }
                    }
                }
            }
        }

        if self.options.extension.table {
            if table::try_continue_row(self, container, &self.rest_of_line(raw_line)) {
                return;
            }
            if matches!(container.data.borrow().value, NodeValue::Table(_)) {
                let parent = container.parent().unwrap_or(self.root);
                self.finalize(container);
                container = parent;
            }
        }

        // Otherwise: accumulate into a paragraph.
        let rest = self.rest_of_line(raw_line);
        let trimmed = dedent_up_to(&rest, 3);
        let para = match container.data.borrow().value {
            NodeValue::Paragraph => container,
            _ => self.add_child(container, NodeValue::Paragraph, self.first_nonspace_column + 1),
        };
        let mut data = para.data.borrow_mut();
        if !data.content.is_empty() {
            data.content.push('\n');
        }
        data.content.push_str(&trimmed);
    }

    /// Continuation-line handling for an already-open fenced/indented code block or HTML block
    /// (distilled spec §4.2.9/§4.2.11's "lazy continuation" rules for verbatim containers).
    /// `self.find_first_nonspace` must already have been called for `raw_line`. Returns
    /// `Some(parent)` when the line closed the block without being consumed by it, so the caller
    /// must re-dispatch `raw_line` against `parent` as an ordinary line; returns `None` when the
    /// line was fully handled (appended to the block, or consumed by its closing fence/tag).
    fn continue_verbatim_block(
        &mut self,
        container: &'a AstNode<'a>,
        raw_line: &str,
    ) -> Option<&'a AstNode<'a>> {
        let bytes = raw_line.as_bytes();
        let is_code_block = matches!(container.data.borrow().value, NodeValue::CodeBlock(..));

        if is_code_block {
            let (fenced, fence_char, fence_length, fence_offset) = match container.data.borrow().value {
                NodeValue::CodeBlock(ref cb) => (cb.fenced, cb.fence_char, cb.fence_length, cb.fence_offset),
                _ => unreachable!(),
            };

            if fenced {
                if self.indent < 4
                    && bytes.get(self.first_nonspace) == Some(&fence_char)
                    && scanners::close_code_fence(&bytes[self.first_nonspace..], fence_char, fence_length)
                {
                    self.finalize(container);
                    return None;
                }
                self.advance_offset(bytes, fence_offset.min(self.indent), true);
                let rest = self.rest_of_line(raw_line);
                if let NodeValue::CodeBlock(ref mut cb) = container.data.borrow_mut().value {
                    cb.literal.push_str(&rest);
                    cb.literal.push('\n');
                }
                return None;
            }

            if self.indent >= 4 {
                self.advance_offset(bytes, 4, true);
                let rest = self.rest_of_line(raw_line);
                if let NodeValue::CodeBlock(ref mut cb) = container.data.borrow_mut().value {
                    cb.literal.push_str(&rest);
                    cb.literal.push('\n');
                }
                return None;
            }
            if self.blank {
                if let NodeValue::CodeBlock(ref mut cb) = container.data.borrow_mut().value {
                    cb.literal.push('\n');
                }
                return None;
            }
            self.finalize(container);
            return Some(container.parent().unwrap_or(self.root));
        }

        // HTML block: types 6/7 run until a blank line, which is not itself part of the block.
        let html_type = container.data.borrow().start_line;
        if matches!(html_type, 6 | 7) && self.blank {
            self.finalize(container);
            return Some(container.parent().unwrap_or(self.root));
        }

        let rest = self.rest_of_line(raw_line);
        if let NodeValue::HtmlBlock(ref mut s) = container.data.borrow_mut().value {
            s.push_str(&rest);
            s.push('\n');
        }

        let ends = match html_type {
            1 => scanners::html_block_end_1(bytes),
            2 => scanners::html_block_end_2(bytes),
            3 => scanners::html_block_end_3(bytes),
            4 => scanners::html_block_end_4(bytes),
            5 => scanners::html_block_end_5(bytes),
            _ => false,
        };
        if ends {
            self.finalize(container);
        }
        None
    }

    fn append_row_content(&mut self, _raw_line: &str) {
        // The header row's own text was already consumed by `table::try_open`; nothing further
        // to append here. Kept as a named step to mirror the "open + first row" pairing in
        // distilled spec §4.2.10.
    }

    fn close_open_paragraph(&mut self, container: &'a AstNode<'a>) {
        if matches!(container.data.borrow().value, NodeValue::Paragraph) {
            self.finalize(container);
        }
    }

    fn maybe_setext_heading(&mut self, container: &'a AstNode<'a>, bytes: &[u8]) -> bool {
        let in_open_paragraph = matches!(container.data.borrow().value, NodeValue::Paragraph)
            && !container.data.borrow().content.trim().is_empty();
        if !in_open_paragraph {
            return false;
        }
        if scanners::setext_heading_line(&bytes[self.first_nonspace..]).is_none() {
            return false;
        }

        // Open question (distilled spec §9): reproduce the source's documented fallback
        // exactly. Flushing leading link-reference definitions out of the paragraph buffer
        // first; if that empties it entirely, the setext conversion is abandoned in favour of a
        // plain thematic break rather than promoting an empty heading.
        self.consume_reference_definitions(container);
        let remaining = container.data.borrow().content.clone();
        if remaining.trim().is_empty() {
            self.finalize(container);
            self.add_child(self.root, NodeValue::ThematicBreak, self.first_nonspace_column + 1);
            return true;
        }

        let mut data = container.data.borrow_mut();
        data.value = NodeValue::Heading(NodeHeading { level: 2, setext: true });
        true
    }

    /// Strips leading link-reference definitions from a paragraph buffer repeatedly, per
    /// distilled spec §4.2: a paragraph may begin with one or more `[label]: dest "title"` lines
    /// which are diverted into the reference table rather than kept as paragraph text.
    fn consume_reference_definitions(&mut self, container: &'a AstNode<'a>) {
        loop {
            let content = container.data.borrow().content.clone();
            if content.trim().is_empty() {
                return;
            }
            match parse_one_reference_definition(&content) {
                Some((label, url, title, consumed)) => {
                    let key = strings::normalize_reference_label(&label);
                    self.refmap.entry(key).or_insert(Reference { url, title });
                    let mut data = container.data.borrow_mut();
                    data.content = data.content[consumed..].to_string();
                }
                None => return,
            }
        }
    }

    /// Closes a block: trims/transforms state that only makes sense once a block is known to
    /// have ended. List tightness is computed afterwards in `finalize_document` since it needs
    /// sibling information this function doesn't have.
    fn finalize(&mut self, node: &'a AstNode<'a>) {
        {
            let mut data = node.data.borrow_mut();
            data.open = false;
            if let NodeValue::CodeBlock(ref mut cb) = data.value {
                if !cb.fenced {
                    strings::remove_trailing_blank_lines(&mut cb.literal);
                    cb.literal.push('\n');
                }
            }
        }
        let is_empty_paragraph = matches!(node.data.borrow().value, NodeValue::Paragraph)
            && node.data.borrow().content.trim().is_empty();
        if is_empty_paragraph {
            node.detach();
        }
    }

    fn finalize_document(&mut self) {
        while let Some(node) = self.deepest_open(self.root) {
            self.finalize(node);
        }
        self.finalize(self.root);
        self.compute_tightness(self.root);
    }

    fn compute_tightness(&self, node: &'a AstNode<'a>) {
        for child in node.children() {
            self.compute_tightness(child);
        }
        let is_list = matches!(node.data.borrow().value, NodeValue::List(_));
        if !is_list {
            return;
        }

        let mut tight = true;
        for item in node.children() {
            let para_count = item
                .children()
                .filter(|c| matches!(c.data.borrow().value, NodeValue::Paragraph))
                .count();
            let has_block_sibling_gap = item
                .children()
                .count()
                > para_count;
            if para_count >= 2 || (para_count >= 1 && has_block_sibling_gap) {
                tight = false;
            }
        }

        if let NodeValue::List(ref mut nl) = node.data.borrow_mut().value {
            nl.tight = tight;
        }
        for item in node.children() {
            let mut data = item.data.borrow_mut();
            if let NodeValue::Item(ref mut il) = data.value {
                il.tight = tight;
            }
        }
    }
}

fn dedent_columns(s: &str, cols: usize) -> String {
    let bytes = s.as_bytes();
    let mut col = 0;
    let mut i = 0;
    while i < bytes.len() && col < cols {
        match bytes[i] {
            b' ' => {
                col += 1;
                i += 1;
            }
            b'\t' => {
                col += 4 - (col % 4);
                i += 1;
            }
            _ => break,
        }
    }
    let extra = col.saturating_sub(cols);
    format!("{}{}", " ".repeat(extra), &s[i..])
}

fn dedent_up_to(s: &str, max_cols: usize) -> String {
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut col = 0;
    while i < bytes.len() && col < max_cols && (bytes[i] == b' ' || bytes[i] == b'\t') {
        col += 1;
        i += 1;
    }
    s[i..].to_string()
}

/// Parses a bullet or ordered list marker at `first_nonspace`, returning
/// `(type, start, delimiter, bullet_char, content_column)`.
fn parse_list_marker(
    bytes: &[u8],
    first_nonspace: usize,
    first_nonspace_column: usize,
) -> Option<(ListType, usize, ListDelimType, u8, usize)> {
    let c = *bytes.get(first_nonspace)?;
    let mut i = first_nonspace;

    if matches!(c, b'-' | b'+' | b'*') {
        i += 1;
        if !matches!(bytes.get(i), None | Some(&b' ') | Some(&b'\t')) {
            return None;
        }
        let content_col = content_column(bytes, i, first_nonspace_column + 1);
        return Some((ListType::Bullet, 0, ListDelimType::Period, c, content_col));
    }

    if c.is_ascii_digit() {
        let start_digits = i;
        let mut digits = 0;
        while i < bytes.len() && bytes[i].is_ascii_digit() && digits < 9 {
            i += 1;
            digits += 1;
        }
        let delim = match bytes.get(i) {
            Some(b'.') => ListDelimType::Period,
            Some(b')') => ListDelimType::Paren,
            _ => return None,
        };
        i += 1;
        if !matches!(bytes.get(i), None | Some(&b' ') | Some(&b'\t')) {
            return None;
        }
        let start: usize = std::str::from_utf8(&bytes[start_digits..start_digits + digits])
            .ok()?
            .parse()
            .unwrap_or(0);
        let marker_width = digits + 1;
        let content_col = content_column(bytes, i, first_nonspace_column + marker_width);
        return Some((ListType::Ordered, start, delim, b'.', content_col));
    }

    None
}

fn content_column(bytes: &[u8], after_marker: usize, marker_end_column: usize) -> usize {
    let mut i = after_marker;
    let mut pad = 0;
    while i < bytes.len() && bytes[i] == b' ' && pad < 4 {
        i += 1;
        pad += 1;
    }
    if pad == 0 || i >= bytes.len() {
        marker_end_column + 1
    } else {
        marker_end_column + pad
    }
}

/// Attempts to parse one `[label]: destination "title"` link-reference definition from the
/// start of `content`, returning the label/url/title and the number of bytes consumed.
fn parse_one_reference_definition(content: &str) -> Option<(String, String, String, usize)> {
    let bytes = content.as_bytes();
    let mut i = 0;
    while i < bytes.len() && isspace(bytes[i]) {
        i += 1;
    }
    if bytes.get(i) != Some(&b'[') {
        return None;
    }
    i += 1;
    let label_start = i;
    while i < bytes.len() && bytes[i] != b']' {
        if bytes[i] == b'\\' && i + 1 < bytes.len() {
            i += 2;
        } else {
            i += 1;
        }
    }
    if i >= bytes.len() || label_start == i {
        return None;
    }
    let label = content[label_start..i].to_string();
    i += 1;
    if bytes.get(i) != Some(&b':') {
        return None;
    }
    i += 1;
    while i < bytes.len() && isspace(bytes[i]) {
        i += 1;
    }
    let url_start = i;
    while i < bytes.len() && !isspace(bytes[i]) {
        i += 1;
    }
    if i == url_start {
        return None;
    }
    let url = strings::clean_url(&content[url_start..i]);
    if url.is_empty() {
        return None;
    }

    let save = i;
    while i < bytes.len() && isspace(bytes[i]) {
        i += 1;
    }
    let mut title = String::new();
    if matches!(bytes.get(i), Some(&b'"') | Some(&b'\'') | Some(&b'(')) {
        let open = bytes[i];
        let close = if open == b'(' { b')' } else { open };
        let title_start = i + 1;
        let mut j = title_start;
        while j < bytes.len() && bytes[j] != close {
            if bytes[j] == b'\\' && j + 1 < bytes.len() {
                j += 2;
            } else {
                j += 1;
            }
        }
        if j < bytes.len() {
            title = strings::clean_title(&content[title_start..j]);
            i = j + 1;
        } else {
            i = save;
        }
    } else {
        i = save;
    }

    while i < bytes.len() && matches!(bytes[i], b' ' | b'\t') {
        i += 1;
    }
    if i < bytes.len() && bytes[i] != b'\n' && !title.is_empty() {
        return None;
    }
    if i < bytes.len() && bytes[i] == b'\n' {
        i += 1;
    }

    Some((label, url, title, i))
}
