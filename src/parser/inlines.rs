//! The inline parser: a single left-to-right scan over a block's raw text that emits leaf nodes
//! directly and records emphasis/strikethrough delimiter runs and `[`/`![` bracket openers on
//! two side stacks, followed by two resolution passes over those stacks (distilled spec §4.3).

use std::collections::HashMap;

use typed_arena::Arena;

use crate::ctype::{ispunct, isspace};
use crate::entity;
use crate::nodes::{make_block, AstNode, NodeFootnoteReference, NodeLink, NodeValue};
use crate::remstack::RemStack;
use crate::scanners;
use crate::strings;

use super::{FootnoteDefinition, Options, Reference};

/// One entry in the emphasis/strikethrough delimiter stack (distilled spec §9's recommended
/// "indexed side array" design, backed here by [`RemStack`]).
struct Delimiter<'a> {
    node: &'a AstNode<'a>,
    delim_char: u8,
    /// Original run length, used by the mod-3 rule.
    orig_len: usize,
    /// Remaining, unconsumed run length.
    len: usize,
    can_open: bool,
    can_close: bool,
}

struct Bracket<'a> {
    /// The placeholder `Text("[")`/`Text("![")` node marking where the bracket opened.
    node: &'a AstNode<'a>,
    image: bool,
    active: bool,
    /// Index into the delimiter stack at the moment this bracket was pushed; emphasis inside a
    /// successfully matched link/image is resolved only from this point forward.
    delim_index_at_open: usize,
}

struct Subject<'a, 'r> {
    arena: &'a Arena<AstNode<'a>>,
    bytes: &'r [u8],
    pos: usize,
    options: &'r Options,
    refmap: &'r HashMap<String, Reference>,
    footnotes: &'r HashMap<String, FootnoteDefinition<'a>>,
    start_line: usize,
    delimiters: RemStack<Delimiter<'a>>,
    brackets: Vec<Bracket<'a>>,
}

/// Runs the inline phase over every `Paragraph`, `Heading`, and `TableCell` node in the tree
/// rooted at `root`, replacing each node's transient `content` buffer with parsed inline
/// children. If the autolink extension is enabled, a second pass then turns bare URLs/emails in
/// the resulting `Text` nodes into `Link`s; if the task-list extension is enabled, a third pass
/// reclassifies checkbox list items.
pub fn process_document<'a>(
    arena: &'a Arena<AstNode<'a>>,
    root: &'a AstNode<'a>,
    options: &Options,
    refmap: &HashMap<String, Reference>,
    footnotes: &HashMap<String, FootnoteDefinition<'a>>,
) {
    process_node(arena, root, options, refmap, footnotes);
    if options.extension.autolink {
        super::autolink::process_autolinks(arena, root);
    }
    if options.extension.tasklist {
        process_tasklist(root);
    }
}

fn process_node<'a>(
    arena: &'a Arena<AstNode<'a>>,
    node: &'a AstNode<'a>,
    options: &Options,
    refmap: &HashMap<String, Reference>,
    footnotes: &HashMap<String, FootnoteDefinition<'a>>,
) {
    let takes_inline_content = matches!(
        node.data.borrow().value,
        NodeValue::Paragraph | NodeValue::Heading(_) | NodeValue::TableCell
    );

    if takes_inline_content {
        let (content, start_line) = {
            let mut data = node.data.borrow_mut();
            (std::mem::take(&mut data.content), data.start_line)
        };
        let mut subject = Subject::new(arena, &content, options, refmap, footnotes, start_line);
        subject.parse_into(node);
    } else {
        let mut child = node.first_child();
        while let Some(c) = child {
            let next = c.next_sibling();
            process_node(arena, c, options, refmap, footnotes);
            child = next;
        }
    }
}

/// Reclassifies `- [ ] foo` / `- [x] foo` list items into `TaskItem`s (distilled spec §4.2.8
/// interacting with §4.4): recognized only after inline parsing, since the checkbox must be the
/// very first thing in the item's first paragraph with nothing else preceding it.
fn process_tasklist<'a>(node: &'a AstNode<'a>) {
    for child in node.children() {
        process_tasklist(child);
    }
    let (list_data, first_para) = match node.data.borrow().value {
        NodeValue::Item(ref nl) => (nl.clone(), node.first_child()),
        _ => return,
    };
    let first_para = match first_para {
        Some(c) if matches!(c.data.borrow().value, NodeValue::Paragraph) => c,
        _ => return,
    };
    let first_text = match first_para.first_child() {
        Some(c) => c,
        None => return,
    };
    let (checked, rest) = {
        let data = first_text.data.borrow();
        match data.value {
            NodeValue::Text(ref s, _) if s.starts_with("[ ] ") || s.as_str() == "[ ]" => {
                (Some(false), s["[ ]".len()..].trim_start_matches(' ').to_string())
            }
            NodeValue::Text(ref s, _)
                if s.starts_with("[x] ") || s.starts_with("[X] ") || s.as_str() == "[x]" || s.as_str() == "[X]" =>
            {
                (Some(true), s["[x]".len()..].trim_start_matches(' ').to_string())
            }
            _ => (None, String::new()),
        }
    };
    if let Some(is_checked) = checked {
        first_text.data.borrow_mut().value = NodeValue::Text(rest, false);
        node.data.borrow_mut().value = NodeValue::TaskItem(list_data, is_checked);
    }
}

impl<'a, 'r> Subject<'a, 'r> {
    fn new(
        arena: &'a Arena<AstNode<'a>>,
        input: &'r str,
        options: &'r Options,
        refmap: &'r HashMap<String, Reference>,
        footnotes: &'r HashMap<String, FootnoteDefinition<'a>>,
        start_line: usize,
    ) -> Self {
        Subject {
            arena,
            bytes: input.as_bytes(),
            pos: 0,
            options,
            refmap,
            footnotes,
            start_line,
            delimiters: RemStack::new(),
            brackets: Vec::new(),
        }
    }

    fn eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn make(&self, value: NodeValue) -> &'a AstNode<'a> {
        self.arena
            .alloc(AstNode::new(make_block(value, self.start_line, self.pos + 1)))
    }

    fn append_text(&mut self, parent: &'a AstNode<'a>, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = parent.last_child() {
            let mut data = last.data.borrow_mut();
            if let NodeValue::Text(ref mut s, false) = data.value {
                s.push_str(text);
                return;
            }
        }
        parent.append(self.make(NodeValue::Text(text.to_string(), false)));
    }

    /// Like `append_text`, but for a character produced by unescaping a backslash escape: it only
    /// merges into a sibling that is itself escape-exempt, so an escaped character never gets
    /// silently folded into ordinary text the smart-punctuation pass would otherwise transform.
    fn append_escaped_text(&mut self, parent: &'a AstNode<'a>, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = parent.last_child() {
            let mut data = last.data.borrow_mut();
            if let NodeValue::Text(ref mut s, true) = data.value {
                s.push_str(text);
                return;
            }
        }
        parent.append(self.make(NodeValue::Text(text.to_string(), true)));
    }

    /// Parses the whole subject, appending the resulting inline tree as children of `parent`.
    fn parse_into(&mut self, parent: &'a AstNode<'a>) {
        while !self.eof() {
            self.parse_inline(parent);
        }
        self.process_emphasis(parent, 0);
        // Any brackets left un-matched by end of input become literal text; nothing further to
        // do since they were already appended as literal `[`/`![` text nodes at open time and
        // only get *replaced* on a successful match.
    }

    fn parse_inline(&mut self, parent: &'a AstNode<'a>) {
        let c = self.bytes[self.pos];
        match c {
            b'\n' => self.handle_newline(parent),
            b'\\' => self.handle_backslash(parent),
            b'`' => self.handle_backticks(parent),
            b'*' | b'_' => self.handle_delim(c, parent),
            b'~' if self.options.extension.strikethrough => self.handle_delim(c, parent),
            b'[' => self.handle_open_bracket(parent, false),
            b'!' => self.handle_bang(parent),
            b']' => self.handle_close_bracket(parent),
            b'&' => self.handle_entity(parent),
            b'<' => self.handle_pointy(parent),
            b' ' | b'\t' => self.handle_plain_run(parent),
            _ => self.handle_plain_run(parent),
        }
    }

    fn handle_newline(&mut self, parent: &'a AstNode<'a>) {
        // Check for a trailing hard-break marker (>=2 spaces, or a backslash) on the text just
        // appended.
        let hard = if let Some(last) = parent.last_child() {
            let mut data = last.data.borrow_mut();
            if let NodeValue::Text(ref mut s, _) = data.value {
                if s.ends_with('\\') {
                    s.pop();
                    true
                } else {
                    let trimmed = s.trim_end_matches(' ');
                    let trailing_spaces = s.len() - trimmed.len();
                    let hard = trailing_spaces >= 2;
                    s.truncate(trimmed.len());
                    hard
                }
            } else {
                false
            }
        } else {
            false
        };
        self.pos += 1;
        while matches!(self.peek(), Some(b' ') | Some(b'\t')) {
            self.pos += 1;
        }
        parent.append(self.make(if hard { NodeValue::LineBreak } else { NodeValue::SoftBreak }));
    }

    fn handle_backslash(&mut self, parent: &'a AstNode<'a>) {
        self.pos += 1;
        match self.peek() {
            Some(b'\n') => {
                self.pos += 1;
                while matches!(self.peek(), Some(b' ') | Some(b'\t')) {
                    self.pos += 1;
                }
                parent.append(self.make(NodeValue::LineBreak));
            }
            Some(c) if ispunct(c) => {
                self.append_escaped_text(parent, &(c as char).to_string());
                self.pos += 1;
            }
            _ => self.append_text(parent, "\\"),
        }
    }

    fn handle_backticks(&mut self, parent: &'a AstNode<'a>) {
        let start = self.pos;
        while self.peek() == Some(b'`') {
            self.pos += 1;
        }
        let opener_len = self.pos - start;
        let content_start = self.pos;

        loop {
            match self.find_backtick_run() {
                Some((run_start, run_len)) if run_len == opener_len => {
                    let raw = std::str::from_utf8(&self.bytes[content_start..run_start]).unwrap_or("");
                    let mut code = strings::normalize_whitespace(raw);
                    if code.len() >= 2 && code.starts_with(' ') && code.ends_with(' ') && code.trim() != "" {
                        code = code[1..code.len() - 1].to_string();
                    }
                    parent.append(self.make(NodeValue::Code(code)));
                    self.pos = run_start + run_len;
                    return;
                }
                Some((run_start, run_len)) => {
                    self.pos = run_start + run_len;
                }
                None => {
                    self.pos = content_start;
                    self.append_text(parent, &"`".repeat(opener_len));
                    return;
                }
            }
        }
    }

    fn find_backtick_run(&mut self) -> Option<(usize, usize)> {
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b'`' {
                let start = self.pos;
                while self.peek() == Some(b'`') {
                    self.pos += 1;
                }
                return Some((start, self.pos - start));
            }
            self.pos += 1;
        }
        None
    }

    fn handle_plain_run(&mut self, parent: &'a AstNode<'a>) {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, b'\n' | b'\\' | b'`' | b'*' | b'_' | b'[' | b']' | b'!' | b'&' | b'<')
                || (c == b'~' && self.options.extension.strikethrough)
            {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            self.pos += 1;
        }
        let text = String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned();
        self.append_text(parent, &text);
    }

    fn handle_entity(&mut self, parent: &'a AstNode<'a>) {
        self.pos += 1;
        let rest = std::str::from_utf8(&self.bytes[self.pos..]).unwrap_or("");
        match entity::unescape(rest) {
            Some((text, consumed)) => {
                self.append_text(parent, &text);
                self.pos += consumed;
            }
            None => self.append_text(parent, "&"),
        }
    }

    fn handle_pointy(&mut self, parent: &'a AstNode<'a>) {
        let rest = &self.bytes[self.pos..];
        if let Some(n) = scanners::autolink_uri(rest) {
            let url = std::str::from_utf8(&rest[1..n - 1]).unwrap_or("").to_string();
            let link = self.make(NodeValue::Link(NodeLink { url: strings::clean_autolink(&url, strings::AutolinkType::Uri), title: String::new() }));
            link.append(self.make(NodeValue::Text(url, false)));
            parent.append(link);
            self.pos += n;
            return;
        }
        if let Some(n) = scanners::autolink_email(rest) {
            let email = std::str::from_utf8(&rest[1..n - 1]).unwrap_or("").to_string();
            let link = self.make(NodeValue::Link(NodeLink { url: strings::clean_autolink(&email, strings::AutolinkType::Email), title: String::new() }));
            link.append(self.make(NodeValue::Text(email, false)));
            parent.append(link);
            self.pos += n;
            return;
        }
        if let Some(n) = scanners::html_tag(rest) {
            let raw = std::str::from_utf8(&rest[..n]).unwrap_or("").to_string();
            parent.append(self.make(NodeValue::HtmlInline(raw)));
            self.pos += n;
            return;
        }
        self.append_text(parent, "<");
        self.pos += 1;
    }

    // -- emphasis / strikethrough delimiter runs -----------------------------------------------

    fn handle_delim(&mut self, c: u8, parent: &'a AstNode<'a>) {
        let before = if self.pos == 0 {
            ' '
        } else {
            self.bytes[self.pos - 1] as char
        };
        let start = self.pos;
        while self.peek() == Some(c) {
            self.pos += 1;
        }
        let run_len = self.pos - start;
        let after = self.bytes.get(self.pos).map(|&b| b as char).unwrap_or(' ');

        let before_is_space = before.is_whitespace();
        let after_is_space = after.is_whitespace();
        let before_is_punct = ispunct(before as u8) && !before_is_space;
        let after_is_punct = ispunct(after as u8) && !after_is_space;

        let left_flanking = !after_is_space && !(after_is_punct && !before_is_space && !before_is_punct);
        let right_flanking = !before_is_space && !(before_is_punct && !after_is_space && !after_is_punct);

        let (can_open, can_close) = if c == b'_' {
            (
                left_flanking && (!right_flanking || before_is_punct),
                right_flanking && (!left_flanking || after_is_punct),
            )
        } else if c == b'~' {
            (true, true)
        } else {
            (left_flanking, right_flanking)
        };

        let text = (c as char).to_string().repeat(run_len);
        let node = self.make(NodeValue::Text(text, false));
        parent.append(node);

        if can_open || can_close {
            self.delimiters.push(Delimiter {
                node,
                delim_char: c,
                orig_len: run_len,
                len: run_len,
                can_open,
                can_close,
            });
        }
    }

    /// Resolves emphasis and strikethrough delimiters from index `from` (inclusive) to the end
    /// of the current stack, per the canonical look-back-for-opener algorithm (distilled spec
    /// §4.3.6/§9). Also handles `~`/`~~` strikethrough using the same stack.
    fn process_emphasis(&mut self, _parent: &'a AstNode<'a>, from: usize) {
        let mut closer = from;
        while closer < self.delimiters.len() {
            let is_closer = match self.delimiters.get(closer) {
                Some(d) => d.can_close,
                None => {
                    closer += 1;
                    continue;
                }
            };
            if !is_closer {
                closer += 1;
                continue;
            }
            let (close_char, close_len) = {
                let d = self.delimiters.get(closer).unwrap();
                (d.delim_char, d.len)
            };
            if close_len == 0 {
                closer += 1;
                continue;
            }

            let mut opener = closer;
            let mut found = None;
            while opener > from {
                opener -= 1;
                let matches = match self.delimiters.get(opener) {
                    Some(d) => d.can_open && d.delim_char == close_char && d.len > 0,
                    None => false,
                };
                if matches {
                    let (open_len, open_orig, close_orig) = {
                        let d = self.delimiters.get(opener).unwrap();
                        (d.len, d.orig_len, self.delimiters.get(closer).unwrap().orig_len)
                    };
                    let mod3_bad = (open_orig + close_orig) % 3 == 0
                        && open_orig % 3 != 0
                        && close_orig % 3 != 0;
                    let both_flanking = {
                        let d = self.delimiters.get(opener).unwrap();
                        d.can_open && d.can_close
                    } && {
                        let d = self.delimiters.get(closer).unwrap();
                        d.can_open && d.can_close
                    };
                    if close_char == b'~' || !(both_flanking && mod3_bad) {
                        found = Some((opener, open_len));
                        break;
                    }
                }
            }

            match found {
                Some((opener_idx, open_len)) => {
                    let strong = close_char != b'~' && open_len >= 2 && close_len >= 2;
                    let use_delims = if close_char == b'~' { open_len.min(close_len).min(2) } else if strong { 2 } else { 1 };
                    self.wrap_emphasis(opener_idx, closer, close_char, use_delims);
                    closer = opener_idx + 1;
                }
                None => {
                    closer += 1;
                }
            }
        }
        self.delimiters.truncate(from);
    }

    fn wrap_emphasis(&mut self, opener_idx: usize, closer_idx: usize, delim_char: u8, count: usize) {
        let opener_node = self.delimiters.get(opener_idx).unwrap().node;
        let closer_node = self.delimiters.get(closer_idx).unwrap().node;

        shrink_delim_text(opener_node, count, false);
        shrink_delim_text(closer_node, count, true);

        let wrapper_value = if delim_char == b'~' {
            NodeValue::Strikethrough
        } else if count == 2 {
            NodeValue::Strong
        } else {
            NodeValue::Emph
        };
        let wrapper = self.make(wrapper_value);
        opener_node.insert_after(wrapper);

        let mut cur = opener_node.next_sibling();
        while let Some(n) = cur {
            if std::ptr::eq(n, wrapper) {
                cur = n.next_sibling();
                continue;
            }
            let next = n.next_sibling();
            if std::ptr::eq(n, closer_node) {
                wrapper.append(n);
                break;
            }
            wrapper.append(n);
            cur = next;
        }

        if let Some(d) = self.delimiters.get_mut(opener_idx) {
            d.len -= count;
        }
        if let Some(d) = self.delimiters.get_mut(closer_idx) {
            d.len -= count;
        }
        self.prune_exhausted(opener_idx);
        self.prune_exhausted(closer_idx);
    }

    fn prune_exhausted(&mut self, idx: usize) {
        let exhausted = matches!(self.delimiters.get(idx), Some(d) if d.len == 0);
        let empty_text = matches!(
            self.delimiters.get(idx).map(|d| d.node),
            Some(n) if matches!(&n.data.borrow().value, NodeValue::Text(s, _) if s.is_empty())
        );
        if exhausted && empty_text {
            if let Some(d) = self.delimiters.get(idx) {
                d.node.detach();
            }
            self.delimiters.remove(idx);
        }
    }

    // -- link / image brackets ------------------------------------------------------------------

    fn handle_bang(&mut self, parent: &'a AstNode<'a>) {
        if self.bytes.get(self.pos + 1) == Some(&b'[') {
            self.pos += 1;
            self.handle_open_bracket(parent, true);
        } else {
            self.append_text(parent, "!");
            self.pos += 1;
        }
    }

    fn handle_open_bracket(&mut self, parent: &'a AstNode<'a>, image: bool) {
        let node = self.make(NodeValue::Text(if image { "![".to_string() } else { "[".to_string() }, false));
        parent.append(node);
        self.pos += 1;
        self.brackets.push(Bracket {
            node,
            image,
            active: true,
            delim_index_at_open: self.delimiters.len(),
        });
    }

    fn handle_close_bracket(&mut self, parent: &'a AstNode<'a>) {
        self.pos += 1;
        let bracket_idx = match self.brackets.iter().rposition(|b| b.active) {
            Some(i) => i,
            None => {
                self.append_text(parent, "]");
                return;
            }
        };

        if self.footnotes_match_here(bracket_idx) {
            return;
        }

        if let Some((link, consumed)) = self.parse_link_tail() {
            self.finish_bracket(bracket_idx, parent, link, consumed);
            return;
        }

        // No matching destination/reference; this bracket is just literal text from here on.
        self.brackets[bracket_idx].active = false;
        self.append_text(parent, "]");
    }

    /// Handles `[^name]` footnote references (distilled spec §4.3.9): unlike link brackets,
    /// footnote references never look ahead for a destination and are recognized purely from
    /// the bracket's own contents.
    fn footnotes_match_here(&mut self, bracket_idx: usize) -> bool {
        if !self.options.extension.footnotes || self.brackets[bracket_idx].image {
            return false;
        }
        let bracket_node = self.brackets[bracket_idx].node;
        let is_caret_bracket = matches!(&bracket_node.data.borrow().value, NodeValue::Text(s, _) if s == "[");
        if !is_caret_bracket {
            return false;
        }
        let mut text = String::new();
        let mut cur = bracket_node.next_sibling();
        while let Some(n) = cur {
            match &n.data.borrow().value {
                NodeValue::Text(s, _) => text.push_str(s),
                _ => return false,
            }
            cur = n.next_sibling();
        }
        if !text.starts_with('^') || text.len() < 2 {
            return false;
        }
        let label = &text[1..];
        let key = strings::normalize_reference_label(label);
        let fnd = match self.footnotes.get(&key) {
            Some(fnd) => fnd,
            None => return false,
        };

        if let NodeValue::FootnoteDefinition(ref mut nfd) = fnd.node.data.borrow_mut().value {
            nfd.total_references += 1;
        }
        let ref_node = self.make(NodeValue::FootnoteReference(NodeFootnoteReference {
            name: label.to_string(),
        }));
        let parent = bracket_node.parent().unwrap();
        bracket_node.insert_before(ref_node);
        let mut cur = bracket_node.next_sibling();
        while let Some(n) = cur {
            let next = n.next_sibling();
            n.detach();
            cur = next;
        }
        bracket_node.detach();
        let _ = parent;
        self.brackets.truncate(bracket_idx);
        true
    }

    /// Tries `(url "title")` or `[ref]`/`[]`/shortcut-reference forms immediately after the
    /// closing `]`, returning the resolved link/image destination and bytes consumed.
    fn parse_link_tail(&mut self) -> Option<(NodeLink, usize)> {
        let save = self.pos;
        if self.peek() == Some(b'(') {
            if let Some((link, consumed)) = self.parse_inline_link_tail() {
                return Some((link, consumed));
            }
            self.pos = save;
        }

        // Full or collapsed reference: `[...]` or `[]`.
        let ref_label = if self.peek() == Some(b'[') {
            let start = self.pos + 1;
            let mut i = start;
            while i < self.bytes.len() && self.bytes[i] != b']' {
                i += 1;
            }
            if i >= self.bytes.len() {
                self.pos = save;
                return None;
            }
            let label = std::str::from_utf8(&self.bytes[start..i]).unwrap_or("").to_string();
            self.pos = i + 1;
            if label.is_empty() {
                None
            } else {
                Some(label)
            }
        } else {
            None
        };

        let shortcut_label = self.last_bracket_text();
        let label = ref_label.or(shortcut_label)?;
        let key = strings::normalize_reference_label(&label);
        let reference = self.refmap.get(&key)?;
        Some((
            NodeLink {
                url: reference.url.clone(),
                title: reference.title.clone(),
            },
            self.pos - save,
        ))
    }

    fn last_bracket_text(&self) -> Option<String> {
        let bracket = self.brackets.last()?;
        let mut text = String::new();
        let mut cur = bracket.node.next_sibling();
        while let Some(n) = cur {
            match &n.data.borrow().value {
                NodeValue::Text(s, _) => text.push_str(s),
                _ => return None,
            }
            cur = n.next_sibling();
        }
        Some(text)
    }

    fn parse_inline_link_tail(&mut self) -> Option<(NodeLink, usize)> {
        let save = self.pos;
        self.pos += 1; // '('
        while matches!(self.peek(), Some(b' ') | Some(b'\t') | Some(b'\n')) {
            self.pos += 1;
        }

        let url = if self.peek() == Some(b'<') {
            let start = self.pos;
            self.pos += 1;
            while self.peek().is_some() && self.peek() != Some(b'>') {
                if self.peek() == Some(b'\n') {
                    self.pos = save;
                    return None;
                }
                if self.peek() == Some(b'\\') {
                    self.pos += 1;
                }
                self.pos += 1;
            }
            if self.peek() != Some(b'>') {
                self.pos = save;
                return None;
            }
            self.pos += 1;
            std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("").to_string()
        } else {
            let start = self.pos;
            let mut depth = 0i32;
            while let Some(c) = self.peek() {
                match c {
                    b'(' => depth += 1,
                    b')' if depth == 0 => break,
                    b')' => depth -= 1,
                    b' ' | b'\t' | b'\n' => break,
                    b'\\' => self.pos += 1,
                    _ => {}
                }
                self.pos += 1;
            }
            std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("").to_string()
        };

        while matches!(self.peek(), Some(b' ') | Some(b'\t') | Some(b'\n')) {
            self.pos += 1;
        }

        let title = if matches!(self.peek(), Some(b'"') | Some(b'\'') | Some(b'(')) {
            let open = self.peek().unwrap();
            let close = if open == b'(' { b')' } else { open };
            let start = self.pos;
            self.pos += 1;
            while let Some(c) = self.peek() {
                if c == close {
                    break;
                }
                if c == b'\\' {
                    self.pos += 1;
                }
                self.pos += 1;
            }
            if self.peek() != Some(close) {
                self.pos = save;
                return None;
            }
            self.pos += 1;
            std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("").to_string()
        } else {
            String::new()
        };

        while matches!(self.peek(), Some(b' ') | Some(b'\t') | Some(b'\n')) {
            self.pos += 1;
        }
        if self.peek() != Some(b')') {
            self.pos = save;
            return None;
        }
        self.pos += 1;

        Some((
            NodeLink {
                url: strings::clean_url(&url),
                title: strings::clean_title(&title),
            },
            self.pos - save,
        ))
    }

    fn finish_bracket(&mut self, bracket_idx: usize, _parent: &'a AstNode<'a>, link: NodeLink, _consumed: usize) {
        let image = self.brackets[bracket_idx].image;
        let bracket_node = self.brackets[bracket_idx].node;
        let delim_from = self.brackets[bracket_idx].delim_index_at_open;

        let wrapper = self.make(if image {
            NodeValue::Image(link)
        } else {
            NodeValue::Link(link)
        });
        bracket_node.insert_before(wrapper);

        let mut cur = bracket_node.next_sibling();
        while let Some(n) = cur {
            let next = n.next_sibling();
            wrapper.append(n);
            cur = next;
        }
        bracket_node.detach();

        self.process_emphasis(wrapper, delim_from);

        if !image {
            for b in self.brackets[..bracket_idx].iter_mut() {
                if !b.image {
                    b.active = false;
                }
            }
        }
        self.brackets.truncate(bracket_idx);
    }
}

/// Shrinks a delimiter run's backing `Text` node by `count` characters, taken off the side
/// nearest the matched emphasis span: the end for openers (`from_front = false`, since an
/// opener's leftover run sits before its consumed characters), the start for closers
/// (`from_front = true`, since a closer's leftover run sits after its consumed characters).
fn shrink_delim_text<'a>(node: &'a AstNode<'a>, count: usize, from_front: bool) {
    let mut data = node.data.borrow_mut();
    if let NodeValue::Text(ref mut s, _) = data.value {
        if from_front {
            let cut = count.min(s.len());
            *s = s[cut..].to_string();
        } else {
            let new_len = s.len().saturating_sub(count);
            s.truncate(new_len);
        }
    }
}
