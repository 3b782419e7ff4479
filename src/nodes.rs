//! The AST produced by the block and inline parsers, and rendered by `html`.

use crate::arena_tree::Node;
use std::cell::RefCell;

/// The core AST node type. `'a` is the lifetime of the arena backing the whole tree.
pub type AstNode<'a> = Node<'a, RefCell<Ast>>;

/// Per-node data. Most of a node's identity lives in `value`; the remaining fields are either
/// bookkeeping shared by every node (`content`, for transient raw text) or are cheap enough to
/// keep flat rather than stuffing them into every `NodeValue` variant that needs them.
#[derive(Debug, Clone)]
pub struct Ast {
    pub value: NodeValue,

    /// Raw, not-yet-inline-parsed text. Populated for `Paragraph`, `Heading`, and `TableCell`
    /// until the inline phase runs, at which point it is cleared and the node gains inline
    /// children instead (see distilled-spec §9, "Transient raw content").
    pub content: String,

    /// 1-based source line on which this block started; used only internally by the block
    /// parser bookkeeping (e.g. deciding whether two lines belong to the same paragraph run).
    /// Not exposed as a stable "source position" API per the Non-goal excluding diagnostics
    /// position-tracking.
    pub start_line: usize,
    pub start_column: usize,

    /// Set once a fenced/indented code block, blockquote, or HTML block has determined it should
    /// no longer accept new lines (used transiently during block parsing).
    pub open: bool,
}

impl Ast {
    pub fn new(value: NodeValue, start_line: usize, start_column: usize) -> Self {
        Ast {
            value,
            content: String::new(),
            start_line,
            start_column,
            open: true,
        }
    }
}

pub fn make_block(value: NodeValue, start_line: usize, start_column: usize) -> RefCell<Ast> {
    RefCell::new(Ast::new(value, start_line, start_column))
}

/// A single table column's alignment, set from a delimiter row (distilled spec §4.2.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAlignment {
    None,
    Left,
    Right,
    Center,
}

/// Bullet vs ordered list, and the punctuation following an ordered marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    Bullet,
    Ordered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListDelimType {
    Period,
    Paren,
}

#[derive(Debug, Clone)]
pub struct NodeList {
    pub list_type: ListType,
    /// Bullet character (`-`, `+`, `*`) for bullet lists; unused for ordered lists.
    pub bullet_char: u8,
    /// Starting number for ordered lists (CommonMark permits any u32 start value).
    pub start: usize,
    pub delimiter: ListDelimType,
    pub tight: bool,
}

#[derive(Debug, Clone)]
pub struct NodeCodeBlock {
    pub fenced: bool,
    pub fence_char: u8,
    pub fence_length: usize,
    pub fence_offset: usize,
    pub info: String,
    pub literal: String,
}

#[derive(Debug, Clone)]
pub struct NodeHeading {
    pub level: u8,
    /// True for a setext-derived heading; kept only because setext H1/H2 share a variant with
    /// ATX headings and some renderers care, though this renderer does not distinguish them.
    pub setext: bool,
}

#[derive(Debug, Clone, Default)]
pub struct NodeLink {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, Default)]
pub struct NodeFootnoteDefinition {
    /// The label exactly as written in the source (not normalized); used to build anchor ids
    /// per distilled-spec §9's "known source behaviour worth preserving".
    pub name: String,
    pub total_references: u32,
}

#[derive(Debug, Clone, Default)]
pub struct NodeFootnoteReference {
    /// The label exactly as written in the source. Rendering assigns this reference's ordinal
    /// and repeat-count lazily from a counter on the render `Context`, since both depend on the
    /// order references are *walked* in, which is only known at render time.
    pub name: String,
}

/// Task-list checkbox state for a `TaskItem` list item. `None` is not representable here: by the
/// time a list item becomes a `TaskItem` its checkbox has always been parsed as checked or not
/// (distilled-spec §8 quantified invariant: "checked is strictly true or false, never null").
pub type TaskState = bool;

#[derive(Debug, Clone)]
pub enum NodeValue {
    Document,
    BlockQuote,
    List(NodeList),
    Item(NodeList),
    /// A list item with a GFM task-list checkbox. Carries the same list-layout fields as `Item`
    /// (needed because a single list's items may start out as plain `Item`s during parsing and
    /// only get reclassified to `TaskItem` in a post-processing pass) plus the checkbox state.
    TaskItem(NodeList, TaskState),
    CodeBlock(NodeCodeBlock),
    HtmlBlock(String),
    Paragraph,
    Heading(NodeHeading),
    ThematicBreak,
    Table(Vec<TableAlignment>),
    TableRow(bool),
    TableCell,
    FootnoteDefinition(NodeFootnoteDefinition),

    /// Inline text. The second field is set on text produced by unescaping a backslash escape
    /// (distilled spec §4.3.1's `\"`/`\'`/`\-`/`\.`), marking it exempt from the smart-punctuation
    /// renderer pass so an escaped `--` doesn't still get turned into an en dash.
    Text(String, bool),
    SoftBreak,
    LineBreak,
    Code(String),
    HtmlInline(String),
    Emph,
    Strong,
    Strikethrough,
    Link(NodeLink),
    Image(NodeLink),
    FootnoteReference(NodeFootnoteReference),
}

impl NodeValue {
    pub fn block(&self) -> bool {
        matches!(
            self,
            NodeValue::Document
                | NodeValue::BlockQuote
                | NodeValue::List(..)
                | NodeValue::Item(..)
                | NodeValue::TaskItem(..)
                | NodeValue::CodeBlock(..)
                | NodeValue::HtmlBlock(..)
                | NodeValue::Paragraph
                | NodeValue::Heading(..)
                | NodeValue::ThematicBreak
                | NodeValue::Table(..)
                | NodeValue::TableRow(..)
                | NodeValue::TableCell
                | NodeValue::FootnoteDefinition(..)
        )
    }

    pub fn accepts_lines(&self) -> bool {
        matches!(
            self,
            NodeValue::Paragraph | NodeValue::Heading(..) | NodeValue::CodeBlock(..)
        )
    }

    pub fn list_data(&self) -> Option<&NodeList> {
        match self {
            NodeValue::List(ref nl) | NodeValue::Item(ref nl) | NodeValue::TaskItem(ref nl, _) => {
                Some(nl)
            }
            _ => None,
        }
    }

    pub fn list_data_mut(&mut self) -> Option<&mut NodeList> {
        match self {
            NodeValue::List(ref mut nl)
            | NodeValue::Item(ref mut nl)
            | NodeValue::TaskItem(ref mut nl, _) => Some(nl),
            _ => None,
        }
    }
}
