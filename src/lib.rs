//! A CommonMark-compatible parser and HTML renderer, with the default GitHub Flavored Markdown
//! extension set (tables, strikethrough, task lists, extended autolinks, the tag filter, and
//! footnotes) built on an arena-allocated AST.
//!
//! ```
//! let html = marktree::markdown("Hello, *world*!");
//! assert_eq!(html, "<p>Hello, <em>world</em>!</p>\n");
//! ```

mod arena_tree;
mod character_set;
mod ctype;
mod entity;
pub mod html;
pub mod nodes;
pub mod parser;
mod remstack;
mod scanners;
mod strings;

#[cfg(test)]
mod tests;

pub use nodes::AstNode;
pub use parser::{ExtensionOptions, Options, ParseOptions, RenderOptions};

use typed_arena::Arena;

/// Parses `input` under `options`, returning the arena-backed AST root. Call [`render`] on the
/// result (using the same `options`, or different ones) to get HTML back out.
pub fn parse<'a>(arena: &'a Arena<AstNode<'a>>, input: &str, options: &Options) -> &'a AstNode<'a> {
    parser::parse(arena, input, options)
}

/// Renders an AST produced by [`parse`] as an HTML string.
pub fn render<'a>(root: &'a AstNode<'a>, options: &Options) -> String {
    let mut output = String::new();
    html::format_document(root, options, &mut output).expect("writing to a String cannot fail");
    output
}

/// Parses `input` as CommonMark (no GFM extensions) and renders it straight to an HTML string.
pub fn markdown(input: &str) -> String {
    let options = Options::default();
    let arena = Arena::new();
    let root = parse(&arena, input, &options);
    render(root, &options)
}

/// Parses `input` with the default GitHub Flavored Markdown extension set and renders it
/// straight to an HTML string.
pub fn gfm(input: &str) -> String {
    let options = Options::gfm();
    let arena = Arena::new();
    let root = parse(&arena, input, &options);
    render(root, &options)
}
