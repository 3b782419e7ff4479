use crate::{html as html_render, parser, Options};
use typed_arena::Arena;

/// Parses `input` under `options` and renders it back to HTML. Shared by every test module
/// below so each one only has to say what options it cares about.
pub(crate) fn render_with(input: &str, options: &Options) -> String {
    let arena = Arena::new();
    let root = parser::parse(&arena, input, options);
    let mut output = String::new();
    html_render::format_document(root, options, &mut output).unwrap();
    output
}

pub(crate) fn gfm_render(input: &str) -> String {
    render_with(input, &Options::gfm())
}

mod api;
mod autolink;
mod code;
mod core;
mod empty;
mod escape;
mod footnotes;
mod html;
mod options;
mod pathological;
mod smart_punct;
mod strikethrough;
mod table;
mod tagfilter;
mod tasklist;
