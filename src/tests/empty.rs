use pretty_assertions::assert_eq;

use crate::Options;

use super::render_with;

#[test]
fn empty_document_renders_nothing() {
    assert_eq!(render_with("", &Options::default()), "");
}

#[test]
fn blank_lines_only() {
    assert_eq!(render_with("\n\n\n", &Options::default()), "");
}

#[test]
fn whitespace_only_paragraph_is_dropped() {
    assert_eq!(render_with("   \n", &Options::default()), "");
}

#[test]
fn markdown_and_gfm_entry_points_agree_on_plain_text() {
    assert_eq!(crate::markdown("hello"), crate::gfm("hello"));
}
