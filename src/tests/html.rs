use pretty_assertions::assert_eq;

use crate::Options;

use super::render_with;

#[test]
fn paragraph_detached_from_tree_still_renders() {
    let arena = typed_arena::Arena::new();
    let options = Options::default();
    let root = crate::parser::parse(&arena, "para", &options);
    let para = root.first_child().unwrap();
    para.detach();

    let mut output = String::new();
    crate::html::format_document(para, &options, &mut output).unwrap();
    assert_eq!(output, "<p>para</p>\n");
}

#[test]
fn emptied_table_renders_without_panicking() {
    let options = Options::gfm();
    let arena = typed_arena::Arena::new();
    let table = crate::parser::parse(&arena, "| x |\n| - |\n| z |\n", &options)
        .first_child()
        .unwrap();

    while let Some(child) = table.first_child() {
        child.detach();
    }

    let mut output = String::new();
    crate::html::format_document(table, &options, &mut output).unwrap();
    assert_eq!(output, "<table>\n</table>\n");
}

#[test]
fn html_block_type_6() {
    assert_eq!(
        render_with("<div>\nhello\n</div>\n", &Options::default()),
        "<div>\nhello\n</div>\n"
    );
}

#[test]
fn inline_html_passthrough() {
    assert_eq!(
        render_with("a <span>b</span> c", &Options::default()),
        "<p>a <span>b</span> c</p>\n"
    );
}
