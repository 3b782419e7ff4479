use pretty_assertions::assert_eq;

use typed_arena::Arena;

use crate::{parser, ExtensionOptions, Options, ParseOptions, RenderOptions};

/// Exercises the public surface end to end, independent of any one module's own tests: if this
/// changes shape, something in the crate's exposed API changed.
#[test]
fn exercise_full_api() {
    let arena = Arena::new();
    let options = Options::default();

    let root = parser::parse(&arena, "# My document\n", &options);
    let _: String = crate::render(root, &options);
    let _: String = crate::markdown("hi");
    let _: String = crate::gfm("hi");

    let _ = Options {
        extension: ExtensionOptions {
            strikethrough: true,
            tagfilter: true,
            table: true,
            autolink: true,
            tasklist: true,
            footnotes: true,
        },
        parse: ParseOptions {},
        render: RenderOptions {
            safe: true,
            softbreak: "<br />\n".to_string(),
            smart: true,
            table_prefer_style_attributes: true,
            full_info_string: true,
            tagfilter: true,
        },
    };
}

#[test]
fn markdown_and_gfm_agree_on_plain_commonmark() {
    assert_eq!(crate::markdown("# hi\n\npara"), "<h1>hi</h1>\n<p>para</p>\n");
    assert_eq!(crate::gfm("# hi\n\npara"), "<h1>hi</h1>\n<p>para</p>\n");
}

#[test]
fn gfm_extensions_are_reachable_through_the_convenience_entry_point() {
    assert_eq!(crate::gfm("~~gone~~"), "<p><del>gone</del></p>\n");
}
