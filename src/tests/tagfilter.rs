use pretty_assertions::assert_eq;

use super::gfm_render;

#[test]
fn tagfilter_escapes_filtered_tags_inline() {
    assert_eq!(
        gfm_render("Hi <title>hi</title> there\n"),
        "<p>Hi &lt;title>hi&lt;/title> there</p>\n"
    );
}

#[test]
fn tagfilter_leaves_other_tags_alone() {
    assert_eq!(
        gfm_render("<span>hi</span>\n"),
        "<p><span>hi</span></p>\n"
    );
}
