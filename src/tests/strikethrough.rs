use pretty_assertions::assert_eq;

use super::gfm_render;

#[test]
fn double_tilde_strikethrough() {
    assert_eq!(gfm_render("~~gone~~"), "<p><del>gone</del></p>\n");
}

#[test]
fn strikethrough_disabled_without_extension() {
    assert_eq!(
        super::render_with("~~gone~~", &crate::Options::default()),
        "<p>~~gone~~</p>\n"
    );
}

#[test]
fn strikethrough_inside_other_emphasis() {
    assert_eq!(
        gfm_render("*a ~~b~~ c*"),
        "<p><em>a <del>b</del> c</em></p>\n"
    );
}
