use pretty_assertions::assert_eq;

use crate::Options;

use super::render_with;

#[test]
fn escapes_html_special_characters_in_text() {
    assert_eq!(
        render_with("<foo> & \"bar\"", &Options::default()),
        "<p>&lt;foo&gt; &amp; &quot;bar&quot;</p>\n"
    );
}

#[test]
fn backslash_escapes_punctuation() {
    assert_eq!(
        render_with(r"\*not emphasis\*", &Options::default()),
        "<p>*not emphasis*</p>\n"
    );
}

#[test]
fn link_destination_is_percent_preserved_but_quotes_escaped() {
    assert_eq!(
        render_with("[a](/url?x=\"y\")", &Options::default()),
        "<p><a href=\"/url?x=%22y%22\">a</a></p>\n"
    );
}

#[test]
fn safe_mode_scrubs_javascript_uri() {
    let options = Options {
        render: crate::RenderOptions {
            safe: true,
            ..Options::default().render
        },
        ..Options::default()
    };
    assert_eq!(
        render_with("[a](javascript:alert(1))", &options),
        "<p><a href=\"\">a</a></p>\n"
    );
}

#[test]
fn default_render_options_keep_raw_html() {
    assert_eq!(
        render_with("<div>hi</div>\n", &Options::default()),
        "<div>hi</div>\n"
    );
}
