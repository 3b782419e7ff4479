use pretty_assertions::assert_eq;

use super::gfm_render;

#[test]
fn bare_https_url() {
    assert_eq!(
        gfm_render("Visit https://example.com/page today."),
        "<p>Visit <a href=\"https://example.com/page\">https://example.com/page</a> today.</p>\n"
    );
}

#[test]
fn www_prefixed_host_gets_an_http_scheme() {
    assert_eq!(
        gfm_render("See www.example.com for details."),
        "<p>See <a href=\"http://www.example.com\">www.example.com</a> for details.</p>\n"
    );
}

#[test]
fn bare_email_address() {
    assert_eq!(
        gfm_render("Contact me at user@example.com please."),
        "<p>Contact me at <a href=\"mailto:user@example.com\">user@example.com</a> please.</p>\n"
    );
}

#[test]
fn trailing_sentence_punctuation_is_not_part_of_the_url() {
    assert_eq!(
        gfm_render("Go to https://example.com."),
        "<p>Go to <a href=\"https://example.com\">https://example.com</a>.</p>\n"
    );
}

#[test]
fn autolink_does_not_fire_inside_existing_link_text() {
    assert_eq!(
        gfm_render("[https://example.com](https://example.com)"),
        "<p><a href=\"https://example.com\">https://example.com</a></p>\n"
    );
}

#[test]
fn autolink_disabled_without_extension() {
    assert_eq!(
        super::render_with("https://example.com", &crate::Options::default()),
        "<p>https://example.com</p>\n"
    );
}
