use pretty_assertions::assert_eq;

use crate::{Options, RenderOptions};

use super::render_with;

fn smart_options() -> Options {
    Options {
        render: RenderOptions {
            smart: true,
            ..Options::default().render
        },
        ..Options::default()
    }
}

#[test]
fn double_hyphen_becomes_en_dash() {
    assert_eq!(render_with("a--b", &smart_options()), "<p>a\u{2013}b</p>\n");
}

#[test]
fn triple_hyphen_becomes_em_dash() {
    assert_eq!(render_with("a---b", &smart_options()), "<p>a\u{2014}b</p>\n");
}

#[test]
fn triple_dot_becomes_ellipsis() {
    assert_eq!(render_with("a...b", &smart_options()), "<p>a\u{2026}b</p>\n");
}

#[test]
fn straight_quotes_become_curly() {
    assert_eq!(
        render_with("\"a\" and 'b'", &smart_options()),
        "<p>\u{201C}a\u{201D} and \u{2018}b\u{2019}</p>\n"
    );
}

#[test]
fn smart_punctuation_is_off_by_default() {
    assert_eq!(render_with("a--b", &Options::default()), "<p>a--b</p>\n");
}

#[test]
fn four_hyphen_run_becomes_two_en_dashes() {
    assert_eq!(render_with("a----b", &smart_options()), "<p>a\u{2013}\u{2013}b</p>\n");
}

#[test]
fn seven_hyphen_run_becomes_em_and_two_en_dashes() {
    assert_eq!(
        render_with("a-------b", &smart_options()),
        "<p>a\u{2014}\u{2013}\u{2013}b</p>\n"
    );
}

#[test]
fn escaped_hyphens_and_quotes_are_left_alone() {
    assert_eq!(render_with("a\\-\\-b", &smart_options()), "<p>a--b</p>\n");
    assert_eq!(render_with("\\\"a\\\"", &smart_options()), "<p>&quot;a&quot;</p>\n");
}

#[test]
fn bracket_then_apostrophe_s_is_not_an_opening_quote() {
    assert_eq!(render_with("(x)'s", &smart_options()), "<p>(x)\u{2019}s</p>\n");
}

#[test]
fn quote_direction_does_not_go_stale_across_a_code_span() {
    assert_eq!(
        render_with("`code`'s value", &smart_options()),
        "<p><code>code</code>\u{2019}s value</p>\n"
    );
}
