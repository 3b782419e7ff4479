use pretty_assertions::assert_eq;

use crate::Options;

use super::render_with;

#[test]
fn fenced_code_block_unterminated_at_eof() {
    assert_eq!(
        render_with("```\nfn main() {}\n", &Options::default()),
        "<pre><code>fn main() {}\n</code></pre>\n"
    );
}

#[test]
fn fenced_code_block_tilde() {
    assert_eq!(
        render_with("~~~\ncode\n~~~\n", &Options::default()),
        "<pre><code>code\n</code></pre>\n"
    );
}

#[test]
fn code_span_with_embedded_backtick() {
    assert_eq!(
        render_with("``foo ` bar``", &Options::default()),
        "<p><code>foo ` bar</code></p>\n"
    );
}

#[test]
fn code_span_strips_one_leading_trailing_space() {
    assert_eq!(
        render_with("` foo `", &Options::default()),
        "<p><code>foo</code></p>\n"
    );
}

#[test]
fn full_info_string_emits_data_meta() {
    let options = Options {
        render: crate::RenderOptions {
            full_info_string: true,
            ..Options::default().render
        },
        ..Options::default()
    };
    assert_eq!(
        render_with("```rust extra stuff\ncode\n```\n", &options),
        "<pre><code class=\"language-rust\" data-meta=\"extra stuff\">code\n</code></pre>\n"
    );
}

#[test]
fn indented_code_block_ignores_one_fewer_space() {
    assert_eq!(
        render_with("   not code\n", &Options::default()),
        "<p>not code</p>\n"
    );
}
