use pretty_assertions::assert_eq;

use crate::Options;

use super::render_with;

#[test]
fn paragraphs_and_emphasis() {
    assert_eq!(
        render_with("My **document**.\n\nIt's mine.", &Options::default()),
        concat!(
            "<p>My <strong>document</strong>.</p>\n",
            "<p>It's mine.</p>\n"
        )
    );
}

#[test]
fn blockquote_and_heading() {
    assert_eq!(
        render_with("> Yes.\n\n## Hi!\n\nOkay.", &Options::default()),
        concat!(
            "<blockquote>\n<p>Yes.</p>\n</blockquote>\n",
            "<h2>Hi!</h2>\n",
            "<p>Okay.</p>\n"
        )
    );
}

#[test]
fn atx_heading_levels() {
    assert_eq!(
        render_with("# one\n###### six", &Options::default()),
        "<h1>one</h1>\n<h6>six</h6>\n"
    );
}

#[test]
fn setext_heading() {
    assert_eq!(
        render_with("Title\n=====\n\nSubtitle\n--------\n", &Options::default()),
        "<h1>Title</h1>\n<h2>Subtitle</h2>\n"
    );
}

#[test]
fn thematic_break() {
    assert_eq!(
        render_with("one\n\n---\n\ntwo", &Options::default()),
        "<p>one</p>\n<hr />\n<p>two</p>\n"
    );
}

#[test]
fn fenced_code_block_with_info_string() {
    assert_eq!(
        render_with("```rust\nfn main() {}\n```\n", &Options::default()),
        "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>\n"
    );
}

#[test]
fn indented_code_block() {
    assert_eq!(
        render_with("    fn main() {}\n", &Options::default()),
        "<pre><code>fn main() {}\n</code></pre>\n"
    );
}

#[test]
fn tight_and_loose_lists() {
    assert_eq!(
        render_with("- a\n- b\n", &Options::default()),
        "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n"
    );
    assert_eq!(
        render_with("- a\n\n- b\n", &Options::default()),
        "<ul>\n<li>\n<p>a</p>\n</li>\n<li>\n<p>b</p>\n</li>\n</ul>\n"
    );
}

#[test]
fn ordered_list_with_start() {
    assert_eq!(
        render_with("3. a\n4. b\n", &Options::default()),
        "<ol start=\"3\">\n<li>a</li>\n<li>b</li>\n</ol>\n"
    );
}

#[test]
fn nested_blockquote_in_list() {
    assert_eq!(
        render_with("- > quoted\n", &Options::default()),
        "<ul>\n<li>\n<blockquote>\n<p>quoted</p>\n</blockquote>\n</li>\n</ul>\n"
    );
}

#[test]
fn links_and_images() {
    assert_eq!(
        render_with(
            "[a link](/url \"a title\")\n\n![an image](/img.png)",
            &Options::default()
        ),
        concat!(
            "<p><a href=\"/url\" title=\"a title\">a link</a></p>\n",
            "<p><img src=\"/img.png\" alt=\"an image\" /></p>\n"
        )
    );
}

#[test]
fn reference_links() {
    assert_eq!(
        render_with(
            "[a link][ref]\n\n[ref]: /url \"a title\"\n",
            &Options::default()
        ),
        "<p><a href=\"/url\" title=\"a title\">a link</a></p>\n"
    );
}

#[test]
fn hard_and_soft_breaks() {
    assert_eq!(
        render_with("one\nbreak\n\nsoft  \nhard", &Options::default()),
        "<p>one\nbreak</p>\n<p>soft<br />\nhard</p>\n"
    );
}

#[test]
fn inline_code_span() {
    assert_eq!(
        render_with("Call `foo()` now.", &Options::default()),
        "<p>Call <code>foo()</code> now.</p>\n"
    );
}

#[test]
fn strong_inside_emphasis_nesting() {
    assert_eq!(
        render_with("*a **b** c*", &Options::default()),
        "<p><em>a <strong>b</strong> c</em></p>\n"
    );
}
