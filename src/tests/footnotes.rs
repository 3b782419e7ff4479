use pretty_assertions::assert_eq;

use super::gfm_render;

#[test]
fn single_reference_and_definition() {
    assert_eq!(
        gfm_render("Here is a note.[^1]\n\n[^1]: The note text.\n"),
        concat!(
            "<p>Here is a note.",
            "<sup class=\"footnote-ref\">",
            "<a href=\"#fn-1\" id=\"fnref-1\" data-footnote-ref>1</a></sup></p>\n",
            "<section class=\"footnotes\" data-footnotes>\n<ol>\n",
            "<li id=\"fn-1\">\n",
            "<p>The note text. ",
            "<a href=\"#fnref-1\" class=\"footnote-backref\" data-footnote-backref ",
            "data-footnote-backref-idx=\"1\" aria-label=\"Back to reference 1\">\u{21A9}</a></p>\n",
            "</li>\n</ol>\n</section>\n"
        )
    );
}

#[test]
fn unreferenced_definition_is_dropped() {
    assert_eq!(
        gfm_render("No notes here.\n\n[^1]: Never used.\n"),
        "<p>No notes here.</p>\n"
    );
}

#[test]
fn repeated_reference_gets_a_numbered_backref() {
    assert_eq!(
        gfm_render("One.[^a] Two.[^a]\n\n[^a]: Shared note.\n"),
        concat!(
            "<p>One.<sup class=\"footnote-ref\">",
            "<a href=\"#fn-a\" id=\"fnref-a\" data-footnote-ref>1</a></sup> Two.",
            "<sup class=\"footnote-ref\">",
            "<a href=\"#fn-a\" id=\"fnref-a-2\" data-footnote-ref>2</a></sup></p>\n",
            "<section class=\"footnotes\" data-footnotes>\n<ol>\n",
            "<li id=\"fn-a\">\n",
            "<p>Shared note. ",
            "<a href=\"#fnref-a\" class=\"footnote-backref\" data-footnote-backref ",
            "data-footnote-backref-idx=\"1\" aria-label=\"Back to reference 1\">\u{21A9}</a>",
            " <a href=\"#fnref-a-2\" class=\"footnote-backref\" data-footnote-backref ",
            "data-footnote-backref-idx=\"1-2\" aria-label=\"Back to reference 1-2\">\u{21A9}2</a></p>\n",
            "</li>\n</ol>\n</section>\n"
        )
    );
}
