use pretty_assertions::assert_eq;

use super::gfm_render;

#[test]
fn unchecked_and_checked_items() {
    assert_eq!(
        gfm_render("- [ ] todo\n- [x] done\n"),
        concat!(
            "<ul>\n",
            "<li><input disabled=\"\" type=\"checkbox\" /> todo</li>\n",
            "<li><input checked=\"\" disabled=\"\" type=\"checkbox\" /> done</li>\n",
            "</ul>\n"
        )
    );
}

#[test]
fn uppercase_x_also_checks() {
    assert_eq!(
        gfm_render("- [X] done\n"),
        "<ul>\n<li><input checked=\"\" disabled=\"\" type=\"checkbox\" /> done</li>\n</ul>\n"
    );
}

#[test]
fn tasklist_requires_extension() {
    assert_eq!(
        super::render_with("- [ ] todo\n", &crate::Options::default()),
        "<ul>\n<li>[ ] todo</li>\n</ul>\n"
    );
}
