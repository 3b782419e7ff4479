use pretty_assertions::assert_eq;

use super::gfm_render;

#[test]
fn table_with_alignment() {
    assert_eq!(
        gfm_render("| a | b | c |\n| :- | :-: | -: |\n| 1 | 2 | 3 |\n"),
        concat!(
            "<table>\n<thead>\n<tr>\n",
            "<th align=\"left\">a</th>\n",
            "<th align=\"center\">b</th>\n",
            "<th align=\"right\">c</th>\n",
            "</tr>\n</thead>\n<tbody>\n<tr>\n",
            "<td align=\"left\">1</td>\n",
            "<td align=\"center\">2</td>\n",
            "<td align=\"right\">3</td>\n",
            "</tr>\n</tbody>\n</table>\n"
        )
    );
}

#[test]
fn table_row_with_escaped_pipe_in_cell() {
    assert_eq!(
        gfm_render("| a | b |\n| - | - |\n| 1\\|2 | 3 |\n"),
        concat!(
            "<table>\n<thead>\n<tr>\n<th>a</th>\n<th>b</th>\n</tr>\n</thead>\n",
            "<tbody>\n<tr>\n<td>1|2</td>\n<td>3</td>\n</tr>\n</tbody>\n</table>\n"
        )
    );
}

#[test]
fn short_row_is_padded_with_empty_cells() {
    assert_eq!(
        gfm_render("| a | b | c |\n| - | - | - |\n| 1 |\n"),
        concat!(
            "<table>\n<thead>\n<tr>\n<th>a</th>\n<th>b</th>\n<th>c</th>\n</tr>\n</thead>\n",
            "<tbody>\n<tr>\n<td>1</td>\n<td></td>\n<td></td>\n</tr>\n</tbody>\n</table>\n"
        )
    );
}

#[test]
fn table_requires_table_extension() {
    assert_eq!(
        super::render_with("| a | b |\n| - | - |\n| 1 | 2 |\n", &crate::Options::default()),
        "<p>| a | b |\n| - | - |\n| 1 | 2 |</p>\n"
    );
}
