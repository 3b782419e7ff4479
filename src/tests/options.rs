use pretty_assertions::assert_eq;

use crate::{ExtensionOptions, Options};

use super::render_with;

#[test]
fn default_options_enable_no_extensions() {
    let options = Options::default();
    assert!(!options.extension.table);
    assert!(!options.extension.strikethrough);
    assert!(!options.extension.tasklist);
    assert!(!options.extension.autolink);
    assert!(!options.extension.tagfilter);
    assert!(!options.extension.footnotes);
}

#[test]
fn gfm_options_enable_the_documented_extension_set() {
    let options = Options::gfm();
    assert!(options.extension.table);
    assert!(options.extension.strikethrough);
    assert!(options.extension.tasklist);
    assert!(options.extension.autolink);
    assert!(options.extension.tagfilter);
    assert!(options.extension.footnotes);
}

#[test]
fn extensions_are_independently_toggleable() {
    let options = Options {
        extension: ExtensionOptions {
            table: true,
            ..ExtensionOptions::default()
        },
        ..Options::default()
    };
    assert_eq!(
        render_with("| a | b |\n| - | - |\n| 1 | 2 |\n", &options),
        concat!(
            "<table>\n<thead>\n<tr>\n<th>a</th>\n<th>b</th>\n</tr>\n</thead>\n",
            "<tbody>\n<tr>\n<td>1</td>\n<td>2</td>\n</tr>\n</tbody>\n</table>\n"
        )
    );
    assert_eq!(
        render_with("~~gone~~", &options),
        "<p>~~gone~~</p>\n"
    );
}
