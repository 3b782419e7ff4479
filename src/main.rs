use std::io::{self, Read, Write};

use clap::Parser as ClapParser;
use typed_arena::Arena;

use marktree::{ExtensionOptions, Options, ParseOptions, RenderOptions};

/// Render CommonMark (optionally GitHub Flavored Markdown) from stdin to HTML on stdout.
#[derive(ClapParser, Debug)]
#[command(name = "marktree", version, about)]
struct Cli {
    /// Enable the default GitHub Flavored Markdown extension set (tables, strikethrough,
    /// task lists, extended autolinks, the tag filter, and footnotes).
    #[arg(long)]
    gfm: bool,

    /// Enable a single extension by name. May be repeated. Names: table, strikethrough,
    /// tasklist, autolink, tagfilter, footnotes.
    #[arg(short = 'e', long = "extension", value_name = "NAME")]
    extensions: Vec<String>,

    /// Apply smart punctuation (straight quotes/dashes/ellipses to their curly/typographic
    /// forms).
    #[arg(long)]
    smart: bool,

    /// Emit `style="text-align: ..."` rather than `align="..."` on table cells.
    #[arg(long)]
    table_prefer_style_attributes: bool,

    /// Emit the remainder of a fenced code block's info string as `data-meta`.
    #[arg(long)]
    full_info_string: bool,

    /// Disable safe mode: render raw HTML and `javascript:`/`vbscript:`-scheme links as-is
    /// rather than scrubbing them. Safe mode is the default.
    #[arg(long)]
    unsafe_: bool,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let mut extension = if cli.gfm {
        ExtensionOptions {
            strikethrough: true,
            tagfilter: true,
            table: true,
            autolink: true,
            tasklist: true,
            footnotes: true,
        }
    } else {
        ExtensionOptions::default()
    };

    for name in &cli.extensions {
        match name.as_str() {
            "table" => extension.table = true,
            "strikethrough" => extension.strikethrough = true,
            "tasklist" => extension.tasklist = true,
            "autolink" => extension.autolink = true,
            "tagfilter" => extension.tagfilter = true,
            "footnotes" => extension.footnotes = true,
            other => {
                eprintln!("marktree: unknown extension `{other}`");
                std::process::exit(1);
            }
        }
    }

    let options = Options {
        extension,
        parse: ParseOptions::default(),
        render: RenderOptions {
            safe: !cli.unsafe_,
            softbreak: "\n".to_string(),
            smart: cli.smart,
            table_prefer_style_attributes: cli.table_prefer_style_attributes,
            full_info_string: cli.full_info_string,
            tagfilter: cli.gfm || cli.extensions.iter().any(|e| e == "tagfilter"),
        },
    };

    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let arena = Arena::new();
    let root = marktree::parse(&arena, &input, &options);
    let output = marktree::render(root, &options);

    io::stdout().write_all(output.as_bytes())
}
