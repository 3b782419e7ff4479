//! Configuration for the parser and renderer. Grouped into `extension`/`parse`/`render`
//! sub-structs, mirroring the distinction between "what extensions exist", "how parsing
//! behaves", and "how rendering behaves" (`SPEC_FULL.md` §4.6).

#[derive(Debug, Clone)]
/// Umbrella options struct threaded through both the parser and the renderer.
pub struct Options {
    /// Enable GFM extensions.
    pub extension: ExtensionOptions,

    /// Parse-time behaviour not tied to a specific extension.
    pub parse: ParseOptions,

    /// Render-time behaviour.
    pub render: RenderOptions,
}

impl Options {
    /// All extensions and render options at their CommonMark defaults (nothing enabled).
    pub fn default() -> Self {
        Options {
            extension: ExtensionOptions::default(),
            parse: ParseOptions::default(),
            render: RenderOptions::default(),
        }
    }

    /// The default GFM extension set named in the spec: `table`, `strikethrough`, `tasklist`,
    /// `autolink`, `tagfilter`, `footnotes`.
    pub fn gfm() -> Self {
        Options {
            extension: ExtensionOptions {
                strikethrough: true,
                tagfilter: true,
                table: true,
                autolink: true,
                tasklist: true,
                footnotes: true,
            },
            parse: ParseOptions::default(),
            render: RenderOptions {
                tagfilter: true,
                ..RenderOptions::default()
            },
        }
    }
}

#[derive(Default, Debug, Clone)]
/// Which GFM extensions are active during parsing.
pub struct ExtensionOptions {
    /// `~text~` / `~~text~~` strikethrough (distilled spec §4.3.7).
    pub strikethrough: bool,

    /// Escapes dangerous raw-HTML tag names at render time (distilled spec §4.4's "tag filter").
    /// Kept as its own extension flag (rather than folded into `render.tagfilter`) because GFM
    /// treats it as something the parser/flavor selects, independent of whether a given render
    /// call wants it applied (see `render.tagfilter`).
    pub tagfilter: bool,

    /// GFM tables (distilled spec §4.2.10).
    pub table: bool,

    /// GFM extended autolinks: bare `www.`/scheme URLs and emails (distilled spec §4.3.8).
    pub autolink: bool,

    /// GFM task-list items, `- [ ]`/`- [x]` (distilled spec §4.2.8 interacting with §4.4).
    pub tasklist: bool,

    /// GFM footnotes (distilled spec §4.2.11, §4.3.9, §4.4).
    pub footnotes: bool,
}

#[derive(Default, Debug, Clone)]
/// Parse-time behaviour not gated by an extension flag. Currently empty: the distilled spec
/// places no parse-time knob outside of which extensions are enabled, but this stays a distinct
/// struct (rather than being folded into `ExtensionOptions`) so a future parse-only flag (e.g. a
/// broken-reference-link callback) has somewhere to live without reshaping `Options`.
pub struct ParseOptions {}

#[derive(Debug, Clone)]
/// Render-time behaviour.
pub struct RenderOptions {
    /// Scrub raw HTML and `javascript:`-scheme URLs (distilled spec §4.4 "Safe mode").
    pub safe: bool,

    /// Replacement text for a soft line break.
    pub softbreak: String,

    /// Apply smart-punctuation substitution (distilled spec §4.4 "Smart punctuation").
    pub smart: bool,

    /// Emit `style="text-align:…"` instead of `align="…"` on table cells.
    pub table_prefer_style_attributes: bool,

    /// Emit the info-string suffix after the first whitespace-separated token as `data-meta` on
    /// fenced code blocks.
    pub full_info_string: bool,

    /// Apply the GFM tag filter to raw HTML output. Distinct from
    /// `extension.tagfilter` so a caller can parse with the tag-filter extension active (which
    /// only affects AST shape, if at all) yet choose not to apply the filter at render time, or
    /// vice versa -- matching how the teacher crate separates the two.
    pub tagfilter: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            safe: false,
            softbreak: "\n".to_string(),
            smart: false,
            table_prefer_style_attributes: false,
            full_info_string: false,
            tagfilter: false,
        }
    }
}
