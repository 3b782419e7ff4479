use std::cell::Cell;
use std::collections::HashMap;
use std::fmt::{self, Write};

use crate::html;
use crate::parser::Options;

/// Threaded through every `render_*` function: owns the output buffer and tracks footnote
/// numbering state, which is the one piece of render state that can't be read back off the AST
/// (distilled spec §4.3.9's "first reference wins the ordinal" rule).
pub struct Context<'o> {
    output: &'o mut dyn Write,
    last_was_lf: Cell<bool>,

    pub options: &'o Options,

    pub(super) footnote_ix: u32,
    pub(super) written_footnote_ix: u32,
    /// Per-footnote-label count of references seen so far, used to number repeated references
    /// to the same footnote (`fnref-name`, `fnref-name-2`, ...).
    pub(super) footnote_ref_counts: HashMap<String, u32>,
}

impl<'o> Context<'o> {
    pub(super) fn new(output: &'o mut dyn Write, options: &'o Options) -> Self {
        Context {
            output,
            last_was_lf: Cell::new(true),
            options,
            footnote_ix: 0,
            written_footnote_ix: 0,
            footnote_ref_counts: HashMap::new(),
        }
    }

    pub(super) fn finish(mut self) -> fmt::Result {
        if self.footnote_ix > 0 {
            self.write_str("</ol>\n</section>\n")?;
        }
        Ok(())
    }

    /// Writes a newline unless the last byte written already was one.
    pub fn cr(&mut self) -> fmt::Result {
        if !self.last_was_lf.get() {
            self.write_str("\n")?;
        }
        Ok(())
    }

    pub fn escape(&mut self, buffer: &str) -> fmt::Result {
        html::escape(self, buffer)
    }

    pub fn escape_href(&mut self, buffer: &str) -> fmt::Result {
        html::escape_href(self, buffer, false)
    }
}

impl<'o> Write for Context<'o> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if let Some(&last) = s.as_bytes().last() {
            self.last_was_lf.set(last == b'\n');
        }
        self.output.write_str(s)
    }
}

impl<'o> fmt::Debug for Context<'o> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("<marktree::html::Context>")
    }
}
