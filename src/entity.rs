//! Named and numeric HTML entity decoding (distilled spec §4.3.2).
//!
//! The named-entity table is generated at build time by `build.rs` from the `entities` crate's
//! WHATWG data, sorted for binary search, and brought in here via `include!`.

use crate::ctype::isdigit;
use std::char;
use std::cmp::min;

include!(concat!(env!("OUT_DIR"), "/entitydata.rs"));

const ENTITY_MIN_LENGTH: usize = 2;
const ENTITY_MAX_LENGTH: usize = 32;

fn isxdigit(ch: u8) -> bool {
    ch.is_ascii_hexdigit()
}

/// Attempts to decode a single entity starting just after the `&` in `text`. Returns the decoded
/// string and the number of bytes consumed (including the trailing `;`), or `None` if `text`
/// does not start with a recognized entity.
pub fn unescape(text: &str) -> Option<(String, usize)> {
    let bytes = text.as_bytes();

    if bytes.len() >= 3 && bytes[0] == b'#' {
        let mut codepoint: u32 = 0;
        let mut i;

        let num_digits = if bytes.len() > 1 && isdigit(bytes[1]) {
            i = 1;
            while i < bytes.len() && isdigit(bytes[i]) {
                codepoint = codepoint.saturating_mul(10).saturating_add((bytes[i] - b'0') as u32);
                codepoint = min(codepoint, 0x11_0000);
                i += 1;
            }
            i - 1
        } else if bytes.len() > 1 && (bytes[1] == b'x' || bytes[1] == b'X') {
            i = 2;
            while i < bytes.len() && isxdigit(bytes[i]) {
                codepoint = codepoint.saturating_mul(16).saturating_add((bytes[i] as u32 | 32) % 39 - 9);
                codepoint = min(codepoint, 0x11_0000);
                i += 1;
            }
            i - 2
        } else {
            0
        };

        if (1..=8).contains(&num_digits) && i < bytes.len() && bytes[i] == b';' {
            if codepoint == 0 || (0xD800..0xE000).contains(&codepoint) || codepoint >= 0x110000 {
                codepoint = 0xFFFD;
            }
            return Some((
                char::from_u32(codepoint).unwrap_or('\u{FFFD}').to_string(),
                i + 1,
            ));
        }
    }

    let size = min(bytes.len(), ENTITY_MAX_LENGTH);
    for i in ENTITY_MIN_LENGTH..size {
        if bytes[i] == b' ' {
            return None;
        }

        if bytes[i] == b';' {
            return lookup(&text[..i]).map(|e| (e.to_string(), i + 1));
        }
    }

    None
}

fn lookup(name: &str) -> Option<&'static str> {
    // The table is sorted by the original "&name;" form (build.rs sorts before stripping the
    // delimiters), which is not quite the same ordering as the bare name alone would produce
    // (e.g. "sup1" sorts before "sup" there, but not under plain string comparison) -- so a
    // linear scan is used rather than a binary search over the stripped names.
    entitydata::TRANSLATED_ENTITIES
        .iter()
        .find(|&&(n, _)| n == name)
        .map(|&(_, v)| v)
}

/// Replaces every recognized entity in `src` with its decoded form, leaving unrecognized `&...;`
/// sequences (and lone `&`s) untouched.
pub fn unescape_html(src: &str) -> String {
    let bytes = src.as_bytes();
    let size = bytes.len();
    let mut i = 0;
    let mut v = String::with_capacity(size);

    while i < size {
        let org = i;
        while i < size && bytes[i] != b'&' {
            i += 1;
        }

        if i > org {
            if org == 0 && i >= size {
                return src.to_string();
            }
            v.push_str(&src[org..i]);
        }

        if i >= size {
            return v;
        }

        i += 1;
        match unescape(&src[i..]) {
            Some((chs, consumed)) => {
                v.push_str(&chs);
                i += consumed;
            }
            None => v.push('&'),
        }
    }

    v
}
