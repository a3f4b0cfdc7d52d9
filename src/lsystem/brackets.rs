//! Bracket extraction for parametrized symbols like `F(i=0.1)`
//!
//! Also holds the small whitespace helpers used when laying out rule text.

/// A token split into its bare symbols and the contents of its first bracket pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brackets {
    pub stripped: String,
    pub contents: String,
}

/// Split `X(expr)` into `X` and `expr`
///
/// Only the first `(` and the first `)` are looked at. Text after the closing
/// bracket is kept in `stripped`. A missing or misplaced `)` is not an error:
/// the token comes back untouched with empty contents.
pub fn extract_brackets(token: &str) -> Brackets {
    let untouched = || Brackets {
        stripped: token.to_string(),
        contents: String::new(),
    };

    let open = match token.find('(') {
        Some(pos) => pos,
        None => return untouched(),
    };

    match token.find(')') {
        Some(close) if close > open => Brackets {
            stripped: format!("{}{}", &token[..open], &token[close + 1..]),
            contents: token[open + 1..close].to_string(),
        },
        _ => untouched(),
    }
}

/// A run of `count` spaces, empty for zero or negative counts
pub fn spaces(count: i64) -> String {
    if count <= 0 {
        return String::new();
    }
    " ".repeat(count as usize)
}

/// Right-pad `s` with spaces so it is at least `width` characters wide
pub fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, spaces(width as i64 - len as i64))
}
