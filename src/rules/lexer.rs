//! Expression tokenizer
//!
//! Splits rule text into untyped string slices. Classification into
//! keywords, identifiers, operators and literals happens later, by content.

/// Scan `text` into tokens in source order. Whitespace is skipped; no
/// token is ever empty.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = text.trim_start();

    while !rest.is_empty() {
        let len = token_len(rest);
        tokens.push(&rest[..len]);
        rest = rest[len..].trim_start();
    }

    log::trace!("tokenized {:?} into {:?}", text, tokens);
    tokens
}

/// Byte length of the token at the start of `s`, which must be non-empty
/// and start with a non-whitespace character
fn token_len(s: &str) -> usize {
    let mut chars = s.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return 0,
    };

    if first == '\'' {
        // An unterminated quote falls through to the single-character rule
        if let Some(end) = s[1..].find('\'') {
            return end + 2;
        }
    }

    let signed_number = first == '-' && chars.next().is_some_and(|c| c.is_ascii_digit());
    if is_word_char(first) || signed_number {
        return s
            .char_indices()
            .skip(1)
            .find(|(_, c)| !is_word_char(*c))
            .map_or(s.len(), |(i, _)| i);
    }

    if s.starts_with("!=") || s.starts_with("<=") || s.starts_with(">=") {
        return 2;
    }

    // Parentheses, single-character operators and any other symbol
    first.len_utf8()
}

/// Identifier, keyword and unquoted number characters
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}
