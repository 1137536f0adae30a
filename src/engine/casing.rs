// WHY: replacement casing follows the shape of the matched text, then the sentence position
// Terminators followed by a closing parenthesis are not recognised (known heuristic limit)

/// Characters that end a sentence for capitalization purposes
pub const SENTENCE_TERMINATORS: &[char] = &['.', '?', '!'];

/// Closing quotes allowed between a terminator and the match
pub const CLOSING_QUOTES: &[char] = &['"', '\'', '\u{201D}', '\u{2019}'];

/// Derive the final text of one replacement
///
/// Applied in order: literal when `match_case`; all-caps match gives all-caps replacement;
/// capitalized match gives capitalized replacement; finally a match at the start of the text,
/// the start of a line or after a sentence terminator gets its first letter uppercased.
pub fn derive_case(matched: &str, replacement: &str, match_case: bool, preceding_context: &str) -> String {
    if match_case {
        return replacement.to_string();
    }

    let mut result = if is_all_uppercase(matched) {
        replacement.to_uppercase()
    } else if matched.chars().next().is_some_and(char::is_uppercase) {
        uppercase_first(replacement)
    } else {
        replacement.to_string()
    };

    if starts_sentence(preceding_context) && result.chars().next().is_some_and(char::is_alphabetic) {
        result = uppercase_first(&result);
    }

    result
}

/// True when `text` has at least one cased character and no lowercase ones
pub fn is_all_uppercase(text: &str) -> bool {
    text.to_uppercase() == text && text.to_lowercase() != text
}

/// Uppercase the first character, keeping the rest as is
pub fn uppercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(text.len());
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// Whether a match preceded by `context` opens a sentence or a line
pub fn starts_sentence(context: &str) -> bool {
    let trimmed = context.trim_end();
    if trimmed.is_empty() {
        return true;
    }
    if context[trimmed.len()..].contains(['\n', '\r']) {
        return true;
    }

    let mut tail = trimmed.chars().rev();
    match tail.next() {
        Some(ch) if SENTENCE_TERMINATORS.contains(&ch) => true,
        Some(ch) if CLOSING_QUOTES.contains(&ch) => {
            tail.next().is_some_and(|prev| SENTENCE_TERMINATORS.contains(&prev))
        }
        _ => false,
    }
}
