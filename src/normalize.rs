// WHY: quote variants are folded before matching so a rule written with straight quotes
// also hits curly, angled and fullwidth quotes in pasted prose

/// Characters folded to the ASCII double quote `"`
pub const DOUBLE_QUOTES: &[char] = &[
    '\u{201C}', // “
    '\u{201D}', // ”
    '\u{201E}', // „
    '\u{201F}', // ‟
    '\u{00AB}', // «
    '\u{00BB}', // »
    '\u{2033}', // ″
    '\u{2036}', // ‶
    '\u{301D}', // 〝
    '\u{301E}', // 〞
    '\u{301F}', // 〟
    '\u{FF02}', // ＂
];

/// Characters folded to the ASCII single quote `'`
pub const SINGLE_QUOTES: &[char] = &[
    '\u{2018}', // ‘
    '\u{2019}', // ’
    '\u{201A}', // ‚
    '\u{201B}', // ‛
    '\u{2039}', // ‹
    '\u{203A}', // ›
    '\u{2032}', // ′
    '\u{2035}', // ‵
    '\u{02BC}', // ʼ
    '\u{FF07}', // ＇
];

/// Map a single character to its canonical quote form, leaving everything else untouched
#[inline]
pub fn fold_quote(ch: char) -> char {
    if DOUBLE_QUOTES.contains(&ch) {
        '"'
    } else if SINGLE_QUOTES.contains(&ch) {
        '\''
    } else {
        ch
    }
}

/// Fold every quote variant in `text` to its ASCII form
pub fn normalize(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    normalize_into(text, &mut result);
    result
}

/// Normalize into a supplied buffer to avoid allocation
/// WHY: the engine normalizes the source and every find string; reuse keeps that cheap
pub fn normalize_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());
    buffer.extend(text.chars().map(fold_quote));
}

/// True when `normalize(text)` would return `text` unchanged
pub fn is_normalized(text: &str) -> bool {
    text.chars().all(|ch| fold_quote(ch) == ch)
}
