//! Heuristic source-language detection from Unicode script ranges.
//!
//! The checks run in a fixed priority order, so mixed-script text is
//! classified by whichever range matches first: CJK ideographs win over
//! kana, kana over Hangul, and anything else is treated as Latin.

/// Guess the source language of `text`.
///
/// Pure and infallible; empty input yields the default `"en"`.
///
/// # Example
///
/// ```
/// use quick_translator::detect;
///
/// assert_eq!(detect("你好"), "zh-CN");
/// assert_eq!(detect("こんにちは"), "ja");
/// assert_eq!(detect("hello"), "en");
/// ```
pub fn detect(text: &str) -> &'static str {
    if text.chars().any(is_cjk_ideograph) {
        return "zh-CN";
    }
    if text.chars().any(is_kana) {
        return "ja";
    }
    if text.chars().any(is_hangul) {
        return "ko";
    }
    "en"
}

/// CJK Unified Ideographs
fn is_cjk_ideograph(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// Hiragana or Katakana
fn is_kana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c) || ('\u{30A0}'..='\u{30FF}').contains(&c)
}

/// Hangul syllables
fn is_hangul(c: char) -> bool {
    ('\u{AC00}'..='\u{D7AF}').contains(&c)
}
