//! Identifier case folding used for generated file names and selectors.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Latin letters that do not decompose into a base letter and a mark.
fn expand_latin(c: char) -> Option<&'static str> {
    let expanded = match c {
        'ß' => "ss",
        'æ' => "ae",
        'Æ' => "Ae",
        'ø' => "o",
        'Ø' => "O",
        'œ' => "oe",
        'Œ' => "Oe",
        'đ' | 'ð' => "d",
        'Đ' | 'Ð' => "D",
        'ł' => "l",
        'Ł' => "L",
        'þ' => "th",
        'Þ' => "Th",
        _ => return None,
    };
    Some(expanded)
}

/// Reduce accented Latin letters to plain ASCII letters (`café` -> `cafe`).
pub fn deburr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.nfd().filter(|&c| !is_combining_mark(c)) {
        match expand_latin(c) {
            Some(expanded) => out.push_str(expanded),
            None => out.push(c),
        }
    }
    out
}

/// Split an identifier into words.
///
/// Words break on any non-alphanumeric character, on a lower-to-upper
/// transition (`heroBanner`), at the end of an acronym (`CTAButton`) and
/// between letters and digits (`hero2`).
pub fn words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(prev) = current.chars().last() {
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_uppercase() && c.is_uppercase() && next_is_lower)
                || (prev.is_alphabetic() && c.is_numeric())
                || (prev.is_numeric() && c.is_alphabetic());
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Lower-case, hyphen-joined form of an identifier (`Rounded Corners` -> `rounded-corners`).
///
/// Accents are dropped and apostrophes removed before splitting, so
/// `Women's Café` becomes `womens-cafe`.
pub fn kebab_case(input: &str) -> String {
    let cleaned: String =
        deburr(input).chars().filter(|&c| !matches!(c, '\'' | '\u{2019}')).collect();
    words(&cleaned).iter().map(|w| w.to_lowercase()).collect::<Vec<_>>().join("-")
}
