//! Text normalization for matching.
//!
//! Labels in the RFE are French and the extraction job keeps them as
//! printed, so lookups fold case, diacritics and whitespace before
//! comparing.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Folds text for comparison.
///
/// Lowercases, strips diacritics ("é" → "e"), expands the "œ"/"æ"
/// ligatures, and collapses whitespace runs to a single space.
///
/// ```
/// use rfe_loader::normalize::fold;
///
/// assert_eq!(fold("  Prothèse   totale de HANCHE "), "prothese totale de hanche");
/// assert_eq!(fold("Œsophagectomie"), "oesophagectomie");
/// ```
pub fn fold(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.nfd().filter(|c| !is_combining_mark(*c)) {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        match c {
            'œ' | 'Œ' => out.push_str("oe"),
            'æ' | 'Æ' => out.push_str("ae"),
            _ => out.extend(c.to_lowercase()),
        }
    }

    out
}

/// Splits folded text into alphanumeric tokens.
pub fn tokens(folded: &str) -> impl Iterator<Item = &str> {
    folded
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
}

/// Collapses whitespace runs and trims, keeping case and accents.
pub fn tidy(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Converts a label to a URL-friendly slug.
///
/// ```
/// use rfe_loader::normalize::slugify;
///
/// assert_eq!(slugify("Chirurgie orthopédique"), "chirurgie-orthopedique");
/// assert_eq!(slugify("Œsophage et estomac"), "oesophage-et-estomac");
/// ```
pub fn slugify(text: &str) -> String {
    tokens(&fold(text)).collect::<Vec<_>>().join("-")
}
