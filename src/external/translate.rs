//! Portuguese → English country names for English-keyed upstream APIs.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Localized name (lower-case) → English name.
///
/// Accented and unaccented spellings are both listed; lookups go through
/// [`normalize`], so only the unaccented keys are ever hit.
const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("brasil", "brazil"),
    ("estados unidos", "united states"),
    ("estados unidos da america", "united states"),
    ("eua", "united states"),
    ("japão", "japan"),
    ("japao", "japan"),
    ("alemanha", "germany"),
    ("frança", "france"),
    ("franca", "france"),
    ("itália", "italy"),
    ("italia", "italy"),
    ("espanha", "spain"),
    ("portugal", "portugal"),
    ("reino unido", "united kingdom"),
    ("inglaterra", "united kingdom"),
    ("canadá", "canada"),
    ("canada", "canada"),
    ("méxico", "mexico"),
    ("mexico", "mexico"),
    ("argentina", "argentina"),
    ("chile", "chile"),
    ("colômbia", "colombia"),
    ("colombia", "colombia"),
    ("peru", "peru"),
    ("venezuela", "venezuela"),
    ("equador", "ecuador"),
    ("uruguai", "uruguay"),
    ("paraguai", "paraguay"),
    ("bolívia", "bolivia"),
    ("bolivia", "bolivia"),
    ("china", "china"),
    ("índia", "india"),
    ("india", "india"),
    ("rússia", "russia"),
    ("russia", "russia"),
    ("austrália", "australia"),
    ("australia", "australia"),
    ("coreia do sul", "south korea"),
    ("coreia sul", "south korea"),
    ("coreia do norte", "north korea"),
    ("coreia norte", "north korea"),
    ("áfrica do sul", "south africa"),
    ("africa do sul", "south africa"),
];

/// Lower-case and strip diacritics: "Japão" → "japao".
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Best-effort English name for a localized country name.
///
/// Unmapped names are returned exactly as given (not normalized).
pub fn to_english(name: &str) -> String {
    let key = normalize(name.trim());
    COUNTRY_NAMES
        .iter()
        .find(|(local, _)| *local == key)
        .map(|(_, english)| english.to_string())
        .unwrap_or_else(|| name.to_string())
}
