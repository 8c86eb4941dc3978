//! Localized display strings.
//!
//! Resolution order for a language tag such as `ja-JP`: exact tag, then the
//! base language (`ja`), then English, then the empty string. Plain strings
//! starting with `@` are keys into a [`Translations`] table and go through
//! the same chain; unknown keys are returned unchanged.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::error::CoreError;
use crate::models::LocalizedText;

pub const DEFAULT_LANGUAGE: &str = "en";

/// A table of `@key` translations, each a language-tag → text map.
#[derive(Debug, Clone, Default)]
pub struct Translations {
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

/// `(key, English, Japanese)` rows of the built-in table.
const BUILTIN_ROWS: &[(&str, &str, &str)] = &[
    ("Settings", "Settings", "設定"),
    ("Language", "Language", "言語"),
    ("PredictOFC", "Predict OFC", "OFC結果予測"),
    ("AvailableCurves", "Available curves", "利用可能な曲線"),
    ("Probability", "Probability", "確率"),
    ("References", "References", "参考文献"),
    ("Sex", "Sex", "性別"),
    ("Male", "Male", "男性"),
    ("Female", "Female", "女性"),
    ("Age", "Age", "年齢"),
    ("ModelNotFound", "Model not found", "モデルが見つかりません"),
    ("ConfigurationError", "Configuration error", "設定エラー"),
    ("OutOfRange", "Outside the model's validated range", "モデルの検証範囲外です"),
];

static BUILTIN: LazyLock<Translations> = LazyLock::new(|| {
    let entries = BUILTIN_ROWS
        .iter()
        .map(|(key, en, ja)| {
            let map = BTreeMap::from([
                ("en".to_string(), en.to_string()),
                ("ja".to_string(), ja.to_string()),
            ]);
            (key.to_string(), map)
        })
        .collect();
    Translations { entries }
});

impl Translations {
    /// The table of UI strings shipped with the toolkit.
    pub fn builtin() -> &'static Translations {
        &BUILTIN
    }

    /// Parse a `{ "Key": { "en": "...", "ja": "..." } }` table.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let entries = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    /// Add or replace entries from another table.
    pub fn merge(&mut self, other: Translations) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, key: &str) -> Option<&BTreeMap<String, String>> {
        self.entries.get(key)
    }
}

fn base_language(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

fn pick<'a>(map: &'a BTreeMap<String, String>, language: &str) -> &'a str {
    map.get(language)
        .or_else(|| map.get(base_language(language)))
        .or_else(|| map.get(DEFAULT_LANGUAGE))
        .map(String::as_str)
        .unwrap_or("")
}

/// Resolve `text` for `language` (defaults to English).
pub fn resolve(text: &LocalizedText, language: Option<&str>, translations: &Translations) -> String {
    let language = language.unwrap_or(DEFAULT_LANGUAGE);
    match text {
        LocalizedText::Plain(s) => match s.strip_prefix('@').and_then(|key| translations.get(key)) {
            Some(map) => pick(map, language).to_string(),
            None => s.clone(),
        },
        LocalizedText::Localized(map) => pick(map, language).to_string(),
    }
}

/// [`resolve`] against the built-in table; absent text resolves to `""`.
pub fn display_string(text: Option<&LocalizedText>, language: Option<&str>) -> String {
    text.map(|t| resolve(t, language, Translations::builtin()))
        .unwrap_or_default()
}
