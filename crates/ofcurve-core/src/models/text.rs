use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A display string that is either plain text or a per-language map.
///
/// Plain strings starting with `@` are translation keys, resolved through
/// [`crate::i18n::Translations`]. Per-language maps must carry an `en` entry;
/// the catalog loader rejects maps without one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum LocalizedText {
    Plain(String),
    Localized(BTreeMap<String, String>),
}

impl LocalizedText {
    pub fn is_translation_key(&self) -> bool {
        matches!(self, LocalizedText::Plain(s) if s.starts_with('@'))
    }

    pub fn has_english(&self) -> bool {
        match self {
            LocalizedText::Plain(_) => true,
            LocalizedText::Localized(map) => map.contains_key("en"),
        }
    }
}

impl From<&str> for LocalizedText {
    fn from(s: &str) -> Self {
        LocalizedText::Plain(s.to_string())
    }
}
