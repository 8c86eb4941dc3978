//! Bibliographic reference links.
//!
//! Formula references are free strings. Recognized prefixes are turned into
//! openable URLs; anything else passes through unchanged.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

const PUBMED_BASE: &str = "https://pubmed.ncbi.nlm.nih.gov/";
const DOI_BASE: &str = "https://doi.org/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ReferenceKind {
    Web,
    Mail,
    Pubmed,
    Doi,
    Plain,
}

impl ReferenceKind {
    pub fn classify(reference: &str) -> Self {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            ReferenceKind::Web
        } else if reference.starts_with("mailto:") {
            ReferenceKind::Mail
        } else if reference.starts_with("PMID:") {
            ReferenceKind::Pubmed
        } else if reference.starts_with("doi:") {
            ReferenceKind::Doi
        } else {
            ReferenceKind::Plain
        }
    }

    pub fn is_openable(self) -> bool {
        self != ReferenceKind::Plain
    }
}

/// Map a reference string to the URL it should open.
pub fn reference_url(reference: &str) -> String {
    match ReferenceKind::classify(reference) {
        ReferenceKind::Web | ReferenceKind::Mail | ReferenceKind::Plain => reference.to_string(),
        ReferenceKind::Pubmed => format!("{PUBMED_BASE}{}", reference["PMID:".len()..].trim()),
        ReferenceKind::Doi => format!("{DOI_BASE}{}", reference["doi:".len()..].trim()),
    }
}
