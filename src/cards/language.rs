//! Display-language preference.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Chinese,
    English,
    Bilingual,
}

impl Language {
    /// Raw value as persisted under `selectedLanguage`.
    pub fn raw(&self) -> &'static str {
        match self {
            Language::Chinese => "中文",
            Language::English => "English",
            Language::Bilingual => "双语",
        }
    }

    /// Parse a persisted raw value. Unknown values fall back to the default.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "中文" => Language::Chinese,
            "English" => Language::English,
            "双语" => Language::Bilingual,
            _ => Language::default(),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chinese" | "zh" | "中文" => Ok(Language::Chinese),
            "english" | "en" | "English" => Ok(Language::English),
            "bilingual" | "both" | "双语" => Ok(Language::Bilingual),
            other => Err(format!(
                "unknown language '{}' (expected chinese, english, or bilingual)",
                other
            )),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw())
    }
}
