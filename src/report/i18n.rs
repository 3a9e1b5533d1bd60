use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The language a report is rendered in. Every text site picks one side of
/// its [`Bilingual`] pair; the two are never mixed in one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[serde(alias = "en")]
    English,
    #[serde(alias = "th")]
    Thai,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Thai];

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Thai => "th",
        }
    }

    /// BCP 47 tag for the PDF `/Lang` entry.
    pub fn bcp47(self) -> &'static str {
        match self {
            Language::English => "en-US",
            Language::Thai => "th-TH",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "th" | "thai" => Ok(Language::Thai),
            other => Err(format!("unknown language '{}' (expected en or th)", other)),
        }
    }
}

/// A text in both report languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bilingual<T = &'static str> {
    pub en: T,
    pub th: T,
}

impl<T> Bilingual<T> {
    pub const fn new(en: T, th: T) -> Self {
        Self { en, th }
    }

    pub fn pick(&self, language: Language) -> &T {
        match language {
            Language::English => &self.en,
            Language::Thai => &self.th,
        }
    }
}

impl Bilingual<&'static str> {
    pub fn to_owned_text(self) -> Bilingual<String> {
        Bilingual::new(self.en.to_string(), self.th.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_never_blends() {
        let text = Bilingual::new("Company:", "บริษัท:");
        assert_eq!(*text.pick(Language::English), "Company:");
        assert_eq!(*text.pick(Language::Thai), "บริษัท:");
    }

    #[test]
    fn parses_codes_and_names() {
        assert_eq!("th".parse::<Language>().unwrap(), Language::Thai);
        assert_eq!("English".parse::<Language>().unwrap(), Language::English);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn serde_accepts_short_codes() {
        let lang: Language = serde_json::from_str("\"th\"").unwrap();
        assert_eq!(lang, Language::Thai);
        assert_eq!(serde_json::to_string(&Language::English).unwrap(), "\"english\"");
    }
}
