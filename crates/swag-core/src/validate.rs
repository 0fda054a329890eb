use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ValidateError;

/// Target languages the model generator is allowed to emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Objc,
    Java,
    Ts,
    Js,
    #[default]
    Swift,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Objc,
        Language::Java,
        Language::Ts,
        Language::Js,
        Language::Swift,
    ];

    /// The name passed to the generator's `--lang` flag, also used as the
    /// output file extension.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Objc => "objc",
            Language::Java => "java",
            Language::Ts => "ts",
            Language::Js => "js",
            Language::Swift => "swift",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ValidateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.as_str() == s)
            .ok_or_else(|| ValidateError::UnsupportedLanguage(s.to_string()))
    }
}

/// Parse and check a document URL. Only absolute http(s) URLs with a host
/// are accepted.
pub fn validate_url(input: &str) -> Result<Url, ValidateError> {
    let url = Url::parse(input).map_err(|e| ValidateError::InvalidUrl(format!("{input} ({e})")))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(ValidateError::InvalidUrl(input.to_string())),
    }
}

pub fn validate_language(input: &str) -> Result<Language, ValidateError> {
    input.parse()
}
