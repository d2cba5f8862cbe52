use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// The two languages the site is published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Tr,
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Tr, Locale::En];

    /// The sibling locale.
    pub fn other(self) -> Locale {
        match self {
            Locale::Tr => Locale::En,
            Locale::En => Locale::Tr,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Tr => "tr",
            Locale::En => "en",
        }
    }

    /// Open Graph locale tag.
    pub fn og_locale(self) -> &'static str {
        match self {
            Locale::Tr => "tr_TR",
            Locale::En => "en_US",
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::Tr
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tr" => Ok(Locale::Tr),
            "en" => Ok(Locale::En),
            other => Err(AppError::InvalidInput(format!("Unsupported locale: {}", other))),
        }
    }
}
