use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const LOCALE_COOKIE: &str = "amertrading-locale";
pub const LOCALE_COOKIE_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Ar,
    Fa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported locale: {0}")]
pub struct UnsupportedLocale(pub String);

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Ar, Locale::Fa];
    pub const DEFAULT: Locale = Locale::En;

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
            Locale::Fa => "fa",
        }
    }

    /// Exact, case-sensitive match against the supported codes.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|locale| locale.as_str() == value)
    }

    pub fn direction(self) -> TextDirection {
        match self {
            Locale::En => TextDirection::Ltr,
            Locale::Ar | Locale::Fa => TextDirection::Rtl,
        }
    }

    pub fn is_rtl(self) -> bool {
        self.direction() == TextDirection::Rtl
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::DEFAULT
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::parse(s).ok_or_else(|| UnsupportedLocale(s.to_string()))
    }
}

/// `Set-Cookie` value persisting the visitor's locale for a year.
pub fn locale_cookie(locale: Locale) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}",
        LOCALE_COOKIE,
        locale.as_str(),
        LOCALE_COOKIE_MAX_AGE_SECS
    )
}
