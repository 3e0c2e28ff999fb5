//! Explicit locale record passed into the viewer.
//!
//! The engine never reads the host application's ambient locale. Callers
//! construct a [`ViewerLocale`] and hand it over through
//! [`crate::config::ViewerConfig`]. Label lookup stays with the caller; this
//! type only decides layout direction and date formatting.

use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// Primary language subtags written right-to-left.
const RTL_LANGUAGES: &[&str] = &["ar", "fa", "he", "ur", "ps", "sd", "yi", "dv", "ku"];

/// Text direction for display and export layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    /// Value for the HTML `dir` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The locale tag was empty or malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid locale tag: {0:?}")]
pub struct InvalidLocale(pub String);

/// Active locale: a BCP 47 style tag plus its layout direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerLocale {
    tag: String,
    direction: Direction,
}

impl ViewerLocale {
    /// Smart constructor. Direction is inferred from the primary subtag.
    ///
    /// Accepts `-` or `_` separators (`ar-EG`, `ar_EG`). Returns an error if the
    /// tag is empty or the primary subtag is not 2-3 ASCII letters.
    pub fn new(tag: impl Into<String>) -> Result<Self, InvalidLocale> {
        let tag = tag.into();
        let primary = primary_subtag(&tag).ok_or_else(|| InvalidLocale(tag.clone()))?;
        let direction = if RTL_LANGUAGES.contains(&primary.as_str()) {
            Direction::Rtl
        } else {
            Direction::Ltr
        };
        Ok(Self {
            tag: tag.replace('_', "-"),
            direction,
        })
    }

    /// Override the inferred direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Normalised tag for the HTML `lang` attribute.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Layout direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Format the generation date for the export header.
    pub fn format_date(&self, at: DateTime<Utc>) -> String {
        let (locale, pattern) = match primary_subtag(&self.tag).as_deref() {
            Some("en") => (chrono::Locale::en_US, "%B %-d, %Y"),
            Some("ar") => (chrono::Locale::ar_SA, "%-d %B %Y"),
            Some("he") => (chrono::Locale::he_IL, "%-d %B %Y"),
            Some("fa") => (chrono::Locale::fa_IR, "%-d %B %Y"),
            Some("ur") => (chrono::Locale::ur_PK, "%-d %B %Y"),
            Some("fr") => (chrono::Locale::fr_FR, "%-d %B %Y"),
            Some("de") => (chrono::Locale::de_DE, "%-d. %B %Y"),
            Some("es") => (chrono::Locale::es_ES, "%-d de %B de %Y"),
            Some("tr") => (chrono::Locale::tr_TR, "%-d %B %Y"),
            _ => (chrono::Locale::POSIX, "%Y-%m-%d"),
        };
        at.format_localized(pattern, locale).to_string()
    }
}

impl Default for ViewerLocale {
    fn default() -> Self {
        Self {
            tag: "en-US".to_string(),
            direction: Direction::Ltr,
        }
    }
}

fn primary_subtag(tag: &str) -> Option<String> {
    let primary = tag.split(['-', '_']).next()?;
    let valid = (2..=3).contains(&primary.len()) && primary.chars().all(|c| c.is_ascii_alphabetic());
    valid.then(|| primary.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn october_14() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn english_is_ltr() {
        let locale = ViewerLocale::new("en-US").unwrap();
        assert_eq!(locale.direction(), Direction::Ltr);
        assert_eq!(locale.tag(), "en-US");
    }

    #[test]
    fn arabic_is_rtl_regardless_of_region_or_case() {
        assert_eq!(ViewerLocale::new("ar").unwrap().direction(), Direction::Rtl);
        assert_eq!(ViewerLocale::new("AR_eg").unwrap().direction(), Direction::Rtl);
        assert_eq!(ViewerLocale::new("he-IL").unwrap().direction(), Direction::Rtl);
    }

    #[test]
    fn underscore_separator_is_normalised() {
        assert_eq!(ViewerLocale::new("fr_CA").unwrap().tag(), "fr-CA");
    }

    #[test]
    fn empty_or_malformed_tags_are_rejected() {
        assert!(ViewerLocale::new("").is_err());
        assert!(ViewerLocale::new("-US").is_err());
        assert!(ViewerLocale::new("english").is_err());
        assert!(ViewerLocale::new("e1").is_err());
    }

    #[test]
    fn explicit_direction_overrides_inference() {
        let locale = ViewerLocale::new("en").unwrap().with_direction(Direction::Rtl);
        assert_eq!(locale.direction(), Direction::Rtl);
    }

    #[test]
    fn english_date_uses_month_name() {
        let locale = ViewerLocale::new("en-US").unwrap();
        assert_eq!(locale.format_date(october_14()), "October 14, 2026");
    }

    #[test]
    fn arabic_date_differs_from_english() {
        let english = ViewerLocale::new("en").unwrap().format_date(october_14());
        let arabic = ViewerLocale::new("ar").unwrap().format_date(october_14());
        assert_ne!(english, arabic);
    }

    #[test]
    fn unknown_language_falls_back_to_iso_date() {
        let locale = ViewerLocale::new("xx").unwrap();
        assert_eq!(locale.format_date(october_14()), "2026-10-14");
    }
}
