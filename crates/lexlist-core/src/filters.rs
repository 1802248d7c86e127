//! Closed filter sets, one per listing.
//!
//! Each listing accepts a fixed set of named filters. Keys outside that set
//! are rejected when the filters are built, so nothing unexpected reaches the
//! endpoint. Blank values are treated as unset and never sent.

use std::fmt;

use chrono::NaiveDate;

use crate::error::FilterError;
use crate::page::PaginationStyle;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The filter type of one listing endpoint.
pub trait ListingFilters: Clone + PartialEq + Default + fmt::Debug {
    /// Human-readable listing name, used in errors and logs.
    const LISTING: &'static str;

    /// Non-blank filter values as query parameters.
    fn query_pairs(&self) -> Vec<(&'static str, String)>;

    /// Set one filter by name. A blank value clears the filter.
    fn set(&mut self, key: &str, value: &str) -> Result<(), FilterError>;

    /// Path of the endpoint serving the current section of this listing.
    fn endpoint(&self) -> &'static str;

    fn style(&self) -> PaginationStyle;

    /// Build filters from `(key, value)` pairs on top of the defaults.
    fn from_pairs<'a, I>(pairs: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filters = Self::default();
        for (key, value) in pairs {
            filters.set(key, value)?;
        }
        Ok(filters)
    }
}

/// Split a `key=value` argument.
pub fn parse_pair(arg: &str) -> Result<(&str, &str), FilterError> {
    arg.split_once('=')
        .map(|(k, v)| (k.trim(), v))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| FilterError::MalformedPair(arg.to_string()))
}

fn text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parsed<T: std::str::FromStr>(key: &str, value: &str) -> Result<Option<T>, FilterError> {
    match text(value) {
        None => Ok(None),
        Some(v) => v.parse().map(Some).map_err(|_| FilterError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn date(key: &str, value: &str) -> Result<Option<NaiveDate>, FilterError> {
    match text(value) {
        None => Ok(None),
        Some(v) => NaiveDate::parse_from_str(&v, DATE_FORMAT)
            .map(Some)
            .map_err(|_| FilterError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
            }),
    }
}

fn push(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<String>) {
    if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
        pairs.push((key, v));
    }
}

// ── Judgments ──

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JudgmentFilters {
    pub search: Option<String>,
    pub court: Option<String>,
    pub judge: Option<String>,
    pub year: Option<u16>,
    pub cnr: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl ListingFilters for JudgmentFilters {
    const LISTING: &'static str = "judgments";

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "search", self.search.clone());
        push(&mut pairs, "court", self.court.clone());
        push(&mut pairs, "judge", self.judge.clone());
        push(&mut pairs, "year", self.year.map(|y| y.to_string()));
        push(&mut pairs, "cnr", self.cnr.clone());
        push(
            &mut pairs,
            "from_date",
            self.from_date.map(|d| d.format(DATE_FORMAT).to_string()),
        );
        push(
            &mut pairs,
            "to_date",
            self.to_date.map(|d| d.format(DATE_FORMAT).to_string()),
        );
        pairs
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), FilterError> {
        match key {
            "search" => self.search = text(value),
            "court" => self.court = text(value),
            "judge" => self.judge = text(value),
            "year" => self.year = parsed(key, value)?,
            "cnr" => self.cnr = text(value),
            "from_date" => self.from_date = date(key, value)?,
            "to_date" => self.to_date = date(key, value)?,
            _ => {
                return Err(FilterError::UnknownKey {
                    listing: Self::LISTING,
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    fn endpoint(&self) -> &'static str {
        "/api/judgments"
    }

    fn style(&self) -> PaginationStyle {
        PaginationStyle::Cursor
    }
}

// ── Acts ──

/// Which collection of acts is being listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActSection {
    #[default]
    Central,
    State,
}

impl std::str::FromStr for ActSection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "central" => Ok(ActSection::Central),
            "state" => Ok(ActSection::State),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActFilters {
    pub section: ActSection,
    pub search: Option<String>,
    pub state: Option<String>,
    pub year: Option<u16>,
    pub ministry: Option<String>,
}

impl ListingFilters for ActFilters {
    const LISTING: &'static str = "acts";

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "search", self.search.clone());
        if self.section == ActSection::State {
            push(&mut pairs, "state", self.state.clone());
        }
        push(&mut pairs, "year", self.year.map(|y| y.to_string()));
        push(&mut pairs, "ministry", self.ministry.clone());
        pairs
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), FilterError> {
        match key {
            "section" => self.section = parsed(key, value)?.unwrap_or_default(),
            "search" => self.search = text(value),
            "state" => self.state = text(value),
            "year" => self.year = parsed(key, value)?,
            "ministry" => self.ministry = text(value),
            _ => {
                return Err(FilterError::UnknownKey {
                    listing: Self::LISTING,
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    fn endpoint(&self) -> &'static str {
        match self.section {
            ActSection::Central => "/api/acts/central",
            ActSection::State => "/api/acts/state",
        }
    }

    fn style(&self) -> PaginationStyle {
        PaginationStyle::Offset
    }
}

// ── Law-section mappings ──

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingFilters {
    pub search: Option<String>,
    pub source_law: Option<String>,
    pub target_law: Option<String>,
    pub section: Option<String>,
}

impl ListingFilters for MappingFilters {
    const LISTING: &'static str = "mappings";

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "search", self.search.clone());
        push(&mut pairs, "source_law", self.source_law.clone());
        push(&mut pairs, "target_law", self.target_law.clone());
        push(&mut pairs, "section", self.section.clone());
        pairs
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), FilterError> {
        match key {
            "search" => self.search = text(value),
            "source_law" => self.source_law = text(value),
            "target_law" => self.target_law = text(value),
            "section" => self.section = text(value),
            _ => {
                return Err(FilterError::UnknownKey {
                    listing: Self::LISTING,
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    fn endpoint(&self) -> &'static str {
        "/api/law-mappings"
    }

    fn style(&self) -> PaginationStyle {
        PaginationStyle::Offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_omitted() {
        let filters =
            JudgmentFilters::from_pairs([("search", "  "), ("court", "Bombay HC"), ("judge", "")])
                .unwrap();
        assert_eq!(filters.query_pairs(), vec![("court", "Bombay HC".to_string())]);
    }

    #[test]
    fn unknown_key_rejected() {
        let err = JudgmentFilters::from_pairs([("bench", "2")]).unwrap_err();
        assert_eq!(
            err,
            FilterError::UnknownKey {
                listing: "judgments",
                key: "bench".into()
            }
        );
    }

    #[test]
    fn invalid_year_rejected() {
        let err = ActFilters::from_pairs([("year", "nineteen")]).unwrap_err();
        assert!(matches!(err, FilterError::InvalidValue { .. }));
    }

    #[test]
    fn dates_round_trip_to_query() {
        let filters =
            JudgmentFilters::from_pairs([("from_date", "2023-01-01"), ("to_date", "2023-12-31")])
                .unwrap();
        assert_eq!(
            filters.query_pairs(),
            vec![
                ("from_date", "2023-01-01".to_string()),
                ("to_date", "2023-12-31".to_string())
            ]
        );
        assert!(JudgmentFilters::from_pairs([("from_date", "01/01/2023")]).is_err());
    }

    #[test]
    fn act_section_selects_endpoint() {
        let central = ActFilters::default();
        assert_eq!(central.endpoint(), "/api/acts/central");
        let state = ActFilters::from_pairs([("section", "state"), ("state", "Kerala")]).unwrap();
        assert_eq!(state.endpoint(), "/api/acts/state");
        assert_eq!(state.query_pairs(), vec![("state", "Kerala".to_string())]);
        assert_ne!(central, state);
    }

    #[test]
    fn state_filter_ignored_for_central_acts() {
        let filters = ActFilters::from_pairs([("state", "Kerala")]).unwrap();
        assert!(filters.query_pairs().is_empty());
    }

    #[test]
    fn values_are_trimmed() {
        let filters = MappingFilters::from_pairs([("source_law", " IPC ")]).unwrap();
        assert_eq!(filters.source_law.as_deref(), Some("IPC"));
    }

    #[test]
    fn parse_pair_splits_on_first_equals() {
        assert_eq!(parse_pair("search=a=b").unwrap(), ("search", "a=b"));
        assert!(parse_pair("search").is_err());
        assert!(parse_pair("=x").is_err());
    }
}
