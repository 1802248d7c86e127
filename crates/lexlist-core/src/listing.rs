//! Records returned by the listing endpoints.
//!
//! The loader treats every record as opaque apart from [`ListItem::key`].
//! Fields the server sends beyond the ones named here are kept in `extra`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A record that can be shown in an incrementally loaded list.
pub trait ListItem {
    /// Server-assigned id or natural key, used to key rendered rows.
    fn key(&self) -> String;

    /// Labelled fields for a display card, in display order.
    fn card(&self) -> Vec<(&'static str, String)>;
}

/// A court judgment, keyed by its CNR (case number record).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    pub cnr: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub court: Option<String>,
    #[serde(default)]
    pub judges: Vec<String>,
    #[serde(default)]
    pub decision_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A central or state act.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Act {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub ministry: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A correspondence between a section of a repealed law and its replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LawMapping {
    pub id: String,
    pub source_law: String,
    pub source_section: String,
    pub target_law: String,
    pub target_section: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ListItem for Judgment {
    fn key(&self) -> String {
        self.cnr.clone()
    }

    fn card(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("cnr", self.cnr.clone()), ("title", self.title.clone())];
        if let Some(court) = &self.court {
            fields.push(("court", court.clone()));
        }
        if !self.judges.is_empty() {
            fields.push(("judges", self.judges.join(", ")));
        }
        if let Some(date) = self.decision_date {
            fields.push(("decided", date.format("%Y-%m-%d").to_string()));
        }
        fields
    }
}

impl ListItem for Act {
    fn key(&self) -> String {
        self.id.clone()
    }

    fn card(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("id", self.id.clone()), ("title", self.title.clone())];
        if let Some(year) = self.year {
            fields.push(("year", year.to_string()));
        }
        if let Some(state) = &self.state {
            fields.push(("state", state.clone()));
        }
        if let Some(ministry) = &self.ministry {
            fields.push(("ministry", ministry.clone()));
        }
        fields
    }
}

impl ListItem for LawMapping {
    fn key(&self) -> String {
        self.id.clone()
    }

    fn card(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("from", format!("{} s.{}", self.source_law, self.source_section)),
            ("to", format!("{} s.{}", self.target_law, self.target_section)),
        ];
        if let Some(subject) = &self.subject {
            fields.push(("subject", subject.clone()));
        }
        fields
    }
}
