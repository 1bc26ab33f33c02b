//! Search projection.
//!
//! A transient, query-derived list of events. While it holds results it
//! replaces the organized/invited display; it is never merged with them.

use std::fmt;
use std::str::FromStr;

use crate::event::Event;
use crate::protocol::SearchParams;

/// Role filter of a search. `Any` means "not filtered".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoleFilter {
    #[default]
    Any,
    Organizer,
    Attendee,
}

impl RoleFilter {
    /// Query value sent to the backend, `None` for `Any`.
    pub fn param(&self) -> Option<&'static str> {
        match self {
            RoleFilter::Any => None,
            RoleFilter::Organizer => Some("organizer"),
            RoleFilter::Attendee => Some("attendee"),
        }
    }
}

impl fmt::Display for RoleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param().unwrap_or("any"))
    }
}

impl FromStr for RoleFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "any" => Ok(RoleFilter::Any),
            "organizer" => Ok(RoleFilter::Organizer),
            "attendee" => Ok(RoleFilter::Attendee),
            other => Err(format!(
                "Unknown role '{}'. Expected any, organizer or attendee",
                other
            )),
        }
    }
}

/// The three user-editable search fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: String,
    pub date: String,
    pub role: RoleFilter,
}

impl SearchQuery {
    pub fn new(keyword: impl Into<String>, date: impl Into<String>, role: RoleFilter) -> Self {
        SearchQuery {
            keyword: keyword.into(),
            date: date.into(),
            role,
        }
    }

    /// True when no filter is set. The identity does not count as a filter.
    pub fn has_no_filters(&self) -> bool {
        self.keyword.trim().is_empty()
            && self.date.trim().is_empty()
            && self.role == RoleFilter::Any
    }

    /// Backend parameters for this query, or `None` when nothing is
    /// filtered. The identity rides along so the backend can attach role
    /// hints.
    pub fn to_params(&self, identity: Option<&str>) -> Option<SearchParams> {
        if self.has_no_filters() {
            return None;
        }

        let non_empty = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };

        Some(SearchParams {
            keyword: non_empty(&self.keyword),
            date: non_empty(&self.date),
            role: self.role.param().map(str::to_string),
            user_email: identity.map(str::to_string),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchProjection {
    pub query: SearchQuery,
    results: Vec<Event>,
}

impl SearchProjection {
    pub fn results(&self) -> &[Event] {
        &self.results
    }

    /// Whether the projection currently replaces the regular display.
    pub fn is_active(&self) -> bool {
        !self.results.is_empty()
    }

    pub fn replace_results(&mut self, results: Vec<Event>) {
        self.results = results;
    }

    pub fn clear(&mut self) {
        self.query = SearchQuery::default();
        self.results.clear();
    }
}
