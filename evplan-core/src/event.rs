//! Event, response and role types.
//!
//! Events are represented uniformly whether the current user organizes them
//! or was invited to them. Which of the two applies is derived on demand by
//! [`Role::derive`], optionally overridden by a hint the backend attaches to
//! search results.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{EvPlanError, EvPlanResult};

/// Date format used on the wire and in drafts.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Opaque, backend-assigned event identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        EventId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        EventId::new(id)
    }
}

/// An event as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id", alias = "id")]
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub organizer_email: String,

    /// Role hint computed by the backend (search results only).
    #[serde(
        rename = "user_role",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_role"
    )]
    pub role_hint: Option<Role>,

    /// The caller's own response, when the backend annotates it.
    #[serde(
        rename = "status",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_status"
    )]
    pub my_status: Option<ResponseStatus>,
}

impl Event {
    /// The calendar date of the event, if the backend sent a parseable one.
    ///
    /// Accepts both plain dates and ISO timestamps by looking at the
    /// leading `YYYY-MM-DD`.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        let head = self.date.get(..10).unwrap_or(&self.date);
        NaiveDate::parse_from_str(head, DATE_FORMAT).ok()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Locally-held input for the create-event form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub description: String,
}

impl EventDraft {
    /// Check the draft before submission.
    ///
    /// Order: title, date presence, date parseability, date not before
    /// `today`. Returns the parsed date on success.
    pub fn validate(&self, today: NaiveDate) -> EvPlanResult<NaiveDate> {
        if self.title.trim().is_empty() {
            return Err(EvPlanError::MissingTitle);
        }

        let raw = self.date.trim();
        if raw.is_empty() {
            return Err(EvPlanError::MissingDate);
        }

        let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map_err(|_| EvPlanError::InvalidDate(raw.to_string()))?;

        if date < today {
            return Err(EvPlanError::DateInPast);
        }

        Ok(date)
    }

    pub fn is_empty(&self) -> bool {
        *self == EventDraft::default()
    }
}

/// An invitee's answer to an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseStatus {
    Going,
    Maybe,
    #[serde(rename = "Not Going")]
    NotGoing,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Going => "Going",
            ResponseStatus::Maybe => "Maybe",
            ResponseStatus::NotGoing => "Not Going",
        }
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match normalized.as_str() {
            "going" => Ok(ResponseStatus::Going),
            "maybe" => Ok(ResponseStatus::Maybe),
            "notgoing" => Ok(ResponseStatus::NotGoing),
            _ => Err(format!(
                "Unknown response '{}'. Expected Going, Maybe or Not Going",
                s
            )),
        }
    }
}

/// One invitation/response record. A record without a response is not sent
/// by the backend; absence means "invited, no answer yet".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub event_id: EventId,
    pub email: String,
    pub status: ResponseStatus,
}

/// The current user's relation to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    Organizer,
    Attendee,
}

impl Role {
    /// Role of `identity` for `event`: the backend hint wins, otherwise
    /// organizer if the emails match, otherwise attendee.
    pub fn derive(event: &Event, identity: Option<&str>) -> Role {
        if let Some(hint) = event.role_hint {
            return hint;
        }
        match identity {
            Some(me) if event.organizer_email == me => Role::Organizer,
            _ => Role::Attendee,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Organizer => "Organizer",
            Role::Attendee => "Attendee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "organizer" => Ok(Role::Organizer),
            "attendee" | "invitee" => Ok(Role::Attendee),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}

fn lenient_role<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Role>, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

fn lenient_status<'de, D: Deserializer<'de>>(d: D) -> Result<Option<ResponseStatus>, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_event(organizer: &str) -> Event {
        Event {
            id: EventId::new("e1"),
            title: "Sprint Review".into(),
            date: "2026-03-20".into(),
            time: "10:00".into(),
            location: "Room 1".into(),
            description: String::new(),
            organizer_email: organizer.into(),
            role_hint: None,
            my_status: None,
        }
    }

    fn draft(date: &str) -> EventDraft {
        EventDraft {
            title: "Sprint Review".into(),
            date: date.into(),
            ..EventDraft::default()
        }
    }

    // --- EventDraft::validate ---

    #[test]
    fn validate_accepts_today_and_later() {
        let today = date(2026, 3, 20);
        assert_eq!(draft("2026-03-20").validate(today).unwrap(), today);
        assert_eq!(
            draft("2026-03-21").validate(today).unwrap(),
            date(2026, 3, 21)
        );
    }

    #[test]
    fn validate_rejects_past_dates() {
        let today = date(2026, 3, 20);
        assert!(matches!(
            draft("2026-03-19").validate(today),
            Err(EvPlanError::DateInPast)
        ));
        assert!(matches!(
            draft("1999-01-01").validate(today),
            Err(EvPlanError::DateInPast)
        ));
    }

    #[test]
    fn validate_checks_in_order() {
        let today = date(2026, 3, 20);

        let mut d = draft("");
        d.title = "  ".into();
        assert!(matches!(d.validate(today), Err(EvPlanError::MissingTitle)));

        assert!(matches!(
            draft("   ").validate(today),
            Err(EvPlanError::MissingDate)
        ));
        assert!(matches!(
            draft("2026-02-30").validate(today),
            Err(EvPlanError::InvalidDate(_))
        ));
        assert!(matches!(
            draft("next week").validate(today),
            Err(EvPlanError::InvalidDate(_))
        ));
    }

    // --- Role ---

    #[test]
    fn role_from_organizer_email() {
        let event = make_event("a@x.com");
        assert_eq!(Role::derive(&event, Some("a@x.com")), Role::Organizer);
        assert_eq!(Role::derive(&event, Some("b@y.com")), Role::Attendee);
        assert_eq!(Role::derive(&event, None), Role::Attendee);
    }

    #[test]
    fn role_hint_takes_precedence() {
        let mut event = make_event("a@x.com");
        event.role_hint = Some(Role::Attendee);
        assert_eq!(Role::derive(&event, Some("a@x.com")), Role::Attendee);
    }

    // --- wire format ---

    #[test]
    fn event_deserializes_backend_shape() {
        let event: Event = serde_json::from_value(json!({
            "_id": "65f0c",
            "title": "Sprint Review",
            "date": "2026-03-20T00:00:00.000Z",
            "time": "10:00",
            "location": "Room 1",
            "description": "",
            "organizer_email": "a@x.com",
            "user_role": "organizer",
            "__v": 0
        }))
        .unwrap();

        assert_eq!(event.id.as_str(), "65f0c");
        assert_eq!(event.role_hint, Some(Role::Organizer));
        assert_eq!(event.calendar_date(), Some(date(2026, 3, 20)));
        assert_eq!(event.my_status, None);
    }

    #[test]
    fn unknown_annotations_are_ignored() {
        let event: Event = serde_json::from_value(json!({
            "id": "e9",
            "title": "Offsite",
            "organizer_email": "a@x.com",
            "user_role": "guest",
            "status": "Not Going"
        }))
        .unwrap();

        assert_eq!(event.role_hint, None);
        assert_eq!(event.my_status, Some(ResponseStatus::NotGoing));
        assert_eq!(event.calendar_date(), None);
    }

    #[test]
    fn response_status_wire_names() {
        let record = ResponseRecord {
            event_id: EventId::new("e1"),
            email: "b@y.com".into(),
            status: ResponseStatus::NotGoing,
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"event_id": "e1", "email": "b@y.com", "status": "Not Going"})
        );
    }

    #[test]
    fn response_status_from_cli_spellings() {
        let parse = |s: &str| s.parse::<ResponseStatus>().unwrap();
        assert_eq!(parse("going"), ResponseStatus::Going);
        assert_eq!(parse("Maybe"), ResponseStatus::Maybe);
        assert_eq!(parse("not-going"), ResponseStatus::NotGoing);
        assert_eq!(parse("Not Going"), ResponseStatus::NotGoing);
        assert!("perhaps".parse::<ResponseStatus>().is_err());
    }
}
