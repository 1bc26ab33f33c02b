//! Defines the JSON protocol spoken with the event backend over HTTP.
//!
//! Every request is a typed struct implementing [`ApiCall`], which names its
//! route and the reply type it expects. The transport in
//! [`crate::backend::HttpBackend`] is generic over it.

use std::fmt;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::event::{Event, EventId, ResponseRecord, ResponseStatus};

pub trait ApiCall: Serialize {
    type Reply: DeserializeOwned;
    const METHOD: Method;

    /// Path segments below the API base. Each segment is percent-encoded
    /// by the transport.
    fn path(&self) -> Vec<String>;

    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    /// Whether the call's fields travel as a JSON body.
    pub fn has_body(&self) -> bool {
        matches!(self, Method::Post)
    }
}

// ============================================================================
// Replies
// ============================================================================

/// `{ "message": ... }`, used both for success and failure replies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

impl Ack {
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterReply {
    #[serde(default)]
    pub responses: Vec<ResponseRecord>,
}

/// Search replies come either as a bare array or wrapped in `{ events }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SearchReply {
    Bare(Vec<Event>),
    Wrapped {
        #[serde(default)]
        events: Vec<Event>,
    },
}

impl SearchReply {
    pub fn into_events(self) -> Vec<Event> {
        match self {
            SearchReply::Bare(events) => events,
            SearchReply::Wrapped { events } => events,
        }
    }
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"********")
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub struct Signup<'a>(pub &'a Credentials);

impl ApiCall for Signup<'_> {
    type Reply = Ack;
    const METHOD: Method = Method::Post;

    fn path(&self) -> Vec<String> {
        vec!["signup".into()]
    }
}

#[derive(Debug, Serialize)]
pub struct Login<'a>(pub &'a Credentials);

impl ApiCall for Login<'_> {
    type Reply = Ack;
    const METHOD: Method = Method::Post;

    fn path(&self) -> Vec<String> {
        vec!["login".into()]
    }
}

// ============================================================================
// Collections
// ============================================================================

/// Events organized by `email`.
#[derive(Debug, Serialize)]
pub struct ListOrganized<'a> {
    pub email: &'a str,
}

impl ApiCall for ListOrganized<'_> {
    type Reply = Vec<Event>;
    const METHOD: Method = Method::Get;

    fn path(&self) -> Vec<String> {
        vec!["events".into(), "organized".into(), self.email.to_string()]
    }
}

/// Events `email` has been invited to.
#[derive(Debug, Serialize)]
pub struct ListInvited<'a> {
    pub email: &'a str,
}

impl ApiCall for ListInvited<'_> {
    type Reply = Vec<Event>;
    const METHOD: Method = Method::Get;

    fn path(&self) -> Vec<String> {
        vec!["events".into(), "invited".into(), self.email.to_string()]
    }
}

// ============================================================================
// Event lifecycle
// ============================================================================

/// A validated draft plus the organizer, ready to submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub description: String,
    pub organizer_email: String,
}

impl ApiCall for NewEvent {
    type Reply = Ack;
    const METHOD: Method = Method::Post;

    fn path(&self) -> Vec<String> {
        vec!["events".into()]
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteEvent<'a> {
    #[serde(skip)]
    pub event_id: &'a EventId,
    pub email: &'a str,
}

impl ApiCall for DeleteEvent<'_> {
    type Reply = Ack;
    const METHOD: Method = Method::Delete;

    fn path(&self) -> Vec<String> {
        vec!["events".into(), self.event_id.to_string()]
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("email", self.email.to_string())]
    }
}

// ============================================================================
// Invitations & responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    pub event_id: EventId,
    pub email: String,
}

impl ApiCall for Invitation {
    type Reply = Ack;
    const METHOD: Method = Method::Post;

    fn path(&self) -> Vec<String> {
        vec!["events".into(), "invite".into()]
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponses<'a> {
    pub event_id: &'a EventId,
}

impl ApiCall for ListResponses<'_> {
    type Reply = RosterReply;
    const METHOD: Method = Method::Get;

    fn path(&self) -> Vec<String> {
        vec!["events".into(), "responses".into(), self.event_id.to_string()]
    }
}

#[derive(Debug, Serialize)]
pub struct Respond<'a> {
    pub event_id: &'a EventId,
    pub email: &'a str,
    pub status: ResponseStatus,
}

impl ApiCall for Respond<'_> {
    type Reply = Ack;
    const METHOD: Method = Method::Post;

    fn path(&self) -> Vec<String> {
        vec!["events".into(), "respond".into()]
    }
}

// ============================================================================
// Search
// ============================================================================

/// Query string for `/events/search`. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchParams {
    pub keyword: Option<String>,
    pub date: Option<String>,
    pub role: Option<String>,
    pub user_email: Option<String>,
}

impl ApiCall for SearchParams {
    type Reply = SearchReply;
    const METHOD: Method = Method::Get;

    fn path(&self) -> Vec<String> {
        vec!["events".into(), "search".into()]
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        [
            ("keyword", &self.keyword),
            ("date", &self.date),
            ("role", &self.role),
            ("user_email", &self.user_email),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.clone().map(|v| (k, v)))
        .collect()
    }
}
