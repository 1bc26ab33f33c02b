//! In-memory backend for tests.
//!
//! Behaves like the event service for the operations the client uses and
//! counts every call, so tests can assert that validation failures never
//! reach the backend.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::backend::Backend;
use crate::error::{EvPlanError, EvPlanResult};
use crate::event::{Event, EventId, ResponseRecord, ResponseStatus, Role};
use crate::protocol::{Ack, Credentials, Invitation, NewEvent, SearchParams};

#[derive(Default)]
struct State {
    users: HashMap<String, String>,
    events: Vec<Event>,
    invitations: Vec<(EventId, String, Option<ResponseStatus>)>,
    next_id: u64,
    calls: HashMap<&'static str, usize>,
    failing: HashSet<&'static str>,
    offline: bool,
}

#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
}

fn rejected(status: u16, message: &str) -> EvPlanError {
    EvPlanError::Rejected {
        status,
        message: Some(message.to_string()),
    }
}

fn ack(message: &str) -> Ack {
    Ack {
        message: Some(message.to_string()),
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn enter(&self, op: &'static str) -> EvPlanResult<MutexGuard<'_, State>> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(op).or_default() += 1;
        if state.offline || state.failing.contains(op) {
            return Err(EvPlanError::Network("connection refused".into()));
        }
        Ok(state)
    }

    /// Number of times `op` was called.
    pub fn calls(&self, op: &str) -> usize {
        self.state.lock().unwrap().calls.get(op).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.state.lock().unwrap().calls.values().sum()
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }

    /// Make every later call of `op` fail as if the network were down.
    pub fn fail_op(&self, op: &'static str) {
        self.state.lock().unwrap().failing.insert(op);
    }

    /// Insert an event directly, bypassing validation.
    pub fn seed_event(&self, title: &str, date: &str, organizer: &str) -> EventId {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = EventId::new(format!("evt-{}", state.next_id));
        state.events.push(Event {
            id: id.clone(),
            title: title.to_string(),
            date: date.to_string(),
            time: String::new(),
            location: String::new(),
            description: String::new(),
            organizer_email: organizer.to_string(),
            role_hint: None,
            my_status: None,
        });
        id
    }

    pub fn seed_invitation(&self, event_id: &EventId, email: &str) {
        let mut state = self.state.lock().unwrap();
        state
            .invitations
            .push((event_id.clone(), email.to_string(), None));
    }
}

impl State {
    fn event(&self, event_id: &EventId) -> EvPlanResult<&Event> {
        self.events
            .iter()
            .find(|e| &e.id == event_id)
            .ok_or_else(|| rejected(404, "Event not found"))
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn organized_events(&self, email: &str) -> EvPlanResult<Vec<Event>> {
        let state = self.enter("organized_events")?;
        Ok(state
            .events
            .iter()
            .filter(|e| e.organizer_email == email)
            .cloned()
            .collect())
    }

    async fn invited_events(&self, email: &str) -> EvPlanResult<Vec<Event>> {
        let state = self.enter("invited_events")?;
        Ok(state
            .invitations
            .iter()
            .filter(|(_, invitee, _)| invitee == email)
            .filter_map(|(id, _, status)| {
                let mut event = state.event(id).ok()?.clone();
                event.my_status = *status;
                Some(event)
            })
            .collect())
    }

    async fn create_event(&self, event: &NewEvent) -> EvPlanResult<Ack> {
        let mut state = self.enter("create_event")?;
        if event.title.trim().is_empty() {
            return Err(rejected(400, "Title is required"));
        }
        state.next_id += 1;
        let id = EventId::new(format!("evt-{}", state.next_id));
        state.events.push(Event {
            id,
            title: event.title.clone(),
            date: event.date.clone(),
            time: event.time.clone(),
            location: event.location.clone(),
            description: event.description.clone(),
            organizer_email: event.organizer_email.clone(),
            role_hint: None,
            my_status: None,
        });
        Ok(ack("Event created"))
    }

    async fn delete_event(&self, event_id: &EventId, email: &str) -> EvPlanResult<Ack> {
        let mut state = self.enter("delete_event")?;
        if state.event(event_id)?.organizer_email != email {
            return Err(rejected(403, "Only the organizer can delete this event"));
        }
        state.events.retain(|e| &e.id != event_id);
        state.invitations.retain(|(id, _, _)| id != event_id);
        Ok(Ack::default())
    }

    async fn invite(&self, invitation: &Invitation) -> EvPlanResult<Ack> {
        let mut state = self.enter("invite")?;
        state.event(&invitation.event_id)?;
        let already = state
            .invitations
            .iter()
            .any(|(id, email, _)| id == &invitation.event_id && email == &invitation.email);
        if already {
            return Err(rejected(400, "User already invited"));
        }
        state
            .invitations
            .push((invitation.event_id.clone(), invitation.email.clone(), None));
        Ok(Ack::default())
    }

    async fn responses(&self, event_id: &EventId) -> EvPlanResult<Vec<ResponseRecord>> {
        let state = self.enter("responses")?;
        state.event(event_id)?;
        Ok(state
            .invitations
            .iter()
            .filter(|(id, _, _)| id == event_id)
            .filter_map(|(id, email, status)| {
                status.map(|status| ResponseRecord {
                    event_id: id.clone(),
                    email: email.clone(),
                    status,
                })
            })
            .collect())
    }

    async fn respond(
        &self,
        event_id: &EventId,
        email: &str,
        status: ResponseStatus,
    ) -> EvPlanResult<Ack> {
        let mut state = self.enter("respond")?;
        state.event(event_id)?;
        let record = state
            .invitations
            .iter_mut()
            .find(|(id, invitee, _)| id == event_id && invitee == email)
            .ok_or_else(|| rejected(403, "You are not invited to this event"))?;
        record.2 = Some(status);
        Ok(ack("Response recorded"))
    }

    async fn search(&self, params: &SearchParams) -> EvPlanResult<Vec<Event>> {
        let state = self.enter("search")?;
        let keyword = params.keyword.as_ref().map(|k| k.to_lowercase());
        let me = params.user_email.as_deref();

        let role_of = |event: &Event| -> Option<Role> {
            let me = me?;
            if event.organizer_email == me {
                return Some(Role::Organizer);
            }
            state
                .invitations
                .iter()
                .any(|(id, email, _)| id == &event.id && email == me)
                .then_some(Role::Attendee)
        };

        Ok(state
            .events
            .iter()
            .filter(|e| match &keyword {
                Some(k) => {
                    e.title.to_lowercase().contains(k) || e.description.to_lowercase().contains(k)
                }
                None => true,
            })
            .filter(|e| params.date.as_ref().is_none_or(|d| &e.date == d))
            .filter_map(|e| {
                let role = role_of(e);
                let wanted = match params.role.as_deref() {
                    Some("organizer") => role == Some(Role::Organizer),
                    Some("attendee") => role == Some(Role::Attendee),
                    _ => true,
                };
                wanted.then(|| Event {
                    role_hint: role,
                    ..e.clone()
                })
            })
            .collect())
    }

    async fn signup(&self, credentials: &Credentials) -> EvPlanResult<Ack> {
        let mut state = self.enter("signup")?;
        if state.users.contains_key(&credentials.email) {
            return Err(rejected(400, "User already exists"));
        }
        state
            .users
            .insert(credentials.email.clone(), credentials.password.clone());
        Ok(ack("User registered"))
    }

    async fn login(&self, credentials: &Credentials) -> EvPlanResult<Ack> {
        let state = self.enter("login")?;
        match state.users.get(&credentials.email) {
            Some(password) if password == &credentials.password => Ok(Ack::default()),
            _ => Err(rejected(401, "Invalid email or password")),
        }
    }
}
