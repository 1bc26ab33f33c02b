//! Event view model: the single source of truth for what the user sees.
//!
//! Holds the organized and invited collections, per-event roster and invite
//! draft caches, the create-event draft and the search projection. Every
//! mutating operation calls the backend first and only touches local state
//! once the backend has confirmed; on failure nothing changes.

use std::collections::HashMap;

use chrono::{Local, NaiveDate};

use crate::backend::Backend;
use crate::error::{EvPlanError, EvPlanResult};
use crate::event::{DATE_FORMAT, Event, EventDraft, EventId, ResponseRecord, ResponseStatus, Role};
use crate::protocol::{Invitation, NewEvent};
use crate::search::{SearchProjection, SearchQuery};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this event?";

const CREATE_OK: &str = "Event created successfully";
const CREATE_FAILED: &str = "Could not create event";
const DELETE_OK: &str = "Event deleted";
const DELETE_FAILED: &str = "Could not delete event";
const INVITE_OK: &str = "Invitation sent";
const INVITE_FAILED: &str = "Could not send invitation";
const ROSTER_FAILED: &str = "Could not load attendees";
const RESPOND_OK: &str = "Response saved";
const RESPOND_FAILED: &str = "Could not save response";
const SEARCH_FAILED: &str = "Search failed";
const LOAD_FAILED: &str = "Could not load events";

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Organized,
    Invited,
}

/// Issued when a collection load starts. Only the most recent ticket for a
/// collection may install its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub collection: Collection,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(String),
    Cancelled,
}

/// What the events area shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventsView<'a> {
    Search(&'a [Event]),
    Collections {
        organized: &'a [Event],
        invited: &'a [Event],
    },
}

pub struct EventViewModel<B> {
    backend: B,
    identity: Option<String>,
    organized: Vec<Event>,
    invited: Vec<Event>,
    rosters: HashMap<EventId, Vec<ResponseRecord>>,
    invite_drafts: HashMap<EventId, String>,
    /// The create-event form.
    pub draft: EventDraft,
    search: SearchProjection,
    organized_generation: u64,
    invited_generation: u64,
}

impl<B: Backend> EventViewModel<B> {
    /// A view model bound to `identity`. Collections start empty; call
    /// [`refresh`](Self::refresh) to load them.
    pub fn new(backend: B, identity: Option<String>) -> Self {
        EventViewModel {
            backend,
            identity,
            organized: Vec::new(),
            invited: Vec::new(),
            rosters: HashMap::new(),
            invite_drafts: HashMap::new(),
            draft: EventDraft::default(),
            search: SearchProjection::default(),
            organized_generation: 0,
            invited_generation: 0,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn organized(&self) -> &[Event] {
        &self.organized
    }

    pub fn invited(&self) -> &[Event] {
        &self.invited
    }

    pub fn search_projection(&self) -> &SearchProjection {
        &self.search
    }

    /// The cached roster for an event, `None` while hidden.
    pub fn roster(&self, event_id: &EventId) -> Option<&[ResponseRecord]> {
        self.rosters.get(event_id).map(Vec::as_slice)
    }

    pub fn invite_draft(&self, event_id: &EventId) -> &str {
        self.invite_drafts
            .get(event_id)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn set_invite_draft(&mut self, event_id: &EventId, email: impl Into<String>) {
        self.invite_drafts.insert(event_id.clone(), email.into());
    }

    pub fn role_of(&self, event: &Event) -> Role {
        Role::derive(event, self.identity())
    }

    /// Search results replace the collections whenever there are any.
    pub fn display(&self) -> EventsView<'_> {
        if self.search.is_active() {
            EventsView::Search(self.search.results())
        } else {
            EventsView::Collections {
                organized: &self.organized,
                invited: &self.invited,
            }
        }
    }

    fn require_identity(&self) -> EvPlanResult<String> {
        self.identity.clone().ok_or(EvPlanError::NotLoggedIn)
    }

    // ========================================================================
    // Identity & loading
    // ========================================================================

    /// Switch to a new identity. Everything cached for the previous one is
    /// dropped, in-flight loads are invalidated, and both collections are
    /// loaded when the new identity is present.
    pub async fn on_identity_changed(&mut self, identity: Option<String>) -> EvPlanResult<()> {
        if identity == self.identity {
            return Ok(());
        }

        self.begin_load(Collection::Organized);
        self.begin_load(Collection::Invited);
        self.organized.clear();
        self.invited.clear();
        self.rosters.clear();
        self.invite_drafts.clear();
        self.draft = EventDraft::default();
        self.search.clear();
        self.identity = identity;

        tracing::info!(identity = ?self.identity, "identity changed");

        if self.identity.is_some() {
            self.refresh().await
        } else {
            Ok(())
        }
    }

    /// Start a load of `collection`, superseding any earlier one.
    pub fn begin_load(&mut self, collection: Collection) -> LoadTicket {
        let generation = self.generation_mut(collection);
        *generation += 1;
        LoadTicket {
            collection,
            generation: *generation,
        }
    }

    /// Install a loaded collection. Returns `false` and leaves state alone
    /// when a newer load has started since `ticket` was issued.
    pub fn apply_load(&mut self, ticket: LoadTicket, events: Vec<Event>) -> bool {
        if *self.generation_mut(ticket.collection) != ticket.generation {
            tracing::debug!(collection = ?ticket.collection, "discarding stale load");
            return false;
        }

        tracing::info!(collection = ?ticket.collection, count = events.len(), "collection replaced");
        match ticket.collection {
            Collection::Organized => self.organized = events,
            Collection::Invited => self.invited = events,
        }
        true
    }

    fn generation_mut(&mut self, collection: Collection) -> &mut u64 {
        match collection {
            Collection::Organized => &mut self.organized_generation,
            Collection::Invited => &mut self.invited_generation,
        }
    }

    async fn fetch(&self, collection: Collection, email: &str) -> EvPlanResult<Vec<Event>> {
        let result = match collection {
            Collection::Organized => self.backend.organized_events(email).await,
            Collection::Invited => self.backend.invited_events(email).await,
        };
        result.map_err(|e| e.or_fallback(LOAD_FAILED))
    }

    /// Reload one collection.
    pub async fn load(&mut self, collection: Collection) -> EvPlanResult<()> {
        let me = self.require_identity()?;
        let ticket = self.begin_load(collection);
        let events = self.fetch(collection, &me).await?;
        self.apply_load(ticket, events);
        Ok(())
    }

    /// Reload both collections. The two loads are independent: one failing
    /// does not stop the other from being applied.
    pub async fn refresh(&mut self) -> EvPlanResult<()> {
        let me = self.require_identity()?;
        let organized_ticket = self.begin_load(Collection::Organized);
        let invited_ticket = self.begin_load(Collection::Invited);

        let (organized, invited) = tokio::join!(
            self.fetch(Collection::Organized, &me),
            self.fetch(Collection::Invited, &me)
        );

        let mut first_error = None;
        for (ticket, result) in [(organized_ticket, organized), (invited_ticket, invited)] {
            match result {
                Ok(events) => {
                    self.apply_load(ticket, events);
                }
                Err(e) => {
                    tracing::warn!(collection = ?ticket.collection, error = %e, "load failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Reload after a confirmed mutation. The mutation already succeeded, so
    /// a failed reload is only logged.
    async fn reload_after(&mut self, collection: Collection) {
        if let Err(e) = self.load(collection).await {
            tracing::warn!(collection = ?collection, error = %e, "reload after update failed");
        }
    }

    // ========================================================================
    // Event lifecycle
    // ========================================================================

    /// Submit the create-event draft, validated against today's date.
    pub async fn create_event(&mut self) -> EvPlanResult<String> {
        self.create_event_on(Local::now().date_naive()).await
    }

    /// Submit the create-event draft, treating `today` as the current date.
    pub async fn create_event_on(&mut self, today: NaiveDate) -> EvPlanResult<String> {
        let me = self.require_identity()?;
        let date = self.draft.validate(today)?;

        let new_event = NewEvent {
            title: self.draft.title.trim().to_string(),
            date: date.format(DATE_FORMAT).to_string(),
            time: self.draft.time.clone(),
            location: self.draft.location.clone(),
            description: self.draft.description.clone(),
            organizer_email: me,
        };

        let ack = self
            .backend
            .create_event(&new_event)
            .await
            .map_err(|e| e.or_fallback(CREATE_FAILED))?;

        tracing::info!(title = %new_event.title, date = %new_event.date, "event created");
        self.reload_after(Collection::Organized).await;
        self.draft = EventDraft::default();

        Ok(ack.message_or(CREATE_OK))
    }

    /// Delete one of the user's own events after confirmation.
    pub async fn delete_event(
        &mut self,
        event_id: &EventId,
        confirm: &impl Confirm,
    ) -> EvPlanResult<DeleteOutcome> {
        let me = self.require_identity()?;

        if !self.organized.iter().any(|e| &e.id == event_id) {
            return Err(EvPlanError::NotOrganizer(event_id.clone()));
        }

        if !confirm.confirm(DELETE_PROMPT) {
            return Ok(DeleteOutcome::Cancelled);
        }

        let ack = self
            .backend
            .delete_event(event_id, &me)
            .await
            .map_err(|e| e.or_fallback(DELETE_FAILED))?;

        tracing::info!(event = %event_id, "event deleted");
        self.rosters.remove(event_id);
        self.invite_drafts.remove(event_id);
        self.reload_after(Collection::Organized).await;

        Ok(DeleteOutcome::Deleted(ack.message_or(DELETE_OK)))
    }

    // ========================================================================
    // Invitations & responses
    // ========================================================================

    /// Invite whoever is typed in the event's invite draft. Only events in
    /// `organized` accept invitations.
    pub async fn invite_user(&mut self, event_id: &EventId) -> EvPlanResult<String> {
        self.require_identity()?;

        let organizer = self
            .organized
            .iter()
            .find(|e| &e.id == event_id)
            .map(|e| e.organizer_email.trim().to_lowercase())
            .ok_or_else(|| EvPlanError::NotOrganizer(event_id.clone()))?;

        let email = self.invite_draft(event_id).trim().to_string();
        if email.is_empty() {
            return Err(EvPlanError::MissingInvitee);
        }
        if email.to_lowercase() == organizer {
            return Err(EvPlanError::SelfInvite);
        }

        let invitation = Invitation {
            event_id: event_id.clone(),
            email,
        };
        let ack = self
            .backend
            .invite(&invitation)
            .await
            .map_err(|e| e.or_fallback(INVITE_FAILED))?;

        tracing::info!(event = %event_id, invitee = %invitation.email, "invitation sent");
        self.invite_drafts.insert(event_id.clone(), String::new());

        Ok(ack.message_or(INVITE_OK))
    }

    /// Show or hide an event's roster. Hiding forgets the cached roster, so
    /// showing again always fetches it fresh. Returns whether it is now
    /// shown.
    pub async fn toggle_attendees(&mut self, event_id: &EventId) -> EvPlanResult<bool> {
        if self.rosters.remove(event_id).is_some() {
            return Ok(false);
        }

        let roster = self
            .backend
            .responses(event_id)
            .await
            .map_err(|e| e.or_fallback(ROSTER_FAILED))?;

        tracing::debug!(event = %event_id, count = roster.len(), "roster loaded");
        self.rosters.insert(event_id.clone(), roster);
        Ok(true)
    }

    pub async fn respond_to_event(
        &mut self,
        event_id: &EventId,
        status: ResponseStatus,
    ) -> EvPlanResult<String> {
        let me = self.require_identity()?;

        let ack = self
            .backend
            .respond(event_id, &me, status)
            .await
            .map_err(|e| e.or_fallback(RESPOND_FAILED))?;

        tracing::info!(event = %event_id, %status, "response saved");
        self.reload_after(Collection::Invited).await;

        Ok(ack.message_or(RESPOND_OK))
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Run a search. With no filter set, results are emptied without asking
    /// the backend. Returns the number of results.
    pub async fn search(&mut self, query: SearchQuery) -> EvPlanResult<usize> {
        self.search.query = query;

        let Some(params) = self.search.query.to_params(self.identity()) else {
            self.search.replace_results(Vec::new());
            return Ok(0);
        };

        let results = self
            .backend
            .search(&params)
            .await
            .map_err(|e| e.or_fallback(SEARCH_FAILED))?;

        let count = results.len();
        self.search.replace_results(results);
        Ok(count)
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
    }
}
