pub mod attendees;
pub mod auth;
pub mod delete;
pub mod events;
pub mod invite;
pub mod new;
pub mod respond;
pub mod search;

use anyhow::{Context as _, Result};
use evplan_core::{ClientConfig, EventViewModel, HttpBackend, Session, SessionStore};

use crate::utils::tui;

/// Everything a command needs: the stored session and a backend client.
pub struct Context {
    pub store: SessionStore,
    pub session: Session,
    pub backend: HttpBackend,
}

impl Context {
    pub fn load(api_base: Option<String>) -> Result<Self> {
        let mut config = ClientConfig::load()?;
        if let Some(api_base) = api_base {
            config.api_base = api_base;
        }

        let store = SessionStore::default_location()?;
        let session = store
            .load()
            .with_context(|| format!("Failed to read session from {}", store.path().display()))?;
        let backend = HttpBackend::new(&config)?;

        tracing::debug!(api_base = %backend.base_url(), identity = ?session.identity(), "context loaded");

        Ok(Context {
            store,
            session,
            backend,
        })
    }

    /// A view model for the logged-in user with both collections loaded.
    pub async fn view_model(self) -> Result<EventViewModel<HttpBackend>> {
        let identity = self.session.require()?.to_string();

        let mut vm = EventViewModel::new(self.backend, None);
        let spinner = tui::create_spinner("Loading events");
        let result = vm.on_identity_changed(Some(identity)).await;
        spinner.finish_and_clear();
        result?;

        Ok(vm)
    }
}
