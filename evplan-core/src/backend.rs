//! Event repository client.
//!
//! [`Backend`] is the seam between the view model and the event service.
//! [`HttpBackend`] talks to the real service with reqwest; tests swap in an
//! in-memory implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{EvPlanError, EvPlanResult};
use crate::event::{Event, EventId, ResponseRecord, ResponseStatus};
use crate::protocol::{
    Ack, ApiCall, Credentials, DeleteEvent, Invitation, ListInvited, ListOrganized, ListResponses,
    Login, Method, NewEvent, Respond, SearchParams, Signup,
};

/// The event and authentication operations of the backend.
///
/// Every method either returns the backend's confirmed answer or an error;
/// none of them touches client state.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn organized_events(&self, email: &str) -> EvPlanResult<Vec<Event>>;

    async fn invited_events(&self, email: &str) -> EvPlanResult<Vec<Event>>;

    async fn create_event(&self, event: &NewEvent) -> EvPlanResult<Ack>;

    async fn delete_event(&self, event_id: &EventId, email: &str) -> EvPlanResult<Ack>;

    async fn invite(&self, invitation: &Invitation) -> EvPlanResult<Ack>;

    async fn responses(&self, event_id: &EventId) -> EvPlanResult<Vec<ResponseRecord>>;

    async fn respond(
        &self,
        event_id: &EventId,
        email: &str,
        status: ResponseStatus,
    ) -> EvPlanResult<Ack>;

    async fn search(&self, params: &SearchParams) -> EvPlanResult<Vec<Event>>;

    async fn signup(&self, credentials: &Credentials) -> EvPlanResult<Ack>;

    async fn login(&self, credentials: &Credentials) -> EvPlanResult<Ack>;
}

/// HTTP client for the event service
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> EvPlanResult<Self> {
        let base_url = config.base_url()?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL for a call: base, encoded path segments, then query.
    fn url_for<C: ApiCall>(&self, call: &C) -> EvPlanResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                EvPlanError::Config(format!("API base '{}' cannot be a base URL", self.base_url))
            })?;
            segments.pop_if_empty();
            for segment in call.path() {
                segments.push(&segment);
            }
        }

        let query = call.query();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    /// Send a typed call and decode its reply.
    ///
    /// Non-2xx replies become [`EvPlanError::Rejected`] carrying the body's
    /// `message` when the body has one.
    pub async fn call<C: ApiCall>(&self, call: C) -> EvPlanResult<C::Reply> {
        let url = self.url_for(&call)?;
        tracing::debug!(method = ?C::METHOD, %url, "backend request");

        let request = match C::METHOD {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
            Method::Delete => self.http.delete(url),
        };
        let request = if C::METHOD.has_body() {
            request.json(&call)
        } else {
            request
        };

        let resp = request.send().await?;
        let status = resp.status();

        if !status.is_success() {
            return Err(rejection(status, resp).await);
        }

        let body = resp.bytes().await?;
        decode_reply(&body)
    }
}

/// An empty success body (e.g. 204) reads as `{}`, an [`Ack`] without a
/// message.
fn decode_reply<T: DeserializeOwned>(body: &[u8]) -> EvPlanResult<T> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|e| EvPlanError::Serialization(e.to_string()))
}

async fn rejection(status: StatusCode, resp: reqwest::Response) -> EvPlanError {
    let message = match resp.json::<Ack>().await {
        Ok(ack) => ack.message.filter(|m| !m.is_empty()),
        Err(_) => None,
    };
    tracing::debug!(status = status.as_u16(), ?message, "backend rejected request");

    EvPlanError::Rejected {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn organized_events(&self, email: &str) -> EvPlanResult<Vec<Event>> {
        self.call(ListOrganized { email }).await
    }

    async fn invited_events(&self, email: &str) -> EvPlanResult<Vec<Event>> {
        self.call(ListInvited { email }).await
    }

    async fn create_event(&self, event: &NewEvent) -> EvPlanResult<Ack> {
        self.call(event.clone()).await
    }

    async fn delete_event(&self, event_id: &EventId, email: &str) -> EvPlanResult<Ack> {
        self.call(DeleteEvent { event_id, email }).await
    }

    async fn invite(&self, invitation: &Invitation) -> EvPlanResult<Ack> {
        self.call(invitation.clone()).await
    }

    async fn responses(&self, event_id: &EventId) -> EvPlanResult<Vec<ResponseRecord>> {
        Ok(self.call(ListResponses { event_id }).await?.responses)
    }

    async fn respond(
        &self,
        event_id: &EventId,
        email: &str,
        status: ResponseStatus,
    ) -> EvPlanResult<Ack> {
        self.call(Respond {
            event_id,
            email,
            status,
        })
        .await
    }

    async fn search(&self, params: &SearchParams) -> EvPlanResult<Vec<Event>> {
        Ok(self.call(params.clone()).await?.into_events())
    }

    async fn signup(&self, credentials: &Credentials) -> EvPlanResult<Ack> {
        self.call(Signup(credentials)).await
    }

    async fn login(&self, credentials: &Credentials) -> EvPlanResult<Ack> {
        self.call(Login(credentials)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(api_base: &str) -> HttpBackend {
        let config = ClientConfig {
            api_base: api_base.to_string(),
            timeout_secs: None,
        };
        HttpBackend::new(&config).unwrap()
    }

    #[test]
    fn empty_success_body_is_a_bare_ack() {
        let ack: Ack = decode_reply(b"").unwrap();
        assert_eq!(ack.message, None);
        assert_eq!(ack.message_or("Event deleted"), "Event deleted");

        let ack: Ack = decode_reply(b" \n").unwrap();
        assert_eq!(ack.message, None);

        let ack: Ack = decode_reply(br#"{"message":"Deleted"}"#).unwrap();
        assert_eq!(ack.message.as_deref(), Some("Deleted"));
    }

    #[test]
    fn empty_body_is_not_an_event_list() {
        assert!(matches!(
            decode_reply::<Vec<Event>>(b""),
            Err(EvPlanError::Serialization(_))
        ));
    }

    #[test]
    fn url_encodes_email_path_segments() {
        let backend = backend("http://localhost:5000");
        let url = backend
            .url_for(&ListOrganized {
                email: "a+team@x.com",
            })
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/events/organized/a+team@x.com"
        );

        let url = backend
            .url_for(&ListInvited {
                email: "odd/name@x.com",
            })
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/events/invited/odd%2Fname@x.com"
        );
    }

    #[test]
    fn url_keeps_base_path_prefix() {
        let backend = backend("https://api.example.com/v1/");
        let id = EventId::new("65f0c");
        let url = backend
            .url_for(&DeleteEvent {
                event_id: &id,
                email: "a@x.com",
            })
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v1/events/65f0c?email=a%40x.com"
        );
    }

    #[test]
    fn url_for_search_only_carries_set_filters() {
        let backend = backend("http://localhost:5000");
        let params = SearchParams {
            keyword: Some("sprint review".into()),
            user_email: Some("a@x.com".into()),
            ..SearchParams::default()
        };
        let url = backend.url_for(&params).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/events/search?keyword=sprint+review&user_email=a%40x.com"
        );
    }
}
