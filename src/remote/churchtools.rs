//! ChurchTools implementation of [`RemoteService`].
//!
//! Agenda, song and live-position data is only reachable through the legacy
//! AJAX endpoint (`?q=<module>/ajax`), which wraps every answer in a
//! `{"status": "success", "data": ...}` envelope. Login uses the personal
//! login token; the session cookie and the CSRF token from the REST API are
//! kept for all following calls.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{
    config::ConnectionConfig,
    error::{RemoteError, RemoteResult},
    types::{AgendaId, EventId},
};

use super::{
    BoxFuture, RemoteService,
    records::{AgendaRecord, EventRecord, ItemRecord, Keyed, LivePositionRecord, SongRecord},
};

const CSRF_HEADER: &str = "CSRF-Token";
const CHURCH_SERVICE: &str = "ChurchService";
const LOGIN: &str = "login";
const MAX_ERROR_BODY: usize = 512;

/// Authenticated client for one ChurchTools instance.
#[derive(Debug)]
pub struct ChurchToolsClient {
    http: Client,
    instance_url: String,
    user_id: i64,
    token: String,
    csrf_token: RwLock<Option<String>>,
}

impl ChurchToolsClient {
    /// Builds a client with a cookie store and the configured request timeout.
    pub fn new(config: &ConnectionConfig) -> RemoteResult<Self> {
        let http = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_millis(config.request_timeout_ms.max(1)))
            .build()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            instance_url: config.normalized_instance_url(),
            user_id: config.user_id,
            token: config.token.clone(),
            csrf_token: RwLock::new(None),
        })
    }

    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// Logs in with the personal login token and fetches a CSRF token.
    pub async fn login(&self) -> RemoteResult<()> {
        info!(instance = %self.instance_url, user_id = self.user_id, "logging in");
        self.ajax(LOGIN, "loginWithToken", json!({ "id": self.user_id, "token": self.token }))
            .await
            .map_err(auth_error)?;

        let csrf: CsrfResponse = decode("csrftoken", self.rest_get("/csrftoken").await?)?;
        *self.csrf_token.write().await = Some(csrf.data);
        info!("login successful");
        Ok(())
    }

    pub async fn logout(&self) -> RemoteResult<()> {
        info!("logging out");
        self.ajax(LOGIN, "logout", json!({ "id": self.user_id, "token": self.token }))
            .await
            .map_err(auth_error)?;
        *self.csrf_token.write().await = None;
        info!("logout successful");
        Ok(())
    }

    async fn ajax(&self, module: &str, func: &str, mut params: Value) -> RemoteResult<Value> {
        let call = format!("{module}/{func}");
        if let Value::Object(map) = &mut params {
            map.insert("func".to_string(), Value::String(func.to_lowercase()));
        }

        let url = format!("{}?q={}/ajax", self.instance_url, module.to_lowercase());
        debug!(call = %call, "churchtools ajax request");

        let mut request = self
            .http
            .post(&url)
            .header("accept", "application/json")
            .json(&params);
        if let Some(token) = self.csrf_token.read().await.clone() {
            request = request.header(CSRF_HEADER, token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        decode_envelope(&call, read_json(response).await?)
    }

    async fn rest_get(&self, path: &str) -> RemoteResult<Value> {
        let url = format!("{}api{}", self.instance_url, path);
        debug!(path, "churchtools rest request");

        let mut request = self.http.get(&url).header("accept", "application/json");
        if let Some(token) = self.csrf_token.read().await.clone() {
            request = request.header(CSRF_HEADER, token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        read_json(response).await
    }

    async fn church_service<T: DeserializeOwned>(&self, func: &str, params: Value) -> RemoteResult<T> {
        let data = self.ajax(CHURCH_SERVICE, func, params).await?;
        decode(func, data)
    }
}

#[derive(Debug, Deserialize)]
struct CsrfResponse {
    data: String,
}

#[derive(Debug, Deserialize)]
struct SongsPayload {
    #[serde(default)]
    songs: Keyed<SongRecord>,
}

/// Unwraps a legacy AJAX envelope, returning its `data` member.
///
/// Anything other than `"status": "success"` becomes [`RemoteError::Envelope`].
pub fn decode_envelope(call: &str, body: Value) -> RemoteResult<Value> {
    let status = body.get("status").and_then(Value::as_str).unwrap_or_default();
    if status != "success" {
        let message = body
            .get("message")
            .or_else(|| body.get("data"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("status {status:?}"));
        return Err(RemoteError::Envelope {
            call: call.to_string(),
            message,
        });
    }

    Ok(body.get("data").cloned().unwrap_or(Value::Null))
}

/// Decodes `data` into `T`, tagging failures with the call name.
pub fn decode<T: DeserializeOwned>(call: &str, data: Value) -> RemoteResult<T> {
    serde_json::from_value(data).map_err(|e| RemoteError::Decode(format!("{call}: {e}")))
}

async fn read_json(response: Response) -> RemoteResult<Value> {
    let status = response.status();
    if !status.is_success() {
        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let cut = (0..=MAX_ERROR_BODY).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
            body.truncate(cut);
        }
        return Err(RemoteError::Status {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| RemoteError::Decode(e.to_string()))
}

fn auth_error(err: RemoteError) -> RemoteError {
    match err {
        RemoteError::Envelope { call, message } => RemoteError::Auth(format!("{call}: {message}")),
        other => other,
    }
}

impl RemoteService for ChurchToolsClient {
    fn connect(&self) -> BoxFuture<'_, RemoteResult<()>> {
        Box::pin(self.login())
    }

    fn disconnect(&self) -> BoxFuture<'_, RemoteResult<()>> {
        Box::pin(self.logout())
    }

    fn upcoming_events(&self) -> BoxFuture<'_, RemoteResult<Vec<EventRecord>>> {
        Box::pin(async move {
            let events: Keyed<EventRecord> = self.church_service("getAllEventData", json!({})).await?;
            Ok(events.into_vec())
        })
    }

    fn agenda_for_event(&self, event_id: EventId) -> BoxFuture<'_, RemoteResult<AgendaRecord>> {
        Box::pin(async move {
            let agenda: Option<AgendaRecord> = self
                .church_service("loadAgendaForEvent", json!({ "event_id": event_id }))
                .await?;
            agenda.ok_or_else(|| RemoteError::NotFound(format!("agenda for event {event_id}")))
        })
    }

    fn agenda_items(&self, agenda_id: AgendaId) -> BoxFuture<'_, RemoteResult<Vec<ItemRecord>>> {
        Box::pin(async move {
            let items: Keyed<ItemRecord> = self
                .church_service("loadAgendaItems", json!({ "agenda_id": agenda_id }))
                .await?;
            Ok(items.into_vec())
        })
    }

    fn all_songs(&self) -> BoxFuture<'_, RemoteResult<Vec<SongRecord>>> {
        Box::pin(async move {
            let payload: SongsPayload = self.church_service("getAllSongs", json!({})).await?;
            Ok(payload.songs.into_vec())
        })
    }

    fn live_position(
        &self,
        event_id: EventId,
        agenda_id: AgendaId,
    ) -> BoxFuture<'_, RemoteResult<LivePositionRecord>> {
        Box::pin(async move {
            let position: Option<LivePositionRecord> = self
                .church_service(
                    "loadAgendaLivePosition",
                    json!({ "event_id": event_id, "agenda_id": agenda_id }),
                )
                .await?;
            Ok(position.unwrap_or_default())
        })
    }

    fn write_live_position(
        &self,
        event_id: EventId,
        position: LivePositionRecord,
    ) -> BoxFuture<'_, RemoteResult<()>> {
        Box::pin(async move {
            self.ajax(
                CHURCH_SERVICE,
                "saveAgendaLivePosition",
                json!({
                    "event_id": event_id,
                    "pos_id": position.position_id,
                    "addseconds": position.extra_seconds,
                }),
            )
            .await?;
            Ok(())
        })
    }
}
