//! Blocking client for the request manager's web API

#![allow(clippy::result_large_err)]

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Url;
use serde::de::DeserializeOwned;

use sdrmm_core::errors::Result;
use sdrmm_core::model::{Candidate, QueueEntry};
use sdrmm_core::remote::RemoteQueue;

use crate::errors::{bad_address, external_service, malformed_response};
use crate::schema::{WireMap, WireMessage, WireSpot};

/// `RemoteQueue` backed by HTTP calls to the request manager
#[derive(Debug, Clone)]
pub struct DrmClient {
    http: Client,
    base: Url,
}

impl DrmClient {
    /// Client for the service at `address` (scheme and host) on `port`
    ///
    /// # Errors
    ///
    /// `Config` if the address is not a usable base URL, `ExternalService` if
    /// the HTTP client cannot be built.
    pub fn new(address: &str, port: u16) -> Result<Self> {
        let mut base = Url::parse(address).map_err(|e| bad_address(address, e))?;
        if base.cannot_be_a_base() {
            return Err(bad_address(address, "not a base URL"));
        }
        base.set_port(Some(port))
            .map_err(|_| bad_address(address, "cannot carry a port"))?;

        let http = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| external_service("drm_client", e))?;

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Base URL with `segments` appended, each percent-encoded
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| bad_address(self.base.as_str(), "not a base URL"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn send<T: DeserializeOwned>(&self, op: &str, request: RequestBuilder) -> Result<T> {
        let body = request
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|e| external_service(op, e))?;
        serde_json::from_str(&body).map_err(|e| malformed_response(op, e))
    }

    fn get<T: DeserializeOwned>(&self, op: &str, url: Url) -> Result<T> {
        tracing::debug!(op, url = %url, "GET");
        self.send(op, self.http.get(url))
    }

    fn control(&self, op: &str, segments: &[&str]) -> Result<()> {
        let url = self.endpoint(segments)?;
        let reply: WireMessage = self.get(op, url)?;
        tracing::debug!(op, message = %reply.message, "queue control");
        Ok(())
    }
}

impl RemoteQueue for DrmClient {
    fn fetch_candidate(&self, id: &str) -> Result<Candidate> {
        let url = self.endpoint(&["query", id])?;
        let map: WireMap = self.get("fetch_candidate", url)?;
        Ok(map.into())
    }

    fn enqueue(&self, id: &str, requester: Option<&str>) -> Result<()> {
        let mut url = self.endpoint(&["addKey", id])?;
        if let Some(user) = requester {
            url.query_pairs_mut().append_pair("user", user);
        }
        let added: WireMap = self.get("enqueue", url)?;
        tracing::debug!(map_id = %added.bsr_key, "queued");
        Ok(())
    }

    fn move_position(&self, from: usize, to: usize) -> Result<()> {
        self.control(
            "move_position",
            &["queue", "move", &from.to_string(), &to.to_string()],
        )
    }

    fn clear(&self) -> Result<()> {
        self.control("clear", &["queue", "clear"])
    }

    fn positions_for_user(&self, username: &str) -> Result<Vec<usize>> {
        let url = self.endpoint(&["queue", "where", username])?;
        let spots: Vec<WireSpot> = self.get("positions_for_user", url)?;
        Ok(spots.into_iter().map(|s| s.spot).collect())
    }

    fn snapshot(&self) -> Result<Vec<QueueEntry>> {
        let url = self.endpoint(&["queue"])?;
        let maps: Vec<WireMap> = self.get("snapshot", url)?;
        Ok(maps.into_iter().map(QueueEntry::from).collect())
    }

    fn set_open(&self, open: bool) -> Result<()> {
        self.control("set_open", &["queue", "open", if open { "true" } else { "false" }])
    }

    fn add_wip(&self, id: &str, requester: &str) -> Result<()> {
        let mut url = self.endpoint(&["addWip"])?;
        url.query_pairs_mut().append_pair("user", requester);
        tracing::debug!(op = "add_wip", url = %url, "POST");
        let added: WireMap = self.send("add_wip", self.http.post(url).body(id.to_string()))?;
        tracing::debug!(map_id = %added.bsr_key, "wip queued");
        Ok(())
    }
}
