//! Best-effort forwarding of new updates to CampusFlow.
//!
//! A notifier is only invoked after the local write has been committed.
//! Its errors are reported to the caller for logging and never undo or fail
//! the submission.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::entities::Update;

/// Value of the `source` field in every forwarded payload.
pub const SOURCE_NAME: &str = "CollegeConnect";

#[derive(Debug, Error)]
pub enum PeerError {
    /// Network failure, timeout, or an unreadable response.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// CampusFlow answered with something other than 200 OK.
    #[error("peer answered {status}")]
    UnexpectedStatus { status: StatusCode },
}

#[derive(Debug, Serialize)]
struct ForwardedUpdate<'a> {
    source: &'static str,
    update: &'a Update,
}

/// Capability to tell the peer about a newly created update.
#[async_trait]
pub trait PeerNotifier: Send + Sync + 'static {
    async fn notify_created(&self, update: &Update) -> Result<(), PeerError>;
}

/// Posts `{"source": "CollegeConnect", "update": ...}` to a fixed URL with a
/// bounded timeout. No retries.
#[derive(Debug, Clone)]
pub struct HttpPeerNotifier {
    url: String,
    client: Client,
}

impl HttpPeerNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(concat!("collegeconnect-server/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            url: url.into(),
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PeerNotifier for HttpPeerNotifier {
    async fn notify_created(&self, update: &Update) -> Result<(), PeerError> {
        let response = self
            .client
            .post(&self.url)
            .json(&ForwardedUpdate {
                source: SOURCE_NAME,
                update,
            })
            .send()
            .await
            .map_err(|source| PeerError::Transport {
                url: self.url.clone(),
                source,
            })?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(PeerError::UnexpectedStatus { status }),
        }
    }
}

/// Used when no peer URL is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl PeerNotifier for DisabledNotifier {
    async fn notify_created(&self, _update: &Update) -> Result<(), PeerError> {
        Ok(())
    }
}

#[cfg(test)]
pub mod recording {
    use std::sync::Mutex;

    use super::*;

    /// Remembers every notified update; optionally fails each call.
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        pub fail_with: Option<StatusCode>,
        seen: Mutex<Vec<Update>>,
    }

    impl RecordingNotifier {
        pub fn failing(status: StatusCode) -> Self {
            Self {
                fail_with: Some(status),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn seen(&self) -> Vec<Update> {
            self.seen.lock().map(|s| s.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl PeerNotifier for RecordingNotifier {
        async fn notify_created(&self, update: &Update) -> Result<(), PeerError> {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(update.clone());
            }
            match self.fail_with {
                Some(status) => Err(PeerError::UnexpectedStatus { status }),
                None => Ok(()),
            }
        }
    }
}
