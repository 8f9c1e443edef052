//! Audio backends and the candidate retry loop.
//!
//! A backend only has to answer "did this locator start playing?". Actual
//! audio output lives outside this crate; the shipped backends probe whether
//! a locator is playable (file exists, host answers).

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::PlaybackError;
use super::state::PlayRequest;
use crate::epoch::Epoch;

/// User agent string sent to streaming hosts
const USER_AGENT: &str = concat!("MusicShelf/", env!("CARGO_PKG_VERSION"));

/// Something that can start playback of an audio locator.
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait AudioBackend: Send + Sync {
    /// Try to start playing `locator`.
    async fn start(&self, locator: &str) -> Result<(), PlaybackError>;
}

/// Backend for local files: a locator plays if the file exists.
#[derive(Debug, Default)]
pub struct FileProbe;

#[async_trait]
impl AudioBackend for FileProbe {
    async fn start(&self, locator: &str) -> Result<(), PlaybackError> {
        match tokio::fs::metadata(locator).await {
            Ok(meta) if meta.is_file() => Ok(()),
            Ok(_) => Err(PlaybackError::unavailable(locator, "not a file")),
            Err(e) => Err(PlaybackError::unavailable(locator, e.to_string())),
        }
    }
}

/// Backend for streaming hosts: a locator plays if the host answers a
/// `HEAD` request (after redirects) with success.
pub struct HttpProbe {
    http_client: reqwest::Client,
}

impl HttpProbe {
    pub fn new() -> Result<Self, PlaybackError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PlaybackError::Backend(e.to_string()))?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl AudioBackend for HttpProbe {
    async fn start(&self, locator: &str) -> Result<(), PlaybackError> {
        let response = self
            .http_client
            .head(locator)
            .send()
            .await
            .map_err(|e| PlaybackError::unavailable(locator, e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(PlaybackError::unavailable(
                locator,
                format!("HTTP {}", status.as_u16()),
            ))
        }
    }
}

/// Start playback for a request, trying its locators in order.
///
/// With retries enabled each failed locator is followed, after `delay`, by
/// the next one; running out reports [`PlaybackError::Exhausted`] once.
/// Without retries the first failure is returned as-is. Before every attempt
/// the request's ticket is checked, so a newer play request cancels the rest
/// of the chain with [`PlaybackError::Superseded`].
///
/// Returns the locator that started.
pub async fn start_playback(
    backend: &dyn AudioBackend,
    request: &PlayRequest,
    epoch: &Epoch,
    delay: Duration,
) -> Result<String, PlaybackError> {
    let title = &request.now_playing.title;

    for (attempt, locator) in request.locators.iter().enumerate() {
        if attempt > 0 {
            tokio::time::sleep(delay).await;
        }
        if !epoch.is_current(request.ticket) {
            debug!(target: "player::retry", %title, attempt, "Play request superseded");
            return Err(PlaybackError::Superseded);
        }

        match backend.start(locator).await {
            Ok(()) => {
                info!(target: "player::retry", %title, %locator, "Playing");
                return Ok(locator.clone());
            }
            Err(e) => {
                warn!(target: "player::retry", %title, %locator, error = %e, "Play failed");
                if !request.retry {
                    return Err(e);
                }
            }
        }
    }

    if request.retry {
        Err(PlaybackError::Exhausted {
            title: title.clone(),
            attempts: request.locators.len(),
        })
    } else {
        Err(PlaybackError::Backend("no audio locators".to_string()))
    }
}
