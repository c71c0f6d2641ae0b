use std::time::Duration;

use reqwest::{Client, StatusCode};
use tokio::time::sleep;

use crate::error::ProbeError;

/// Pacing for the result poll loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Pause between polls while the artifact is not published yet.
    pub interval: Duration,

    /// Upper bound on poll attempts before the run is considered lost.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 120,
        }
    }
}

/// Poll the summary artifact until the server stops answering 404.
///
/// The test server publishes the artifact only once the run completes; any
/// status other than 404 ends the loop and its body is returned as-is.
/// Transport errors propagate immediately.
pub async fn poll_summary(
    client: &Client,
    csv_url: &str,
    config: &PollConfig,
) -> Result<String, ProbeError> {
    for attempt in 1..=config.max_attempts {
        let response = client.post(csv_url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            log::debug!(
                "Result not ready (attempt {attempt}/{}), waiting {:?}",
                config.max_attempts,
                config.interval
            );
            sleep(config.interval).await;
            continue;
        }

        log::info!(
            "Result artifact available after {attempt} poll(s), status {}",
            response.status()
        );
        return Ok(response.text().await?);
    }

    Err(ProbeError::PollExhausted {
        attempts: config.max_attempts,
    })
}
