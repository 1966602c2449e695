//! Callout dispatch: one bounded-time network request per built callout,
//! fanned out concurrently, every outcome settled into a `CalloutResponse`.
//!
//! The whole dispatch never fails: individual failures are embedded as
//! error-tagged records and the result list always resolves, in slot order.

use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tokio::time::timeout;

use crate::callout::{CalloutRequest, CalloutResponse, CalloutSlot};
use crate::errors::CalloutError;
use crate::metrics_defs;

/// Issues RTC callouts over a shared HTTP client.
#[derive(Clone, Default)]
pub struct Dispatcher {
    client: reqwest::Client,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a caller-configured client (cookie jar, proxies, TLS settings).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fan out all ready slots concurrently and resolve once every outcome
    /// has settled. Failed slots pass through untouched; results come back
    /// in slot order regardless of completion order.
    pub async fn execute(&self, slots: Vec<CalloutSlot>, budget: Duration) -> Vec<CalloutResponse> {
        let rtc_start = Instant::now();
        let mut results: Vec<Option<CalloutResponse>> = Vec::with_capacity(slots.len());
        let mut join_set = JoinSet::new();

        for (index, slot) in slots.into_iter().enumerate() {
            match slot {
                CalloutSlot::Failed(response) => {
                    if let Some(error) = response.error {
                        shared::counter!(metrics_defs::CALLOUT_ERRORS, "kind" => error.as_str())
                            .increment(1);
                    }
                    results.push(Some(response));
                }
                CalloutSlot::Ready(request) => {
                    results.push(None);
                    let client = self.client.clone();
                    join_set.spawn(async move {
                        let response = send_callout(&client, request, rtc_start, budget).await;
                        (index, response)
                    });
                }
            }
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, response)) => results[index] = Some(response),
                Err(error) => tracing::error!(%error, "rtc callout task panicked"),
            }
        }

        results.into_iter().flatten().collect()
    }
}

/// Send one callout with a timeout guard. The guard abandons the request
/// rather than cancelling the transfer on the wire, and `rtc_time` is read
/// after the guard settles, so a fired guard's own cleanup can push the
/// recorded time past the configured budget.
async fn send_callout(
    client: &reqwest::Client,
    request: CalloutRequest,
    rtc_start: Instant,
    budget: Duration,
) -> CalloutResponse {
    let CalloutRequest { url, label } = request;
    shared::counter!(metrics_defs::CALLOUTS_DISPATCHED).increment(1);
    tracing::debug!(callout = %label, "rtc callout dispatched");

    let outcome = timeout(budget, fetch_body(client, &url)).await;
    let rtc_time = rtc_start.elapsed().as_millis() as u64;
    shared::histogram!(metrics_defs::CALLOUT_DURATION).record(rtc_time as f64);

    let response = match outcome {
        // Timeout expiry and transport failures collapse into one kind.
        Err(_elapsed) => CalloutResponse::error(label, rtc_time, CalloutError::NetworkFailure),
        Ok(Err(error)) => {
            tracing::debug!(%error, "rtc callout transport failure");
            CalloutResponse::error(label, rtc_time, CalloutError::NetworkFailure)
        }
        // An empty body is a success with no payload.
        Ok(Ok(body)) if body.is_empty() => CalloutResponse::success(label, rtc_time, None),
        Ok(Ok(body)) => match serde_json::from_str(&body) {
            Ok(value) => CalloutResponse::success(label, rtc_time, Some(value)),
            Err(_) => {
                CalloutResponse::error(label, rtc_time, CalloutError::MalformedJsonResponse)
            }
        },
    };

    if let Some(error) = response.error {
        shared::counter!(metrics_defs::CALLOUT_ERRORS, "kind" => error.as_str()).increment(1);
    }
    response
}

/// One attempt, no retries. Non-2xx statuses count as transport failures.
async fn fetch_body(client: &reqwest::Client, url: &str) -> Result<String, reqwest::Error> {
    let response = client.get(url).send().await?.error_for_status()?;
    response.text().await
}
