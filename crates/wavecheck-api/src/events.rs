// Event log endpoint
//
// The engine correlates device restarts against a bounded look-back
// window of this log; `within_hours` bounds the request server-side.

use serde_json::json;
use tracing::debug;

use crate::client::ControllerClient;
use crate::error::Error;
use crate::models::RawEvent;

impl ControllerClient {
    /// List events within the given look-back window.
    ///
    /// `POST /api/s/{site}/stat/event` with `{"within": hours, "_limit": n}`
    ///
    /// The controller caps the response at `limit` entries; the log it
    /// actually holds may span less (or more) than the requested window,
    /// so callers must inspect the returned timestamps rather than assume
    /// full coverage.
    pub async fn list_events(&self, within_hours: u32, limit: u32) -> Result<Vec<RawEvent>, Error> {
        let url = self.site_url("stat/event")?;
        debug!(within_hours, limit, "listing events");
        let body = json!({
            "within": within_hours,
            "_limit": limit,
            "_sort": "-time",
        });
        self.post(url, &body).await
    }
}
