// Historical counter endpoints
//
// Hourly per-device reports (stat/report/hourly.*). These endpoints are
// optional: older controllers 404 on them, which surfaces as
// `Error::EndpointUnavailable` so the engine can degrade gracefully.

use serde_json::json;
use tracing::debug;

use crate::client::ControllerClient;
use crate::error::Error;
use crate::models::RawCounterSample;

impl ControllerClient {
    /// Fetch hourly counter samples for one device.
    ///
    /// `POST /api/s/{site}/stat/report/hourly.{ap|sw}` with a `macs`
    /// filter and epoch-millisecond `start`/`end` bounds.
    pub async fn hourly_device_counters(
        &self,
        report: &str,
        mac: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<RawCounterSample>, Error> {
        let path = format!("stat/report/hourly.{report}");
        let url = self.site_url(&path)?;
        debug!(report, mac, "fetching hourly counters");

        let body = json!({
            "attrs": ["time", "rx_packets", "tx_packets"],
            "macs": [mac.to_lowercase()],
            "start": start_ms,
            "end": end_ms,
        });

        self.post(url, &body).await
    }
}
