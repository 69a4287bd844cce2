// Device snapshot endpoint
//
// Read-only access to `stat/device`. The diagnostic engine never issues
// device commands; it only proposes changes.

use serde_json::json;
use tracing::debug;

use crate::client::ControllerClient;
use crate::error::Error;
use crate::models::RawDevice;

impl ControllerClient {
    /// List all adopted devices with full statistics.
    ///
    /// `GET /api/s/{site}/stat/device`
    pub async fn list_devices(&self) -> Result<Vec<RawDevice>, Error> {
        let url = self.site_url("stat/device")?;
        debug!("listing devices");
        self.get(url).await
    }

    /// Get a single device by MAC address.
    ///
    /// Filters the device list by MAC. Returns `None` if no device matches.
    pub async fn get_device(&self, mac: &str) -> Result<Option<RawDevice>, Error> {
        let url = self.site_url("stat/device")?;
        let body = json!({ "macs": [mac.to_lowercase()] });
        let devices: Vec<RawDevice> = self.post(url, &body).await?;
        Ok(devices.into_iter().next())
    }
}
