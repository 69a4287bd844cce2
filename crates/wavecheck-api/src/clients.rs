// Client (station) snapshot endpoint

use tracing::debug;

use crate::client::ControllerClient;
use crate::error::Error;
use crate::models::RawClientEntry;

impl ControllerClient {
    /// List all currently associated clients.
    ///
    /// `GET /api/s/{site}/stat/sta`
    pub async fn list_clients(&self) -> Result<Vec<RawClientEntry>, Error> {
        let url = self.site_url("stat/sta")?;
        debug!("listing clients");
        self.get(url).await
    }
}
