//! Snapshot collection: one session login plus the read-only endpoints.
//!
//! Collection degrades per collector: a failed event fetch becomes a
//! `CollectionFailure` on the snapshot (the dependent analyzers skip
//! themselves), while auth failures abort the run since nothing else
//! can succeed either.

use chrono::Utc;
use tracing::{debug, warn};

use wavecheck_api::{ControllerClient, Error as ApiError, TransportConfig};
use wavecheck_core::{CollectionFailure, Collector, CoreError, Snapshot, convert};

use crate::config::ControllerSettings;
use crate::error::CliError;

/// Open an authenticated controller session.
pub async fn open_session(settings: &ControllerSettings) -> Result<ControllerClient, CliError> {
    let transport = TransportConfig {
        tls: settings.tls.clone(),
        timeout: settings.timeout,
        cookie_jar: None,
    };
    let client = ControllerClient::new(
        settings.url.clone(),
        settings.site.clone(),
        settings.platform,
        &transport,
    )
    .map_err(CoreError::from)?;

    client
        .login(&settings.username, &settings.password)
        .await
        .map_err(CoreError::from)?;
    Ok(client)
}

/// Fetch devices, clients, and events, and assemble the snapshot.
///
/// Individual collector failures are recorded on the snapshot rather
/// than aborting; the scorer decides whether they were critical.
pub async fn collect_snapshot(
    client: &ControllerClient,
    within_hours: u32,
    event_limit: u32,
) -> Result<Snapshot, CliError> {
    let mut failures = Vec::new();

    let devices = match client.list_devices().await {
        Ok(devices) => devices,
        Err(err) => {
            record_or_abort(err, Collector::Devices, &mut failures)?;
            Vec::new()
        }
    };

    let clients = match client.list_clients().await {
        Ok(clients) => clients,
        Err(err) => {
            record_or_abort(err, Collector::Clients, &mut failures)?;
            Vec::new()
        }
    };

    let events = match client.list_events(within_hours, event_limit).await {
        Ok(events) => events,
        Err(err) => {
            record_or_abort(err, Collector::Events, &mut failures)?;
            Vec::new()
        }
    };

    debug!(
        devices = devices.len(),
        clients = clients.len(),
        events = events.len(),
        failures = failures.len(),
        "snapshot collected"
    );
    Ok(convert::snapshot(
        Utc::now(),
        &devices,
        &clients,
        &events,
        failures,
    ))
}

/// Auth failures abort; anything else degrades to a recorded failure.
fn record_or_abort(
    err: ApiError,
    collector: Collector,
    failures: &mut Vec<CollectionFailure>,
) -> Result<(), CliError> {
    match err {
        ApiError::Authentication { .. } | ApiError::SessionExpired => {
            Err(CoreError::from(err).into())
        }
        other => {
            warn!(%collector, error = %other, "collector failed, degrading");
            failures.push(CollectionFailure {
                collector,
                detail: other.to_string(),
            });
            Ok(())
        }
    }
}
