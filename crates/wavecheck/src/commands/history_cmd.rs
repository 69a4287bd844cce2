//! `history` subcommands: inspect and maintain the suppression store.

use chrono::Utc;
use serde::Serialize;
use tabled::Tabled;

use wavecheck_core::HistoryStore;

use crate::cli::{GlobalOpts, HistoryArgs, HistoryCommand};
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct EntryView {
    key: String,
    value: String,
    recorded_at: String,
    reason: String,
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Device | Band | Kind")]
    key: String,
    #[tabled(rename = "Last value")]
    value: String,
    #[tabled(rename = "Recorded")]
    recorded_at: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

pub fn handle(args: &HistoryArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = args.history.clone().unwrap_or_else(config::history_path);
    let mut store = HistoryStore::load(&path);

    match &args.command {
        HistoryCommand::List => {
            let entries: Vec<EntryView> = store
                .iter()
                .map(|(key, entry)| EntryView {
                    key: key.to_owned(),
                    value: entry.value.clone(),
                    recorded_at: entry.recorded_at.format("%Y-%m-%d").to_string(),
                    reason: entry.reason.clone(),
                })
                .collect();

            let rendered = output::render_list(
                &global.output,
                &entries,
                |e| EntryRow {
                    key: e.key.clone(),
                    value: e.value.clone(),
                    recorded_at: e.recorded_at.clone(),
                    reason: e.reason.clone(),
                },
                |e| e.key.clone(),
            );
            if entries.is_empty() {
                output::print_output("No recommendation history recorded.", global.quiet);
            } else {
                output::print_output(&rendered, global.quiet);
            }
            Ok(())
        }

        HistoryCommand::Prune { days } => {
            let removed = store.prune(*days, Utc::now());
            store.save()?;
            output::print_output(
                &format!("Pruned {removed} entries older than {days} days."),
                global.quiet,
            );
            Ok(())
        }

        HistoryCommand::Clear => {
            if !global.yes {
                return Err(CliError::ConfirmationRequired {
                    action: "history clear".into(),
                });
            }
            let removed = store.len();
            store.clear();
            store.save()?;
            output::print_output(&format!("Removed {removed} entries."), global.quiet);
            Ok(())
        }
    }
}
