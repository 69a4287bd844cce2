//! `config` subcommands.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

const TEMPLATE: &str = r#"# wavecheck configuration
#
# Credentials are resolved in order: WAVECHECK_PASSWORD env var,
# system keyring (service "wavecheck", user "<profile>/password"),
# then the plaintext `password` field below.

default_profile = "default"

[profiles.default]
controller = "https://192.168.1.1"
site = "default"
# "unifi-os" for consoles (UDM etc.), "standalone" for software controllers
platform = "unifi-os"
username = "admin"
# password = "..."
# ca_cert = "/path/to/ca.pem"
# insecure = true
# timeout = 30

# Engine tunables (defaults shown; uncomment to override)
# [engine.weights]
# rf = 0.35
# client = 0.30
# infrastructure = 0.20
# security = 0.15
"#;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init { force } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::Validation {
                    field: "config".into(),
                    reason: format!(
                        "{} already exists; use --force to overwrite",
                        path.display()
                    ),
                });
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, TEMPLATE)?;
            output::print_output(
                &format!("Wrote starter config to {}", path.display()),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::Show => {
            let mut cfg = config::load_config_or_default();
            for profile in cfg.profiles.values_mut() {
                if profile.password.is_some() {
                    profile.password = Some("<redacted>".into());
                }
            }
            let rendered = output::render_single(
                &global.output,
                &cfg,
                |c| {
                    toml::to_string_pretty(c)
                        .unwrap_or_else(|e| format!("could not render config: {e}"))
                },
                |_| config::config_path().display().to_string(),
            );
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}
