//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

/// Map an interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let inventory = config::load_inventory(global)?;
            let rendered = match global.output {
                OutputFormat::Table => inventory.to_redacted_toml()?,
                format => output::render_structured(format, &inventory.redacted())?
                    .unwrap_or_default(),
            };
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            let path = nxtop_config::inventory_path(global.inventory.as_deref());
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::SetPassword { username } => {
            let username = match username {
                Some(u) => u,
                None => config::load_inventory(global)
                    .ok()
                    .and_then(|inv| inv.credentials.username)
                    .or_else(|| std::env::var(nxtop_config::USERNAME_ENV).ok())
                    .ok_or_else(|| CliError::Validation {
                        field: "username".into(),
                        reason: "pass --username or set credentials.username in the inventory"
                            .into(),
                    })?,
            };

            let secret = rpassword::prompt_password(format!("Password for {username}: "))
                .map_err(prompt_err)?;
            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "value cannot be empty".into(),
                });
            }

            let entry = nxtop_config::keyring_entry(&username)?;
            entry.set_password(&secret).map_err(|e| CliError::Keyring {
                message: format!("failed to store password: {e}"),
            })?;

            tracing::info!(%username, "password stored in keyring");
            if !global.quiet {
                eprintln!("✓ password for '{username}' stored in system keyring");
            }
            Ok(())
        }
    }
}
