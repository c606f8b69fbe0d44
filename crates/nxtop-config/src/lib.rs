//! Inventory configuration for nxtop.
//!
//! Loads the device inventory (YAML or TOML file, overlaid with `NXTOP_*`
//! environment variables), resolves the fleet password (env, keyring,
//! plaintext), and translates the result into `nxtop_core::FleetConfig`.
//! The CLI adds flag overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml, Yaml},
    value::Dict,
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use nxtop_core::{Credentials, DeviceId, FleetConfig, Scheme, TlsVerification};

/// Keyring service name under which fleet passwords are stored.
pub const KEYRING_SERVICE: &str = "nxtop";

/// Prefix for environment overrides of inventory keys.
pub const ENV_PREFIX: &str = "NXTOP_";

/// Environment variable holding the fleet password.
pub const PASSWORD_ENV: &str = "NXTOP_PASSWORD";

/// Environment variable holding the fleet username.
pub const USERNAME_ENV: &str = "NXTOP_USERNAME";

/// Inventory file picked up from the working directory when present.
pub const LOCAL_INVENTORY_FILE: &str = "network_config.yaml";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured{}", username.as_deref().map(|u| format!(" for user '{u}'")).unwrap_or_default())]
    NoCredentials { username: Option<String> },

    #[error("inventory file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Inventory structs ───────────────────────────────────────────────

/// The device inventory and run settings.
///
/// Files may also use the keys of the older `network_config.yaml` layout
/// (`NetworkDevice`, `Credentials`, `PrintCLI`); [`load_inventory`]
/// renames them before extraction.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Inventory {
    /// Devices to poll (host names or addresses, optional port).
    #[serde(default)]
    pub devices: Vec<String>,

    /// Print a ranking table per device to the console.
    #[serde(default = "default_print_cli")]
    pub print_cli: bool,

    /// Disable TLS certificate verification.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Scheme NX-API listens on.
    #[serde(default)]
    pub scheme: Scheme,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Directory report files are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Keep only the busiest N interfaces per direction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<usize>,

    /// Maximum number of devices polled at once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,

    /// Fleet-wide credentials.
    #[serde(default)]
    pub credentials: CredentialsSection,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            print_cli: default_print_cli(),
            insecure: false,
            ca_cert: None,
            scheme: Scheme::default(),
            timeout: default_timeout(),
            output_dir: default_output_dir(),
            top: None,
            max_concurrency: None,
            credentials: CredentialsSection::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CredentialsSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Plaintext password (prefer the keyring or an env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Name of an environment variable holding the password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,
}

fn default_print_cli() -> bool {
    true
}
fn default_timeout() -> u64 {
    30
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Inventory {
    /// Reject inventories a poll could not run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.devices.is_empty() {
            return Err(ConfigError::Validation {
                field: "devices".into(),
                reason: "at least one device is required".into(),
            });
        }
        if let Some(pos) = self.devices.iter().position(|d| d.trim().is_empty()) {
            return Err(ConfigError::Validation {
                field: "devices".into(),
                reason: format!("entry {} is empty", pos + 1),
            });
        }
        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        if self.top == Some(0) {
            return Err(ConfigError::Validation {
                field: "top".into(),
                reason: "must be at least 1 (omit it to rank every interface)".into(),
            });
        }
        if self.max_concurrency == Some(0) {
            return Err(ConfigError::Validation {
                field: "max_concurrency".into(),
                reason: "must be at least 1 (omit it for no limit)".into(),
            });
        }
        Ok(())
    }

    /// Configured devices as trimmed identities.
    pub fn device_ids(&self) -> Vec<DeviceId> {
        self.devices
            .iter()
            .map(|d| DeviceId::new(d.trim()))
            .collect()
    }

    /// TLS strategy implied by `insecure` and `ca_cert`.
    pub fn tls(&self) -> TlsVerification {
        if self.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.ca_cert {
            TlsVerification::CustomCa(ca_path.clone())
        } else {
            TlsVerification::SystemDefaults
        }
    }

    /// A copy safe to print: any plaintext password is masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.credentials.password.is_some() {
            copy.credentials.password = Some("****".into());
        }
        copy
    }

    /// Redacted inventory rendered as TOML.
    pub fn to_redacted_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&self.redacted())?)
    }
}

// ── Inventory file path ─────────────────────────────────────────────

/// Resolve which inventory file to read.
///
/// An explicit path wins; otherwise `network_config.yaml` in the working
/// directory, then the platform config directory.
pub fn inventory_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let local = PathBuf::from(LOCAL_INVENTORY_FILE);
    if local.is_file() {
        return local;
    }
    default_inventory_path()
}

/// Platform config path (XDG on Linux).
pub fn default_inventory_path() -> PathBuf {
    ProjectDirs::from("com", "nxtop", "nxtop").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("inventory.toml");
            p
        },
        |dirs| dirs.config_dir().join("inventory.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("nxtop");
    p
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

// ── Inventory loading ───────────────────────────────────────────────

/// Load an inventory from `path` plus `NXTOP_*` environment overrides.
///
/// Nested keys use a double underscore: `NXTOP_CREDENTIALS__USERNAME`.
pub fn load_inventory(path: &Path) -> Result<Inventory, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let file = if is_yaml(path) {
        Figment::from(Yaml::file(path))
    } else {
        Figment::from(Toml::file(path))
    };
    let mut values: Dict = file.extract()?;
    rename_legacy_keys(&mut values);

    let inventory: Inventory = Figment::from(Serialized::defaults(values))
        .merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(&["password", "username", "inventory", "output"])
                .split("__"),
        )
        .extract()?;

    debug!(
        path = %path.display(),
        devices = inventory.devices.len(),
        "inventory loaded"
    );
    Ok(inventory)
}

/// Keys of the older `network_config.yaml` layout and their current names.
pub const LEGACY_KEYS: [(&str, &str); 3] = [
    ("NetworkDevice", "devices"),
    ("Credentials", "credentials"),
    ("PrintCLI", "print_cli"),
];

/// Rename legacy top-level keys in place. A current key already present
/// in the same file wins over its legacy spelling.
fn rename_legacy_keys(values: &mut Dict) {
    for (legacy, current) in LEGACY_KEYS {
        if let Some(value) = values.remove(legacy) {
            if values.contains_key(current) {
                debug!(legacy, current, "ignoring legacy key shadowed by current key");
            } else {
                values.insert(current.to_owned(), value);
            }
        }
    }
}

// ── Credential resolution ───────────────────────────────────────────

/// Keyring entry holding the password for `username`.
pub fn keyring_entry(username: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(KEYRING_SERVICE, username)?)
}

/// Resolve the fleet credentials.
///
/// Username: inventory, then `NXTOP_USERNAME`. Password: the env var
/// named by `password_env`, then `NXTOP_PASSWORD`, then the system
/// keyring, then plaintext in the inventory.
pub fn resolve_credentials(inventory: &Inventory) -> Result<Credentials, ConfigError> {
    let section = &inventory.credentials;
    let username = section
        .username
        .clone()
        .or_else(|| std::env::var(USERNAME_ENV).ok())
        .filter(|u| !u.trim().is_empty())
        .ok_or(ConfigError::NoCredentials { username: None })?;

    // 1. Inventory's password_env → env var lookup
    if let Some(ref env_name) = section.password_env {
        if let Ok(pw) = std::env::var(env_name) {
            return Ok(Credentials::new(username, SecretString::from(pw)));
        }
    }

    // 2. Global env var
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(Credentials::new(username, SecretString::from(pw)));
    }

    // 3. System keyring
    if let Ok(entry) = keyring_entry(&username) {
        if let Ok(pw) = entry.get_password() {
            return Ok(Credentials::new(username, SecretString::from(pw)));
        }
    }

    // 4. Plaintext in the inventory
    if let Some(ref pw) = section.password {
        return Ok(Credentials::new(username, SecretString::from(pw.clone())));
    }

    Err(ConfigError::NoCredentials {
        username: Some(username),
    })
}

/// Build a `FleetConfig` from an inventory; no CLI overrides.
pub fn to_fleet_config(inventory: &Inventory) -> Result<FleetConfig, ConfigError> {
    inventory.validate()?;
    let credentials = resolve_credentials(inventory)?;

    Ok(FleetConfig {
        credentials,
        tls: inventory.tls(),
        scheme: inventory.scheme,
        timeout: Duration::from_secs(inventory.timeout),
        top: inventory.top,
        max_concurrency: inventory.max_concurrency,
    })
}
