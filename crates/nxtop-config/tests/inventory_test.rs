#![allow(clippy::unwrap_used)]
// Inventory loading from disk and environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Jail;
use secrecy::ExposeSecret;

use nxtop_config::{
    ConfigError, LOCAL_INVENTORY_FILE, inventory_path, load_inventory, resolve_credentials,
    to_fleet_config,
};
use nxtop_core::{DeviceId, Scheme, TlsVerification};

const LEGACY_YAML: &str = r"
NetworkDevice:
  - 10.0.0.1
  - core-sw2.lab
Credentials:
  username: admin
  password: s3cret
PrintCLI: false
";

const TOML_INVENTORY: &str = r#"
devices = ["leaf1", "leaf2:8443"]
scheme = "http"
timeout = 5
output_dir = "reports"
top = 3
max_concurrency = 2
ca_cert = "lab-ca.pem"

[credentials]
username = "netops"
password_env = "LAB_SWITCH_PW"
"#;

#[test]
fn test_legacy_yaml_keys_are_accepted() {
    Jail::expect_with(|jail| {
        jail.create_file(LOCAL_INVENTORY_FILE, LEGACY_YAML)?;

        let inv = load_inventory(Path::new(LOCAL_INVENTORY_FILE)).unwrap();

        assert_eq!(inv.devices, vec!["10.0.0.1", "core-sw2.lab"]);
        assert_eq!(inv.credentials.username.as_deref(), Some("admin"));
        assert_eq!(inv.credentials.password.as_deref(), Some("s3cret"));
        assert!(!inv.print_cli);
        assert_eq!(inv.timeout, 30);
        assert_eq!(inv.scheme, Scheme::Https);
        Ok(())
    });
}

#[test]
fn test_toml_inventory_maps_to_fleet_config() {
    Jail::expect_with(|jail| {
        jail.create_file("inventory.toml", TOML_INVENTORY)?;
        jail.set_env("LAB_SWITCH_PW", "from-env");

        let inv = load_inventory(Path::new("inventory.toml")).unwrap();
        assert!(inv.print_cli);
        assert_eq!(inv.output_dir, PathBuf::from("reports"));
        assert_eq!(
            inv.device_ids(),
            vec![DeviceId::from("leaf1"), DeviceId::from("leaf2:8443")]
        );

        let fleet = to_fleet_config(&inv).unwrap();
        assert_eq!(fleet.credentials.username, "netops");
        assert_eq!(fleet.credentials.password.expose_secret(), "from-env");
        assert_eq!(fleet.scheme, Scheme::Http);
        assert_eq!(fleet.timeout, Duration::from_secs(5));
        assert_eq!(fleet.top, Some(3));
        assert_eq!(fleet.max_concurrency, Some(2));
        assert_eq!(fleet.tls, TlsVerification::CustomCa(PathBuf::from("lab-ca.pem")));
        Ok(())
    });
}

#[test]
fn test_env_overrides_file_values() {
    Jail::expect_with(|jail| {
        jail.create_file(LOCAL_INVENTORY_FILE, LEGACY_YAML)?;
        jail.set_env("NXTOP_TIMEOUT", "7");
        jail.set_env("NXTOP_INSECURE", "true");
        jail.set_env("NXTOP_CREDENTIALS__USERNAME", "operator");
        jail.set_env("NXTOP_PRINT_CLI", "true");

        let inv = load_inventory(Path::new(LOCAL_INVENTORY_FILE)).unwrap();

        assert_eq!(inv.timeout, 7);
        assert!(inv.insecure);
        assert!(inv.print_cli);
        assert_eq!(inv.devices, vec!["10.0.0.1", "core-sw2.lab"]);
        assert_eq!(inv.credentials.password.as_deref(), Some("s3cret"));
        assert_eq!(inv.credentials.username.as_deref(), Some("operator"));
        assert_eq!(inv.tls(), TlsVerification::DangerAcceptInvalid);
        Ok(())
    });
}

#[test]
fn test_password_env_beats_plaintext() {
    Jail::expect_with(|jail| {
        jail.create_file(LOCAL_INVENTORY_FILE, LEGACY_YAML)?;
        jail.set_env("NXTOP_PASSWORD", "env-secret");

        let inv = load_inventory(Path::new(LOCAL_INVENTORY_FILE)).unwrap();
        let creds = resolve_credentials(&inv).unwrap();

        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password.expose_secret(), "env-secret");
        Ok(())
    });
}

#[test]
fn test_missing_username_is_no_credentials() {
    Jail::expect_with(|jail| {
        jail.create_file("inventory.toml", r#"devices = ["sw1"]"#)?;

        let inv = load_inventory(Path::new("inventory.toml")).unwrap();
        let err = to_fleet_config(&inv).unwrap_err();

        assert!(matches!(err, ConfigError::NoCredentials { username: None }));
        Ok(())
    });
}

#[test]
fn test_empty_inventory_fails_validation() {
    Jail::expect_with(|jail| {
        jail.create_file("inventory.toml", "[credentials]\nusername = \"admin\"\n")?;

        let inv = load_inventory(Path::new("inventory.toml")).unwrap();
        let err = to_fleet_config(&inv).unwrap_err();

        assert!(matches!(err, ConfigError::Validation { .. }), "got: {err}");
        Ok(())
    });
}

#[test]
fn test_local_inventory_is_preferred() {
    Jail::expect_with(|jail| {
        assert_ne!(inventory_path(None), PathBuf::from(LOCAL_INVENTORY_FILE));

        jail.create_file(LOCAL_INVENTORY_FILE, LEGACY_YAML)?;
        assert_eq!(inventory_path(None), PathBuf::from(LOCAL_INVENTORY_FILE));

        let explicit = Path::new("elsewhere/fleet.toml");
        assert_eq!(inventory_path(Some(explicit)), explicit.to_path_buf());
        Ok(())
    });
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");

    let err = load_inventory(&path).unwrap_err();

    assert!(matches!(err, ConfigError::NotFound { path: ref p } if p == &path));
}

#[test]
fn test_malformed_file_is_figment_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "devices = [\"sw1\"\ntimeout = \"soon\"").unwrap();

    let err = load_inventory(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Figment(_)), "got: {err}");
}
