//! CLI configuration: the shared inventory plus flag overrides.
//!
//! Flags win over the inventory, which wins over `NXTOP_*` env vars
//! (applied by `nxtop_config` while loading).

use std::path::PathBuf;

use nxtop_config::Inventory;
use nxtop_core::{DeviceId, FleetConfig};

use crate::cli::{GlobalOpts, PollArgs};
use crate::error::CliError;

/// Everything a poll needs, resolved up front.
#[derive(Debug)]
pub struct PollPlan {
    pub fleet: FleetConfig,
    pub devices: Vec<DeviceId>,
    pub output_dir: PathBuf,
    pub print_cli: bool,
}

/// Load the inventory selected by `--inventory` (or the default lookup).
pub fn load_inventory(global: &GlobalOpts) -> Result<Inventory, CliError> {
    let path = nxtop_config::inventory_path(global.inventory.as_deref());
    Ok(nxtop_config::load_inventory(&path)?)
}

/// Resolve the inventory, device selection and overrides into a plan.
///
/// With no inventory file on the default lookup path, `--device` flags
/// alone describe an ad-hoc fleet; credentials then come from the
/// environment.
pub fn build_poll_plan(global: &GlobalOpts, args: &PollArgs) -> Result<PollPlan, CliError> {
    let mut inventory = match load_inventory(global) {
        Ok(mut inventory) => {
            if !args.devices.is_empty() {
                inventory.devices = select_devices(&inventory, &args.devices)?;
            }
            inventory
        }
        Err(CliError::InventoryNotFound { .. })
            if global.inventory.is_none() && !args.devices.is_empty() =>
        {
            tracing::debug!("no inventory file, polling devices given on the command line");
            Inventory {
                devices: args.devices.clone(),
                ..Inventory::default()
            }
        }
        Err(e) => return Err(e),
    };

    apply_overrides(&mut inventory, global, args);

    let fleet = nxtop_config::to_fleet_config(&inventory)?;
    Ok(PollPlan {
        fleet,
        devices: inventory.device_ids(),
        output_dir: inventory.output_dir,
        print_cli: inventory.print_cli,
    })
}

/// Restrict the inventory to `requested`, rejecting unknown devices.
fn select_devices(inventory: &Inventory, requested: &[String]) -> Result<Vec<String>, CliError> {
    requested
        .iter()
        .map(|wanted| {
            let wanted = wanted.trim();
            inventory
                .devices
                .iter()
                .find(|known| known.trim() == wanted)
                .cloned()
                .ok_or_else(|| CliError::Validation {
                    field: "device".into(),
                    reason: format!("'{wanted}' is not in the inventory"),
                })
        })
        .collect()
}

fn apply_overrides(inventory: &mut Inventory, global: &GlobalOpts, args: &PollArgs) {
    if global.insecure {
        inventory.insecure = true;
    }
    if let Some(timeout) = global.timeout {
        inventory.timeout = timeout;
    }
    if let Some(top) = args.top {
        inventory.top = Some(top);
    }
    if let Some(limit) = args.max_concurrency {
        inventory.max_concurrency = Some(limit);
    }
    if let Some(ref dir) = args.output_dir {
        inventory.output_dir.clone_from(dir);
    }
    if args.no_print {
        inventory.print_cli = false;
    }
}
