//! Per-device reports: the text brief written to disk and the console table.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use tabled::builder::Builder;
use tabled::settings::{Panel, Style};

use nxtop_core::{DeviceId, DeviceResult, Direction, RankedEntry};

use crate::error::CliError;

/// Bytes in one GB as the briefs count it (binary gigabyte).
pub const BYTES_PER_GB: u64 = 1_073_741_824;

/// Whole GB, truncated.
pub fn whole_gb(bytes: u64) -> u64 {
    bytes / BYTES_PER_GB
}

/// GB with two decimals.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn fmt_gb(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / BYTES_PER_GB as f64)
}

fn section_title(direction: Direction) -> &'static str {
    match direction {
        Direction::Inbound => "Inbound Traffic Brief:",
        Direction::Outbound => "Outbound Traffic Brief:",
    }
}

fn column_title(direction: Direction) -> &'static str {
    match direction {
        Direction::Inbound => "Traffic In (GB)",
        Direction::Outbound => "Traffic Out (GB)",
    }
}

// ── File brief ───────────────────────────────────────────────────────

/// Report file name for a device; path separators and `:` become `_`.
pub fn file_name(device: &DeviceId) -> String {
    let safe: String = device
        .as_str()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    format!("{safe}.txt")
}

/// The text brief for a device, or `None` when there is nothing to report.
///
/// A blank line always follows the inbound block, even when it is empty.
/// An empty section prints no title.
pub fn render_brief(result: &DeviceResult) -> Option<String> {
    if !result.is_ok() || result.rankings.is_empty() {
        return None;
    }

    let section = |direction| {
        let entries = result.rankings.get(direction);
        if entries.is_empty() {
            String::new()
        } else {
            brief_section(direction, entries)
        }
    };

    Some(format!(
        "{}\n{}",
        section(Direction::Inbound),
        section(Direction::Outbound)
    ))
}

fn brief_section(direction: Direction, entries: &[RankedEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", section_title(direction));
    for (index, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}: Interface: {} Usage: {} GB",
            index + 1,
            entry.interface,
            whole_gb(entry.bytes)
        );
    }
    out
}

/// Write a device's brief into `dir`.
///
/// Returns the written path, or `None` when the device has nothing to
/// report.
pub fn write_report(dir: &Path, result: &DeviceResult) -> Result<Option<PathBuf>, CliError> {
    let Some(brief) = render_brief(result) else {
        return Ok(None);
    };
    let path = dir.join(file_name(&result.device));
    std::fs::write(&path, brief).map_err(|source| CliError::ReportWriteFailed {
        path: path.clone(),
        source,
    })?;
    Ok(Some(path))
}

// ── Console ──────────────────────────────────────────────────────────

/// Console rendering of one device: a table, or a one-line notice.
pub fn render_console(result: &DeviceResult, color: bool) -> String {
    if !result.is_ok() {
        let notice = format!(
            "Skipping {} due to an issue retrieving interface data.",
            result.device
        );
        return if color {
            notice.yellow().to_string()
        } else {
            notice
        };
    }
    if result.rankings.is_empty() {
        return "No interface data found.".to_owned();
    }

    let mut builder = Builder::default();
    for direction in Direction::ALL {
        let entries = result.rankings.get(direction);
        if entries.is_empty() {
            continue;
        }
        builder.push_record([
            "Interface Name".to_owned(),
            column_title(direction).to_owned(),
        ]);
        for entry in entries {
            builder.push_record([entry.interface.clone(), fmt_gb(entry.bytes)]);
        }
    }

    let title = if color {
        result.device.as_str().bold().to_string()
    } else {
        result.device.to_string()
    };

    let mut table = builder.build();
    table.with(Style::ascii()).with(Panel::header(title));
    table.to_string()
}
