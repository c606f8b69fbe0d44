//! Output formatting: console tables or structured JSON/YAML.

use std::io::{self, IsTerminal, Write};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Decide whether color should be used on a stream.
pub fn should_color(mode: ColorMode, is_terminal: bool) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => is_terminal && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Color decision for stdout.
pub fn stdout_color(mode: ColorMode) -> bool {
    should_color(mode, io::stdout().is_terminal())
}

/// Color decision for stderr.
pub fn stderr_color(mode: ColorMode) -> bool {
    should_color(mode, io::stderr().is_terminal())
}

/// Serialize `data` in a structured format.
///
/// Returns `None` for [`OutputFormat::Table`]; callers render tables
/// themselves.
pub fn render_structured<T: serde::Serialize + ?Sized>(
    format: OutputFormat,
    data: &T,
) -> Result<Option<String>, CliError> {
    let rendered = match format {
        OutputFormat::Table => return Ok(None),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
    };
    Ok(Some(rendered))
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}
