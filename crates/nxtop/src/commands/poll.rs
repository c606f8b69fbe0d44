//! `nxtop poll`: collect, rank, report.

use std::path::Path;

use owo_colors::OwoColorize;
use tracing::{debug, warn};

use nxtop_core::{DeviceResult, Fleet, TlsVerification};

use crate::cli::{GlobalOpts, PollArgs};
use crate::config;
use crate::error::CliError;
use crate::output;
use crate::report;

pub async fn handle(args: &PollArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let plan = config::build_poll_plan(global, args)?;

    if plan.fleet.tls == TlsVerification::DangerAcceptInvalid {
        let notice = "warning: TLS certificate verification is disabled for every device";
        if output::stderr_color(global.color) {
            eprintln!("{}", notice.yellow().bold());
        } else {
            eprintln!("{notice}");
        }
    }

    let fleet = Fleet::from_config(&plan.fleet)?;
    let results = fleet.collect(&plan.devices).await;

    let write_outcome = if args.no_files {
        Ok(())
    } else {
        write_reports(&plan.output_dir, &results)
    };

    if let Some(rendered) = output::render_structured(global.output, &results)? {
        output::print_output(&rendered, global.quiet);
    } else if plan.print_cli {
        let color = output::stdout_color(global.color);
        for result in &results {
            output::print_output(&report::render_console(result, color), global.quiet);
        }
    }

    write_outcome
}

/// Write every device's brief; failures are reported and skipped.
///
/// Errors only when every attempted write failed.
fn write_reports(dir: &Path, results: &[DeviceResult]) -> Result<(), CliError> {
    let mut attempted = 0usize;
    let mut failed = 0usize;

    for result in results {
        match report::write_report(dir, result) {
            Ok(Some(path)) => {
                attempted += 1;
                debug!(device = %result.device, path = %path.display(), "report written");
            }
            Ok(None) => {
                debug!(device = %result.device, status = ?result.status, "nothing to report");
            }
            Err(err) => {
                attempted += 1;
                failed += 1;
                warn!(device = %result.device, error = %err, "report write failed");
                eprintln!("{:?}", miette::Report::new(err));
            }
        }
    }

    if attempted > 0 && failed == attempted {
        return Err(CliError::AllReportsFailed { count: failed });
    }
    Ok(())
}
