//! Output formatting for CLI responses

use anyhow::Error;
use cadence_timer::countdown::CountdownStatus;
use cadence_timer::perf::PerformanceReport;
use colored::Colorize;
use serde_json::json;
use std::io::{self, Write};
use std::time::Duration;

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": { "message": error.to_string() }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format error as JSON: {e}"),
    }
}

/// Overwrite the current terminal line with a countdown status.
pub fn print_countdown(out: &mut impl Write, status: CountdownStatus) -> io::Result<()> {
    let text = match status {
        CountdownStatus::Counting(_) => status.to_string().bold(),
        CountdownStatus::Finished => status.to_string().green().bold(),
        CountdownStatus::Overdue(_) => status.to_string().red().bold(),
    };
    // Trailing spaces clear leftovers of a longer previous status.
    write!(out, "\r{text}    ")?;
    out.flush()
}

/// Print a performance report.
pub fn print_performance(report: &PerformanceReport, requested: Duration, json: bool) -> anyhow::Result<()> {
    if json {
        let output = json!({
            "success": true,
            "requested_s": requested.as_secs_f64(),
            "loops": report.loops,
            "mean_s": report.mean.as_secs_f64(),
            "std_dev_s": report.std_dev.as_secs_f64(),
            "mean_error_s": report.mean_error_secs(requested),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", "Loop Performance".bold());
        println!("  Requested period: {:.6}s", requested.as_secs_f64());
        println!("  Loops:            {}", report.loops);
        println!("  Mean period:      {:.6}s", report.mean.as_secs_f64());
        println!("  Std deviation:    {:.6}s", report.std_dev.as_secs_f64());

        let error_ms = report.mean_error_secs(requested) * 1000.0;
        let error = format!("{error_ms:+.3}ms");
        let tolerance_ms = requested.as_secs_f64() * 10.0;
        if error_ms.abs() <= tolerance_ms {
            println!("  Mean error:       {}", error.green());
        } else {
            println!("  Mean error:       {}", error.yellow());
        }
    }
    Ok(())
}
