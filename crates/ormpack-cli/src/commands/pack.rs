//! Pack command implementation
//!
//! Packs the AO, roughness and metalness siblings of a `_Color` map into a
//! single ORM texture.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use ormpack_texture::{
    run_pipeline, ComposeOutcome, ComposeReport, ComposeRequest, OutputFormat, SourceReport,
    SourceStatus,
};

use super::json_output::{error_codes, JsonError, JsonSource, JsonWarning, PackOutput, PackResult};

/// Run the pack command
///
/// # Arguments
/// * `input` - Path to the material's `_Color` map
/// * `format` - Output format token (`jpg` or `png`)
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(input: &Path, format: &str, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(input, format)
    } else {
        run_human(input, format)
    }
}

/// Run pack with human-readable (colored) output
fn run_human(input: &Path, format: &str) -> Result<ExitCode> {
    let format: OutputFormat = format.parse()?;

    println!("{} {}", "Packing ORM texture for".cyan().bold(), input.display());

    let outcome = run_pipeline(&ComposeRequest::new(input, format));
    print_sources(&outcome.sources);

    for warning in &outcome.warnings {
        println!("{} {}", "warning:".yellow().bold(), warning);
    }

    let report = outcome.result?;
    print_report(&report);

    Ok(ExitCode::SUCCESS)
}

/// Run pack with machine-readable JSON output
fn run_json(input: &Path, format: &str) -> Result<ExitCode> {
    let format: OutputFormat = match format.parse() {
        Ok(f) => f,
        Err(e) => {
            let error = JsonError::new(error_codes::UNSUPPORTED_FORMAT, e.to_string())
                .with_suggestion("Use 'png' or 'jpg'");
            let output = PackOutput::failure(vec![error], Vec::new(), Vec::new());
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(ExitCode::from(1));
        }
    };

    let ComposeOutcome {
        sources,
        warnings,
        result,
    } = run_pipeline(&ComposeRequest::new(input, format));

    let sources: Vec<JsonSource> = sources.iter().map(JsonSource::from).collect();
    let warnings: Vec<JsonWarning> = warnings.iter().map(JsonWarning::from).collect();

    let (output, code) = match result {
        Ok(report) => (
            PackOutput::success(pack_result(&report), sources, warnings),
            ExitCode::SUCCESS,
        ),
        Err(e) => (
            PackOutput::failure(JsonError::from_compose_error(&e), sources, warnings),
            ExitCode::from(1),
        ),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(code)
}

fn pack_result(report: &ComposeReport) -> PackResult {
    PackResult {
        output_path: report.output_path.display().to_string(),
        format: report.format.to_string(),
        width: report.width,
        height: report.height,
        channels: report.channels,
        file_size: report.file_size,
        hash: report.hash.clone(),
    }
}

fn print_sources(sources: &[SourceReport]) {
    println!("{}", "Sources:".bold());
    for source in sources {
        let label = format!("{:>9}", source.role.as_str());
        match &source.status {
            SourceStatus::Loaded {
                width,
                height,
                channels,
            } => println!(
                "  {} {} {} ({}x{}, {} ch)",
                "ok".green(),
                label.dimmed(),
                source.path.display(),
                width,
                height,
                channels
            ),
            SourceStatus::Missing => println!(
                "  {} {} {} (missing, channel left at zero)",
                "--".dimmed(),
                label.dimmed(),
                source.path.display()
            ),
            SourceStatus::DecodeFailed { .. } => println!(
                "  {} {} {} (unreadable, channel left at zero)",
                "!!".yellow(),
                label.dimmed(),
                source.path.display()
            ),
        }
    }
}

fn print_report(report: &ComposeReport) {
    println!(
        "{} wrote {}x{} ORM file with size: {} to: {}",
        "ok".green().bold(),
        report.width,
        report.height,
        format_size(report.file_size),
        report.output_path.display()
    );
    println!("  {} {}", "BLAKE3:".dimmed(), &report.hash[..16]);
}

/// Format a byte count for display.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let b = bytes as f64;
    if b >= MB {
        format!("{:.2} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024 + 512 * 1024), "3.50 MB");
    }

    #[test]
    fn test_bad_format_is_error_in_human_mode() {
        let err = run(Path::new("Mat_Color.png"), "tga", false).unwrap_err();
        assert!(err.to_string().contains("jpg or png"));
    }
}
