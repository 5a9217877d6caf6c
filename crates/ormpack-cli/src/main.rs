//! ormpack CLI - packs AO, roughness and metalness maps into one ORM texture
//!
//! ```text
//! ormpack textures/Metal007_2K_Color.jpg png
//! ```
//!
//! reads `Metal007_2K_AmbientOcclusion.jpg`, `Metal007_2K_Roughness.jpg` and
//! `Metal007_2K_Metalness.jpg` from the same folder and writes
//! `Metal007_2K_ORM.png`.

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use ormpack_cli::commands;

/// Pack ambient occlusion, roughness and metalness maps into a single ORM texture
#[derive(Parser)]
#[command(name = "ormpack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the material's `_Color` map (e.g. textures/Metal007_Color.jpg)
    input: PathBuf,

    /// Output format of the ORM texture: jpg or png
    format: String,

    /// Output machine-readable JSON (no colored output)
    #[arg(long)]
    json: bool,

    /// Show debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn default_log_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

fn init_logging(verbose: bool) {
    let env = env_logger::Env::default().default_filter_or(default_log_filter(verbose));
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version requests are not failures.
            let code = if e.use_stderr() { 1 } else { 0 };
            print!("{}", e.render());
            return ExitCode::from(code);
        }
    };

    init_logging(cli.verbose);
    log::debug!("input={} format={} json={}", cli.input.display(), cli.format, cli.json);

    let result = commands::pack::run(&cli.input, &cli.format, cli.json);

    match result {
        Ok(code) => code,
        Err(e) => {
            println!("{}: {}", "error".red(), e);
            ExitCode::from(1)
        }
    }
}
