use clap::Parser;
use gridwalk::core::config::{self, CliOverrides, InputMode};
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "gridwalk", about = "Walk a marker around a grid with W/A/S/D")]
struct Args {
    /// Grid side length (at least 1)
    #[arg(short, long)]
    size: Option<usize>,

    /// Read one command per line instead of single raw keys
    #[arg(long)]
    line_input: bool,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Config file to use instead of ~/.gridwalk/config.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let (file_config, source) = match config::load_config(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("gridwalk: {e}");
            return ExitCode::FAILURE;
        }
    };
    let overrides = CliOverrides {
        size: args.size,
        input_mode: args.line_input.then_some(InputMode::Line),
        log_file: args.log_file,
    };
    let resolved = match config::resolve(&file_config, &overrides) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("gridwalk: {e}");
            return ExitCode::FAILURE;
        }
    };

    // stdout is the grid, so logs go to a file
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    // Config loading ran before the logger existed
    source.log();
    log::info!("Gridwalk starting up: {:?}", resolved);

    match gridwalk::tui::run(resolved).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Gridwalk failed: {}", e);
            eprintln!("gridwalk: {e}");
            ExitCode::FAILURE
        }
    }
}
