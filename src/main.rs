mod model;
mod plugin;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use model::config::{LauncherConfig, OutputFormat};

/// Prints the JVM options contributed by installed bootstrap plugins.
#[derive(Parser)]
#[command(name = "bootopts")]
#[command(version)]
#[command(about, long_about = None)]
struct Cli {
    /// Plugins root to scan; repeat for several roots (replaces configured dirs)
    #[arg(short, long = "plugins-dir", value_name = "DIR")]
    plugins_dirs: Vec<PathBuf>,
    /// How to print the generated options
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
    /// Config file to use instead of the user config
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log to file only; stdout carries the generated options.
    let log_dir = directories::ProjectDirs::from("", "", "bootopts")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("bootopts"));
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "bootopts.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let filter =
        EnvFilter::try_from_env("BOOTOPTS_LOG").unwrap_or_else(|_| EnvFilter::new("bootopts=info"));
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_env_filter(filter)
        .init();

    tracing::info!("bootopts starting");

    let mut config = LauncherConfig::load(cli.config.as_deref())?;
    config.apply_overrides(cli.plugins_dirs, cli.format);

    let options = plugin::bootstrap_jvm_options(&config.plugins.dirs)?;
    tracing::info!("generated {} bootstrap options", options.len());

    print_options(&mut io::stdout().lock(), config.output.format, &options)?;

    Ok(())
}

/// Writes nothing at all when there are no options.
fn print_options(out: &mut impl Write, format: OutputFormat, options: &[String]) -> io::Result<()> {
    if options.is_empty() {
        return Ok(());
    }
    writeln!(out, "{}", format.render(options))?;
    out.flush()
}
