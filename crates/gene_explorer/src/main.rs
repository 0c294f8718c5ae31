use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use gene_explorer::headless::{self, PlotArgs};
use gene_explorer::{App, LabKeyClient, Settings, init_logging};

#[derive(Parser, Debug)]
#[command(name = "gene_explorer")]
#[command(about = "Explore gene expression against immune response in a terminal")]
struct Args {
    /// Path to the data directory (default: ~/.gene_explorer/)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Request a single plot and print its image URL
    Plot(PlotArgs),
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gene_explorer")
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);

    init_logging(&data_dir, &args.log_level)?;

    let settings = Settings::load(&data_dir)
        .wrap_err_with(|| format!("failed to load settings from {}", data_dir.display()))?;

    if let Some(Command::Plot(plot_args)) = args.command {
        return headless::plot(settings, &plot_args);
    }

    let client =
        LabKeyClient::new(settings.server.clone()).wrap_err("failed to create the LabKey client")?;
    let mut app = App::new(settings, client);

    ratatui::run(|terminal| app.run(terminal))?;

    tracing::info!("Application shutting down");

    if let Err(err) = ratatui::try_restore() {
        tracing::error!("Failed to restore terminal: {err}");
    }

    Ok(())
}
