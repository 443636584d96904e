use clap::Parser;
use mcport::commands;
use mcport::{Cli, RunSettings, init_logging};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let mut settings = RunSettings::load(cli.config.as_deref())?;
    cli.apply(&mut settings);
    settings.validate()?;

    init_logging(&settings.output.dir, &cli.log_level)?;
    tracing::info!(command = ?cli.command, "mcport starting");

    commands::run(&cli.command, &settings)?;

    tracing::info!("mcport finished");
    Ok(())
}
