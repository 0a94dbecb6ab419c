use anyhow::Context;
use clap::Parser;
use course_events::app::{handle_fatal_error, init_logging, AppConfig};
use course_events::cli::{run_report, Cli};
use course_events::config::ConfigLoader;
use course_events::error::ExitCode;
use tracing::debug;

fn main() {
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        // --help and --version come through here too
        let code = if e.use_stderr() {
            ExitCode::USAGE
        } else {
            ExitCode::SUCCESS
        };
        let _ = e.print();
        std::process::exit(code)
    });

    if let Err(e) = run(&cli) {
        handle_fatal_error(e, cli.verbose);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    // Logging is not up yet, so config errors reach the user via handle_fatal_error
    let config = ConfigLoader::load(cli.config.as_deref(), cli.to_overrides())
        .context("Failed to load configuration")?;

    let app_config = AppConfig::new(cli.verbose).with_log_level(config.log_level.clone());
    init_logging(&app_config);

    let run_config = config.resolve()?;
    debug!("Resolved configuration: {:?}", run_config);

    let summary = run_report(&run_config)?;
    if let Some(text) = summary.render(run_config.summary)? {
        print!("{text}");
        if !text.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}
