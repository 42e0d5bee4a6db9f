//! bluetick-console binary entry point

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bluetick_console::{
    api::GraphqlClient,
    cli::{self, Cli, Commands},
    config::Config,
    console_tui::App,
    workflow::WorkflowTarget,
};

const DEFAULT_LOG_FILTER: &str = "bluetick_console=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Log to a file so output does not corrupt the terminal
fn init_file_logging(log_file: &Path) {
    let directory = log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "bluetick_console.log".into());
    let file_appender = tracing_appender::rolling::never(directory, file_name);

    tracing_subscriber::fmt()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_env_filter(env_filter())
        .init();
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(env_filter())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env()?;

    let command = cli.command.unwrap_or(Commands::Tui { route: None });
    match &command {
        Commands::Tui { .. } => init_file_logging(&config.log_file),
        _ => init_stderr_logging(),
    }

    config.validate()?;
    let catalog = Arc::new(config.catalog()?);
    let client = GraphqlClient::from_config(&config).context("Failed to build HTTP client")?;
    info!("Using backend {}", client.endpoint());

    match command {
        Commands::Tui { route } => {
            info!("Starting blue tick console");
            if let Err(e) = run_tui(&config, Arc::new(client), catalog, route).await {
                error!("Console encountered an error: {}", e);
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        command => match cli::execute(&command, &config, &client, catalog.as_ref()).await {
            Ok(output) => print!("{}", output),
            Err(e) => {
                error!("{:?} failed: {}", command, e);
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

async fn run_tui(
    config: &Config,
    client: Arc<GraphqlClient>,
    catalog: Arc<bluetick_console::i18n::Catalog>,
    route: Option<WorkflowTarget>,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, client, catalog);
    app.start(route);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
