use std::io;

use clap::Parser;

use ssh_wm::app::App;
use ssh_wm::config::{Cli, Config};
use ssh_wm::drivers::{ConsoleInputDriver, ConsoleOutputDriver, OutputDriver};
use ssh_wm::manager::{ManagerOptions, SessionManager};
use ssh_wm::runner::run_app;
use ssh_wm::shortcuts::Shortcuts;
use ssh_wm::terminal::CellMetrics;
use ssh_wm::tracing_sub::{self, SubscriberMakeWriter};
use ssh_wm::transport::WsConnector;
use ssh_wm::window::Size;

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;
    run(config)
}

fn cell_metrics(config: &Config) -> CellMetrics {
    if let Some(metrics) = config.cell_metrics {
        return metrics;
    }
    crossterm::terminal::window_size()
        .ok()
        .and_then(|size| CellMetrics::from_window_size(&size))
        .unwrap_or_default()
}

fn run(config: Config) -> io::Result<()> {
    let writer = match &config.log_file {
        Some(path) => SubscriberMakeWriter::to_file(path)?,
        None => SubscriberMakeWriter::discard(),
    };
    tracing_sub::init(writer, config.log_level);

    let metrics = cell_metrics(&config);
    tracing::info!(
        endpoint = %config.endpoint,
        cell_width = metrics.width,
        cell_height = metrics.height,
        "starting"
    );

    let options = ManagerOptions {
        minimum: config.minimum_size(),
        metrics,
    };
    let connector = WsConnector::new(config.endpoint.clone());
    let manager = SessionManager::new(Box::new(connector), Size::new(0, 0), options);
    let mut app = App::new(manager, Shortcuts::default());

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let result = run_app(
        &mut output,
        ConsoleInputDriver::new(),
        &mut app,
        config.poll_interval,
    );
    app.manager_mut().close_all();
    output.exit()?;
    tracing::info!("stopped");
    result
}
