use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tabview::context::{Theme, ViewContext};
use tabview::controller::Controller;
use tabview::demo::{self, Demo};
use tabview::domain::{Message, TVConfig, TabError};
use tabview::loader::{Dataset, load_data_file};
use tabview::model::{Model, Status};
use tabview::ui::TableUI;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Data file to show (csv, parquet, arrow). Without it a demo dataset is shown.
    path: Option<String>,

    #[arg(long, value_enum, default_value_t = Demo::Users)]
    demo: Demo,

    /// Rows per page, overrides the dataset default
    #[arg(long)]
    page_size: Option<usize>,

    #[arg(long, default_value_t = 250)]
    debounce_ms: u64,

    /// Fields the search box matches against
    #[arg(long, value_delimiter = ',')]
    search_fields: Option<Vec<String>>,

    #[arg(long)]
    placeholder: Option<String>,

    #[arg(long, value_enum, default_value_t = Theme::Dark)]
    theme: Theme,

    #[arg(long, default_value_t = 32)]
    max_column_width: usize,

    /// Event poll timeout in milliseconds
    #[arg(long, default_value_t = 100)]
    event_poll_time: u64,

    #[arg(long, default_value = "tabview.log")]
    log_file: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(&cli.log_file) {
        eprintln!("Error: failed to open log file {}: {e}", cli.log_file);
        return ExitCode::FAILURE;
    }

    let result = run(cli);
    ratatui::restore();
    match result {
        Err(e) => {
            error!("{e:?}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn setup_logging(log_file: &str) -> Result<(), TabError> {
    let path = PathBuf::from(shellexpand::tilde(log_file).as_ref());
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_env("TABVIEW_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(file).with_ansi(false))
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

fn load(cli: &Cli) -> Result<Dataset, TabError> {
    let mut dataset = match &cli.path {
        Some(p) => {
            let expanded = shellexpand::full(p).map_err(|e| TabError::LoadingFailed(e.to_string()))?;
            load_data_file(PathBuf::from(expanded.as_ref()))?
        }
        None => demo::dataset(cli.demo),
    };
    if cli.page_size.is_some() {
        dataset.page_size = cli.page_size;
    }
    Ok(dataset)
}

fn run(cli: Cli) -> Result<(), TabError> {
    info!("Starting tabview {}", env!("CARGO_PKG_VERSION"));

    let dataset = load(&cli)?;
    let cfg = TVConfig::default()
        .with_event_poll_time(cli.event_poll_time)
        .with_max_column_width(cli.max_column_width)
        .with_debounce_ms(cli.debounce_ms)
        .with_search_fields(cli.search_fields.clone())
        .with_placeholder(cli.placeholder.clone());
    let ctx = ViewContext::new("tabview", cli.theme, cfg.max_column_width);

    let mut model = Model::init(&cfg, dataset)?;
    let ui = TableUI::new(&ctx);
    let controller = Controller::new(&cfg);

    let mut terminal = ratatui::init();
    let size = terminal.size()?;
    model.update(Some(Message::Resize(size.width as usize, size.height as usize)))?;

    while model.status != Status::QUITTING {
        // Render the current view
        terminal.draw(|f| ui.draw(&model, f))?;

        // Pending searches are applied on every pass, key or not
        let message = controller.handle_event(&model)?;
        model.update(message)?;
    }

    info!("Bye");
    Ok(())
}
