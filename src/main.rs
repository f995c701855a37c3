use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pyassist::Provider;
use pyassist::core::config::{self, CliOverrides};
use pyassist::core::history::HistoryStore;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "pyassist", about = "Ask a local LLM your Python questions")]
struct Args {
    /// LLM provider to use (overrides config file)
    #[arg(short, long, value_enum)]
    provider: Option<Provider>,

    /// Model name (overrides config file)
    #[arg(short, long)]
    model: Option<String>,

    /// Path of the question/answer history file
    #[arg(long)]
    history_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // File logger: the terminal belongs to the UI
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("pyassist.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("pyassist: {e}");
            return ExitCode::FAILURE;
        }
    };
    let cli = CliOverrides {
        provider: args.provider,
        model: args.model,
        history_file: args.history_file,
    };
    let resolved = config::resolve(&file_config, &cli);

    log::info!(
        "pyassist starting up with provider {:?}, model {}",
        resolved.provider,
        resolved.model_name
    );

    let store = HistoryStore::new(resolved.history_file.clone());
    let history = match store.load() {
        Ok(history) => history,
        Err(e) => {
            // Leave the file alone so nothing the user saved is lost
            log::error!("Cannot load history {}: {}", store.path().display(), e);
            eprintln!(
                "pyassist: cannot load history file {}: {e}",
                store.path().display()
            );
            return ExitCode::FAILURE;
        }
    };

    match pyassist::tui::run(resolved, store, history) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Fatal: {}", e);
            eprintln!("pyassist: {e}");
            ExitCode::FAILURE
        }
    }
}
