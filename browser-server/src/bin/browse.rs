//! Terminal client: prints the table list, or one table's sample with `--table`

use clap::Parser;
use schema_browser::{render_view, BrowserController, HttpTableSource, TableName};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "schema-browse", about = "Browse the tables of a running schema browser server")]
struct Arguments {
    /// Server URL including any mount path
    #[arg(long, env = "BROWSER_URL", default_value = "http://127.0.0.1:3000")]
    url: String,

    /// Table to show
    #[arg(long, short)]
    table: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let arguments = Arguments::parse();

    let source = match HttpTableSource::new(&arguments.url) {
        Ok(source) => source,
        Err(failure) => {
            eprintln!("{}", failure);
            return ExitCode::FAILURE;
        }
    };

    let controller = BrowserController::new(source);
    controller.load_tables().await;
    if let Some(table) = arguments.table {
        controller.select_table(TableName::new(table)).await;
    }

    let state = controller.state().await;
    print!("{}", render_view(&state));

    if state.error().is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
