//! # Drawline CLI
//!
//! Process boundary for the die schedule engine.
//!
//! - `draw_cli calc '<json>'` computes one request and prints `{"result": ...}`
//! - `draw_cli serve` (the default) reads one JSON request per stdin line and
//!   writes one JSON response per stdout line until stdin closes
//!
//! Failed requests can be appended to an error log with `--error-log`.

mod logging;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use draw_core::protocol::{self, Response};
use draw_core::{load_stock_table, DrawResult, ErrorLog, StockDieTable};

#[derive(Parser)]
#[command(name = "draw_cli")]
#[command(about = "Drawline - wire-drawing die schedule calculator", long_about = None)]
struct Cli {
    /// Stock die table (JSON); defaults to the built-in table
    #[arg(long, env = "DRAW_STOCK_TABLE", global = true)]
    stock_table: Option<PathBuf>,

    /// Append failed requests to this file
    #[arg(long, env = "DRAW_ERROR_LOG", global = true)]
    error_log: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a single request given as a JSON argument
    Calc {
        /// Drawing request as JSON
        request: String,
    },
    /// Answer JSON requests line by line on stdin/stdout
    Serve,
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    let table = match load_table(cli.stock_table.as_deref()) {
        Ok(table) => table,
        Err(e) => {
            tracing::error!("{}", e);
            println!(
                "{}",
                serde_json::json!({ "error": e.to_string(), "code": e.error_code() })
            );
            return ExitCode::FAILURE;
        }
    };
    let error_log = cli.error_log.map(ErrorLog::new);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Calc { request } => {
            let response = protocol::handle_one_shot(&request, &table);
            println!("{}", response.body);
            record(error_log.as_ref(), &response);
            if response.is_error() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Commands::Serve => match serve(&table, error_log.as_ref()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!("request loop stopped: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn load_table(path: Option<&std::path::Path>) -> DrawResult<StockDieTable> {
    match path {
        Some(path) => load_stock_table(path),
        None => StockDieTable::embedded(),
    }
}

fn serve(table: &StockDieTable, error_log: Option<&ErrorLog>) -> io::Result<()> {
    tracing::info!(rows = table.len(), "serving requests on stdin");
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;
        let Some(response) = protocol::handle_line(&line, table) else {
            continue;
        };
        writeln!(stdout, "{}", response.body)?;
        stdout.flush()?;
        record(error_log, &response);
    }
    tracing::info!("stdin closed, exiting");
    Ok(())
}

fn record(error_log: Option<&ErrorLog>, response: &Response) {
    let (Some(log), Some(err)) = (error_log, &response.error) else {
        return;
    };
    if let Err(e) = log.append(err) {
        tracing::warn!(path = %log.path().display(), "could not write error log: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_is_default() {
        let cli = Cli::try_parse_from(["draw_cli"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.stock_table.is_none());
    }

    #[test]
    fn test_calc_with_global_flags() {
        let cli = Cli::try_parse_from(["draw_cli", "calc", "{}", "--stock-table", "dies.json"]).unwrap();
        assert_eq!(cli.stock_table, Some(PathBuf::from("dies.json")));
        assert!(matches!(cli.command, Some(Commands::Calc { ref request }) if request == "{}"));
    }

    #[test]
    fn test_builtin_table_loads() {
        assert!(!load_table(None).unwrap().is_empty());
    }
}
