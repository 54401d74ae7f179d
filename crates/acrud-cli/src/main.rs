use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use acrud_core::{Error as CoreError, Row};
use acrud_db::Instance;

#[derive(Debug, Error)]
enum CliError {
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("invalid JSON payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("payload must be a JSON object")]
    NotAnObject,
    #[error("table '{0}' doesn't exist")]
    UnknownTable(String),
}

#[derive(Parser, Debug)]
#[command(name = "acrud", version, about = "Generic CRUD layer over MySQL and SQLite")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ConnArgs {
    /// Database connection string (e.g. mysql://user@host/db, sqlite://app.db).
    #[arg(long, value_name = "CONNECTION_STRING")]
    conn: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List tables in the target database.
    Tables {
        #[command(flatten)]
        conn: ConnArgs,
    },
    /// Print the normalized schema as JSON.
    Schema {
        #[command(flatten)]
        conn: ConnArgs,
        /// Restrict output to one table.
        #[arg(long)]
        table: Option<String>,
    },
    /// Validate a JSON row against a table; exits 1 when invalid.
    Validate {
        #[command(flatten)]
        conn: ConnArgs,
        #[arg(long)]
        table: String,
        /// Row data as a JSON object.
        #[arg(long, value_name = "JSON")]
        data: String,
    },
    /// Insert or update a JSON row, deciding by the primary-key value.
    Save {
        #[command(flatten)]
        conn: ConnArgs,
        #[arg(long)]
        table: String,
        /// Row data as a JSON object.
        #[arg(long, value_name = "JSON")]
        data: String,
    },
}

fn parse_row(data: &str) -> Result<Row, CliError> {
    let value: serde_json::Value = serde_json::from_str(data)?;
    value.as_object().cloned().ok_or(CliError::NotAnObject)
}

async fn run(cli: Cli) -> Result<i32, CliError> {
    match cli.command {
        Command::Tables { conn } => {
            let instance = Instance::connect(&conn.conn).await?;
            for table in instance.tables().await? {
                println!("{table}");
            }
            Ok(0)
        }
        Command::Schema { conn, table } => {
            let instance = Instance::connect(&conn.conn).await?;
            let schema = instance.schema().await?;
            match table {
                Some(name) => {
                    let table_schema = schema
                        .table(&name)
                        .ok_or_else(|| CliError::UnknownTable(name.clone()))?;
                    println!("{}", serde_json::to_string_pretty(table_schema)?);
                }
                None => println!("{}", serde_json::to_string_pretty(schema)?),
            }
            Ok(0)
        }
        Command::Validate { conn, table, data } => {
            let row = parse_row(&data)?;
            let instance = Instance::connect(&conn.conn).await?;
            let result = instance.validate(&table, &row).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(if result.is_empty() { 0 } else { 1 })
        }
        Command::Save { conn, table, data } => {
            let row = parse_row(&data)?;
            let instance = Instance::connect(&conn.conn).await?;
            let outcome = instance.save(&table, &row).await?;
            debug!(table = %table, ?outcome, "row saved");
            println!("{}", serde_json::to_string(&outcome)?);
            Ok(0)
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_object_payloads() {
        assert!(parse_row("{\"total\": 5}").is_ok());
        assert!(matches!(parse_row("[1,2]"), Err(CliError::NotAnObject)));
        assert!(matches!(parse_row("not json"), Err(CliError::Payload(_))));
    }
}
