//! staffbook CLI
//!
//! Thin request front end over `staffbook_core`: parses a command, dispatches
//! it to the employee API and prints the JSON response envelope.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;
use staffbook_core::{
    init_logging_from_config, ApiResponse, ApiStatus, Employee, EmployeeApi,
    SqliteConnectionProvider, StoreConfig,
};

#[derive(Parser)]
#[command(name = "staffbook")]
#[command(version, about = "Manage employees, departments, companies and passports", long_about = None)]
struct Cli {
    /// TOML config file ([database] / [logging] sections)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database file; overrides config and STAFFBOOK_DB_PATH
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List employees of a company
    ByCompany { company_id: i64 },

    /// List employees of a department
    ByDepartment { department_id: i64 },

    /// Create an employee from a JSON document (inline department, company, passports)
    Create {
        /// Employee JSON
        json: String,
    },

    /// Partially update an employee; the JSON must carry `id`
    Update {
        /// Employee JSON, or `null`
        json: String,
    },

    /// Delete an employee and its passports
    Delete { id: i64 },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::from(2);
        }
    };
    if let Err(message) = init_logging_from_config(&config.logging) {
        eprintln!("warning: logging disabled: {message}");
    }

    let provider = SqliteConnectionProvider::from_config(&config);
    info!(
        "event=cli_start module=cli status=ok db_path={}",
        provider.path().display()
    );
    let api = EmployeeApi::new(provider);

    let status = match cli.command {
        Commands::ByCompany { company_id } => print(api.get_employees_by_company_id(company_id)),
        Commands::ByDepartment { department_id } => {
            print(api.get_employees_by_department_id(department_id))
        }
        Commands::Create { json } => match parse_employee(&json) {
            Ok(Some(employee)) => print(api.create_new_employee(&employee)),
            Ok(None) => print(client_fault::<()>("no employee supplied")),
            Err(response) => print(response),
        },
        Commands::Update { json } => match parse_employee(&json) {
            Ok(employee) => print(api.update_employee(employee.as_ref())),
            Err(response) => print(response),
        },
        Commands::Delete { id } => print(api.delete_employee(id)),
    };

    if status.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn load_config(cli: &Cli) -> Result<StoreConfig, String> {
    let config = match &cli.config {
        Some(path) => StoreConfig::load(path).map_err(|err| err.to_string())?,
        None => StoreConfig::default(),
    };
    let mut config = config.with_env_overrides().map_err(|err| err.to_string())?;
    if let Some(db) = &cli.db {
        config.database.path = db.clone();
    }
    Ok(config)
}

/// Parses request JSON; `null` means no employee was supplied.
fn parse_employee(json: &str) -> Result<Option<Employee>, ApiResponse<()>> {
    serde_json::from_str(json).map_err(|err| client_fault(format!("malformed employee: {err}")))
}

fn client_fault<T>(message: impl Into<String>) -> ApiResponse<T> {
    ApiResponse {
        status: ApiStatus::ClientFault,
        body: None,
        message: Some(message.into()),
    }
}

fn print<T: Serialize>(response: ApiResponse<T>) -> ApiStatus {
    match serde_json::to_string_pretty(&response) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("error: failed to render response: {err}"),
    }
    response.status
}
