use anyhow::{Context, Result};
use nixt_core::AppCore;
use nixt_core::dashboard::{SharedControllerData, SharedDataUpdate};
use serde_json::Value;
use std::path::{Path, PathBuf};

use super::utils::format_datetime;
use crate::cli::SharedCommands;
use crate::output::{OutputFormat, json::print_json};

pub async fn run(core: &AppCore, command: SharedCommands, format: OutputFormat) -> Result<()> {
    match command {
        SharedCommands::Show => {
            let data = core.sessions.shared_data();
            if format.is_json() {
                return print_json(&data);
            }
            print_summary(&data);
            Ok(())
        }
        SharedCommands::Update {
            clients,
            projects,
            transactions,
            activities,
            users,
        } => {
            let update = SharedDataUpdate {
                clients: read_list(clients)?,
                projects: read_list(projects)?,
                transactions: read_list(transactions)?,
                activities: read_list(activities)?,
                users: read_list(users)?,
            };
            let data = core.sessions.update_shared_data(update)?;
            if format.is_json() {
                return print_json(&data);
            }
            println!("Shared controller data updated");
            print_summary(&data);
            Ok(())
        }
    }
}

fn read_list(path: Option<PathBuf>) -> Result<Option<Vec<Value>>> {
    path.map(|p| read_json_array(&p)).transpose()
}

fn read_json_array(path: &Path) -> Result<Vec<Value>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} does not contain a JSON array", path.display()))
}

fn print_summary(data: &SharedControllerData) {
    println!("Clients:       {}", data.clients.len());
    println!("Projects:      {}", data.projects.len());
    println!("Transactions:  {}", data.transactions.len());
    println!("Activities:    {}", data.activities.len());
    println!("Users:         {}", data.users.len());
    println!(
        "Last updated:  {}",
        data.last_updated
            .as_ref()
            .map(format_datetime)
            .unwrap_or_else(|| "never".to_string())
    );
}
