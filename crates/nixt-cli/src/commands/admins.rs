use anyhow::Result;
use colored::Colorize;
use comfy_table::Cell;
use nixt_core::AppCore;
use nixt_core::api::is_known_permission;

use super::utils::format_optional;
use crate::cli::AdminCommands;
use crate::output::{
    OutputFormat,
    json::print_json,
    table::{print_table, table_or_empty},
};

pub async fn run(core: &AppCore, command: AdminCommands, format: OutputFormat) -> Result<()> {
    match command {
        AdminCommands::List => {
            let admins = core.api.list_project_admins_with_users().await?;
            if format.is_json() {
                return print_json(&admins);
            }
            let Some(mut table) = table_or_empty(
                vec!["ID", "User", "Email", "Permissions", "Since"],
                admins.len(),
                "No project admins.",
            ) else {
                return Ok(());
            };
            for admin in &admins {
                let (label, email) = match &admin.user {
                    Some(user) => (user.label(), user.email.clone()),
                    None => (admin.user_id.clone(), "-".to_string()),
                };
                let permissions = if admin.permissions.is_empty() {
                    "-".to_string()
                } else {
                    admin.permissions.join(", ")
                };
                table.add_row(vec![
                    Cell::new(&admin.id),
                    Cell::new(label),
                    Cell::new(email),
                    Cell::new(permissions),
                    Cell::new(format_optional(admin.created_at.as_deref())),
                ]);
            }
            print_table(table)
        }
        AdminCommands::Add {
            user_id,
            permissions,
        } => {
            warn_unknown(&permissions);
            let response = core.api.create_project_admin(&user_id, &permissions).await?;
            if format.is_json() {
                return print_json(&response);
            }
            println!("User {} is now a project admin", user_id);
            Ok(())
        }
        AdminCommands::Permissions {
            admin_id,
            permissions,
        } => {
            warn_unknown(&permissions);
            let response = core
                .api
                .update_admin_permissions(&admin_id, &permissions)
                .await?;
            if format.is_json() {
                return print_json(&response);
            }
            if permissions.is_empty() {
                println!("Cleared permissions for admin {}", admin_id);
            } else {
                println!(
                    "Admin {} permissions: {}",
                    admin_id,
                    permissions.join(", ")
                );
            }
            Ok(())
        }
        AdminCommands::Remove { admin_id } => {
            let response = core.api.delete_project_admin(&admin_id).await?;
            if format.is_json() {
                return print_json(&response);
            }
            println!("Removed project admin {}", admin_id);
            Ok(())
        }
    }
}

/// Unknown keys are still sent; the server decides what they mean.
fn warn_unknown(permissions: &[String]) {
    for key in permissions.iter().filter(|key| !is_known_permission(key)) {
        eprintln!("{} unknown permission '{}'", "Warning:".yellow().bold(), key);
    }
}
