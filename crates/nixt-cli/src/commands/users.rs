use anyhow::Result;
use comfy_table::{Cell, Table};
use nixt_core::AppCore;
use nixt_core::api::{ManagedUser, UserQuery};

use super::utils::{format_optional, provider_filter};
use crate::cli::UserCommands;
use crate::output::{OutputFormat, json::print_json, table::print_table};

pub async fn run(core: &AppCore, command: UserCommands, format: OutputFormat) -> Result<()> {
    match command {
        UserCommands::List {
            limit,
            offset,
            search,
            provider,
        } => {
            let query = UserQuery {
                limit: Some(limit),
                offset: Some(offset),
                search,
                auth_provider: provider_filter(provider),
            };
            let page = core.api.list_users(&query).await?;
            if format.is_json() {
                return print_json(&page);
            }
            if page.data.is_empty() {
                println!("No users found.");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec!["ID", "Email", "Name", "Provider", "Verified", "Created"]);
            for user in &page.data {
                table.add_row(vec![
                    Cell::new(&user.id),
                    Cell::new(&user.email),
                    Cell::new(user.label()),
                    Cell::new(user.auth_provider.to_string()),
                    Cell::new(verified(user)),
                    Cell::new(format_optional(user.created_at.as_deref())),
                ]);
            }
            print_table(table)?;
            println!("Showing {} of {}", page.data.len(), page.count);
            if page.has_more() {
                println!("More available: --offset {}", page.next_offset);
            }
            Ok(())
        }
        UserCommands::Show { id } => {
            let user = core.api.get_user(&id).await?;
            if format.is_json() {
                return print_json(&user);
            }
            println!("ID:         {}", user.id);
            println!("Email:      {}", user.email);
            println!("Name:       {}", user.label());
            println!("Provider:   {}", user.auth_provider);
            println!("Verified:   {}", verified(&user));
            println!("Created:    {}", format_optional(user.created_at.as_deref()));
            println!("Updated:    {}", format_optional(user.updated_at.as_deref()));
            Ok(())
        }
    }
}

fn verified(user: &ManagedUser) -> &'static str {
    match user.email_verified {
        Some(true) => "yes",
        Some(false) => "no",
        None => "-",
    }
}
