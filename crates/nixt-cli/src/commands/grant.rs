use anyhow::Result;
use comfy_table::Cell;
use nixt_core::AppCore;
use nixt_core::dashboard::{AllowedUser, AllowedUserUpdate, NewAllowedUser};
use serde_json::json;

use super::utils::{format_datetime, format_sections, yes_no};
use crate::cli::{GrantCommands, GrantUpdateArgs};
use crate::output::{OutputFormat, json::print_json, table::{print_table, table_or_empty}};

pub async fn run(core: &AppCore, command: GrantCommands, format: OutputFormat) -> Result<()> {
    match command {
        GrantCommands::Add {
            email,
            name,
            role,
            sections,
            added_by,
            inactive,
        } => {
            let mut grant = NewAllowedUser::new(email, name, role.into())
                .with_added_by(added_by)
                .with_sections(sections);
            if inactive {
                grant = grant.inactive();
            }
            let grant = core.sessions.add_allowed_user(grant)?;

            if format.is_json() {
                return print_json(&grant);
            }
            println!("Granted {} access to {}", grant.role, grant.email);
            Ok(())
        }
        GrantCommands::Remove { email, role } => {
            let had_session = core.sessions.is_logged_in();
            let removed = core
                .sessions
                .remove_allowed_user(&email, role.map(Into::into))?;
            let session_ended = had_session && !core.sessions.is_logged_in();

            if format.is_json() {
                return print_json(&json!({
                    "removed": removed,
                    "sessionEnded": session_ended,
                }));
            }
            println!("Removed {} grant(s) for {}", removed, email);
            if session_ended {
                println!("Dashboard session for {} ended", email);
            }
            Ok(())
        }
        GrantCommands::Update(args) => update(core, args, format),
        GrantCommands::List => {
            let grants = core.sessions.allowed_users();
            if format.is_json() {
                return print_json(&grants);
            }
            print_grants(&grants, "No grants.")
        }
        GrantCommands::Roles { email } => {
            let roles = core.sessions.get_user_roles(&email);
            if format.is_json() {
                return print_json(&roles);
            }
            print_grants(&roles, &format!("No active grants for {}.", email))
        }
    }
}

fn update(core: &AppCore, args: GrantUpdateArgs, format: OutputFormat) -> Result<()> {
    let update = AllowedUserUpdate {
        email: args.new_email,
        name: args.name,
        role: args.role.map(Into::into),
        added_at: None,
        added_by: args.added_by,
        dashboard_sections: args.sections.map(|s| s.into_iter().collect()),
        is_active: args.active,
    };
    if update.is_empty() {
        anyhow::bail!("Nothing to update; pass at least one field");
    }

    let updated = core.sessions.update_allowed_user(&args.email, &update)?;
    if format.is_json() {
        return print_json(&json!({ "updated": updated }));
    }
    if updated == 0 {
        println!("No grants stored under {} (emails match exactly)", args.email);
    } else {
        println!("Updated {} grant(s) for {}", updated, args.email);
    }
    Ok(())
}

fn print_grants(grants: &[AllowedUser], empty: &str) -> Result<()> {
    let Some(mut table) = table_or_empty(
        vec!["Email", "Name", "Role", "Active", "Sections", "Added", "Added By"],
        grants.len(),
        empty,
    ) else {
        return Ok(());
    };
    for grant in grants {
        table.add_row(vec![
            Cell::new(&grant.email),
            Cell::new(&grant.name),
            Cell::new(grant.role.to_string()),
            Cell::new(yes_no(grant.is_active)),
            Cell::new(format_sections(&grant.dashboard_sections)),
            Cell::new(format_datetime(&grant.added_at)),
            Cell::new(&grant.added_by),
        ]);
    }
    print_table(table)
}
