use anyhow::Result;
use comfy_table::Cell;
use nixt_core::AppCore;

use super::utils::format_optional;
use crate::cli::SubscriptionCommands;
use crate::output::{OutputFormat, json::print_json, table::{print_table, table_or_empty}};

pub async fn run(core: &AppCore, command: SubscriptionCommands, format: OutputFormat) -> Result<()> {
    match command {
        SubscriptionCommands::List { user_id } => {
            let subscriptions = core.api.subscriptions_for_user(&user_id).await?;
            if format.is_json() {
                return print_json(&subscriptions);
            }
            let Some(mut table) = table_or_empty(
                vec!["ID", "Plan", "Status", "Interval", "Amount", "Period End"],
                subscriptions.len(),
                &format!("No subscriptions for {}.", user_id),
            ) else {
                return Ok(());
            };
            for sub in &subscriptions {
                table.add_row(vec![
                    Cell::new(&sub.id),
                    Cell::new(&sub.plan_name),
                    Cell::new(sub.status.to_string()),
                    Cell::new(sub.billing_interval.to_string()),
                    Cell::new(sub.display_amount()),
                    Cell::new(format_optional(sub.current_period_end.as_deref())),
                ]);
            }
            print_table(table)
        }
        SubscriptionCommands::Cancel { id } => {
            let response = core.api.cancel_subscription(&id).await?;
            if format.is_json() {
                return print_json(&response);
            }
            println!("Subscription {} cancelled", id);
            Ok(())
        }
        SubscriptionCommands::CancelMine => {
            let response = core.api.cancel_my_subscription().await?;
            if format.is_json() {
                return print_json(&response);
            }
            println!("Subscription cancelled successfully");
            // Pick up the new subscription state when a session exists.
            if core.auth.initialize().await.unwrap_or(false) {
                println!(
                    "Active subscription: {}",
                    if core.auth.has_active_subscription() { "yes" } else { "no" }
                );
            }
            Ok(())
        }
    }
}
