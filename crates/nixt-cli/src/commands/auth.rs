use anyhow::{Context, Result, bail};
use nixt_core::AppCore;
use nixt_core::auth::{AuthError, AuthResponse, AuthUser, RegisterData};
use nixt_storage::keys;
use serde_json::json;

use super::utils::{format_optional, yes_no};
use crate::cli::AuthCommands;
use crate::output::{OutputFormat, json::print_json};

pub async fn run(core: &AppCore, command: AuthCommands, format: OutputFormat) -> Result<()> {
    match command {
        AuthCommands::Login { email, password } => {
            let password = resolve_password(password)?;
            let result = core.auth.login(&email, &password).await;
            report_sign_in(result, format)
        }
        AuthCommands::Register {
            email,
            password,
            first_name,
            last_name,
            display_name,
        } => {
            let data = RegisterData {
                email,
                password: resolve_password(password)?,
                first_name,
                last_name,
                display_name,
            };
            let result = core.auth.register(&data).await;
            report_sign_in(result, format)
        }
        AuthCommands::Google { credential } => {
            let result = core.auth.login_with_google(&credential).await;
            report_sign_in(result, format)
        }
        AuthCommands::Logout => {
            core.auth.logout()?;
            if format.is_json() {
                return print_json(&json!({ "success": true }));
            }
            println!("Signed out");
            Ok(())
        }
        AuthCommands::Whoami => {
            core.auth.initialize().await?;
            whoami(core, format)
        }
        AuthCommands::Refresh => {
            if core.store.get(keys::ACCESS_TOKEN)?.is_none() {
                bail!("Not signed in");
            }
            // Loading the stored token fetches the identity, refreshing it on 401.
            let refreshed = core.auth.initialize().await?;
            if format.is_json() {
                return print_json(&json!({ "refreshed": refreshed, "user": core.auth.user() }));
            }
            if refreshed {
                println!("Identity refreshed");
                whoami(core, format)
            } else if core.auth.token().is_none() {
                bail!("Session expired; not signed in")
            } else {
                bail!("Could not refresh the identity; cached state kept")
            }
        }
    }
}

fn resolve_password(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => rpassword::prompt_password("Password: ").context("Failed to read password"),
    }
}

fn report_sign_in(result: Result<AuthUser, AuthError>, format: OutputFormat) -> Result<()> {
    if format.is_json() {
        print_json(&AuthResponse::from_result(&result))?;
        return result.map(|_| ()).map_err(Into::into);
    }

    let user = result?;
    println!("Signed in as {} ({})", user.user.email, user.role);
    Ok(())
}

fn whoami(core: &AppCore, format: OutputFormat) -> Result<()> {
    let Some(user) = core.auth.user() else {
        if format.is_json() {
            return print_json(&serde_json::Value::Null);
        }
        bail!("Not signed in");
    };

    if format.is_json() {
        return print_json(&user);
    }

    println!("ID:             {}", user.user.id);
    println!("Email:          {}", user.user.email);
    println!("Name:           {}", user.user.label());
    println!("Provider:       {}", user.user.auth_provider);
    println!("Role:           {}", user.role);
    println!("Admin:          {}", yes_no(core.auth.is_admin()));
    println!(
        "Permissions:    {}",
        if user.is_owner() {
            "all".to_string()
        } else if user.permissions.is_empty() {
            "-".to_string()
        } else {
            user.permissions.join(", ")
        }
    );
    println!(
        "Subscription:   {}",
        yes_no(core.auth.has_active_subscription())
    );
    for sub in core.auth.subscriptions() {
        println!(
            "  {} [{}] until {}{}",
            format_optional(sub.plan_name.as_deref()),
            format_optional(sub.status.as_deref()),
            format_optional(sub.current_period_end.as_deref()),
            if sub.cancel_at_period_end {
                " (cancels at period end)"
            } else {
                ""
            }
        );
    }
    Ok(())
}
