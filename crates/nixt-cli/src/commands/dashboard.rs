use anyhow::{Result, bail};
use nixt_core::AppCore;
use nixt_core::dashboard::{DashboardSession, LoginOutcome};

use super::utils::{format_datetime, format_sections};
use crate::cli::DashboardCommands;
use crate::output::{OutputFormat, json::print_json};

pub async fn run(core: &AppCore, command: DashboardCommands, format: OutputFormat) -> Result<()> {
    match command {
        DashboardCommands::Login { email, role } => {
            let outcome = match role {
                Some(role) => core.sessions.login_to_dashboard_with_role(&email, role.into())?,
                None => core.sessions.login_to_dashboard(&email)?,
            };
            if format.is_json() {
                return print_json(&outcome);
            }
            report_outcome(&email, outcome)
        }
        DashboardCommands::Logout => {
            core.sessions.logout_from_dashboard()?;
            if format.is_json() {
                return print_json(&serde_json::json!({ "success": true }));
            }
            println!("Dashboard session ended");
            Ok(())
        }
        DashboardCommands::Status => {
            let session = core.sessions.session();
            if format.is_json() {
                return print_json(&session);
            }
            match session {
                Some(session) => {
                    print_session(&session);
                    Ok(())
                }
                None => bail!("No dashboard session"),
            }
        }
    }
}

fn report_outcome(email: &str, outcome: LoginOutcome) -> Result<()> {
    let code = outcome.message();
    match outcome {
        LoginOutcome::Success(session) => {
            println!("Signed in to the dashboard");
            print_session(&session);
            Ok(())
        }
        LoginOutcome::EmailNotFound => bail!("{}: {} has no dashboard access", code, email),
        LoginOutcome::AccountDisabled => {
            bail!("{}: every grant for {} is disabled", code, email)
        }
        LoginOutcome::MultipleRoles(roles) => {
            let roles = roles
                .iter()
                .map(|g| g.role.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            bail!(
                "{}: {} holds several roles ({}), pick one with --role",
                code,
                email,
                roles
            )
        }
    }
}

fn print_session(session: &DashboardSession) {
    println!("Email:     {}", session.email);
    println!("Name:      {}", session.name);
    println!("Role:      {}", session.role);
    println!("Since:     {}", format_datetime(&session.login_at));
    println!("Sections:  {}", format_sections(&session.dashboard_sections));
}
