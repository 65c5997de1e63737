use colored::Colorize;

pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), err);

    let msg = format!("{:#}", err).to_lowercase();

    if msg.contains("not signed in") || msg.contains("status: 401") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Sign in with:");
        eprintln!("  {} nixt auth login <email>", "$".dimmed());
    }

    if msg.contains("no dashboard session") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Open a session with:");
        eprintln!("  {} nixt dashboard login <email>", "$".dimmed());
    }

    if msg.contains("server connection error") || msg.contains("error connecting to server") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Check that the API is reachable, or point at another one with");
        eprintln!("  --api-url or the NIXT_API_URL environment variable.");
    }

    std::process::exit(1);
}
