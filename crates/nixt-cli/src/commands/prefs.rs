use anyhow::{Result, bail};
use nixt_core::AppCore;
use nixt_core::preferences::THEMES;
use serde_json::json;

use crate::cli::PrefsCommands;
use crate::output::{OutputFormat, json::print_json};

pub async fn run(core: &AppCore, command: PrefsCommands, format: OutputFormat) -> Result<()> {
    let prefs = &core.preferences;
    match command {
        PrefsCommands::Language { language } => {
            if let Some(language) = language {
                prefs.set_language(language.into())?;
            }
            let language = prefs.language()?;
            if format.is_json() {
                return print_json(&json!({
                    "language": language,
                    "direction": language.direction(),
                }));
            }
            println!("Language:   {}", language);
            println!("Direction:  {}", language.direction());
            Ok(())
        }
        PrefsCommands::Theme { index, next } => {
            if next {
                prefs.next_theme()?;
            } else if let Some(index) = index
                && !prefs.set_theme(index)?
            {
                bail!(
                    "Theme index {} out of range (0-{})",
                    index,
                    THEMES.len() - 1
                );
            }

            let current = prefs.theme()?;
            let palette = prefs.palette()?;
            if format.is_json() {
                return print_json(&json!({
                    "index": current,
                    "palette": palette,
                }));
            }
            for (i, theme) in THEMES.iter().enumerate() {
                let marker = if i == current { "*" } else { " " };
                println!("{} {} {}", marker, i, theme.name);
            }
            Ok(())
        }
    }
}
