use crate::cli_args::DetectArgs;
use aidigest_core::detect_languages;
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

pub fn handle_detect_command(args: DetectArgs, quiet: bool, _verbose: u8) -> Result<()> {
    let root = args.root.clone().unwrap_or_else(|| PathBuf::from("."));
    log::info!("Detecting language ecosystems in {}", root.display());

    let detected = detect_languages(&root);

    if args.format_output.format.as_deref() == Some("json") {
        println!("{}", serde_json::to_string_pretty(&detected)?);
        return Ok(());
    }

    if detected.is_empty() {
        if !quiet {
            println!("No specific languages detected in this directory.");
        }
        return Ok(());
    }

    for language in &detected {
        println!(
            "{} {} ({} files)",
            "•".green(),
            language.name.bold(),
            language.file_count
        );
        if !quiet {
            println!(
                "  suggested ignores: {}",
                language.ignore_patterns.join(", ").dimmed()
            );
        }
    }
    Ok(())
}
