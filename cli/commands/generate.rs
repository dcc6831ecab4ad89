use crate::cli_args::GenerateArgs;
use crate::settings::{self, UserSettings};
use aidigest_core::{AggregationRequest, Progress, aggregate, detect_languages};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_OUTPUT_FILENAME: &str = "codebase.md";
const DEFAULT_IGNORE_FILENAME: &str = ".aidigestignore";

/// Progress sink printing each message to stderr as it arrives. Warnings are
/// highlighted; everything is suppressed in quiet mode.
struct ConsoleProgress {
    quiet: bool,
}

impl Progress for ConsoleProgress {
    fn report(&self, message: &str) {
        if self.quiet {
            return;
        }
        if message.starts_with("Warning:") {
            eprintln!("{}", message.yellow());
        } else {
            eprintln!("{}", message);
        }
    }
}

pub fn handle_generate_command(args: GenerateArgs, quiet: bool, _verbose: u8) -> Result<()> {
    let root = args.root.clone().unwrap_or_else(|| PathBuf::from("."));
    let output_file = args
        .output
        .clone()
        .unwrap_or_else(|| root.join(DEFAULT_OUTPUT_FILENAME));
    log::info!(
        "Aggregating {} into {}",
        root.display(),
        output_file.display()
    );

    let mut user_settings = settings::load_settings();

    let use_default_ignores = if args.no_default_ignores {
        false
    } else {
        user_settings.use_default_ignores
    };
    let strip_whitespace = args.strip_whitespace || user_settings.strip_whitespace;

    let mut ignore_patterns = user_settings.custom_ignore_patterns.clone();
    ignore_patterns.extend(args.ignore.iter().cloned());
    ignore_patterns.extend(read_ignore_file(&root, args.ignore_file.as_deref())?);

    if !args.no_language_ignores {
        collect_language_patterns(&root, &user_settings, quiet, &mut ignore_patterns);
    }

    if !quiet {
        eprintln!("Using {} ignore patterns total.", ignore_patterns.len());
    }

    let request = AggregationRequest {
        input_directory: root.clone(),
        output_file,
        ignore_patterns,
        use_default_ignores,
        strip_whitespace,
    };

    let progress = ConsoleProgress { quiet };
    let result = aggregate(&request, &progress).context("File aggregation failed")?;

    match args.format_output.format.as_deref() {
        Some("json") => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => {
            if !quiet {
                println!(
                    "{} Wrote {} file(s) ({} bytes) to {}",
                    "✅".green(),
                    result.included_files,
                    result.output_size,
                    request.output_file.display().to_string().blue()
                );
            }
        }
    }

    user_settings.last_input_directory = root.display().to_string();
    if let Err(e) = settings::save_settings(&user_settings) {
        log::warn!("Failed to save settings: {:#}", e);
    }

    Ok(())
}

/// Reads ignore patterns from an explicit file or, when present, the root's
/// `.aidigestignore`. Blank lines and `#` comments are skipped.
fn read_ignore_file(root: &Path, explicit: Option<&Path>) -> Result<Vec<String>> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = root.join(DEFAULT_IGNORE_FILENAME);
            if !default.is_file() {
                return Ok(Vec::new());
            }
            default
        }
    };

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read ignore file {}", path.display()))?;
    let patterns = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();
    Ok(patterns)
}

/// Runs advisory language detection and appends the suggestions of every
/// ecosystem the saved preferences still enable. Detection can never fail
/// the run; a missing root simply contributes nothing.
fn collect_language_patterns(
    root: &Path,
    user_settings: &UserSettings,
    quiet: bool,
    ignore_patterns: &mut Vec<String>,
) {
    let detected = detect_languages(root);
    if detected.is_empty() {
        log::debug!("No language ecosystems detected.");
        return;
    }

    if !quiet {
        let summary: Vec<String> = detected
            .iter()
            .map(|lang| format!("{} ({} files)", lang.name, lang.file_count))
            .collect();
        eprintln!(
            "Detected {} language(s): {}",
            detected.len(),
            summary.join(", ")
        );
    }

    for language in &detected {
        if !user_settings.language_enabled(language.name) {
            log::debug!("Skipping disabled language: {}", language.name);
            continue;
        }
        ignore_patterns.extend(language.ignore_patterns.iter().map(|p| p.to_string()));
        if !quiet {
            eprintln!(
                "Including {} ignore patterns for {}",
                language.ignore_patterns.len(),
                language.name
            );
        }
    }
}
