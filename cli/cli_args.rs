use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Aggregate a source tree into one annotated Markdown document for AI models.",
    long_about = "aidigest walks a directory, filters files through default and custom ignore \npatterns, and concatenates the survivors into a single Markdown document. \nBinary and opaque files are listed as type notes; detected language ecosystems \ncontribute suggested ignore patterns.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  aidigest generate ./my-project\n  aidigest generate -o digest.md --strip-whitespace\n  aidigest detect ./my-project --format json",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence progress messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "g",
        visible_alias = "gen",
        about = "Aggregate the directory into a single Markdown document."
    )]
    Generate(GenerateArgs),

    #[command(
        visible_alias = "d",
        about = "Detect language ecosystems and their suggested ignore patterns."
    )]
    Detect(DetectArgs),

    #[command(about = "Generate or save shell completion scripts.")]
    Completion(CompletionArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct FormatOutputOpts {
    #[arg(short = 'f', long, help = "Set the output format.", value_name = "FORMAT", value_parser = ["text", "json"], help_heading = "Output Formatting")]
    pub format: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        value_name = "ROOT",
        help = "Directory to aggregate (default: current dir)."
    )]
    pub root: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Output file path (default: <ROOT>/codebase.md).",
        help_heading = "Output Control"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'i',
        long = "ignore",
        value_name = "PATTERN",
        help = "Extra ignore pattern (substring or glob); repeatable.",
        help_heading = "Filtering"
    )]
    pub ignore: Vec<String>,

    #[arg(
        long,
        value_name = "FILE",
        help = "File with ignore patterns, one per line (default: <ROOT>/.aidigestignore if present).",
        help_heading = "Filtering"
    )]
    pub ignore_file: Option<PathBuf>,

    #[arg(
        long,
        help = "Skip the built-in default ignore patterns.",
        help_heading = "Filtering"
    )]
    pub no_default_ignores: bool,

    #[arg(
        long,
        help = "Skip language detection and its suggested ignore patterns.",
        help_heading = "Filtering"
    )]
    pub no_language_ignores: bool,

    #[arg(
        long,
        help = "Collapse whitespace runs in non-indentation-sensitive files.",
        help_heading = "Content"
    )]
    pub strip_whitespace: bool,

    #[clap(flatten)]
    pub format_output: FormatOutputOpts,
}

#[derive(Args, Debug, Clone)]
pub struct DetectArgs {
    #[arg(
        value_name = "ROOT",
        help = "Directory to inspect (default: current dir)."
    )]
    pub root: Option<PathBuf>,

    #[clap(flatten)]
    pub format_output: FormatOutputOpts,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    #[arg(
        value_name = "SHELL",
        help = "Target shell (fish, bash, zsh; default: fish)."
    )]
    pub shell: Option<String>,
}
