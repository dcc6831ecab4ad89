use crate::classify::{self, Classification};
use crate::error::{AppError, Result};
use crate::rules::{IgnoreRuleSet, to_posix};
use crate::transform;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Output documents above this size trigger a warning suggesting tighter
/// ignore rules.
pub const MAX_OUTPUT_SIZE: u64 = 10 * 1024 * 1024;

/// One-way sink for ordered, human-readable progress messages. Reports must
/// never block the run; implementations that forward across threads should
/// drop on a full channel rather than wait.
pub trait Progress {
    fn report(&self, message: &str);
}

impl<F> Progress for F
where
    F: Fn(&str),
{
    fn report(&self, message: &str) {
        self(message)
    }
}

/// Sink that discards every message.
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&self, _message: &str) {}
}

/// Caller-constructed description of one aggregation run. Immutable for the
/// duration of the run.
#[derive(Debug, Clone)]
pub struct AggregationRequest {
    pub input_directory: PathBuf,
    pub output_file: PathBuf,
    /// Literal-substring or `*`/`?` glob patterns; deduplicated when the
    /// effective rule set is built.
    pub ignore_patterns: Vec<String>,
    pub use_default_ignores: bool,
    pub strip_whitespace: bool,
}

impl AggregationRequest {
    pub fn new(input_directory: impl Into<PathBuf>, output_file: impl Into<PathBuf>) -> Self {
        Self {
            input_directory: input_directory.into(),
            output_file: output_file.into(),
            ignore_patterns: Vec::new(),
            use_default_ignores: true,
            strip_whitespace: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileError {
    pub path: String,
    pub message: String,
}

/// Counts and warnings for one completed run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    pub total_files: usize,
    pub included_files: usize,
    pub ignored_files: usize,
    /// Binary/opaque files rendered as type notes; a subset of `included_files`.
    pub binary_files: usize,
    pub error_files: Vec<FileError>,
    pub output_size: u64,
    pub size_warning: bool,
}

#[derive(Debug)]
enum FileOutcome {
    Included,
    Ignored,
    Errored(String),
}

// One record per traversed file, kept only long enough to tally the result.
#[derive(Debug)]
struct FileRecord {
    relative_path: String,
    classification: Option<Classification>,
    #[allow(dead_code)]
    size: u64,
    outcome: FileOutcome,
}

#[derive(Debug)]
struct FileEntry {
    relative_path: String,
    absolute_path: PathBuf,
}

/// Runs one complete traversal-filter-render-write cycle, producing exactly
/// one output document or one terminal failure. Per-file errors are tallied
/// and reported but never abort the run.
pub fn aggregate(request: &AggregationRequest, progress: &dyn Progress) -> Result<AggregationResult> {
    validate_request(request)?;

    let rules = IgnoreRuleSet::build(
        &request.ignore_patterns,
        request.use_default_ignores,
        &request.output_file,
    )?;
    if request.use_default_ignores {
        progress.report("Using default ignore patterns.");
    }
    log::debug!("Effective ignore set holds {} rules.", rules.len());

    log::info!(
        "Walking input directory: {}",
        request.input_directory.display()
    );
    let mut entries = enumerate_files(&request.input_directory)?;
    progress.report(&format!(
        "Found {} files in {}. Applying filters...",
        entries.len(),
        request.input_directory.display()
    ));

    // Case-insensitive ascending order keeps the document reproducible
    // independent of file-system enumeration order.
    entries.sort_by(|a, b| {
        a.relative_path
            .to_lowercase()
            .cmp(&b.relative_path.to_lowercase())
    });

    let mut document = String::new();
    let mut records = Vec::with_capacity(entries.len());

    for entry in &entries {
        if rules.matches(&entry.relative_path) {
            log::trace!("Ignoring: {}", entry.relative_path);
            records.push(FileRecord {
                relative_path: entry.relative_path.clone(),
                classification: None,
                size: 0,
                outcome: FileOutcome::Ignored,
            });
            continue;
        }

        match render_file(entry, request.strip_whitespace) {
            Ok((section, classification, size)) => {
                document.push_str(&section);
                records.push(FileRecord {
                    relative_path: entry.relative_path.clone(),
                    classification: Some(classification),
                    size,
                    outcome: FileOutcome::Included,
                });
            }
            Err(e) => {
                progress.report(&format!(
                    "Warning: Could not process file '{}': {}",
                    entry.relative_path, e
                ));
                records.push(FileRecord {
                    relative_path: entry.relative_path.clone(),
                    classification: None,
                    size: 0,
                    outcome: FileOutcome::Errored(e.to_string()),
                });
            }
        }
    }

    if let Some(parent) = request.output_file.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| AppError::DirCreation {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }
    write_atomic(&request.output_file, &document)?;

    let result = tally(&records, document.len() as u64);

    progress.report(&format!(
        "Files aggregated successfully into {}",
        request.output_file.display()
    ));
    progress.report(&format!("Total files found: {}", result.total_files));
    progress.report(&format!(
        "Files included in output: {}",
        result.included_files
    ));
    progress.report(&format!(
        "Binary and SVG files included: {}",
        result.binary_files
    ));
    if !result.error_files.is_empty() {
        progress.report(&format!(
            "Files with errors (skipped): {}",
            result.error_files.len()
        ));
    }
    if result.size_warning {
        progress.report(&format!(
            "Warning: Output file size ({:.2} MB) exceeds 10 MB.",
            result.output_size as f64 / 1024.0 / 1024.0
        ));
        progress.report("Consider adding more files to .aidigestignore to reduce the output size.");
    }
    progress.report(&format!(
        "Done! Wrote code base to {}",
        request.output_file.display()
    ));

    Ok(result)
}

fn validate_request(request: &AggregationRequest) -> Result<()> {
    if request.input_directory.as_os_str().is_empty() {
        return Err(AppError::Validation(
            "Input directory cannot be empty.".to_string(),
        ));
    }
    if !request.input_directory.is_dir() {
        return Err(AppError::Validation(format!(
            "Input directory does not exist: {}",
            request.input_directory.display()
        )));
    }
    if request.output_file.as_os_str().is_empty() {
        return Err(AppError::Validation(
            "Output file path cannot be empty.".to_string(),
        ));
    }
    Ok(())
}

fn enumerate_files(root: &Path) -> Result<Vec<FileEntry>> {
    let mut entries = Vec::new();
    for entry_result in WalkDir::new(root).follow_links(false) {
        let entry = entry_result?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = pathdiff::diff_paths(entry.path(), root)
            .unwrap_or_else(|| entry.path().to_path_buf());
        entries.push(FileEntry {
            relative_path: to_posix(&relative),
            absolute_path: entry.path().to_path_buf(),
        });
    }
    log::debug!("Directory walk complete. Found {} files.", entries.len());
    Ok(entries)
}

/// Renders one file into its document section. Errors here are per-file and
/// recoverable; the caller tallies them and moves on.
fn render_file(
    entry: &FileEntry,
    strip_whitespace: bool,
) -> std::io::Result<(String, Classification, u64)> {
    let classification = classify::classify(&entry.absolute_path);
    match classification {
        Classification::Text => {
            let raw = fs::read_to_string(&entry.absolute_path)?;
            let size = raw.len() as u64;
            let extension = Path::new(&entry.relative_path)
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned())
                .unwrap_or_default();

            let mut content = transform::escape_triple_backticks(&raw);
            if strip_whitespace && !transform::is_whitespace_dependent(&extension) {
                content = transform::collapse_whitespace(&content);
            }

            let section = format!(
                "# {}\n\n```{}\n{}\n```\n\n",
                entry.relative_path, extension, content
            );
            Ok((section, classification, size))
        }
        Classification::BinaryOpaque { kind } => {
            let size = fs::metadata(&entry.absolute_path)
                .map(|m| m.len())
                .unwrap_or(0);
            let wording = if kind == "SVG Image" {
                "file"
            } else {
                "binary file"
            };
            let section = format!(
                "# {}\n\nThis is a {} of the type: {}\n\n",
                entry.relative_path, wording, kind
            );
            Ok((section, classification, size))
        }
    }
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let mut tmp_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "output".into());
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, contents).map_err(|e| AppError::FileWrite {
        path: tmp_path.clone(),
        source: e,
    })?;
    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        AppError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

fn tally(records: &[FileRecord], output_size: u64) -> AggregationResult {
    let mut result = AggregationResult {
        total_files: records.len(),
        output_size,
        size_warning: output_size > MAX_OUTPUT_SIZE,
        ..AggregationResult::default()
    };
    for record in records {
        match &record.outcome {
            FileOutcome::Included => {
                result.included_files += 1;
                if matches!(
                    record.classification,
                    Some(Classification::BinaryOpaque { .. })
                ) {
                    result.binary_files += 1;
                }
            }
            FileOutcome::Ignored => result.ignored_files += 1,
            FileOutcome::Errored(message) => result.error_files.push(FileError {
                path: record.relative_path.clone(),
                message: message.clone(),
            }),
        }
    }
    result
}
