use crate::error::{AppError, Result};
use regex::Regex;
use std::collections::HashSet;
use std::path::{Component, Path};

/// Built-in ignore patterns applied when a request opts into the defaults.
/// Patterns without wildcards are case-insensitive substring matches against
/// the relative path; patterns with `*`/`?` are anchored globs.
pub static DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".aidigestignore",
    // Node.js
    "node_modules",
    "package-lock.json",
    "npm-debug.log",
    // Yarn
    "yarn.lock",
    "yarn-error.log",
    // pnpm
    "pnpm-lock.yaml",
    // Bun
    "bun.lockb",
    // Deno
    "deno.lock",
    // PHP (Composer)
    "vendor",
    "composer.lock",
    // Python
    "__pycache__",
    "*.pyc",
    "*.pyo",
    "*.pyd",
    ".Python",
    "pip-log.txt",
    "pip-delete-this-directory.txt",
    ".venv",
    "venv",
    "ENV",
    "env",
    ".pytest_cache",
    "migrations",
    // Godot
    ".godot",
    "*.import",
    // Ruby
    "Gemfile.lock",
    ".bundle",
    // Java
    "target",
    "*.class",
    // Gradle
    ".gradle",
    "build",
    // Maven
    "pom.xml.tag",
    "pom.xml.releaseBackup",
    "pom.xml.versionsBackup",
    "pom.xml.next",
    // .NET
    "bin",
    "obj",
    "*.suo",
    "*.user",
    // Go
    "go.sum",
    // Rust
    "Cargo.lock",
    // General
    ".git",
    ".svn",
    ".hg",
    ".DS_Store",
    "Thumbs.db",
    // Environment variables
    ".env",
    ".env.local",
    ".env.development.local",
    ".env.test.local",
    ".env.production.local",
    "*.env",
    "*.env.*",
    // Common framework directories
    ".svelte-kit",
    ".next",
    ".nuxt",
    ".vuepress",
    ".cache",
    "dist",
    "tmp",
    // Our output file
    "codebase.md",
    // Turborepo cache folder
    ".turbo",
    ".vercel",
    ".netlify",
    "LICENSE",
    // Certificates
    ".pem",
    ".cer",
    ".crt",
    ".key",
    ".p12",
    ".pfx",
    // Images
    ".jpg",
    ".jpeg",
    ".png",
    ".gif",
    ".bmp",
    ".webp",
    ".svg",
    // Videos
    ".mp4",
    ".webm",
    ".ogg",
    ".ogv",
    ".avi",
    ".mov",
    ".flv",
    ".mkv",
    // Azure
    "azure-pipelines.yml",
    //
    "static",
    "statics",
    "staticfiles",
    ".mypy_cache",
    "poetry.lock",
];

#[derive(Debug)]
enum CompiledRule {
    /// Anchored, case-insensitive regex translated from a `*`/`?` glob.
    Glob(Regex),
    /// Lowercased literal, matched as a substring of the relative path.
    /// Matches mid-filename as well as path segments; this coarseness is
    /// intentional and part of the observable contract.
    Substring(String),
}

/// Compiled union of default and caller-supplied ignore patterns.
///
/// Matching is order-independent (a path is ignored if any rule matches) and
/// pure, so a set may be shared across concurrent lookups.
#[derive(Debug)]
pub struct IgnoreRuleSet {
    rules: Vec<CompiledRule>,
    output_file_name: String,
}

impl IgnoreRuleSet {
    /// Builds the effective rule set for one aggregation run. Patterns are
    /// deduplicated; the output file's bare name is always ignored so a run
    /// never re-ingests its own previous output.
    pub fn build(
        custom_patterns: &[String],
        use_defaults: bool,
        output_file: &Path,
    ) -> Result<Self> {
        let mut patterns: HashSet<&str> = HashSet::new();
        if use_defaults {
            patterns.extend(DEFAULT_IGNORE_PATTERNS.iter().copied());
        }
        for pattern in custom_patterns {
            let trimmed = pattern.trim();
            if !trimmed.is_empty() {
                patterns.insert(trimmed);
            }
        }

        let mut rules = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            if pattern.contains(['*', '?']) {
                rules.push(CompiledRule::Glob(compile_glob(pattern)?));
            } else {
                rules.push(CompiledRule::Substring(pattern.to_lowercase()));
            }
        }

        let output_file_name = output_file
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        Ok(Self {
            rules,
            output_file_name,
        })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns true if `relative_path` (posix-style, root-relative) is ignored.
    pub fn matches(&self, relative_path: &str) -> bool {
        if !self.output_file_name.is_empty() {
            let file_name = relative_path.rsplit('/').next().unwrap_or(relative_path);
            if file_name.to_lowercase() == self.output_file_name {
                log::trace!("Path matches output file name: {}", relative_path);
                return true;
            }
        }

        let lowered = relative_path.to_lowercase();
        self.rules.iter().any(|rule| match rule {
            CompiledRule::Glob(re) => re.is_match(relative_path),
            CompiledRule::Substring(literal) => lowered.contains(literal.as_str()),
        })
    }
}

/// Translates a glob pattern into an anchored, case-insensitive regex.
/// `*` matches zero or more characters (including `/`), `?` exactly one;
/// every other regex metacharacter is escaped so patterns like `*.env` keep
/// plain glob semantics. A trailing `/` marks a directory prefix and is
/// expanded to match everything nested under it.
fn compile_glob(pattern: &str) -> Result<Regex> {
    let mut processed = pattern.to_string();
    if processed.ends_with('/') && processed.len() > 1 {
        processed.push('*');
    }
    let translated = regex::escape(&processed)
        .replace("\\*", ".*")
        .replace("\\?", ".");
    Regex::new(&format!("(?i)^{}$", translated)).map_err(|e| {
        log::error!("Invalid ignore pattern \"{}\": {}", pattern, e);
        AppError::Pattern(format!("Invalid ignore pattern \"{}\": {}", pattern, e))
    })
}

/// Renders a root-relative path with `/` separators regardless of platform.
pub fn to_posix(path: &Path) -> String {
    let mut parts = Vec::new();
    for component in path.components() {
        if let Component::Normal(name) = component {
            parts.push(name.to_string_lossy().into_owned());
        }
    }
    parts.join("/")
}
