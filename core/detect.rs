use indexmap::IndexMap;
use serde::Serialize;
use std::path::Path;
use walkdir::WalkDir;

/// Static description of one ecosystem: its canonical extensions (without the
/// leading dot, lowercase) and curated ignore-pattern suggestions.
#[derive(Debug)]
pub struct LanguageDefinition {
    pub key: &'static str,
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    pub ignore_patterns: &'static [&'static str],
}

/// Fixed-order ecosystem table. An extension is claimed by the first entry
/// that lists it, so `.jsx`/`.tsx` tally under JavaScript/TypeScript rather
/// than React.
pub static LANGUAGE_DEFINITIONS: &[LanguageDefinition] = &[
    LanguageDefinition {
        key: "JavaScript",
        name: "JavaScript/Node.js",
        extensions: &["js", "mjs", "cjs", "jsx"],
        ignore_patterns: &[
            "node_modules/",
            "package-lock.json",
            "npm-debug.log*",
            "yarn.lock",
            "yarn-error.log",
            ".npm/",
            "dist/",
            "build/",
        ],
    },
    LanguageDefinition {
        key: "TypeScript",
        name: "TypeScript",
        extensions: &["ts", "tsx"],
        ignore_patterns: &[
            "node_modules/",
            "dist/",
            "build/",
            "*.d.ts",
            "tsconfig.tsbuildinfo",
        ],
    },
    LanguageDefinition {
        key: "Python",
        name: "Python",
        extensions: &["py", "pyw", "pyx", "pyi"],
        ignore_patterns: &[
            "__pycache__/",
            "*.pyc",
            "*.pyo",
            "*.pyd",
            ".venv/",
            "venv/",
            "env/",
            ".pytest_cache/",
            "*.egg-info/",
            ".mypy_cache/",
            "poetry.lock",
        ],
    },
    LanguageDefinition {
        key: "C#",
        name: "C# / .NET",
        extensions: &["cs", "csx", "csproj", "sln", "vb", "fs"],
        ignore_patterns: &[
            "bin/",
            "obj/",
            "packages/",
            "*.suo",
            "*.user",
            "*.nupkg",
            ".vs/",
        ],
    },
    LanguageDefinition {
        key: "Java",
        name: "Java",
        extensions: &["java", "jar", "class"],
        ignore_patterns: &[
            "target/",
            "*.class",
            ".gradle/",
            "build/",
            "gradle-wrapper.jar",
            ".mvn/",
        ],
    },
    LanguageDefinition {
        key: "C/C++",
        name: "C/C++",
        extensions: &["c", "cpp", "cxx", "cc", "h", "hpp", "hxx"],
        ignore_patterns: &[
            "*.o",
            "*.obj",
            "*.exe",
            "*.dll",
            "*.so",
            "*.a",
            "*.lib",
            "build/",
            "cmake-build-*/",
            "CMakeCache.txt",
            "CMakeFiles/",
        ],
    },
    LanguageDefinition {
        key: "PHP",
        name: "PHP",
        extensions: &["php", "phtml", "php3", "php4", "php5"],
        ignore_patterns: &["vendor/", "composer.lock", "*.log"],
    },
    LanguageDefinition {
        key: "Ruby",
        name: "Ruby",
        extensions: &["rb", "ruby", "rake", "gemspec"],
        ignore_patterns: &["Gemfile.lock", ".bundle/", "vendor/bundle/"],
    },
    LanguageDefinition {
        key: "Go",
        name: "Go",
        extensions: &["go"],
        ignore_patterns: &["go.sum", "vendor/", "*.exe"],
    },
    LanguageDefinition {
        key: "Rust",
        name: "Rust",
        extensions: &["rs"],
        ignore_patterns: &["target/", "Cargo.lock", "*.exe"],
    },
    LanguageDefinition {
        key: "Web",
        name: "Web (HTML/CSS)",
        extensions: &["html", "htm", "css", "scss", "sass", "less"],
        ignore_patterns: &["*.min.css", "*.min.js", ".sass-cache/", "node_modules/"],
    },
    LanguageDefinition {
        key: "React",
        name: "React",
        extensions: &["jsx", "tsx"],
        ignore_patterns: &["node_modules/", "build/", ".next/", "dist/"],
    },
    LanguageDefinition {
        key: "Vue",
        name: "Vue.js",
        extensions: &["vue"],
        ignore_patterns: &["node_modules/", "dist/", ".nuxt/"],
    },
    LanguageDefinition {
        key: "Docker",
        name: "Docker",
        extensions: &["dockerfile"],
        ignore_patterns: &[".dockerignore", "docker-compose.override.yml"],
    },
    LanguageDefinition {
        key: "Database",
        name: "Database",
        extensions: &["sql", "db", "sqlite", "sqlite3"],
        ignore_patterns: &["*.db", "*.sqlite", "*.sqlite3", "migrations/"],
    },
];

/// Marker files mapped straight to an ecosystem by bare file name, checked
/// before any extension lookup.
pub static SPECIAL_FILES: &[(&str, &str)] = &[
    ("Dockerfile", "Docker"),
    ("docker-compose.yml", "Docker"),
    ("docker-compose.yaml", "Docker"),
    ("Makefile", "C/C++"),
    ("CMakeLists.txt", "C/C++"),
    ("package.json", "JavaScript"),
    ("tsconfig.json", "TypeScript"),
    ("requirements.txt", "Python"),
    ("setup.py", "Python"),
    ("Pipfile", "Python"),
    ("pyproject.toml", "Python"),
    ("Gemfile", "Ruby"),
    ("Cargo.toml", "Rust"),
    ("go.mod", "Go"),
    ("composer.json", "PHP"),
    ("pom.xml", "Java"),
    ("build.gradle", "Java"),
];

/// One detected ecosystem. `selected` defaults to true at creation and is
/// thereafter owned by the caller; the detector never mutates it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedLanguage {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    pub ignore_patterns: &'static [&'static str],
    pub file_count: usize,
    pub selected: bool,
}

/// Walks `root` and returns the ecosystems present, sorted by descending file
/// count with ties kept in first-encounter order. Advisory only: a missing
/// root yields an empty list and per-file access errors are swallowed.
pub fn detect_languages(root: &Path) -> Vec<DetectedLanguage> {
    if !root.is_dir() {
        log::debug!("Detection root missing or not a directory: {}", root.display());
        return Vec::new();
    }

    // IndexMap keeps first-tally order, which is the tie-break for the sort.
    let mut counts: IndexMap<&'static str, usize> = IndexMap::new();

    for entry_result in WalkDir::new(root).follow_links(false) {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("Skipping inaccessible path during detection: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();

        // Marker files take priority over extension matches.
        if let Some((_, key)) = SPECIAL_FILES.iter().find(|(name, _)| *name == file_name) {
            *counts.entry(*key).or_insert(0) += 1;
            continue;
        }

        let Some(extension) = entry.path().extension() else {
            continue;
        };
        let extension = extension.to_string_lossy().to_lowercase();
        for definition in LANGUAGE_DEFINITIONS {
            if definition.extensions.contains(&extension.as_str()) {
                *counts.entry(definition.key).or_insert(0) += 1;
                break;
            }
        }
    }

    let mut detected: Vec<DetectedLanguage> = counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(key, count)| {
            let definition = LANGUAGE_DEFINITIONS
                .iter()
                .find(|d| d.key == *key)
                .expect("tallied key comes from the definition table");
            DetectedLanguage {
                name: definition.name,
                extensions: definition.extensions,
                ignore_patterns: definition.ignore_patterns,
                file_count: *count,
                selected: true,
            }
        })
        .collect();

    // Stable sort preserves encounter order among equal counts.
    detected.sort_by(|a, b| b.file_count.cmp(&a.file_count));

    log::debug!(
        "Detected {} ecosystem(s) under {}",
        detected.len(),
        root.display()
    );
    detected
}
