use std::fs::File;
use std::io::Read;
use std::path::Path;

/// How many leading bytes are probed for NUL when sniffing for binary content.
pub const BINARY_PROBE_LEN: u64 = 8192;

/// Per-file classification decided before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Regular text, included with its full content.
    Text,
    /// Binary or otherwise opaque content, included as a one-line type note.
    BinaryOpaque { kind: &'static str },
}

/// Human-readable type label derived purely from the file extension.
/// Unrecognized extensions fall back to "Binary".
pub fn file_type_label(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "webp" => "Image",
        "svg" => "SVG Image",
        "wasm" => "WebAssembly",
        "pdf" => "PDF",
        "doc" | "docx" => "Word Document",
        "xls" | "xlsx" => "Excel Spreadsheet",
        "ppt" | "pptx" => "PowerPoint Presentation",
        "zip" | "rar" | "7z" => "Compressed Archive",
        "exe" => "Executable",
        "dll" => "Dynamic-link Library",
        "so" => "Shared Object",
        "dylib" => "Dynamic Library",
        "pem" | "cer" | "crt" | "key" | "p12" | "pfx" => "Certificate",
        _ => "Binary",
    }
}

/// True for extensions whose content is never meaningful to inline, even when
/// it happens to be text. SVG is the notable case: XML on disk, but worthless
/// as included source.
pub fn forced_binary(path: &Path) -> bool {
    let is_svg = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    is_svg || file_type_label(path) != "Binary"
}

/// NUL-byte heuristic over the first 8 KiB. A failed read classifies as
/// binary rather than erroring, which keeps aggregation resilient to
/// transient I/O problems on individual files.
pub fn is_binary_file(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return true;
    };
    let mut buffer = Vec::with_capacity(BINARY_PROBE_LEN as usize);
    match file.take(BINARY_PROBE_LEN).read_to_end(&mut buffer) {
        Ok(_) => buffer.contains(&0),
        Err(_) => true,
    }
}

/// Classifies a file as text or binary/opaque. Extension-forced kinds win
/// over the content probe; everything else is decided by the NUL heuristic.
pub fn classify(path: &Path) -> Classification {
    if forced_binary(path) || is_binary_file(path) {
        Classification::BinaryOpaque {
            kind: file_type_label(path),
        }
    } else {
        Classification::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn labels_follow_extension_case_insensitively() {
        assert_eq!(file_type_label(&PathBuf::from("a/photo.PNG")), "Image");
        assert_eq!(file_type_label(&PathBuf::from("report.pdf")), "PDF");
        assert_eq!(file_type_label(&PathBuf::from("mod.wasm")), "WebAssembly");
        assert_eq!(file_type_label(&PathBuf::from("server.key")), "Certificate");
        assert_eq!(file_type_label(&PathBuf::from("mystery.bin")), "Binary");
        assert_eq!(file_type_label(&PathBuf::from("no_extension")), "Binary");
    }

    #[test]
    fn nul_byte_in_prefix_classifies_binary_despite_txt_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, b"plain text\x00more").unwrap();
        assert_eq!(
            classify(&path),
            Classification::BinaryOpaque { kind: "Binary" }
        );
    }

    #[test]
    fn svg_is_opaque_regardless_of_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("icon.svg");
        fs::write(&path, "<svg xmlns=\"http://www.w3.org/2000/svg\"/>").unwrap();
        assert_eq!(
            classify(&path),
            Classification::BinaryOpaque { kind: "SVG Image" }
        );
    }

    #[test]
    fn plain_text_classifies_as_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("main.rs");
        fs::write(&path, "fn main() {}\n").unwrap();
        assert_eq!(classify(&path), Classification::Text);
    }

    #[test]
    fn missing_file_probes_as_binary() {
        assert!(is_binary_file(&PathBuf::from("/nonexistent/definitely-missing")));
    }
}
