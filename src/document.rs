//! Document intake: file reading and HTML cleaning.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::AnalysisError;

pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["txt", "md", "html", "htm", "pdf", "text"];

static SCRIPT_STYLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style|noscript)\b[^>]*>.*?</(script|style|noscript)\s*>").unwrap()
});

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").unwrap());

static IMG_SRC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<img\b[^>]*?\bsrc\s*=\s*["']([^"']+)["']"#).unwrap()
});

// Closing block-level tags end a line of text.
static BLOCK_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</(p|div|h[1-6]|li|tr|section|article|blockquote)\s*>|<br\s*/?>").unwrap()
});

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]+>").unwrap());

static LOOKS_LIKE_HTML: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<(html|body|p|div|span|br|h[1-6]|title|img|a|article|section)\b[^>]*>").unwrap()
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{00A0}]+").unwrap());

static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\n\s*").unwrap());

/// Plain text plus what was lifted out of the markup.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanedDocument {
    pub text: String,
    pub title: Option<String>,
    pub images: Vec<String>,
}

impl CleanedDocument {
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.trim().to_string(),
            title: None,
            images: Vec::new(),
        }
    }
}

pub fn looks_like_html(text: &str) -> bool {
    LOOKS_LIKE_HTML.is_match(text)
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn collapse_whitespace(text: &str) -> String {
    let spaced = WHITESPACE.replace_all(text, " ");
    BLANK_LINES.replace_all(spaced.trim(), "\n").into_owned()
}

/// Strip markup, keeping the title and image sources.
pub fn clean_html(html: &str) -> CleanedDocument {
    let without_scripts = SCRIPT_STYLE.replace_all(html, " ");
    let without_comments = COMMENT.replace_all(&without_scripts, " ");

    let title = TITLE
        .captures(&without_comments)
        .and_then(|c| c.get(1))
        .map(|m| collapse_whitespace(&decode_entities(&TAG.replace_all(m.as_str(), " "))))
        .filter(|t| !t.is_empty());

    let images: Vec<String> = IMG_SRC
        .captures_iter(&without_comments)
        .filter_map(|c| c.get(1).map(|m| decode_entities(m.as_str().trim())))
        .collect();

    let body = TITLE.replace_all(&without_comments, " ");
    let body = BLOCK_END.replace_all(&body, "\n");
    let body = TAG.replace_all(&body, " ");
    let text = collapse_whitespace(&decode_entities(&body));

    CleanedDocument { text, title, images }
}

/// Clean input that is HTML, or pass plain text through.
pub fn prepare(content: &str, force_html: bool) -> CleanedDocument {
    if force_html || looks_like_html(content) {
        clean_html(content)
    } else {
        CleanedDocument::plain(content)
    }
}

/// Raw file content and whether its extension marks it as HTML.
pub struct RawDocument {
    pub content: String,
    pub is_html: bool,
}

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn read_document(path: &Path) -> Result<RawDocument, AnalysisError> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "txt" | "md" | "text" => Ok(RawDocument {
            content: read_text(path)?,
            is_html: false,
        }),
        "html" | "htm" => Ok(RawDocument {
            content: read_text(path)?,
            is_html: true,
        }),
        "pdf" => {
            let content = pdf_extract::extract_text(path).map_err(|e| AnalysisError::Document {
                path: path.to_path_buf(),
                message: format!("PDF extraction failed: {}", e),
            })?;
            Ok(RawDocument {
                content,
                is_html: false,
            })
        }
        _ => Err(AnalysisError::UnsupportedFormat(ext)),
    }
}

fn read_text(path: &Path) -> Result<String, AnalysisError> {
    fs::read_to_string(path).map_err(|e| AnalysisError::Document {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    const PAGE: &str = r#"<html><head><title>Solar &amp; Wind</title>
        <style>body { color: red; }</style>
        <script>alert("hi");</script></head>
        <body><!-- nav --><h1>Energy</h1>
        <p>Solar power is <b>cheap</b>.</p>
        <img src="/img/panel.png" alt="panel"><p>Wind&nbsp;power grows.</p>
        <IMG SRC='https://example.com/turbine.jpg'>
        </body></html>"#;

    #[test]
    fn test_clean_html_extracts_parts() {
        let doc = clean_html(PAGE);
        assert_eq!(doc.title.as_deref(), Some("Solar & Wind"));
        assert_eq!(doc.images, vec!["/img/panel.png", "https://example.com/turbine.jpg"]);
        assert!(doc.text.contains("Solar power is cheap ."));
        assert!(doc.text.contains("Wind power grows."));
        assert!(!doc.text.contains("alert"));
        assert!(!doc.text.contains("color"));
        assert!(!doc.text.contains('<'));
    }

    #[test]
    fn test_prepare_detects_html() {
        assert!(looks_like_html("<p>Hello</p>"));
        assert!(!looks_like_html("5 < 6 and 7 > 3"));
        let doc = prepare("  plain text only.  ", false);
        assert_eq!(doc.text, "plain text only.");
        assert!(doc.title.is_none());
    }

    #[test]
    fn test_read_text_document() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let file_path = temp_dir.path().join("note.txt");
        let mut file = File::create(&file_path)?;
        writeln!(file, "Hello, World!")?;

        let doc = read_document(&file_path)?;
        assert_eq!(doc.content, "Hello, World!\n");
        assert!(!doc.is_html);
        Ok(())
    }

    #[test]
    fn test_read_html_document() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let file_path = temp_dir.path().join("page.HTML");
        fs::write(&file_path, PAGE)?;
        assert!(read_document(&file_path)?.is_html);
        Ok(())
    }

    #[test]
    fn test_unsupported_format() {
        let err = read_document(Path::new("archive.zip"));
        assert!(matches!(err, Err(AnalysisError::UnsupportedFormat(ext)) if ext == "zip"));
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("a/b/report.PDF")));
        assert!(is_supported(Path::new("notes.md")));
        assert!(!is_supported(Path::new("binary.exe")));
        assert!(!is_supported(Path::new("README")));
    }
}
