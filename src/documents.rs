//! Loading PDF documents into a single query context.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Model whose encoding is used to size the loaded context.
pub const CONTEXT_TOKEN_MODEL: &str = "gpt-4";

/// All documents of a directory, concatenated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedDocuments {
    pub context: String,
    pub token_count: usize,
    /// File names in load order.
    pub document_names: Vec<String>,
}

/// Header that precedes each document's text in the context.
pub fn document_header(name: &str) -> String {
    format!("=== Document: {} ===", name)
}

/// Count tokens in `text` with the encoding used by `model`.
pub fn count_tokens(text: &str, model: &str) -> Result<usize> {
    if text.is_empty() {
        return Ok(0);
    }
    let bpe = tiktoken_rs::get_bpe_from_model(model)
        .map_err(|e| Error::Tokenizer(format!("no encoding for '{}': {}", model, e)))?;
    Ok(bpe.encode_with_special_tokens(text).len())
}

/// `*.pdf` files directly inside `dir`, sorted by file name.
fn pdf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(dir = %dir.display(), "Documents directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(Error::Io {
                path: dir.to_path_buf(),
                source: e,
            })
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| Error::Io {
                path: dir.to_path_buf(),
                source: e,
            })?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "pdf") {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Load every PDF in `dir` into one context string.
///
/// Each document is appended as `\n\n=== Document: <name> ===\n\n<text>`.
/// A missing or empty directory yields an empty context.
pub fn load_documents(dir: impl AsRef<Path>) -> Result<LoadedDocuments> {
    let dir = dir.as_ref();
    let files = pdf_files(dir)?;

    let mut context = String::new();
    let mut document_names = Vec::with_capacity(files.len());

    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let text = pdf_extract::extract_text(&path).map_err(|e| Error::Pdf {
            path: path.clone(),
            detail: e.to_string(),
        })?;
        tracing::debug!(document = %name, chars = text.len(), "Extracted document text");

        context.push_str("\n\n");
        context.push_str(&document_header(&name));
        context.push_str("\n\n");
        context.push_str(&text);
        document_names.push(name);
    }

    let token_count = count_tokens(&context, CONTEXT_TOKEN_MODEL)?;
    tracing::info!(
        dir = %dir.display(),
        documents = document_names.len(),
        tokens = token_count,
        "Loaded documents"
    );

    Ok(LoadedDocuments {
        context,
        token_count,
        document_names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_format() {
        assert_eq!(document_header("a.pdf"), "=== Document: a.pdf ===");
    }

    #[test]
    fn test_count_tokens_empty() {
        assert_eq!(count_tokens("", "gpt-4").unwrap(), 0);
    }

    #[test]
    fn test_count_tokens_nonempty() {
        let n = count_tokens("Sparse attention scales better than dense attention.", "gpt-4")
            .unwrap();
        assert!(n > 0 && n < 20, "unexpected token count {}", n);
    }

    #[test]
    fn test_count_tokens_unknown_model() {
        assert!(matches!(
            count_tokens("hello", "not-a-real-model"),
            Err(Error::Tokenizer(_))
        ));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let loaded = load_documents("/nonexistent/docbench/documents").unwrap();
        assert_eq!(loaded, LoadedDocuments::default());
    }
}
