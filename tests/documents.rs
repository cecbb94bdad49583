//! Integration tests for document loading over real directories.

use std::fs;

use docbench::documents::{document_header, load_documents};
use docbench::Error;

/// A one-page PDF showing `text` in Helvetica, with a correct xref table.
fn one_page_pdf(text: &str) -> Vec<u8> {
    let content = format!("BT /F1 24 Tf 72 700 Td ({}) Tj ET", text);
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_start = pdf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{:010} 00000 n \n", offset));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_start
    ));
    pdf.extend_from_slice(xref.as_bytes());
    pdf
}

#[test]
fn test_empty_directory() {
    let dir = tempfile::tempdir().unwrap();

    let loaded = load_documents(dir.path()).unwrap();

    assert_eq!(loaded.context, "");
    assert_eq!(loaded.token_count, 0);
    assert!(loaded.document_names.is_empty());
}

#[test]
fn test_loads_pdfs_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.pdf"), one_page_pdf("Bravo")).unwrap();
    fs::write(dir.path().join("a.pdf"), one_page_pdf("Alpha")).unwrap();
    fs::write(dir.path().join("readme.txt"), "skip me").unwrap();

    let loaded = load_documents(dir.path()).unwrap();

    assert_eq!(loaded.document_names, vec!["a.pdf", "b.pdf"]);
    assert!(loaded
        .context
        .starts_with(&format!("\n\n{}\n\n", document_header("a.pdf"))));

    let first = loaded.context.find("=== Document: a.pdf ===").unwrap();
    let second = loaded.context.find("\n\n=== Document: b.pdf ===\n\n").unwrap();
    assert!(first < second);

    let alpha = loaded.context.find("Alpha").unwrap();
    let bravo = loaded.context.find("Bravo").unwrap();
    assert!(first < alpha && alpha < second && second < bravo);
    assert!(!loaded.context.contains("skip me"));
    assert!(loaded.token_count > 0);
}

#[test]
fn test_non_pdf_files_ignored() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), "not a pdf").unwrap();
    fs::write(dir.path().join("paper.PDF.bak"), "backup").unwrap();
    fs::create_dir(dir.path().join("nested.pdf")).unwrap();

    let loaded = load_documents(dir.path()).unwrap();

    assert_eq!(loaded.context, "");
    assert!(loaded.document_names.is_empty());
}

#[test]
fn test_corrupt_pdf_names_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.pdf"), "this is not a pdf").unwrap();

    let err = load_documents(dir.path()).unwrap_err();

    match err {
        Error::Pdf { path, .. } => assert!(path.ends_with("broken.pdf")),
        other => panic!("expected Pdf error, got {other:?}"),
    }
}
