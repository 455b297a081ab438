//! Text extraction for uploaded resumes.
//!
//! The format is decided by the file name suffix and is a closed set:
//! PDF, DOCX, plain text, or `Unknown`. Unknown files extract to empty text
//! instead of failing, so they simply score zero against any job description.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse PDF: {0}")]
    Pdf(String),

    #[error("failed to parse DOCX: {0}")]
    Docx(String),

    #[error("plain text file is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("extraction task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
    Unknown,
}

impl DocumentFormat {
    /// Suffix match on the file name. Case-sensitive: `CV.PDF` is `Unknown`.
    pub fn from_path(path: &Path) -> Self {
        let name = path.to_string_lossy();
        if name.ends_with(".pdf") {
            DocumentFormat::Pdf
        } else if name.ends_with(".docx") {
            DocumentFormat::Docx
        } else if name.ends_with(".txt") {
            DocumentFormat::PlainText
        } else {
            DocumentFormat::Unknown
        }
    }

    /// Extracts text from the raw file contents.
    pub fn extract_text(self, bytes: &[u8]) -> Result<String, ExtractError> {
        match self {
            DocumentFormat::Pdf => extract_pdf(bytes),
            DocumentFormat::Docx => extract_docx(bytes),
            DocumentFormat::PlainText => Ok(String::from_utf8(bytes.to_vec())?),
            DocumentFormat::Unknown => Ok(String::new()),
        }
    }
}

/// Reads the file at `path` and returns its text.
pub async fn extract(path: &Path) -> Result<String, ExtractError> {
    let format = DocumentFormat::from_path(path);
    if format == DocumentFormat::Unknown {
        debug!("Unrecognized resume format for {}", path.display());
        return Ok(String::new());
    }

    let bytes = tokio::fs::read(path).await?;
    tokio::task::spawn_blocking(move || format.extract_text(&bytes))
        .await
        .map_err(|e| ExtractError::Task(e.to_string()))?
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract walks every page and concatenates their text.
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    use docx_rs::DocumentChild;

    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut text = String::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => push_paragraph(&mut text, paragraph),
            DocumentChild::Table(table) => push_table(&mut text, table),
            DocumentChild::StructuredDataTag(tag) => push_tag(&mut text, tag),
            _ => {}
        }
    }
    Ok(text)
}

/// One line per paragraph, wherever the paragraph sits.
fn push_paragraph(text: &mut String, paragraph: &docx_rs::Paragraph) {
    push_paragraph_children(text, &paragraph.children);
    text.push('\n');
}

fn push_paragraph_children(text: &mut String, children: &[docx_rs::ParagraphChild]) {
    use docx_rs::{InsertChild, ParagraphChild};

    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(text, run),
            ParagraphChild::Hyperlink(link) => push_paragraph_children(text, &link.children),
            ParagraphChild::Insert(insert) => {
                for insert_child in &insert.children {
                    if let InsertChild::Run(run) = insert_child {
                        push_run(text, run);
                    }
                }
            }
            ParagraphChild::StructuredDataTag(tag) => push_tag(text, tag),
            _ => {}
        }
    }
}

fn push_run(text: &mut String, run: &docx_rs::Run) {
    use docx_rs::RunChild;

    for child in &run.children {
        match child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}

fn push_table(text: &mut String, table: &docx_rs::Table) {
    use docx_rs::{TableCellContent, TableChild, TableRowChild};

    for TableChild::TableRow(row) in &table.rows {
        for TableRowChild::TableCell(cell) in &row.cells {
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => push_paragraph(text, paragraph),
                    TableCellContent::Table(nested) => push_table(text, nested),
                    TableCellContent::StructuredDataTag(tag) => push_tag(text, tag),
                    _ => {}
                }
            }
        }
    }
}

fn push_tag(text: &mut String, tag: &docx_rs::StructuredDataTag) {
    use docx_rs::StructuredDataTagChild;

    for child in &tag.children {
        match child {
            StructuredDataTagChild::Run(run) => push_run(text, run),
            StructuredDataTagChild::Paragraph(paragraph) => push_paragraph(text, paragraph),
            StructuredDataTagChild::Table(table) => push_table(text, table),
            StructuredDataTagChild::StructuredDataTag(nested) => push_tag(text, nested),
            _ => {}
        }
    }
}
