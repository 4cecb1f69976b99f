//! Context assembly: one append-only pass over retained files.
//!
//! Each record becomes a boundary line naming its path, the decoded content
//! and a blank line. There is no reordering, no deduplication and no global
//! cap; the total is bounded by the per-file ceiling times the number of
//! accepted files.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::domain::{FileRecord, Result};

/// Instruction header for the architecture review.
pub const REVIEW_HEADER: &str = "You are a senior technical architect. \
Below is the source code for a project.\n\
1. Summarize the project's core architecture.\n\
2. Rate it (1-10) based on code quality and documentation.\n\
3. Suggest 3 specific code improvements.\n";

/// Assembled prompt text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptDocument {
    text: String,
    file_count: usize,
}

impl PromptDocument {
    pub fn new(header: &str) -> Self {
        PromptDocument {
            text: header.to_string(),
            file_count: 0,
        }
    }

    pub fn append_file(&mut self, record: &FileRecord) {
        self.text.push_str("--- FILE: ");
        self.text.push_str(&record.path);
        self.text.push_str(" ---\n");
        self.text.push_str(&record.content);
        self.text.push_str("\n\n");
        self.file_count += 1;
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// Size in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// SHA-256 of the document, hex-encoded.
    pub fn digest(&self) -> String {
        sha256_hex(&self.text)
    }

    /// Write the document as UTF-8, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.text.as_bytes())?;
        Ok(())
    }
}

/// SHA-256 of `text`, hex-encoded.
pub fn sha256_hex(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Build a document from `records` in the order given.
pub fn assemble<'a, I>(header: &str, records: I) -> PromptDocument
where
    I: IntoIterator<Item = &'a FileRecord>,
{
    let mut doc = PromptDocument::new(header);
    for record in records {
        doc.append_file(record);
    }
    doc
}
