//! Plain-text matrix archives.
//!
//! An archive is a sequence of sections separated by `-----` lines. Each
//! section starts with a title line followed by one bracketed row per
//! line, e.g. `[1, 0, 1]`. Lines that are neither are ignored, as are
//! sections without any rows.

use crate::{GfMatrix, MatrixError};

#[derive(Clone, Debug)]
pub struct ArchiveEntry {
    pub title: String,
    pub matrix: GfMatrix,
}

/// Parse every well-formed matrix section out of `content`.
pub fn parse_archive(content: &str) -> Result<Vec<ArchiveEntry>, MatrixError> {
    let mut entries = Vec::new();

    for section in content.split("-----") {
        let section = section.trim();
        if section.is_empty() {
            continue;
        }

        let mut lines = section.lines().map(str::trim);
        let title = match lines.find(|l| !l.is_empty()) {
            Some(t) => t.to_string(),
            None => continue,
        };

        let rows: Vec<Vec<String>> = section
            .lines()
            .map(str::trim)
            .filter(|l| l.starts_with('[') && l.ends_with(']'))
            .map(|l| {
                l.trim_matches(['[', ']'])
                    .split([',', ' ', '\t'])
                    .filter(|e| !e.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .collect();

        if rows.is_empty() {
            continue;
        }

        entries.push(ArchiveEntry {
            title,
            matrix: GfMatrix::parse_entries(&rows)?,
        });
    }

    Ok(entries)
}
