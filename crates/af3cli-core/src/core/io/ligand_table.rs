use crate::core::models::ligand::{Ligand, LigandDefinition};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LigandTableError {
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Invalid ligand on row {row} ('{name}'): {reason}")]
    Row {
        row: usize,
        name: String,
        reason: String,
    },
}

#[derive(Debug, Deserialize)]
struct LigandRow {
    name: String,
    #[serde(default)]
    smiles: Option<String>,
    #[serde(default)]
    ccd: Option<String>,
}

/// A named ligand to be placed into a copy of a base job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreeningCandidate {
    pub name: String,
    pub ligand: Ligand,
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn split_ccd_codes(codes: &str) -> Vec<String> {
    codes
        .split(|c: char| c == ';' || c.is_whitespace())
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

fn row_to_candidate(row: usize, record: LigandRow) -> Result<ScreeningCandidate, LigandTableError> {
    let name = record.name.trim().to_string();
    let row_error = |reason: &str| LigandTableError::Row {
        row,
        name: name.clone(),
        reason: reason.to_string(),
    };
    if name.is_empty() {
        return Err(row_error("candidate name is empty"));
    }

    let definition = match (non_empty(record.smiles), non_empty(record.ccd)) {
        (Some(smiles), None) => LigandDefinition::Smiles(smiles),
        (None, Some(codes)) => LigandDefinition::Ccd(split_ccd_codes(&codes)),
        (Some(_), Some(_)) => return Err(row_error("both 'smiles' and 'ccd' are set")),
        (None, None) => return Err(row_error("one of 'smiles' or 'ccd' is required")),
    };

    let ligand = Ligand::new(definition, None, None).map_err(|e| row_error(&e.to_string()))?;
    Ok(ScreeningCandidate { name, ligand })
}

fn read_rows<R: Read>(
    mut reader: csv::Reader<R>,
    label: &str,
) -> Result<Vec<ScreeningCandidate>, LigandTableError> {
    let mut candidates = Vec::new();
    let mut seen = HashSet::new();
    for (index, result) in reader.deserialize::<LigandRow>().enumerate() {
        let record = result.map_err(|e| LigandTableError::Csv {
            path: label.to_string(),
            source: e,
        })?;
        // Row 1 is the header line.
        let candidate = row_to_candidate(index + 2, record)?;
        if !seen.insert(candidate.name.clone()) {
            return Err(LigandTableError::Row {
                row: index + 2,
                name: candidate.name,
                reason: "duplicate candidate name".to_string(),
            });
        }
        candidates.push(candidate);
    }
    Ok(candidates)
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.trim(csv::Trim::All).comment(Some(b'#'));
    builder
}

/// Loads screening candidates from a CSV file with a `name` column and one of
/// `smiles` or `ccd` per row.
pub fn load(path: &Path) -> Result<Vec<ScreeningCandidate>, LigandTableError> {
    let label = path.to_string_lossy().to_string();
    let reader = reader_builder()
        .from_path(path)
        .map_err(|e| LigandTableError::Csv {
            path: label.clone(),
            source: e,
        })?;
    read_rows(reader, &label)
}

pub fn read_from(reader: impl Read) -> Result<Vec<ScreeningCandidate>, LigandTableError> {
    read_rows(reader_builder().from_reader(reader), "<stream>")
}
