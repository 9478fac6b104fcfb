use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: FastaParseErrorKind,
    },
    #[error("Record '{header}' has no sequence data")]
    EmptySequence { header: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FastaParseErrorKind {
    #[error("Sequence data appears before any '>' header")]
    MissingHeader,
    #[error("Header line is empty")]
    EmptyHeader,
}

/// One `>`-delimited record of a FASTA file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub header: String,
    pub sequence: String,
}

impl FastaRecord {
    /// The first whitespace-separated token of the header.
    pub fn id(&self) -> &str {
        self.header.split_whitespace().next().unwrap_or("")
    }
}

fn finish_record(header: String, sequence: String) -> Result<FastaRecord, FastaError> {
    if sequence.is_empty() {
        return Err(FastaError::EmptySequence { header });
    }
    Ok(FastaRecord { header, sequence })
}

/// Reads every record from a FASTA stream.
///
/// Sequence lines are concatenated with whitespace removed. Blank lines and
/// lines starting with `;` are ignored.
pub fn read_records(reader: &mut impl BufRead) -> Result<Vec<FastaRecord>, FastaError> {
    let mut records = Vec::new();
    let mut current: Option<(String, String)> = None;

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = line_num + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with(';') {
            continue;
        }

        if let Some(header) = trimmed.strip_prefix('>') {
            let header = header.trim();
            if header.is_empty() {
                return Err(FastaError::Parse {
                    line: line_num,
                    kind: FastaParseErrorKind::EmptyHeader,
                });
            }
            if let Some((prev_header, prev_sequence)) = current.take() {
                records.push(finish_record(prev_header, prev_sequence)?);
            }
            current = Some((header.to_string(), String::new()));
            continue;
        }

        match current.as_mut() {
            Some((_, sequence)) => {
                sequence.extend(trimmed.chars().filter(|c| !c.is_whitespace()));
            }
            None => {
                return Err(FastaError::Parse {
                    line: line_num,
                    kind: FastaParseErrorKind::MissingHeader,
                });
            }
        }
    }

    if let Some((header, sequence)) = current {
        records.push(finish_record(header, sequence)?);
    }
    Ok(records)
}

pub fn read_records_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<FastaRecord>, FastaError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    read_records(&mut reader)
}
