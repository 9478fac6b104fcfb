use super::sequence::SequenceType;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ModelError {
    #[error("Expected {expected} identifier(s) but {found} were supplied")]
    IdCountMismatch { expected: usize, found: usize },

    #[error("An entity must have at least one copy")]
    ZeroCopies,

    #[error("Templates are only supported for protein sequences, not {0}")]
    TemplateNotSupported(SequenceType),

    #[error("A document requires at least one model seed")]
    EmptySeeds,

    #[error("Invalid atom specification '{0}'. Expected 'ENTITY:RESIDUE:ATOM' (e.g., 'A:1:CA').")]
    InvalidAtomSpec(String),

    #[error("Invalid sequence type '{0}'. Expected 'protein', 'rna' or 'dna'.")]
    ParseSequenceType(String),

    #[error("Invalid template type '{0}'. Expected 'mmcif' or 'mmcifPath'.")]
    ParseTemplateType(String),
}
