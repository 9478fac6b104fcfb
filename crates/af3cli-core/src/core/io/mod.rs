//! Reading and writing job descriptions and their auxiliary inputs.
//!
//! The JSON dialect consumed by the structure predictor is handled by
//! [`json::JsonFile`] behind the [`traits::DocumentFile`] interface. FASTA
//! files supply polymer sequences and CSV ligand tables supply screening
//! candidates.

pub mod fasta;
pub mod json;
pub mod ligand_table;
pub mod traits;
