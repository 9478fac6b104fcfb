//! # af3cli Core Library
//!
//! Assembles AlphaFold3 job description files: biological sequences, ligands,
//! covalent bonds, structural templates and alignment data are collected into
//! one document, given unique chain identifiers, and serialized into the JSON
//! input dialect.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** The job model (`Document`, `Sequence`, `Ligand`, ...),
//!   the chain identifier register, and the readers and writers for JSON, FASTA and CSV.
//!
//! - **[`workflows`]: The Public API.** Higher-level procedures built on the model,
//!   such as generating one job per ligand for a screening campaign.

pub mod core;
pub mod workflows;
