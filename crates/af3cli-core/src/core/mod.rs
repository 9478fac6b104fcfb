//! # Core Module
//!
//! The foundation of af3cli: the job model and its file formats.
//!
//! - **Job Representation** ([`models`]) - Sequences, ligands, bonds, templates, MSAs,
//!   the identifier register and the document assembler
//! - **File I/O** ([`io`]) - JSON job files, FASTA sequence sources and CSV ligand tables

pub mod io;
pub mod models;
