//! # Core Models Module
//!
//! Data structures describing an AlphaFold3 job and the bookkeeping needed to
//! give every chain a unique identifier.
//!
//! ## Key Components
//!
//! - [`ids`] - Bijective base-26 identifier encoding and the per-document [`ids::IdRegister`]
//! - [`entity`] - The [`entity::Identifiable`] capability shared by sequences and ligands
//! - [`sequence`] - Protein, RNA and DNA entries with modifications, templates and MSAs
//! - [`ligand`] - Small molecules given as SMILES or CCD codes
//! - [`bond`] - Covalent bonds between atoms of different entities
//! - [`document`] - The job root, identifier reconciliation and JSON projection
//! - [`builder`] - Fluent construction of documents
//!
//! ## Usage
//!
//! ```ignore
//! use af3cli::core::models::builder::InputBuilder;
//! use af3cli::core::models::ligand::Ligand;
//! use af3cli::core::models::sequence::{Sequence, SequenceType};
//!
//! let mut builder = InputBuilder::new();
//! builder
//!     .set_name("insulin_job")
//!     .add_sequence(Sequence::builder(SequenceType::Protein, "GIVEQCCTSICSLYQLENYCN").copies(6).build()?)
//!     .add_ligand(Ligand::ccd(["ZN"]));
//! let mut document = builder.build()?;
//! let json = document.to_value();
//! ```

pub mod bond;
pub mod builder;
pub mod document;
pub mod entity;
pub mod error;
pub mod ids;
pub mod ligand;
pub mod msa;
pub mod projection;
pub mod sequence;
pub mod template;
