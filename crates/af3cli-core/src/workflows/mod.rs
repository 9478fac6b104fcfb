//! # Workflows Module
//!
//! Higher-level procedures that drive the job model end to end.
//!
//! - **Screening** ([`screen`]) - Expands one base job into one job per
//!   candidate ligand, each with its own name and reconciled chain ids.
//! - **Progress** ([`progress`]) - Event type and reporter used by the
//!   workflows to inform a front end about their advancement.

pub mod progress;
pub mod screen;
