use super::bond::Bond;
use super::document::Document;
use super::error::ModelError;
use super::ligand::Ligand;
use super::sequence::Sequence;

/// Incremental construction of a [`Document`].
pub struct InputBuilder {
    document: Document,

    // --- Deferred so that an empty seed list is reported once, at build time ---
    seeds: Option<Vec<u32>>,
}

impl Default for InputBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBuilder {
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            seeds: None,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.document.set_name(name);
        self
    }

    pub fn set_version(&mut self, version: u32) -> &mut Self {
        self.document.set_version(version);
        self
    }

    pub fn set_dialect(&mut self, dialect: impl Into<String>) -> &mut Self {
        self.document.set_dialect(dialect);
        self
    }

    pub fn set_seeds(&mut self, seeds: Vec<u32>) -> &mut Self {
        self.seeds = Some(seeds);
        self
    }

    pub fn add_sequence(&mut self, sequence: Sequence) -> &mut Self {
        self.document.add_sequence(sequence);
        self
    }

    pub fn add_ligand(&mut self, ligand: Ligand) -> &mut Self {
        self.document.add_ligand(ligand);
        self
    }

    pub fn add_bonded_atom_pair(&mut self, bond: Bond) -> &mut Self {
        self.document.add_bond(bond);
        self
    }

    pub fn add_user_ccd(&mut self, user_ccd: impl Into<String>) -> &mut Self {
        self.document.set_user_ccd(Some(user_ccd.into()));
        self
    }

    pub fn build(self) -> Result<Document, ModelError> {
        let mut document = self.document;
        if let Some(seeds) = self.seeds {
            document.set_seeds(seeds)?;
        }
        Ok(document)
    }
}
