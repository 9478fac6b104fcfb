use super::bond::Bond;
use super::entity::Identifiable;
use super::error::ModelError;
use super::ids::IdRegister;
use super::ligand::Ligand;
use super::projection::Projection;
use super::sequence::Sequence;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

pub const DEFAULT_NAME: &str = "job";
pub const DEFAULT_VERSION: u32 = 1;
pub const DEFAULT_DIALECT: &str = "alphafold3";
pub const DEFAULT_SEED: u32 = 1;

/// The root of an AlphaFold3 job description.
///
/// Sequences and ligands are kept in insertion order. Chain identifiers are
/// assigned lazily: [`Document::to_value`] first reconciles every entity
/// against the document's [`IdRegister`], registering explicit identifiers
/// and generating the missing ones, then projects the whole document.
/// Reconciliation only touches entities that are not registered yet, so
/// repeated projections are identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    version: u32,
    dialect: String,
    seeds: Vec<u32>,
    user_ccd: Option<String>,
    sequences: Vec<Sequence>,
    ligands: Vec<Ligand>,
    bonds: Vec<Bond>,
    register: IdRegister,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            version: DEFAULT_VERSION,
            dialect: DEFAULT_DIALECT.to_string(),
            seeds: vec![DEFAULT_SEED],
            user_ccd: None,
            sequences: Vec::new(),
            ligands: Vec::new(),
            bonds: Vec::new(),
            register: IdRegister::new(),
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn set_version(&mut self, version: u32) {
        self.version = version;
    }

    pub fn dialect(&self) -> &str {
        &self.dialect
    }

    pub fn set_dialect(&mut self, dialect: impl Into<String>) {
        self.dialect = dialect.into();
    }

    pub fn seeds(&self) -> &[u32] {
        &self.seeds
    }

    /// Replaces the model seeds.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptySeeds`] if `seeds` is empty; the previous
    /// seeds are kept in that case.
    pub fn set_seeds(&mut self, seeds: Vec<u32>) -> Result<(), ModelError> {
        if seeds.is_empty() {
            return Err(ModelError::EmptySeeds);
        }
        self.seeds = seeds;
        Ok(())
    }

    pub fn user_ccd(&self) -> Option<&str> {
        self.user_ccd.as_deref()
    }

    pub fn set_user_ccd(&mut self, user_ccd: Option<String>) {
        self.user_ccd = user_ccd;
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn ligands(&self) -> &[Ligand] {
        &self.ligands
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn register(&self) -> &IdRegister {
        &self.register
    }

    pub fn add_sequence(&mut self, sequence: Sequence) {
        self.sequences.push(sequence);
    }

    pub fn add_ligand(&mut self, ligand: Ligand) {
        self.ligands.push(ligand);
    }

    pub fn add_bond(&mut self, bond: Bond) {
        self.bonds.push(bond);
    }

    /// Removes a sequence. Identifiers already handed out stay consumed;
    /// call [`Document::reset_ids`] to re-derive them in the new order.
    pub fn remove_sequence(&mut self, index: usize) -> Option<Sequence> {
        (index < self.sequences.len()).then(|| self.sequences.remove(index))
    }

    /// Removes a ligand. See [`Document::remove_sequence`].
    pub fn remove_ligand(&mut self, index: usize) -> Option<Ligand> {
        (index < self.ligands.len()).then(|| self.ligands.remove(index))
    }

    /// Total number of chain copies across all sequences and ligands.
    pub fn num_chains(&self) -> usize {
        self.entities().map(|e| e.num()).sum()
    }

    fn entities(&self) -> impl Iterator<Item = &dyn Identifiable> {
        self.sequences
            .iter()
            .map(|s| s as &dyn Identifiable)
            .chain(self.ligands.iter().map(|l| l as &dyn Identifiable))
    }

    /// Brings every entity to exactly `num` identifiers.
    ///
    /// Entities are visited sequences first, then ligands, each in insertion
    /// order. Explicit identifiers are registered before any generation takes
    /// place so that generated ones never collide with them.
    pub fn reconcile_ids(&mut self) {
        let Self {
            sequences,
            ligands,
            register,
            ..
        } = self;

        let mut entities: Vec<&mut dyn Identifiable> = sequences
            .iter_mut()
            .map(|s| s as &mut dyn Identifiable)
            .chain(ligands.iter_mut().map(|l| l as &mut dyn Identifiable))
            .collect();

        for entity in entities.iter_mut() {
            if entity.is_registered() {
                continue;
            }
            let Some(ids) = entity.ids() else {
                continue;
            };
            for id in ids {
                if register.contains(id) {
                    warn!("Identifier '{}' is already in use by another entity.", id);
                }
                register.register(id.as_str());
            }
            entity.id_holder_mut().mark_registered();
        }

        for entity in entities.iter_mut() {
            if entity.ids().is_some() {
                continue;
            }
            let ids: Vec<String> = (0..entity.num()).map(|_| register.generate()).collect();
            debug!("Assigned generated identifiers {:?}.", ids);
            entity.id_holder_mut().assign_generated(ids);
        }
    }

    /// Clears the identifiers of every entity and resets the register.
    pub fn reset_ids(&mut self) {
        for sequence in self.sequences.iter_mut() {
            sequence.clear_ids();
        }
        for ligand in self.ligands.iter_mut() {
            ligand.clear_ids();
        }
        self.register.reset();
    }

    /// Reconciles identifiers and projects the document into the JSON dialect.
    pub fn to_value(&mut self) -> Value {
        self.reconcile_ids();

        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(self.name.clone()));
        map.insert("version".to_string(), json!(self.version));
        map.insert("dialect".to_string(), Value::String(self.dialect.clone()));
        map.insert("modelSeeds".to_string(), json!(self.seeds));

        let entries = self
            .sequences
            .iter()
            .map(Projection::to_value)
            .chain(self.ligands.iter().map(Projection::to_value))
            .collect();
        map.insert("sequences".to_string(), Value::Array(entries));

        if !self.bonds.is_empty() {
            map.insert(
                "bondedAtomPairs".to_string(),
                Value::Array(self.bonds.iter().map(Projection::to_value).collect()),
            );
        }
        if let Some(user_ccd) = &self.user_ccd {
            map.insert("userCCD".to_string(), Value::String(user_ccd.clone()));
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::bond::Atom;
    use crate::core::models::ligand::LigandDefinition;
    use crate::core::models::sequence::SequenceType;
    use std::collections::HashSet;

    fn ids_of(value: &Value, index: usize) -> Vec<String> {
        let entry = value["sequences"][index].as_object().unwrap();
        let (_, detail) = entry.iter().next().unwrap();
        detail["id"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    }

    fn hexamer_with_ligand() -> Document {
        let mut doc = Document::new();
        doc.add_sequence(
            Sequence::builder(SequenceType::Protein, "GIVEQCCTSICSLYQLENYCN")
                .copies(6)
                .build()
                .unwrap(),
        );
        doc.add_ligand(Ligand::ccd(["ZN"]));
        doc
    }

    #[test]
    fn new_document_has_defaults() {
        let doc = Document::new();
        assert_eq!(doc.name(), "job");
        assert_eq!(doc.version(), 1);
        assert_eq!(doc.dialect(), "alphafold3");
        assert_eq!(doc.seeds(), [1]);
        assert!(doc.user_ccd().is_none());
        assert_eq!(doc.num_chains(), 0);
    }

    #[test]
    fn set_seeds_rejects_empty_list() {
        let mut doc = Document::new();
        doc.set_seeds(vec![3, 4]).unwrap();
        assert_eq!(doc.set_seeds(Vec::new()), Err(ModelError::EmptySeeds));
        assert_eq!(doc.seeds(), [3, 4]);
    }

    #[test]
    fn ligands_continue_after_sequences() {
        let mut doc = hexamer_with_ligand();
        let value = doc.to_value();
        let entries = value["sequences"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(ids_of(&value, 0), ["A", "B", "C", "D", "E", "F"]);
        assert_eq!(ids_of(&value, 1), ["G"]);
        assert_eq!(doc.num_chains(), 7);
    }

    #[test]
    fn explicit_ids_are_kept_and_skipped_by_generation() {
        let mut doc = Document::new();
        doc.add_sequence(Sequence::protein("MVK"));
        doc.add_sequence(
            Sequence::builder(SequenceType::Protein, "GGG")
                .ids(["B", "C"])
                .build()
                .unwrap(),
        );
        doc.add_ligand(Ligand::smiles("CCO"));
        let value = doc.to_value();
        assert_eq!(ids_of(&value, 0), ["A"]);
        assert_eq!(ids_of(&value, 1), ["B", "C"]);
        assert_eq!(ids_of(&value, 2), ["D"]);
    }

    #[test]
    fn explicit_ids_on_later_entities_are_reserved_first() {
        let mut doc = Document::new();
        doc.add_sequence(Sequence::builder(SequenceType::Rna, "AUG").copies(2).build().unwrap());
        let ligand =
            Ligand::new(LigandDefinition::Smiles("O".into()), Some(vec!["A".into()]), None);
        doc.add_ligand(ligand.unwrap());
        let value = doc.to_value();
        assert_eq!(ids_of(&value, 0), ["B", "C"]);
        assert_eq!(ids_of(&value, 1), ["A"]);
    }

    #[test]
    fn projection_is_idempotent() {
        let mut doc = hexamer_with_ligand();
        doc.add_bond(Bond::new(Atom::new("A", 6, "SG"), Atom::new("B", 11, "SG")));
        let first = serde_json::to_string(&doc.to_value()).unwrap();
        let count_after_first = doc.register().count();
        let second = serde_json::to_string(&doc.to_value()).unwrap();
        assert_eq!(first, second);
        assert_eq!(doc.register().count(), count_after_first);
    }

    #[test]
    fn entities_added_later_continue_numbering() {
        let mut doc = hexamer_with_ligand();
        doc.to_value();
        doc.add_sequence(Sequence::dna("GCGAATTCG"));
        let value = doc.to_value();
        assert_eq!(ids_of(&value, 1), ["H"]);
        assert_eq!(ids_of(&value, 2), ["G"]);
    }

    #[test]
    fn all_identifiers_are_unique_after_projection() {
        let mut doc = Document::new();
        doc.add_sequence(Sequence::builder(SequenceType::Protein, "M").copies(30).build().unwrap());
        doc.add_sequence(
            Sequence::builder(SequenceType::Dna, "ACGT")
                .ids(["AB", "F"])
                .build()
                .unwrap(),
        );
        let heme = Ligand::new(LigandDefinition::Ccd(vec!["HEM".into()]), None, Some(3));
        doc.add_ligand(heme.unwrap());
        doc.to_value();

        let all: Vec<&String> = doc
            .sequences()
            .iter()
            .flat_map(|s| s.ids().unwrap())
            .chain(doc.ligands().iter().flat_map(|l| l.ids().unwrap()))
            .collect();
        let unique: HashSet<&String> = all.iter().copied().collect();
        assert_eq!(all.len(), 35);
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn reset_ids_regenerates_in_current_order() {
        let mut doc = Document::new();
        doc.add_sequence(Sequence::protein("AAA"));
        doc.add_sequence(Sequence::protein("CCC"));
        doc.add_ligand(Ligand::smiles("C"));
        doc.to_value();

        let removed = doc.remove_sequence(0).unwrap();
        assert_eq!(removed.sequence(), "AAA");
        assert!(doc.remove_sequence(5).is_none());

        doc.reset_ids();
        assert!(doc.register().is_empty());
        assert!(doc.sequences()[0].ids().is_none());

        let value = doc.to_value();
        assert_eq!(ids_of(&value, 0), ["A"]);
        assert_eq!(ids_of(&value, 1), ["B"]);
    }

    #[test]
    fn optional_top_level_keys_appear_only_when_set() {
        let mut doc = Document::new();
        doc.add_sequence(Sequence::protein("MVK"));
        let value = doc.to_value();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["name", "version", "dialect", "modelSeeds", "sequences"]);

        doc.add_bond(Bond::new(Atom::new("A", 1, "CA"), Atom::new("A", 2, "CA")));
        doc.set_user_ccd(Some("data_MYL".into()));
        let value = doc.to_value();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            [
                "name",
                "version",
                "dialect",
                "modelSeeds",
                "sequences",
                "bondedAtomPairs",
                "userCCD"
            ]
        );
        assert_eq!(value["bondedAtomPairs"], json!([["A", 1, "CA", "A", 2, "CA"]]));
        assert_eq!(value["userCCD"], "data_MYL");
    }

    #[test]
    fn set_ids_after_projection_registers_new_values() {
        let mut doc = Document::new();
        doc.add_sequence(Sequence::protein("MVK"));
        doc.to_value();
        let mut sequence = doc.remove_sequence(0).unwrap();
        sequence.set_ids(vec!["Z".into()]).unwrap();
        doc.add_sequence(sequence);
        doc.add_ligand(Ligand::smiles("C"));
        let value = doc.to_value();
        assert_eq!(ids_of(&value, 0), ["Z"]);
        assert_eq!(ids_of(&value, 1), ["B"]);
        assert!(doc.register().contains("Z"));
    }
}
