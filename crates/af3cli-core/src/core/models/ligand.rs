use super::entity::{IdHolder, Identifiable};
use super::error::ModelError;
use super::projection::Projection;
use serde_json::{Map, Value, json};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LigandType {
    Smiles,
    Ccd,
}

impl LigandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LigandType::Smiles => "smiles",
            LigandType::Ccd => "ccdCodes",
        }
    }
}

impl fmt::Display for LigandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LigandDefinition {
    Smiles(String),
    Ccd(Vec<String>), // One or more CCD component codes
}

impl LigandDefinition {
    pub fn ligand_type(&self) -> LigandType {
        match self {
            LigandDefinition::Smiles(_) => LigandType::Smiles,
            LigandDefinition::Ccd(_) => LigandType::Ccd,
        }
    }
}

/// A small molecule entry of the job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ligand {
    definition: LigandDefinition,
    id_holder: IdHolder,
}

impl Ligand {
    pub fn new(
        definition: LigandDefinition,
        ids: Option<Vec<String>>,
        copies: Option<usize>,
    ) -> Result<Self, ModelError> {
        Ok(Self {
            definition,
            id_holder: IdHolder::new(ids, copies)?,
        })
    }

    pub fn smiles(smiles: impl Into<String>) -> Self {
        Self {
            definition: LigandDefinition::Smiles(smiles.into()),
            id_holder: IdHolder::default(),
        }
    }

    pub fn ccd<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            definition: LigandDefinition::Ccd(codes.into_iter().map(Into::into).collect()),
            id_holder: IdHolder::default(),
        }
    }

    pub fn definition(&self) -> &LigandDefinition {
        &self.definition
    }

    pub fn ligand_type(&self) -> LigandType {
        self.definition.ligand_type()
    }
}

impl Identifiable for Ligand {
    fn id_holder(&self) -> &IdHolder {
        &self.id_holder
    }

    fn id_holder_mut(&mut self) -> &mut IdHolder {
        &mut self.id_holder
    }
}

impl Projection for Ligand {
    fn to_value(&self) -> Value {
        let mut detail = Map::new();
        detail.insert("id".to_string(), json!(self.ids().unwrap_or_default()));
        let body = match &self.definition {
            LigandDefinition::Smiles(smiles) => json!(smiles),
            LigandDefinition::Ccd(codes) => json!(codes),
        };
        detail.insert(self.ligand_type().as_str().to_string(), body);

        let mut entry = Map::new();
        entry.insert("ligand".to_string(), Value::Object(detail));
        Value::Object(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ligand_type_strings() {
        assert_eq!(LigandType::Smiles.as_str(), "smiles");
        assert_eq!(LigandType::Ccd.as_str(), "ccdCodes");
        assert_eq!(LigandType::Ccd.to_string(), "ccdCodes");
    }

    #[test]
    fn smiles_ligand_projects_string_body() {
        let mut ligand = Ligand::smiles("[Zn2+]");
        ligand.set_ids(vec!["B".into()]).unwrap();
        assert_eq!(
            ligand.to_value(),
            json!({"ligand": {"id": ["B"], "smiles": "[Zn2+]"}})
        );
    }

    #[test]
    fn ccd_ligand_projects_code_list() {
        let mut ligand = Ligand::ccd(["NAC"]);
        assert_eq!(ligand.ligand_type(), LigandType::Ccd);
        ligand.set_ids(vec!["C".into()]).unwrap();
        assert_eq!(
            ligand.to_value(),
            json!({"ligand": {"id": ["C"], "ccdCodes": ["NAC"]}})
        );
    }

    #[test]
    fn new_validates_identifier_cardinality() {
        let definition = LigandDefinition::Ccd(vec!["ZN".into()]);
        let ligand = Ligand::new(definition.clone(), None, Some(2)).unwrap();
        assert_eq!(ligand.num(), 2);

        let ligand = Ligand::new(definition.clone(), Some(vec!["X".into(), "Y".into()]), None)
            .unwrap();
        assert_eq!(ligand.num(), 2);

        let result = Ligand::new(definition, Some(vec!["X".into()]), Some(2));
        assert_eq!(
            result,
            Err(ModelError::IdCountMismatch {
                expected: 2,
                found: 1
            })
        );
    }
}
