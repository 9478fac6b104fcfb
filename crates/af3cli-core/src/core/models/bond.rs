use super::error::ModelError;
use super::projection::Projection;
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;

/// Reference to one atom of an entity: chain id, 1-based residue index and atom name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom {
    pub entity_id: String,
    pub residue: u32,
    pub name: String,
}

impl Atom {
    pub fn new(entity_id: impl Into<String>, residue: u32, name: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            residue,
            name: name.into(),
        }
    }
}

impl FromStr for Atom {
    type Err = ModelError;

    /// Parses the `ENTITY:RESIDUE:ATOM` form, e.g. `A:1:CA`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidAtomSpec(s.to_string());
        let mut parts = s.trim().split(':');
        let (Some(entity_id), Some(residue), Some(name), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        let (entity_id, residue, name) = (entity_id.trim(), residue.trim(), name.trim());
        if entity_id.is_empty() || name.is_empty() {
            return Err(invalid());
        }
        let residue: u32 = residue.parse().map_err(|_| invalid())?;
        Ok(Atom::new(entity_id, residue, name))
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.entity_id, self.residue, self.name)
    }
}

/// Covalent bond between two atoms, possibly of different entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: Atom,
    pub atom2: Atom,
}

impl Bond {
    pub fn new(atom1: Atom, atom2: Atom) -> Self {
        Self { atom1, atom2 }
    }

    pub fn involves_entity(&self, entity_id: &str) -> bool {
        self.atom1.entity_id == entity_id || self.atom2.entity_id == entity_id
    }
}

impl Projection for Bond {
    fn to_value(&self) -> Value {
        json!([
            self.atom1.entity_id,
            self.atom1.residue,
            self.atom1.name,
            self.atom2.entity_id,
            self.atom2.residue,
            self.atom2.name,
        ])
    }
}
