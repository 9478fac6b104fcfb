use super::entity::{IdHolder, Identifiable};
use super::error::ModelError;
use super::msa::Msa;
use super::projection::Projection;
use super::template::Template;
use serde_json::{Map, Value, json};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceType {
    Protein,
    Rna,
    Dna,
}

impl SequenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SequenceType::Protein => "protein",
            SequenceType::Rna => "rna",
            SequenceType::Dna => "dna",
        }
    }
}

impl FromStr for SequenceType {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "protein" => Ok(SequenceType::Protein),
            "rna" => Ok(SequenceType::Rna),
            "dna" => Ok(SequenceType::Dna),
            _ => Err(ModelError::ParseSequenceType(s.to_string())),
        }
    }
}

impl fmt::Display for SequenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position-anchored chemical modification of a polymer residue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modification {
    /// Post-translational modification of a protein residue (CCD code + 1-based position).
    Residue { ptm_type: String, position: u32 },
    /// Modified base of an RNA or DNA nucleotide (CCD code + 1-based position).
    Nucleotide {
        modification_type: String,
        position: u32,
    },
}

impl Modification {
    pub fn residue(ptm_type: impl Into<String>, position: u32) -> Self {
        Modification::Residue {
            ptm_type: ptm_type.into(),
            position,
        }
    }

    pub fn nucleotide(modification_type: impl Into<String>, position: u32) -> Self {
        Modification::Nucleotide {
            modification_type: modification_type.into(),
            position,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Modification::Residue { ptm_type, .. } => ptm_type,
            Modification::Nucleotide {
                modification_type, ..
            } => modification_type,
        }
    }

    pub fn position(&self) -> u32 {
        match self {
            Modification::Residue { position, .. } | Modification::Nucleotide { position, .. } => {
                *position
            }
        }
    }
}

impl Projection for Modification {
    fn to_value(&self) -> Value {
        match self {
            Modification::Residue { ptm_type, position } => json!({
                "ptmType": ptm_type,
                "ptmPosition": position,
            }),
            Modification::Nucleotide {
                modification_type,
                position,
            } => json!({
                "modificationType": modification_type,
                "basePosition": position,
            }),
        }
    }
}

/// A protein, RNA or DNA chain entry of the job, possibly with several copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    seq_type: SequenceType,
    sequence: String,
    modifications: Vec<Modification>,
    templates: Vec<Template>,
    msa: Option<Msa>,
    id_holder: IdHolder,
}

impl Sequence {
    /// Creates a single-copy sequence without explicit identifiers.
    pub fn new(seq_type: SequenceType, sequence: impl Into<String>) -> Self {
        Self {
            seq_type,
            sequence: sequence.into(),
            modifications: Vec::new(),
            templates: Vec::new(),
            msa: None,
            id_holder: IdHolder::default(),
        }
    }

    pub fn protein(sequence: impl Into<String>) -> Self {
        Self::new(SequenceType::Protein, sequence)
    }

    pub fn rna(sequence: impl Into<String>) -> Self {
        Self::new(SequenceType::Rna, sequence)
    }

    pub fn dna(sequence: impl Into<String>) -> Self {
        Self::new(SequenceType::Dna, sequence)
    }

    pub fn builder(seq_type: SequenceType, sequence: impl Into<String>) -> SequenceBuilder {
        SequenceBuilder::new(seq_type, sequence)
    }

    pub fn seq_type(&self) -> SequenceType {
        self.seq_type
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn modifications(&self) -> &[Modification] {
        &self.modifications
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn msa(&self) -> Option<&Msa> {
        self.msa.as_ref()
    }
}

impl Identifiable for Sequence {
    fn id_holder(&self) -> &IdHolder {
        &self.id_holder
    }

    fn id_holder_mut(&mut self) -> &mut IdHolder {
        &mut self.id_holder
    }
}

impl Projection for Sequence {
    fn to_value(&self) -> Value {
        let mut detail = Map::new();
        detail.insert("id".to_string(), json!(self.ids().unwrap_or_default()));
        detail.insert("sequence".to_string(), Value::String(self.sequence.clone()));
        if !self.modifications.is_empty() {
            detail.insert(
                "modifications".to_string(),
                Value::Array(self.modifications.iter().map(Projection::to_value).collect()),
            );
        }
        if !self.templates.is_empty() {
            detail.insert(
                "templates".to_string(),
                Value::Array(self.templates.iter().map(Projection::to_value).collect()),
            );
        }
        if let Some(msa) = &self.msa {
            msa.merge_into(&mut detail);
        }

        let mut entry = Map::new();
        entry.insert(self.seq_type.as_str().to_string(), Value::Object(detail));
        Value::Object(entry)
    }
}

/// Step-by-step construction of a [`Sequence`] with its optional parts.
#[derive(Debug, Clone)]
pub struct SequenceBuilder {
    seq_type: SequenceType,
    sequence: String,
    ids: Option<Vec<String>>,
    copies: Option<usize>,
    modifications: Vec<Modification>,
    templates: Vec<Template>,
    msa: Option<Msa>,
}

impl SequenceBuilder {
    pub fn new(seq_type: SequenceType, sequence: impl Into<String>) -> Self {
        Self {
            seq_type,
            sequence: sequence.into(),
            ids: None,
            copies: None,
            modifications: Vec::new(),
            templates: Vec::new(),
            msa: None,
        }
    }

    pub fn ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn copies(mut self, copies: usize) -> Self {
        self.copies = Some(copies);
        self
    }

    pub fn modification(mut self, modification: Modification) -> Self {
        self.modifications.push(modification);
        self
    }

    pub fn modifications(mut self, modifications: Vec<Modification>) -> Self {
        self.modifications.extend(modifications);
        self
    }

    pub fn template(mut self, template: Template) -> Self {
        self.templates.push(template);
        self
    }

    pub fn templates(mut self, templates: Vec<Template>) -> Self {
        self.templates.extend(templates);
        self
    }

    pub fn msa(mut self, msa: Msa) -> Self {
        self.msa = Some(msa);
        self
    }

    pub fn build(self) -> Result<Sequence, ModelError> {
        if !self.templates.is_empty() && self.seq_type != SequenceType::Protein {
            return Err(ModelError::TemplateNotSupported(self.seq_type));
        }
        let id_holder = IdHolder::new(self.ids, self.copies)?;
        Ok(Sequence {
            seq_type: self.seq_type,
            sequence: self.sequence,
            modifications: self.modifications,
            templates: self.templates,
            msa: self.msa,
            id_holder,
        })
    }
}
