use crate::core::io::traits::DocumentFile;
use crate::core::models::bond::{Atom, Bond};
use crate::core::models::document::Document;
use crate::core::models::error::ModelError;
use crate::core::models::ligand::{Ligand, LigandDefinition};
use crate::core::models::msa::{Msa, MsaSource};
use crate::core::models::sequence::{Modification, Sequence, SequenceType};
use crate::core::models::template::{Template, TemplateType};
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::debug;

const INDENT: &[u8] = b"    ";

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Missing required field '{field}' in {context}")]
    MissingField {
        context: &'static str,
        field: &'static str,
    },
    #[error("Invalid MSA definition: {0}")]
    Msa(String),
    #[error("Invalid template definition: {0}")]
    Template(String),
    #[error("Invalid ligand definition: {0}")]
    Ligand(String),
    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    name: Option<String>,
    version: Option<u32>,
    dialect: Option<String>,
    model_seeds: Option<Vec<u32>>,
    sequences: Option<Vec<RawEntry>>,
    bonded_atom_pairs: Option<Vec<RawBond>>,
    #[serde(rename = "userCCD")]
    user_ccd: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "lowercase")]
enum RawEntry {
    Protein(RawPolymer),
    Rna(RawPolymer),
    Dna(RawPolymer),
    Ligand(RawLigand),
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RawIds {
    One(String),
    Many(Vec<String>),
}

impl From<RawIds> for Vec<String> {
    fn from(ids: RawIds) -> Self {
        match ids {
            RawIds::One(id) => vec![id],
            RawIds::Many(ids) => ids,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawPolymer {
    id: Option<RawIds>,
    sequence: Option<String>,
    #[serde(default)]
    modifications: Vec<RawModification>,
    #[serde(default)]
    templates: Vec<RawTemplate>,
    paired_msa: Option<String>,
    paired_msa_path: Option<String>,
    unpaired_msa: Option<String>,
    unpaired_msa_path: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RawModification {
    Residue {
        #[serde(rename = "ptmType")]
        ptm_type: String,
        #[serde(rename = "ptmPosition")]
        ptm_position: u32,
    },
    Nucleotide {
        #[serde(rename = "modificationType")]
        modification_type: String,
        #[serde(rename = "basePosition")]
        base_position: u32,
    },
}

impl From<RawModification> for Modification {
    fn from(raw: RawModification) -> Self {
        match raw {
            RawModification::Residue {
                ptm_type,
                ptm_position,
            } => Modification::residue(ptm_type, ptm_position),
            RawModification::Nucleotide {
                modification_type,
                base_position,
            } => Modification::nucleotide(modification_type, base_position),
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawTemplate {
    mmcif: Option<String>,
    mmcif_path: Option<String>,
    query_indices: Option<Vec<u32>>,
    template_indices: Option<Vec<u32>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawLigand {
    id: Option<RawIds>,
    smiles: Option<String>,
    ccd_codes: Option<Vec<String>>,
}

type RawAtom = (String, u32, String);

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RawBond {
    Flat(String, u32, String, String, u32, String),
    Nested(RawAtom, RawAtom),
}

impl From<RawBond> for Bond {
    fn from(raw: RawBond) -> Self {
        match raw {
            RawBond::Flat(e1, r1, a1, e2, r2, a2) => {
                Bond::new(Atom::new(e1, r1, a1), Atom::new(e2, r2, a2))
            }
            RawBond::Nested((e1, r1, a1), (e2, r2, a2)) => {
                Bond::new(Atom::new(e1, r1, a1), Atom::new(e2, r2, a2))
            }
        }
    }
}

fn msa_source(
    inline: Option<String>,
    path: Option<String>,
    kind: &str,
) -> Result<Option<MsaSource>, JsonError> {
    match (inline, path) {
        (Some(_), Some(_)) => Err(JsonError::Msa(format!(
            "{} alignment is given both inline and as a path",
            kind
        ))),
        (Some(text), None) => Ok(Some(MsaSource::Inline(text))),
        (None, Some(path)) => Ok(Some(MsaSource::Path(path))),
        (None, None) => Ok(None),
    }
}

fn convert_template(raw: RawTemplate) -> Result<Template, JsonError> {
    let (template_type, mmcif) = match (raw.mmcif, raw.mmcif_path) {
        (Some(text), None) => (TemplateType::Inline, text),
        (None, Some(path)) => (TemplateType::File, path),
        (Some(_), Some(_)) => {
            return Err(JsonError::Template(
                "both 'mmcif' and 'mmcifPath' are set".to_string(),
            ));
        }
        (None, None) => {
            return Err(JsonError::Template(
                "one of 'mmcif' or 'mmcifPath' is required".to_string(),
            ));
        }
    };
    let query_indices = raw.query_indices.ok_or(JsonError::MissingField {
        context: "template",
        field: "queryIndices",
    })?;
    let template_indices = raw.template_indices.ok_or(JsonError::MissingField {
        context: "template",
        field: "templateIndices",
    })?;
    Ok(Template::new(
        template_type,
        mmcif,
        query_indices,
        template_indices,
    ))
}

fn convert_polymer(seq_type: SequenceType, raw: RawPolymer) -> Result<Sequence, JsonError> {
    let sequence = raw.sequence.ok_or(JsonError::MissingField {
        context: "sequence entry",
        field: "sequence",
    })?;
    let paired = msa_source(raw.paired_msa, raw.paired_msa_path, "paired")?;
    let unpaired = msa_source(raw.unpaired_msa, raw.unpaired_msa_path, "unpaired")?;
    let templates = raw
        .templates
        .into_iter()
        .map(convert_template)
        .collect::<Result<Vec<_>, _>>()?;

    let mut builder = Sequence::builder(seq_type, sequence)
        .modifications(raw.modifications.into_iter().map(Into::into).collect())
        .templates(templates);
    if let Some(ids) = raw.id {
        builder = builder.ids(Vec::<String>::from(ids));
    }
    if paired.is_some() || unpaired.is_some() {
        builder = builder.msa(Msa::new(paired, unpaired));
    }
    Ok(builder.build()?)
}

fn convert_ligand(raw: RawLigand) -> Result<Ligand, JsonError> {
    let definition = match (raw.smiles, raw.ccd_codes) {
        (Some(smiles), None) => LigandDefinition::Smiles(smiles),
        (None, Some(codes)) if !codes.is_empty() => LigandDefinition::Ccd(codes),
        (None, Some(_)) => {
            return Err(JsonError::Ligand("'ccdCodes' must not be empty".to_string()));
        }
        (Some(_), Some(_)) => {
            return Err(JsonError::Ligand(
                "both 'smiles' and 'ccdCodes' are set".to_string(),
            ));
        }
        (None, None) => {
            return Err(JsonError::MissingField {
                context: "ligand entry",
                field: "smiles",
            });
        }
    };
    Ok(Ligand::new(definition, raw.id.map(Into::into), None)?)
}

/// The AlphaFold3 JSON input dialect.
pub struct JsonFile;

impl JsonFile {
    /// Parses a document from an in-memory JSON string.
    pub fn parse(content: &str) -> Result<Document, JsonError> {
        let raw: RawDocument = serde_json::from_str(content)?;
        Self::from_raw(raw)
    }

    /// Reconciles identifiers and renders the document as pretty-printed JSON.
    pub fn render(document: &mut Document) -> Result<String, JsonError> {
        let mut buffer = Vec::new();
        Self::write_to(document, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| JsonError::Io(io::Error::other(e)))
    }

    fn from_raw(raw: RawDocument) -> Result<Document, JsonError> {
        let entries = raw.sequences.ok_or(JsonError::MissingField {
            context: "document",
            field: "sequences",
        })?;

        let mut document = Document::new();
        if let Some(name) = raw.name {
            document.set_name(name);
        }
        if let Some(version) = raw.version {
            document.set_version(version);
        }
        if let Some(dialect) = raw.dialect {
            document.set_dialect(dialect);
        }
        if let Some(seeds) = raw.model_seeds {
            document.set_seeds(seeds)?;
        }
        document.set_user_ccd(raw.user_ccd);

        for entry in entries {
            match entry {
                RawEntry::Protein(p) => {
                    document.add_sequence(convert_polymer(SequenceType::Protein, p)?)
                }
                RawEntry::Rna(p) => document.add_sequence(convert_polymer(SequenceType::Rna, p)?),
                RawEntry::Dna(p) => document.add_sequence(convert_polymer(SequenceType::Dna, p)?),
                RawEntry::Ligand(l) => document.add_ligand(convert_ligand(l)?),
            }
        }
        for bond in raw.bonded_atom_pairs.unwrap_or_default() {
            document.add_bond(bond.into());
        }

        debug!(
            "Parsed document '{}' with {} sequence(s) and {} ligand(s).",
            document.name(),
            document.sequences().len(),
            document.ligands().len()
        );
        Ok(document)
    }
}

impl DocumentFile for JsonFile {
    type Error = JsonError;

    fn read_from(reader: &mut impl BufRead) -> Result<Document, Self::Error> {
        let raw: RawDocument = serde_json::from_reader(reader)?;
        Self::from_raw(raw)
    }

    fn write_to(document: &mut Document, writer: &mut impl Write) -> Result<(), Self::Error> {
        let value = document.to_value();
        let mut serializer = Serializer::with_formatter(&mut *writer, PrettyFormatter::with_indent(INDENT));
        value.serialize(&mut serializer)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::entity::Identifiable;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn sample_document() -> Document {
        let mut document = Document::new();
        document.set_name("example_1J8F");
        document.set_seeds(vec![1, 7]).unwrap();
        document.add_sequence(
            Sequence::builder(SequenceType::Protein, "GEADMDFLRNLFSQTLSLGSQKERLLDELTLEG")
                .copies(2)
                .modification(Modification::residue("HY3", 1))
                .template(Template::new(TemplateType::File, "/t.cif", vec![0, 1], vec![2, 3]))
                .msa(Msa::new(Some(MsaSource::Inline(">q\nGEAD".into())), None))
                .build()
                .unwrap(),
        );
        document.add_sequence(
            Sequence::builder(SequenceType::Dna, "GCGAATTCG")
                .modification(Modification::nucleotide("6OG", 1))
                .build()
                .unwrap(),
        );
        document.add_ligand(Ligand::smiles("[Zn2+]"));
        document.add_ligand(Ligand::ccd(["NAG", "FUC"]));
        document.add_bond(Bond::new(Atom::new("A", 1, "CA"), Atom::new("C", 1, "C1")));
        document.set_user_ccd(Some("data_MY-X".into()));
        document
    }

    #[test]
    fn written_json_uses_four_space_indent_and_trailing_newline() {
        let mut document = Document::new();
        document.add_sequence(Sequence::protein("MVK"));
        let text = JsonFile::render(&mut document).unwrap();
        assert!(text.starts_with("{\n    \"name\": \"job\""));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn write_then_read_preserves_entities_and_ids() {
        let mut original = sample_document();
        let text = JsonFile::render(&mut original).unwrap();

        let mut parsed = JsonFile::parse(&text).unwrap();
        assert_eq!(parsed.name(), "example_1J8F");
        assert_eq!(parsed.seeds(), [1, 7]);
        assert_eq!(parsed.user_ccd(), Some("data_MY-X"));
        assert_eq!(parsed.sequences().len(), 2);
        assert_eq!(parsed.ligands().len(), 2);
        assert_eq!(parsed.sequences()[0].ids().unwrap(), ["A", "B"]);
        assert_eq!(parsed.sequences()[1].ids().unwrap(), ["C"]);
        assert_eq!(parsed.ligands()[1].ids().unwrap(), ["E"]);
        assert_eq!(parsed.sequences()[0].templates()[0].template_type, TemplateType::File);
        assert_eq!(parsed.bonds(), original.bonds());

        assert_eq!(JsonFile::render(&mut parsed).unwrap(), text);
    }

    #[test]
    fn read_accepts_single_string_ids_and_nested_bonds() {
        let text = r#"{
            "name": "nested",
            "sequences": [
                {"protein": {"id": "P", "sequence": "MVK"}},
                {"ligand": {"id": ["L1", "L2"], "ccdCodes": ["ATP"]}}
            ],
            "bondedAtomPairs": [[["P", 1, "CA"], ["L1", 1, "PG"]]]
        }"#;
        let document = JsonFile::parse(text).unwrap();
        assert_eq!(document.version(), 1);
        assert_eq!(document.dialect(), "alphafold3");
        assert_eq!(document.seeds(), [1]);
        assert_eq!(document.sequences()[0].ids().unwrap(), ["P"]);
        assert_eq!(document.ligands()[0].num(), 2);
        assert_eq!(document.bonds()[0].atom2, Atom::new("L1", 1, "PG"));
    }

    #[test]
    fn read_without_ids_generates_them_on_projection() {
        let text = r#"{"sequences": [{"rna": {"sequence": "AUG"}}, {"ligand": {"smiles": "O"}}]}"#;
        let mut document = JsonFile::parse(text).unwrap();
        let value = document.to_value();
        assert_eq!(value["sequences"][0]["rna"]["id"], serde_json::json!(["A"]));
        assert_eq!(value["sequences"][1]["ligand"]["id"], serde_json::json!(["B"]));
    }

    #[test]
    fn missing_sequences_is_reported() {
        let result = JsonFile::parse(r#"{"name": "empty"}"#);
        assert!(matches!(
            result,
            Err(JsonError::MissingField {
                context: "document",
                field: "sequences"
            })
        ));
    }

    #[test]
    fn missing_sequence_string_is_reported() {
        let result = JsonFile::parse(r#"{"sequences": [{"dna": {"id": "A"}}]}"#);
        assert!(matches!(
            result,
            Err(JsonError::MissingField {
                field: "sequence",
                ..
            })
        ));
    }

    #[test]
    fn conflicting_msa_fields_are_rejected() {
        let text = r#"{"sequences": [{"protein": {
            "sequence": "MVK", "pairedMsa": ">a\nMVK", "pairedMsaPath": "/a.a3m"
        }}]}"#;
        assert!(matches!(JsonFile::parse(text), Err(JsonError::Msa(_))));
    }

    #[test]
    fn template_on_rna_is_rejected() {
        let text = r#"{"sequences": [{"rna": {
            "sequence": "AUG",
            "templates": [{"mmcif": "data_", "queryIndices": [0], "templateIndices": [0]}]
        }}]}"#;
        assert!(matches!(
            JsonFile::parse(text),
            Err(JsonError::Model(ModelError::TemplateNotSupported(
                SequenceType::Rna
            )))
        ));
    }

    #[test]
    fn template_without_source_is_rejected() {
        let text = r#"{"sequences": [{"protein": {
            "sequence": "MVK",
            "templates": [{"queryIndices": [0], "templateIndices": [0]}]
        }}]}"#;
        assert!(matches!(JsonFile::parse(text), Err(JsonError::Template(_))));
    }

    #[test]
    fn ligand_without_body_is_rejected() {
        let text = r#"{"sequences": [{"ligand": {"id": "A"}}]}"#;
        assert!(matches!(
            JsonFile::parse(text),
            Err(JsonError::MissingField {
                context: "ligand entry",
                ..
            })
        ));
    }

    #[test]
    fn empty_seed_list_is_rejected() {
        let text = r#"{"modelSeeds": [], "sequences": []}"#;
        assert!(matches!(
            JsonFile::parse(text),
            Err(JsonError::Model(ModelError::EmptySeeds))
        ));
    }

    #[test]
    fn read_from_buffered_reader() {
        let text = r#"{"name": "buffered", "sequences": [{"protein": {"sequence": "MVK"}}]}"#;
        let mut cursor = Cursor::new(text.as_bytes());
        let document = JsonFile::read_from(&mut cursor).unwrap();
        assert_eq!(document.name(), "buffered");
    }

    #[test]
    fn path_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("job.json");
        let mut document = sample_document();
        JsonFile::write_to_path(&mut document, &path).unwrap();

        let parsed = JsonFile::read_from_path(&path).unwrap();
        assert_eq!(parsed.name(), document.name());
        assert_eq!(parsed.num_chains(), document.num_chains());
    }

    #[test]
    fn read_from_missing_path_is_io_error() {
        let dir = tempdir().unwrap();
        let result = JsonFile::read_from_path(dir.path().join("absent.json"));
        assert!(matches!(result, Err(JsonError::Io(_))));
    }
}
