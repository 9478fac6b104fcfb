mod defaults;

use crate::cli::BuildArgs;
use crate::error::{CliError, Result};
use af3cli::core::io::fasta::{self, FastaRecord};
use af3cli::core::models::bond::{Atom, Bond};
use af3cli::core::models::builder::InputBuilder;
use af3cli::core::models::document::Document;
use af3cli::core::models::error::ModelError;
use af3cli::core::models::ligand::{Ligand, LigandDefinition};
use af3cli::core::models::msa::{Msa, MsaSource};
use af3cli::core::models::sequence::{Modification, Sequence, SequenceType};
use af3cli::core::models::template::{Template, TemplateType};
use defaults::DefaultsConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
struct PartialModification {
    #[serde(rename = "type")]
    code: String,
    position: u32,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialTemplate {
    mmcif: Option<String>,
    mmcif_path: Option<String>,
    query_indices: Vec<u32>,
    template_indices: Vec<u32>,
}

impl PartialTemplate {
    fn into_template(self) -> Result<Template> {
        let (template_type, mmcif) = match (self.mmcif, self.mmcif_path) {
            (Some(text), None) => (TemplateType::Inline, text),
            (None, Some(path)) => (TemplateType::File, path),
            _ => {
                return Err(CliError::Config(
                    "A template needs exactly one of 'mmcif' or 'mmcif-path'.".to_string(),
                ));
            }
        };
        Ok(Template::new(
            template_type,
            mmcif,
            self.query_indices,
            self.template_indices,
        ))
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialMsa {
    paired: Option<String>,
    paired_path: Option<String>,
    unpaired: Option<String>,
    unpaired_path: Option<String>,
}

impl PartialMsa {
    fn source(inline: Option<String>, path: Option<String>, kind: &str) -> Result<Option<MsaSource>> {
        match (inline, path) {
            (Some(_), Some(_)) => Err(CliError::Config(format!(
                "The {0} alignment is given both as '{0}' and '{0}-path'.",
                kind
            ))),
            (Some(text), None) => Ok(Some(MsaSource::Inline(text))),
            (None, Some(path)) => Ok(Some(MsaSource::Path(path))),
            (None, None) => Ok(None),
        }
    }

    fn into_msa(self) -> Result<Msa> {
        Ok(Msa::new(
            Self::source(self.paired, self.paired_path, "paired")?,
            Self::source(self.unpaired, self.unpaired_path, "unpaired")?,
        ))
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialSequence {
    #[serde(rename = "type")]
    seq_type: String,
    sequence: Option<String>,
    fasta: Option<PathBuf>,
    copies: Option<usize>,
    ids: Option<Vec<String>>,
    #[serde(default)]
    modifications: Vec<PartialModification>,
    #[serde(default)]
    templates: Vec<PartialTemplate>,
    msa: Option<PartialMsa>,
}

impl PartialSequence {
    fn has_chain_details(&self) -> bool {
        self.ids.is_some()
            || !self.modifications.is_empty()
            || !self.templates.is_empty()
            || self.msa.is_some()
    }

    fn into_sequences(self, base_dir: &Path) -> Result<Vec<Sequence>> {
        let seq_type: SequenceType = self
            .seq_type
            .parse()
            .map_err(|e: ModelError| CliError::Config(e.to_string()))?;

        let residues = match (&self.sequence, &self.fasta) {
            (Some(sequence), None) => vec![sequence.clone()],
            (None, Some(path)) => {
                let records = read_fasta(&base_dir.join(path))?;
                if records.len() > 1 && self.has_chain_details() {
                    return Err(CliError::Config(format!(
                        "FASTA file {:?} holds {} records; 'ids', 'modifications', 'templates' and 'msa' need a single record.",
                        path,
                        records.len()
                    )));
                }
                records.into_iter().map(|r| r.sequence).collect()
            }
            _ => {
                return Err(CliError::Config(
                    "A sequence needs exactly one of 'sequence' or 'fasta'.".to_string(),
                ));
            }
        };

        let modifications: Vec<Modification> = self
            .modifications
            .iter()
            .map(|m| match seq_type {
                SequenceType::Protein => Modification::residue(m.code.clone(), m.position),
                SequenceType::Rna | SequenceType::Dna => {
                    Modification::nucleotide(m.code.clone(), m.position)
                }
            })
            .collect();
        let templates = self
            .templates
            .into_iter()
            .map(PartialTemplate::into_template)
            .collect::<Result<Vec<_>>>()?;
        let msa = self.msa.map(PartialMsa::into_msa).transpose()?;

        let mut sequences = Vec::with_capacity(residues.len());
        for residue_string in residues {
            let mut builder = Sequence::builder(seq_type, residue_string)
                .modifications(modifications.clone())
                .templates(templates.clone());
            if let Some(ids) = &self.ids {
                builder = builder.ids(ids.clone());
            }
            if let Some(copies) = self.copies {
                builder = builder.copies(copies);
            }
            if let Some(msa) = &msa {
                builder = builder.msa(msa.clone());
            }
            sequences.push(builder.build()?);
        }
        Ok(sequences)
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
struct PartialLigand {
    smiles: Option<String>,
    ccd: Option<Vec<String>>,
    copies: Option<usize>,
    ids: Option<Vec<String>>,
}

impl PartialLigand {
    fn into_ligand(self) -> Result<Ligand> {
        let definition = match (self.smiles, self.ccd) {
            (Some(smiles), None) => LigandDefinition::Smiles(smiles),
            (None, Some(codes)) if !codes.is_empty() => LigandDefinition::Ccd(codes),
            _ => {
                return Err(CliError::Config(
                    "A ligand needs exactly one of 'smiles' or a non-empty 'ccd' list.".to_string(),
                ));
            }
        };
        Ok(Ligand::new(definition, self.ids, self.copies)?)
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
struct PartialBond {
    atom1: String,
    atom2: String,
}

impl PartialBond {
    fn into_bond(self) -> Result<Bond> {
        Ok(Bond::new(
            self.atom1.parse::<Atom>()?,
            self.atom2.parse::<Atom>()?,
        ))
    }
}

/// A job file as written by the user, before defaults and CLI overrides apply.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialJobConfig {
    name: Option<String>,
    version: Option<u32>,
    dialect: Option<String>,
    seeds: Option<Vec<u32>>,
    user_ccd_path: Option<PathBuf>,
    #[serde(default)]
    sequences: Vec<PartialSequence>,
    #[serde(default)]
    ligands: Vec<PartialLigand>,
    #[serde(default)]
    bonds: Vec<PartialBond>,

    #[serde(skip)]
    base_dir: PathBuf,
}

fn read_fasta(path: &Path) -> Result<Vec<FastaRecord>> {
    debug!("Reading FASTA records from {:?}", path);
    fasta::read_records_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

fn read_user_ccd(path: &Path) -> Result<String> {
    debug!("Reading user CCD from {:?}", path);
    Ok(std::fs::read_to_string(path)?)
}

fn split_ccd_codes(codes: &str) -> Vec<String> {
    codes
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

impl PartialJobConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading job configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    /// Builds the document described by the file alone.
    pub fn into_document(self) -> Result<Document> {
        Ok(self.into_builder()?.build()?)
    }

    /// Builds the document described by the file, then applies CLI overrides
    /// and appends CLI entities after the file's entities.
    pub fn merge_with_cli(self, args: &BuildArgs) -> Result<Document> {
        let mut builder = self.into_builder()?;

        if let Some(name) = &args.name {
            builder.set_name(name.clone());
        }
        if !args.seeds.is_empty() {
            builder.set_seeds(args.seeds.clone());
        }

        let cli_sequences = args
            .protein
            .iter()
            .map(|s| (SequenceType::Protein, s.clone()))
            .chain(args.rna.iter().map(|s| (SequenceType::Rna, s.clone())))
            .chain(args.dna.iter().map(|s| (SequenceType::Dna, s.clone())));
        let mut sequences: Vec<(SequenceType, String)> = cli_sequences.collect();
        for path in &args.fasta {
            for record in read_fasta(path)? {
                debug!(
                    "Adding FASTA record '{}' from {:?} as a {} chain.",
                    record.id(),
                    path,
                    args.fasta_type
                );
                sequences.push((args.fasta_type, record.sequence));
            }
        }
        for (seq_type, residues) in sequences {
            let mut sequence = Sequence::builder(seq_type, residues);
            if let Some(copies) = args.copies {
                sequence = sequence.copies(copies);
            }
            builder.add_sequence(sequence.build()?);
        }

        for smiles in &args.smiles {
            builder.add_ligand(Ligand::smiles(smiles.clone()));
        }
        for codes in &args.ccd {
            let codes = split_ccd_codes(codes);
            if codes.is_empty() {
                return Err(CliError::Argument("--ccd needs at least one code.".to_string()));
            }
            builder.add_ligand(Ligand::ccd(codes));
        }

        if args.bond.len() % 2 != 0 {
            return Err(CliError::Argument(
                "--bond takes exactly two atoms.".to_string(),
            ));
        }
        for pair in args.bond.chunks_exact(2) {
            builder.add_bonded_atom_pair(Bond::new(pair[0].clone(), pair[1].clone()));
        }

        if let Some(path) = &args.user_ccd {
            builder.add_user_ccd(read_user_ccd(path)?);
        }

        let document = builder.build()?;
        if document.sequences().is_empty() && document.ligands().is_empty() {
            return Err(CliError::Argument(
                "No sequences or ligands were given.".to_string(),
            ));
        }
        Ok(document)
    }

    fn into_builder(self) -> Result<InputBuilder> {
        let defaults = DefaultsConfig::default();
        let mut builder = InputBuilder::new();
        builder
            .set_name(self.name.unwrap_or(defaults.name))
            .set_version(self.version.unwrap_or(defaults.version))
            .set_dialect(self.dialect.unwrap_or(defaults.dialect))
            .set_seeds(self.seeds.unwrap_or(defaults.seeds));

        if let Some(path) = &self.user_ccd_path {
            builder.add_user_ccd(read_user_ccd(&self.base_dir.join(path))?);
        }
        for entry in self.sequences {
            for sequence in entry.into_sequences(&self.base_dir)? {
                builder.add_sequence(sequence);
            }
        }
        for entry in self.ligands {
            builder.add_ligand(entry.into_ligand()?);
        }
        for entry in self.bonds {
            builder.add_bonded_atom_pair(entry.into_bond()?);
        }
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use af3cli::core::models::entity::Identifiable;
    use clap::Parser;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn write_config_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let file_path = dir.path().join(name);
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn build_args(extra: &[&str]) -> BuildArgs {
        let mut args = vec!["af3cli", "build", "-o", "out.json"];
        args.extend_from_slice(extra);
        match Cli::parse_from(args).command {
            Commands::Build(args) => args,
            _ => panic!("Expected 'build' subcommand"),
        }
    }

    const INSULIN_JOB: &str = r#"
name = "insulin"
seeds = [1, 2]

[[sequences]]
type = "protein"
sequence = "GIVEQCCTSICSLYQLENYCN"
copies = 2
modifications = [{ type = "HY3", position = 1 }]
templates = [{ mmcif-path = "t.cif", query-indices = [0, 1], template-indices = [0, 1] }]
msa = { paired-path = "p.a3m", unpaired = ">q\nGIVE" }

[[ligands]]
ccd = ["ZN"]

[[bonds]]
atom1 = "A:6:SG"
atom2 = "B:11:SG"
"#;

    #[test]
    fn load_from_file_and_merge_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = write_config_file(&dir, "job.toml", INSULIN_JOB);

        let mut document = PartialJobConfig::from_file(&config_path)
            .unwrap()
            .into_document()
            .unwrap();

        assert_eq!(document.name(), "insulin");
        assert_eq!(document.version(), 1);
        assert_eq!(document.dialect(), "alphafold3");
        assert_eq!(document.seeds(), [1, 2]);
        assert_eq!(document.sequences()[0].num(), 2);
        assert_eq!(document.sequences()[0].modifications()[0], Modification::residue("HY3", 1));
        assert_eq!(document.sequences()[0].templates()[0].template_type, TemplateType::File);
        assert_eq!(document.bonds()[0].atom2, Atom::new("B", 11, "SG"));

        let value = document.to_value();
        let protein = &value["sequences"][0]["protein"];
        assert_eq!(protein["id"], serde_json::json!(["A", "B"]));
        assert_eq!(protein["pairedMsaPath"], "p.a3m");
        assert_eq!(protein["unpairedMsa"], ">q\nGIVE");
        assert_eq!(value["sequences"][1]["ligand"]["id"], serde_json::json!(["C"]));
    }

    #[test]
    fn cli_args_override_file_values_and_append_entities() {
        let dir = tempdir().unwrap();
        let config_path = write_config_file(&dir, "job.toml", INSULIN_JOB);
        let args = build_args(&[
            "--name",
            "override",
            "--seeds",
            "9",
            "--dna",
            "GATTACA",
            "--smiles",
            "CCO",
            "--bond",
            "A:1:N",
            "D:1:C1",
        ]);

        let document = PartialJobConfig::from_file(&config_path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(document.name(), "override");
        assert_eq!(document.seeds(), [9]);
        assert_eq!(document.sequences().len(), 2);
        assert_eq!(document.sequences()[1].seq_type(), SequenceType::Dna);
        assert_eq!(document.ligands().len(), 2);
        assert_eq!(document.bonds().len(), 2);
    }

    #[test]
    fn cli_only_build_uses_defaults() {
        let args = build_args(&["--protein", "MVK", "--copies", "3", "--ccd", "NAG, FUC"]);
        let document = PartialJobConfig::default().merge_with_cli(&args).unwrap();

        assert_eq!(document.name(), "job");
        assert_eq!(document.seeds(), [1]);
        assert_eq!(document.sequences()[0].num(), 3);
        assert_eq!(
            document.ligands()[0].definition(),
            &LigandDefinition::Ccd(vec!["NAG".into(), "FUC".into()])
        );
    }

    #[test]
    fn fasta_paths_resolve_against_config_directory() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("inputs")).unwrap();
        fs::write(dir.path().join("inputs/chains.fasta"), ">a\nMVK\n>b\nGGG\n").unwrap();
        let config_path = write_config_file(
            &dir,
            "job.toml",
            "[[sequences]]\ntype = \"protein\"\nfasta = \"inputs/chains.fasta\"\n",
        );

        let document = PartialJobConfig::from_file(&config_path)
            .unwrap()
            .into_document()
            .unwrap();
        assert_eq!(document.sequences().len(), 2);
        assert_eq!(document.sequences()[1].sequence(), "GGG");
    }

    #[test]
    fn multi_record_fasta_with_ids_is_rejected() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("chains.fasta"), ">a\nMVK\n>b\nGGG\n").unwrap();
        let config_path = write_config_file(
            &dir,
            "job.toml",
            "[[sequences]]\ntype = \"protein\"\nfasta = \"chains.fasta\"\nids = [\"A\"]\n",
        );
        let result = PartialJobConfig::from_file(&config_path)
            .unwrap()
            .into_document();
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn user_ccd_is_read_relative_to_config() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("custom.cif"), "data_LIG\n").unwrap();
        let config_path = write_config_file(
            &dir,
            "job.toml",
            "user-ccd-path = \"custom.cif\"\n[[ligands]]\nccd = [\"LIG\"]\n",
        );
        let document = PartialJobConfig::from_file(&config_path)
            .unwrap()
            .into_document()
            .unwrap();
        assert_eq!(document.user_ccd(), Some("data_LIG\n"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let config_path = write_config_file(&dir, "job.toml", "nmae = \"typo\"\n");
        let result = PartialJobConfig::from_file(&config_path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn invalid_sequence_type_is_config_error() {
        let dir = tempdir().unwrap();
        let config_path = write_config_file(
            &dir,
            "job.toml",
            "[[sequences]]\ntype = \"peptide\"\nsequence = \"MVK\"\n",
        );
        let result = PartialJobConfig::from_file(&config_path)
            .unwrap()
            .into_document();
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("peptide")));
    }

    #[test]
    fn template_on_rna_is_rejected() {
        let dir = tempdir().unwrap();
        let config_path = write_config_file(
            &dir,
            "job.toml",
            r#"
[[sequences]]
type = "rna"
sequence = "AUG"
templates = [{ mmcif = "data_", query-indices = [0], template-indices = [0] }]
"#,
        );
        let result = PartialJobConfig::from_file(&config_path)
            .unwrap()
            .into_document();
        assert!(matches!(result, Err(CliError::Core(_))));
    }

    #[test]
    fn explicit_ids_are_preserved() {
        let dir = tempdir().unwrap();
        let config_path = write_config_file(
            &dir,
            "job.toml",
            "[[sequences]]\ntype = \"protein\"\nsequence = \"MVK\"\nids = [\"H\", \"L\"]\n[[ligands]]\nsmiles = \"O\"\n",
        );
        let mut document = PartialJobConfig::from_file(&config_path)
            .unwrap()
            .into_document()
            .unwrap();
        document.reconcile_ids();
        assert_eq!(document.sequences()[0].ids().unwrap(), ["H", "L"]);
        assert_eq!(document.ligands()[0].ids().unwrap(), ["A"]);
    }

    #[test]
    fn empty_build_is_rejected() {
        let args = build_args(&[]);
        let result = PartialJobConfig::default().merge_with_cli(&args);
        assert!(matches!(result, Err(CliError::Argument(_))));
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result = PartialJobConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
