use crate::cli::InspectArgs;
use crate::error::{CliError, Result};
use af3cli::core::io::{json::JsonFile, traits::DocumentFile};
use af3cli::core::models::document::Document;
use af3cli::core::models::entity::Identifiable;
use af3cli::core::models::ligand::LigandDefinition;
use std::collections::HashSet;
use std::fmt;
use tracing::{info, warn};

fn format_ids(ids: Option<&[String]>) -> String {
    ids.map(|ids| ids.join(",")).unwrap_or_default()
}

/// Human-readable overview of a document whose ids are already reconciled.
struct Summary<'a>(&'a Document);

impl Summary<'_> {
    fn chain_ids(&self) -> HashSet<&str> {
        let sequences = self.0.sequences().iter().filter_map(|s| s.ids());
        let ligands = self.0.ligands().iter().filter_map(|l| l.ids());
        sequences
            .chain(ligands)
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// Bonds with at least one atom on a chain the document does not define.
    fn dangling_bonds(&self) -> usize {
        let known = self.chain_ids();
        self.0
            .bonds()
            .iter()
            .filter(|bond| {
                !known.contains(bond.atom1.entity_id.as_str())
                    || !known.contains(bond.atom2.entity_id.as_str())
            })
            .count()
    }

    fn bonds_suffix(&self, ids: Option<&[String]>) -> String {
        let ids = ids.unwrap_or_default();
        let count = self
            .0
            .bonds()
            .iter()
            .filter(|bond| ids.iter().any(|id| bond.involves_entity(id)))
            .count();
        match count {
            0 => String::new(),
            n => format!(", {} bond(s)", n),
        }
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let document = self.0;
        writeln!(f, "Job:      {}", document.name())?;
        writeln!(f, "Dialect:  {} (version {})", document.dialect(), document.version())?;
        let seeds: Vec<String> = document.seeds().iter().map(u32::to_string).collect();
        writeln!(f, "Seeds:    {}", seeds.join(", "))?;
        writeln!(f, "Chains:   {}", document.num_chains())?;

        for sequence in document.sequences() {
            writeln!(
                f,
                "  {:<8} [{}] {} residue(s), {} modification(s), {} template(s){}{}",
                sequence.seq_type().as_str(),
                format_ids(sequence.ids()),
                sequence.sequence().len(),
                sequence.modifications().len(),
                sequence.templates().len(),
                if sequence.msa().is_some() { ", MSA" } else { "" },
                self.bonds_suffix(sequence.ids())
            )?;
        }
        for ligand in document.ligands() {
            let description = match ligand.definition() {
                LigandDefinition::Smiles(smiles) => format!("SMILES {}", smiles),
                LigandDefinition::Ccd(codes) => format!("CCD {}", codes.join(",")),
            };
            writeln!(
                f,
                "  {:<8} [{}] {}{}",
                "ligand",
                format_ids(ligand.ids()),
                description,
                self.bonds_suffix(ligand.ids())
            )?;
        }

        let known = self.chain_ids();
        for bond in document.bonds() {
            write!(f, "  bond     {} - {}", bond.atom1, bond.atom2)?;
            for atom in [&bond.atom1, &bond.atom2] {
                if !known.contains(atom.entity_id.as_str()) {
                    write!(f, " (unknown chain {})", atom.entity_id)?;
                }
            }
            writeln!(f)?;
        }
        if document.user_ccd().is_some() {
            writeln!(f, "User CCD: present")?;
        }
        Ok(())
    }
}

pub fn run(args: InspectArgs) -> Result<()> {
    info!("Reading job from {:?}", &args.path);
    let mut document =
        JsonFile::read_from_path(&args.path).map_err(|e| CliError::FileParsing {
            path: args.path.clone(),
            source: e.into(),
        })?;
    document.reconcile_ids();
    let summary = Summary(&document);
    let dangling = summary.dangling_bonds();
    if dangling > 0 {
        warn!(
            "Job {:?} has {} bond(s) to chains it does not define.",
            &args.path, dangling
        );
    }
    print!("{}", summary);
    Ok(())
}
