use af3cli::core::models::bond::Atom;
use af3cli::core::models::sequence::SequenceType;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "af3cli contributors",
    version,
    about = "af3cli - Assemble AlphaFold3 input files from sequences, ligands, bonds and job files.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to write screening jobs.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assemble a single AlphaFold3 input file from a job file and/or arguments.
    Build(BuildArgs),
    /// Generate one input file per candidate ligand of a CSV table.
    Screen(ScreenArgs),
    /// Print a summary of an existing AlphaFold3 input file.
    Inspect(InspectArgs),
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    // --- Core Arguments ---
    /// Path for the output JSON file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to a job file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Metadata Overrides ---
    /// Override the job name.
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Override the model seeds (comma separated).
    #[arg(long, value_name = "SEEDS", value_delimiter = ',')]
    pub seeds: Vec<u32>,

    // --- Entities ---
    /// Add a protein chain. Can be used multiple times.
    #[arg(long, value_name = "SEQ")]
    pub protein: Vec<String>,

    /// Add an RNA chain. Can be used multiple times.
    #[arg(long, value_name = "SEQ")]
    pub rna: Vec<String>,

    /// Add a DNA chain. Can be used multiple times.
    #[arg(long, value_name = "SEQ")]
    pub dna: Vec<String>,

    /// Add every record of a FASTA file as a chain. Can be used multiple times.
    #[arg(long, value_name = "PATH")]
    pub fasta: Vec<PathBuf>,

    /// Molecule type of the records read with --fasta.
    #[arg(long, value_name = "TYPE", default_value = "protein")]
    pub fasta_type: SequenceType,

    /// Number of copies of each chain given on the command line.
    #[arg(long, value_name = "INT")]
    pub copies: Option<usize>,

    /// Add a ligand from a SMILES string. Can be used multiple times.
    #[arg(long, value_name = "SMILES")]
    pub smiles: Vec<String>,

    /// Add a ligand from CCD codes (comma separated). Can be used multiple times.
    #[arg(long, value_name = "CODES")]
    pub ccd: Vec<String>,

    /// Add a covalent bond between two atoms given as ENTITY:RESIDUE:ATOM.
    #[arg(long, num_args = 2, value_names = ["ATOM1", "ATOM2"])]
    pub bond: Vec<Atom>,

    /// Path to a user-provided CCD file in mmCIF format.
    #[arg(long, value_name = "PATH")]
    pub user_ccd: Option<PathBuf>,
}

/// Arguments for the `screen` subcommand.
#[derive(Args, Debug)]
pub struct ScreenArgs {
    /// Path to the base job file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Path to the CSV table of candidate ligands.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub ligands: PathBuf,

    /// Directory receiving one JSON file per candidate.
    #[arg(short = 'd', long, required = true, value_name = "DIR")]
    pub output_dir: PathBuf,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to an AlphaFold3 input JSON file.
    #[arg(required = true, value_name = "PATH")]
    pub path: PathBuf,
}
