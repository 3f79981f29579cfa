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
    author,
    version,
    about = "mdflare - Detect non-covalent contacts across molecular dynamics trajectories and summarise them as flare graphs.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute per-frame contacts of a trajectory and write them to <OUTPUT_DIR>/contacts.tsv.
    Contacts(ContactsArgs),
    /// Aggregate a contact file into a flare graph JSON document.
    Flare(FlareArgs),
}

/// Arguments for the `contacts` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ContactsArgs {
    // --- Inputs ---
    /// Topology structure (PDB). Its first model defines atoms and residues.
    #[arg(value_name = "TOPOLOGY")]
    pub topology: PathBuf,

    /// Trajectory coordinates (multi-model PDB), one model per frame.
    #[arg(value_name = "TRAJECTORY")]
    pub trajectory: PathBuf,

    /// Directory that receives contacts.tsv. Created if missing.
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Interaction Types ---
    /// Interaction types to compute: sb, pc, ps, ts, vdw, hb, lhb.
    /// Repeat the flag or give a comma-separated list.
    #[arg(
        long = "itype",
        value_name = "TYPE",
        value_delimiter = ',',
        conflicts_with = "all"
    )]
    pub itypes: Vec<String>,

    /// Compute every interaction type. `lhb` is included only when a ligand is given.
    #[arg(long)]
    pub all: bool,

    // --- Frame Range ---
    /// First frame to process (0-based).
    #[arg(long, value_name = "INT")]
    pub beg: Option<usize>,

    /// Frame at which to stop (exclusive). Defaults to the last frame.
    #[arg(long, value_name = "INT")]
    pub end: Option<usize>,

    /// Process every Nth frame.
    #[arg(long, value_name = "INT")]
    pub stride: Option<usize>,

    /// Number of worker threads.
    #[arg(long, value_name = "NUM")]
    pub cores: Option<usize>,

    // --- Chemistry ---
    /// Residue name of the solvent (e.g. TIP3, HOH).
    #[arg(long = "solv", value_name = "RESN")]
    pub solvent: Option<String>,

    /// Residue name of the ligand for `lhb`.
    #[arg(long, value_name = "RESN")]
    pub ligand: Option<String>,

    // --- Selections ---
    /// Only report contacts among atoms matched by this selection.
    #[arg(long = "sele", value_name = "QUERY")]
    pub selection: Option<String>,

    /// With --sele, only report contacts between the two selections.
    #[arg(long = "sele2", value_name = "QUERY", requires = "selection")]
    pub selection2: Option<String>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S cutoffs.hbond-distance=3.2
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

/// Arguments for the `flare` subcommand.
#[derive(Args, Debug, Clone)]
pub struct FlareArgs {
    /// Contact file produced by `mdflare contacts`.
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Where to write the JSON graph. Printed to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Interaction types to keep: `all` or a comma-separated list (e.g. hb,sb).
    #[arg(long, value_name = "TYPES", default_value = "all")]
    pub itype: String,

    /// Tab-separated label file (`residue<TAB>tree.path[<TAB>color]`) used to filter and
    /// rename residues.
    #[arg(long, value_name = "PATH")]
    pub flarelabels: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("mdflare").chain(args.iter().copied()))
    }

    #[test]
    fn contacts_accepts_repeated_and_comma_separated_types() {
        let cli = parse(&[
            "contacts", "top.pdb", "traj.pdb", "out", "--itype", "sb,hb", "--itype", "vdw",
            "--cores", "4",
        ])
        .unwrap();
        let Commands::Contacts(args) = cli.command else {
            panic!("expected contacts");
        };
        assert_eq!(args.itypes, ["sb", "hb", "vdw"]);
        assert_eq!(args.cores, Some(4));
        assert!(!args.all);
    }

    #[test]
    fn missing_positionals_are_rejected() {
        let err = parse(&["contacts", "top.pdb"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn all_conflicts_with_itype() {
        let err = parse(&["contacts", "a", "b", "c", "--all", "--itype", "sb"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn second_selection_requires_first() {
        let err = parse(&["contacts", "a", "b", "c", "--all", "--sele2", "chain B"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn flare_defaults_to_all_types_and_stdout() {
        let cli = parse(&["flare", "--input", "contacts.tsv"]).unwrap();
        let Commands::Flare(args) = cli.command else {
            panic!("expected flare");
        };
        assert_eq!(args.itype, "all");
        assert!(args.output.is_none());
        assert!(args.flarelabels.is_none());
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = parse(&["flare", "-i", "c.tsv", "-vv", "--log-file", "run.log"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_file, Some(PathBuf::from("run.log")));
    }
}
