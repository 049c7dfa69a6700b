use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tforge",
    about = "Thermodynamic phase assembly from YAML definitions",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build one phase and print its elements, species and state
    #[command(visible_alias = "i")]
    Inspect(InspectArgs),

    /// Build every phase of a file and report which ones fail
    #[command(visible_alias = "c")]
    Check(CheckArgs),

    /// List registered phase models and their aliases
    #[command(visible_alias = "m")]
    Models(ModelsArgs),
}

impl Command {
    pub fn options(&self) -> &CommonOptions {
        match self {
            Command::Inspect(args) => &args.common,
            Command::Check(args) => &args.common,
            Command::Models(args) => &args.common,
        }
    }
}

/// Options shared by all commands.
#[derive(Args)]
#[command(next_help_heading = "Input Options")]
pub struct CommonOptions {
    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Extra directory searched for referenced files, repeatable
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        action = clap::ArgAction::Append
    )]
    pub data_dirs: Vec<PathBuf>,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Input file (YAML)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Phase name; the first phase of the file if omitted or '-'
    #[arg(short, long, value_name = "NAME", default_value = "")]
    pub phase: String,

    #[command(flatten)]
    pub common: CommonOptions,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Input file (YAML)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub common: CommonOptions,
}

#[derive(Args)]
pub struct ModelsArgs {
    /// List standard-state sub-models instead of phase models
    #[arg(long = "standard-states")]
    pub standard_states: bool,

    #[command(flatten)]
    pub common: CommonOptions,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn data_dirs_accumulate() {
        let cli = Cli::try_parse_from([
            "tforge", "check", "mech.yaml", "--data-dir", "a", "--data-dir", "b", "-q",
        ])
        .unwrap();
        let options = cli.command.options();
        assert_eq!(options.data_dirs, [PathBuf::from("a"), PathBuf::from("b")]);
        assert!(options.quiet);
    }

    #[test]
    fn inspect_defaults_to_first_phase() {
        let cli = Cli::try_parse_from(["tforge", "inspect", "mech.yaml"]).unwrap();
        let Command::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(args.phase, "");
    }
}
