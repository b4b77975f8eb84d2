use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod run;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode every input byte and print tag, data and output.
    Decode(DecodeArgs),
    /// Pump input through a ticked background worker.
    Run(RunArgs),
    /// Encode value tokens (u:<n>, s:<n>, l:<c>) into bytes.
    Encode(EncodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format),
        Command::Run(args) => run::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Where input bytes come from. Stdin when neither flag is given.
#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// Hex byte string (e.g. "00 7f 82 c0").
    #[arg(long, conflicts_with = "file")]
    pub hex: Option<String>,
    /// Read bytes from file.
    #[arg(long, conflicts_with = "hex")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Time between resume ticks (e.g. 10ms, 1s).
    #[arg(long, default_value = "10ms")]
    pub interval: String,
    /// Exit after printing N fragments (at least 1).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub count: Option<u64>,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Value tokens: u:<0..63>, s:<-32..31>, l:<a..z>.
    #[arg(required = true)]
    pub tokens: Vec<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
