use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// Personal assistant for notes, tasks, contacts and finance records.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// Directory holding the notes, tasks, contacts and finance snapshots
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Directory for exported notes and finance reports [default: the data directory]
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

pub fn parse() -> Args {
    Args::parse()
}
