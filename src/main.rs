use anyhow::Result;
use log::info;
use std::io;

mod args;
mod calculator;
mod config;
mod csv_writer;
mod errors;
mod exchange;
mod models;
mod report;
mod repository;
mod shell;
mod store;
mod terminal;
mod traits;

const DEFAULT_LOG_FILTER: &str = "warn";

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => DEFAULT_LOG_FILTER,
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}

fn main() -> Result<()> {
    let args = args::parse();
    init_logging(args.verbose);

    let config = config::Config::new(args.data_dir, args.output_dir);
    info!(
        "event=app_start data_dir={} output_dir={} version={}",
        config.data_dir().display(),
        config.output_dir().display(),
        env!("CARGO_PKG_VERSION")
    );

    let mut shell = shell::Shell::open(config, terminal::TerminalPrompt::new(), io::stdout())?;
    shell.run()
}
