mod commands;
mod terminal;

use anyhow::Context;
use commands::{CommandLine, Commands, scan, sources};
use scout_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init(commands.verbose);

    let mut cfg = Config::from_env(commands.env_file.as_deref())
        .context("loading environment")?;
    cfg.no_banner = commands.no_banner;
    cfg.quiet = commands.quiet;

    print::banner(cfg.no_banner, cfg.quiet);

    match commands.command {
        Commands::Scan(args) => {
            args.apply(&mut cfg);
            print::header("getting ready to scan", cfg.quiet);
            scan::scan(args.target, &cfg).await
        }
        Commands::Sources => {
            print::header("available sources", cfg.quiet);
            sources::list(&cfg);
            Ok(())
        }
    }
}
