mod commands;
mod terminal;

use commands::{CommandLine, Commands, catalog, scan};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose, commands.quiet, commands.wants_json());

    match &commands.command {
        Commands::Scan(args) => {
            let cfg = args.to_config(commands.quiet, commands.no_banner);
            print::banner(cfg.no_banner || cfg.json || cfg.quiet > 0);
            scan::scan(&args.address, &args.os, &cfg).await
        }
        Commands::Catalog => {
            print::banner(commands.no_banner || commands.quiet > 0);
            catalog::catalog(commands.quiet);
            Ok(())
        }
    }
}
