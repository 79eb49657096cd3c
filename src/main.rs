//! datactl CLI - manage a data platform from the command line

use clap::Parser;
use datactl::cli::Args;
use datactl::script::Dispatch;
use datactl::{logging, Config, LocalPlatform, PlatformDispatcher};

fn main() {
    let args = Args::parse();
    logging::init(args.verbose, args.quiet);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(args: Args) -> datactl::Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let mut platform = LocalPlatform::open(&config.state_file)?;

    let audit = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    PlatformDispatcher::new(&mut platform, &config).dispatch(args, &audit)
}
