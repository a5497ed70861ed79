use clap::Parser;
use videolog::cli::{Args, init_logging, run_cli};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    run_cli(args)
}
