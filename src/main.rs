use anyhow::Result;
use capacity_forecast::cli::run_cli;
use human_panic::setup_panic;

fn main() -> Result<()> {
    setup_panic!();

    run_cli()
}
