use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();
    jamboree_cli::run_cli()
}
