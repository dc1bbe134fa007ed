fn main() -> anyhow::Result<()> {
    sectorloc::cli::run_cli()
}
