fn main() -> anyhow::Result<()> {
    sigroute::cli::run_cli()
}
