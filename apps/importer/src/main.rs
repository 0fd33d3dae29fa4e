fn main() -> anyhow::Result<()> {
    arq_importer::run()
}
