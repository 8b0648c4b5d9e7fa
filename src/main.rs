use anyhow::Context;

fn main() -> anyhow::Result<()> {
    overlay::logging::init();
    overlay::cli::run().context("entrypoint setup failed")
}
