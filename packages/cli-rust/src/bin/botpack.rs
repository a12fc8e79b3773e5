//! botpack binary entry point

fn main() -> anyhow::Result<()> {
    botpack::run()
}
