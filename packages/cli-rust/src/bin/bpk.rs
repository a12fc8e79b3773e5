//! bpk - short alias for the botpack binary

fn main() -> anyhow::Result<()> {
    botpack::run()
}
