fn main() -> anyhow::Result<()> {
    cubefield::app::run()
}
