fn main() -> anyhow::Result<()> {
    roster_pivot_lib::run()
}
