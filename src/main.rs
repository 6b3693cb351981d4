// `--headless [task-id]` runs one headless task and exits; anything else
// starts the interactive reporter.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("--headless") => location_reporter_lib::run_headless(args.next()).await,
        Some(other) => anyhow::bail!("unknown argument '{other}' (expected --headless [task-id])"),
        None => location_reporter_lib::run().await,
    }
}
