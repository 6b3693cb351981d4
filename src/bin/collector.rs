use anyhow::Result;
use log::info;
use location_reporter_lib::{collector::CollectorServer, utils::init_logging};

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(false);

    let addr = std::env::var("COLLECTOR_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_owned());
    let server = CollectorServer::start(&addr).await?;

    tokio::select! {
        result = server.wait() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Collector shutting down");
            Ok(())
        }
    }
}
