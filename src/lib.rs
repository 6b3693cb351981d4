pub mod collector;
pub mod delivery;
pub mod display;
pub mod error;
pub mod host;
pub mod lifecycle;
pub mod models;
pub mod position;
pub mod scheduler;
pub mod settings;
#[cfg(test)]
mod test_utils;
pub mod utils;

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{error, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use delivery::{DeliveryClient, LocationSink};
use display::DisplayModel;
use host::HostCommand;
use lifecycle::{LifecycleBus, LifecycleCoordinator};
use models::HostLifecycle;
use position::{PermissionGate, PositionSource, SimulatedProvider};
use scheduler::{
    run_headless_task, BackgroundScheduler, ForegroundScheduler, HeadlessEvent, IntervalTaskHost,
    ReportCycle, TaskHost, TaskToken,
};
use settings::{ReporterSettings, SettingsStore};

pub use error::{ReportError, Stage};

struct AppState {
    bus: LifecycleBus,
    display: DisplayModel,
    task_host: Arc<IntervalTaskHost>,
    background: BackgroundScheduler,
}

impl AppState {
    fn handle(&mut self, command: HostCommand) -> bool {
        match command {
            HostCommand::Lifecycle(state) => {
                self.bus.publish(state);
                self.display.set_app_state(state);
                println!("{}", self.display.render());
            }
            HostCommand::Fetch => match self.task_host.trigger() {
                Some(token) => info!("[BackgroundFetch] manual wake-up {token}"),
                None => warn!("[BackgroundFetch] no task registered"),
            },
            HostCommand::Status => println!("{}", self.display.render()),
            HostCommand::Quit => return false,
        }
        true
    }
}

fn load_settings() -> Result<ReporterSettings> {
    let store = SettingsStore::from_env()?;
    let settings = store.settings();
    utils::init_logging(settings.debug);
    info!("Settings loaded from {}", store.path().display());
    Ok(settings)
}

/// Run the reporter until stdin closes or reads `quit`.
///
/// Each stdin line is a lifecycle state (`active`, `inactive`,
/// `background`), `fetch` for an immediate background wake-up, or `status`.
pub async fn run() -> Result<()> {
    let settings = load_settings()?;
    info!("Location reporter starting up...");

    let permission = PermissionGate::from_prompt(settings.location_permission_granted);
    let provider = Arc::new(SimulatedProvider::new(
        settings.home_latitude,
        settings.home_longitude,
    ));
    let source = Arc::new(PositionSource::new(provider, permission));

    let client = DeliveryClient::with_timeout(&settings.collector_url, settings.delivery_timeout())
        .context("failed to build collector client")?;
    let sink: Arc<dyn LocationSink> = Arc::new(client.clone());
    let cycle = ReportCycle::new(source, sink, settings.acquire_options());

    let bus = LifecycleBus::new(HostLifecycle::Active);
    let display = DisplayModel::load(&client, bus.current()).await;
    println!("{}", display.render());

    let coordinator = LifecycleCoordinator::new(
        ForegroundScheduler::new(cycle.clone(), settings.foreground_interval()),
        &bus,
    );
    let shutdown = CancellationToken::new();
    let coordinator_handle = coordinator.spawn(shutdown.clone());

    let task_host = Arc::new(IntervalTaskHost::new());
    let host_handle: Arc<dyn TaskHost> = task_host.clone();
    let mut background =
        BackgroundScheduler::new(cycle, host_handle, settings.background_fetch_config());
    if let Err(err) = background.configure() {
        error!("[BackgroundFetch] Failed to configure: {err:#}");
    }

    let mut app = AppState {
        bus,
        display,
        task_host,
        background,
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match HostCommand::parse(&line) {
            Ok(Some(command)) => {
                if !app.handle(command) {
                    break;
                }
            }
            Ok(None) => {}
            Err(err) => warn!("{err}"),
        }
    }

    info!("Location reporter shutting down");
    shutdown.cancel();
    coordinator_handle
        .await
        .context("lifecycle coordinator task failed to join")?;
    app.background.stop();
    if settings.enable_headless && !settings.stop_on_terminate {
        info!("Headless reporting stays available after exit (`--headless`)");
    }

    Ok(())
}

/// Perform one headless task, as the OS would after the app was terminated,
/// and return.
pub async fn run_headless(task_id: Option<String>) -> Result<()> {
    let settings = load_settings()?;

    if !settings.enable_headless {
        warn!("Headless reporting is disabled in settings; nothing to do");
        return Ok(());
    }

    let client = DeliveryClient::with_timeout(&settings.collector_url, settings.delivery_timeout())
        .context("failed to build collector client")?;
    let task_host = IntervalTaskHost::new();
    let token = task_id.map(TaskToken::from).unwrap_or_default();

    run_headless_task(HeadlessEvent::new(token), &client, &task_host).await;
    Ok(())
}
