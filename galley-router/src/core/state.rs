use std::sync::Arc;
use std::time::Duration;

use shared::models::{Order, PrintResult, Station};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::config::DispatchConfig;
use crate::message::KdsChannel;
use crate::printing::{
    Dispatcher, HardwareRecord, OutcomeLogger, PrintJobStore, PrintJobStoreResult,
};
use crate::routing::{OrderLine, RoutingResolver, RoutingResult, StationRegistry};

/// Interval between print-job retention sweeps
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Routing and delivery result of one send action
#[derive(Debug)]
pub struct SendOutcome {
    pub routing: RoutingResult,
    pub results: Vec<PrintResult>,
}

impl SendOutcome {
    pub fn all_delivered(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &PrintResult> {
        self.results.iter().filter(|r| !r.success)
    }
}

/// Process-wide engine state
///
/// Built once at startup; [`shutdown`](Self::shutdown) closes the KDS channel
/// and stops background tasks.
#[derive(Clone)]
pub struct EngineState {
    pub config: DispatchConfig,
    registry: Arc<StationRegistry>,
    resolver: RoutingResolver,
    dispatcher: Arc<Dispatcher>,
    shutdown_token: CancellationToken,
}

impl EngineState {
    /// Open the print-job store named by the config (in-memory when unset)
    /// and wire every component
    pub fn initialize(config: &DispatchConfig) -> PrintJobStoreResult<Self> {
        let store = match &config.print_job_db {
            Some(path) => PrintJobStore::open(path)?,
            None => PrintJobStore::open_in_memory()?,
        };
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: &DispatchConfig, store: PrintJobStore) -> Self {
        let registry = Arc::new(StationRegistry::new());
        let kds = KdsChannel::new(config.kds_channel_capacity);
        let dispatcher = Dispatcher::new(config, registry.clone(), kds, OutcomeLogger::new(store));

        Self {
            config: config.clone(),
            registry,
            resolver: RoutingResolver::default(),
            dispatcher: Arc::new(dispatcher),
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Replace the tag-default table used for new resolutions
    pub fn with_resolver(mut self, resolver: RoutingResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn registry(&self) -> &Arc<StationRegistry> {
        &self.registry
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn kds(&self) -> &KdsChannel {
        self.dispatcher.kds()
    }

    /// Install a new station snapshot, registering hardware for each station
    pub fn load_stations(&self, stations: Vec<Station>) {
        if let Some(store) = self.dispatcher.outcomes().store() {
            let now = chrono::Utc::now().timestamp_millis();
            for station in &stations {
                if let Err(e) = store.register_hardware(&HardwareRecord::for_station(station, now)) {
                    warn!(station_id = %station.id, error = %e, "Failed to register station hardware");
                }
            }
        }
        self.registry.replace_snapshot(stations);
    }

    /// Route an order against its location's stations and deliver it
    pub async fn send_order(&self, order: &Order, lines: &[OrderLine]) -> SendOutcome {
        let stations = self.registry.active_stations_for(&order.location_id);
        let routing = self.resolver.resolve(order, lines, &stations);
        let results = self.dispatcher.dispatch(&routing).await;
        SendOutcome { routing, results }
    }

    /// Ask a failed station to be retried while its failover window is open
    pub fn signal_retry(&self, station_id: &str) -> bool {
        self.dispatcher.failover().signal_retry(station_id)
    }

    /// Purge print jobs older than the configured retention
    pub fn cleanup_print_jobs(&self) -> PrintJobStoreResult<usize> {
        match self.dispatcher.outcomes().store() {
            Some(store) => store.cleanup_older_than(
                self.config.print_job_retention_millis(),
                chrono::Utc::now().timestamp_millis(),
            ),
            None => Ok(0),
        }
    }

    /// Start the periodic retention sweep
    pub fn start_background_tasks(&self) -> JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
            loop {
                tokio::select! {
                    _ = state.shutdown_token.cancelled() => {
                        info!("Print job cleanup task stopping");
                        break;
                    }
                    _ = interval.tick() => match state.cleanup_print_jobs() {
                        Ok(0) => {}
                        Ok(deleted) => info!(deleted, "Old print jobs purged"),
                        Err(e) => warn!(error = %e, "Print job cleanup failed"),
                    },
                }
            }
        })
    }

    pub fn shutdown(&self) {
        self.shutdown_token.cancel();
        self.dispatcher.kds().shutdown();
    }
}
