//! Ticket dispatcher
//!
//! Renders every manifest of a routing result and delivers all of them
//! concurrently. One station failing never affects the others, and nothing
//! escapes `dispatch`: every manifest settles into a `PrintResult`.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures::future::join_all;
use galley_printer::PrintError;
use shared::models::{AttemptKind, Order, PrintJob, PrintResult, StationType};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use super::connector::{PrinterConnector, TcpPrinterConnector};
use super::failover::{FailoverCoordinator, FailoverDecision};
use super::kds::KdsTicket;
use super::outcome::OutcomeLogger;
use super::renderer::TicketRenderer;
use crate::core::DispatchConfig;
use crate::message::{ChannelError, KdsChannel, KdsEnvelope};
use crate::routing::{RoutingManifest, RoutingResult, StationRegistry};

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Station {0} has no printer address configured")]
    MissingAddress(String),

    #[error(transparent)]
    Printer(#[from] PrintError),

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error("Backup station {0} is not available")]
    BackupUnavailable(String),
}

impl DeliveryError {
    /// Transport failures a backup printer may still succeed on
    pub fn is_failover_eligible(&self) -> bool {
        matches!(self, DeliveryError::Printer(e) if e.is_transport())
    }
}

pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Delivers routing results to printers and KDS screens
pub struct Dispatcher {
    registry: Arc<StationRegistry>,
    connector: Arc<dyn PrinterConnector>,
    kds: KdsChannel,
    outcomes: OutcomeLogger,
    failover: Arc<FailoverCoordinator>,
    renderer: TicketRenderer,
    /// Present when writes are serialized per station
    station_locks: Option<DashMap<String, Arc<Mutex<()>>>>,
}

impl Dispatcher {
    pub fn new(
        config: &DispatchConfig,
        registry: Arc<StationRegistry>,
        kds: KdsChannel,
        outcomes: OutcomeLogger,
    ) -> Self {
        Self {
            registry,
            connector: Arc::new(TcpPrinterConnector::new(config.printer_timeout())),
            kds,
            outcomes,
            failover: Arc::new(FailoverCoordinator::new()),
            renderer: TicketRenderer::new(config.timezone),
            station_locks: config.serialize_station_writes.then(DashMap::new),
        }
    }

    /// Replace the network connector
    pub fn with_connector(mut self, connector: Arc<dyn PrinterConnector>) -> Self {
        self.connector = connector;
        self
    }

    pub fn failover(&self) -> &Arc<FailoverCoordinator> {
        &self.failover
    }

    pub fn outcomes(&self) -> &OutcomeLogger {
        &self.outcomes
    }

    pub fn kds(&self) -> &KdsChannel {
        &self.kds
    }

    pub fn renderer(&self) -> &TicketRenderer {
        &self.renderer
    }

    /// Deliver every manifest concurrently, one `PrintResult` per manifest
    ///
    /// Expo screens then receive one order-wide ticket, whether or not any
    /// KDS station was routed.
    #[instrument(skip_all, fields(order_id = %result.order().id, manifests = result.manifests().len()))]
    pub async fn dispatch(&self, result: &RoutingResult) -> Vec<PrintResult> {
        let order = result.order();
        let results = join_all(
            result
                .manifests()
                .iter()
                .map(|manifest| self.deliver_manifest(order, manifest)),
        )
        .await;

        self.publish_order_wide(result);

        let failed = results.iter().filter(|r| !r.success).count();
        if failed > 0 {
            warn!(
                delivered = results.len() - failed,
                failed, "Order dispatched with failures"
            );
        } else {
            info!(delivered = results.len(), "Order dispatched");
        }
        results
    }

    async fn deliver_manifest(&self, order: &Order, manifest: &RoutingManifest) -> PrintResult {
        let station = manifest.station();
        let item_count = manifest.item_count();

        let err = match self.attempt(order, manifest, AttemptKind::Primary, None).await {
            Ok(()) => return PrintResult::ok(&station.id, &station.name, item_count),
            Err(err) => err,
        };

        if station.is_printer()
            && err.is_failover_eligible()
            && let Some((backup_id, window_ms)) = station.failover_target()
        {
            return self
                .fail_over(order, manifest, err, backup_id, window_ms)
                .await;
        }

        PrintResult::failed(&station.id, &station.name, item_count, err.to_string())
    }

    /// Wait for an operator retry, otherwise rebuild for the backup. One
    /// attempt either way.
    async fn fail_over(
        &self,
        order: &Order,
        manifest: &RoutingManifest,
        first_error: DeliveryError,
        backup_id: &str,
        window_ms: u64,
    ) -> PrintResult {
        let station = manifest.station();
        let item_count = manifest.item_count();
        warn!(
            station_id = %station.id,
            backup_id,
            window_ms,
            error = %first_error,
            "Printer failed, waiting for operator retry before failover"
        );

        let decision = self
            .failover
            .wait_for_retry(&station.id, Duration::from_millis(window_ms))
            .await;

        match decision {
            FailoverDecision::RetryPrimary => {
                match self
                    .attempt(order, manifest, AttemptKind::OperatorRetry, None)
                    .await
                {
                    Ok(()) => PrintResult::ok(&station.id, &station.name, item_count),
                    Err(e) => PrintResult::failed(
                        &station.id,
                        &station.name,
                        item_count,
                        format!("{}; retry failed: {}", first_error, e),
                    ),
                }
            }
            FailoverDecision::UseBackup => {
                let Some(backup) = self.registry.station(backup_id) else {
                    let e = DeliveryError::BackupUnavailable(backup_id.to_string());
                    warn!(station_id = %station.id, error = %e, "Failover aborted");
                    return PrintResult::failed(
                        &station.id,
                        &station.name,
                        item_count,
                        format!("{}; {}", first_error, e),
                    );
                };

                let rebuilt = manifest.rebuild_for(&backup);
                match self
                    .attempt(order, &rebuilt, AttemptKind::Failover, Some(&station.id))
                    .await
                {
                    Ok(()) => {
                        info!(station_id = %station.id, backup_id = %backup.id, "Ticket delivered via backup");
                        PrintResult {
                            delivered_via: Some(backup.id.clone()),
                            ..PrintResult::ok(&station.id, &station.name, item_count)
                        }
                    }
                    Err(e) => PrintResult::failed(
                        &station.id,
                        &station.name,
                        item_count,
                        format!("{}; backup {} failed: {}", first_error, backup.id, e),
                    ),
                }
            }
        }
    }

    /// One delivery attempt, logged as one `PrintJob`
    async fn attempt(
        &self,
        order: &Order,
        manifest: &RoutingManifest,
        kind: AttemptKind,
        failover_from: Option<&str>,
    ) -> DeliveryResult<()> {
        let station = manifest.station();
        let mut job = PrintJob::pending(
            &order.id,
            &station.id,
            kind,
            manifest.item_count(),
            now_millis(),
        );
        job.failover_from = failover_from.map(String::from);

        let result = match station.station_type {
            StationType::Printer => self.send_to_printer(order, manifest).await,
            StationType::Kds => self.publish_to_kds(order, manifest),
        };

        match &result {
            Ok(bytes) => job.mark_sent(*bytes, now_millis()),
            Err(e) => job.mark_failed(e.to_string(), now_millis()),
        }
        self.outcomes.log(&job);

        result.map(|_| ())
    }

    #[instrument(skip_all, fields(station_id = %manifest.station().id))]
    async fn send_to_printer(&self, order: &Order, manifest: &RoutingManifest) -> DeliveryResult<usize> {
        let station = manifest.station();
        let (ip, port) = station
            .network_address()
            .ok_or_else(|| DeliveryError::MissingAddress(station.id.clone()))?;

        let data = self.renderer.render(order, manifest);

        let _guard = match &self.station_locks {
            Some(locks) => {
                let lock = locks.entry(station.id.clone()).or_default().clone();
                Some(lock.lock_owned().await)
            }
            None => None,
        };

        self.connector.send(ip, port, &data).await?;
        Ok(data.len())
    }

    fn publish_to_kds(&self, order: &Order, manifest: &RoutingManifest) -> DeliveryResult<usize> {
        let station = manifest.station();
        let envelope = KdsEnvelope::for_station(
            &order.location_id,
            manifest.matched_tags().to_vec(),
            &station.id,
            KdsTicket::build(order, manifest),
        );
        self.kds.publish(envelope)?;
        Ok(0)
    }

    /// Not part of any station's delivery; failure is logged only
    fn publish_order_wide(&self, result: &RoutingResult) {
        let order = result.order();
        let envelope = KdsEnvelope::for_order(
            &order.location_id,
            KdsTicket::for_order(order, result.items()),
        );
        if let Err(e) = self.kds.publish(envelope) {
            warn!(error = %e, "Order-wide KDS ticket not published");
        }
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
