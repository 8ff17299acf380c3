//! Station registry
//!
//! Holds the configured stations as an immutable snapshot. Readers clone the
//! `Arc` once per resolution; configuration changes swap in a new snapshot.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use shared::models::Station;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct RegistrySnapshot {
    version: u64,
    /// Stations per location, in configured order
    by_location: HashMap<String, Vec<Arc<Station>>>,
    by_id: HashMap<String, Arc<Station>>,
}

impl RegistrySnapshot {
    fn build(version: u64, stations: Vec<Station>) -> Self {
        let mut by_location: HashMap<String, Vec<Arc<Station>>> = HashMap::new();
        let mut by_id = HashMap::with_capacity(stations.len());

        for station in stations {
            let station = Arc::new(station);
            by_location
                .entry(station.location_id.clone())
                .or_default()
                .push(station.clone());
            by_id.insert(station.id.clone(), station);
        }

        Self {
            version,
            by_location,
            by_id,
        }
    }
}

/// Read-mostly station lookup shared by the resolver and the dispatcher
#[derive(Debug, Default)]
pub struct StationRegistry {
    snapshot: RwLock<Arc<RegistrySnapshot>>,
    next_version: AtomicU64,
}

impl StationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_stations(stations: Vec<Station>) -> Self {
        let registry = Self::new();
        registry.replace_snapshot(stations);
        registry
    }

    /// Atomically replace every station
    pub fn replace_snapshot(&self, stations: Vec<Station>) {
        let version = self.next_version.fetch_add(1, Ordering::Relaxed) + 1;
        let count = stations.len();
        let snapshot = Arc::new(RegistrySnapshot::build(version, stations));
        *self.snapshot.write() = snapshot;
        info!(version, stations = count, "Station registry snapshot replaced");
    }

    fn load(&self) -> Arc<RegistrySnapshot> {
        self.snapshot.read().clone()
    }

    /// Active, non-deleted stations of one location in configured order
    pub fn active_stations_for(&self, location_id: &str) -> Vec<Station> {
        let snapshot = self.load();
        let stations: Vec<Station> = snapshot
            .by_location
            .get(location_id)
            .into_iter()
            .flatten()
            .filter(|s| s.is_available())
            .map(|s| Station::clone(s))
            .collect();
        debug!(
            location_id,
            version = snapshot.version,
            active = stations.len(),
            "Loaded active stations"
        );
        stations
    }

    /// Active station by id (used to look up failover backups)
    pub fn station(&self, station_id: &str) -> Option<Station> {
        self.load()
            .by_id
            .get(station_id)
            .filter(|s| s.is_available())
            .map(|s| Station::clone(s))
    }

    pub fn version(&self) -> u64 {
        self.load().version
    }

    pub fn len(&self) -> usize {
        self.load().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stations() -> Vec<Station> {
        let mut inactive = Station::kds("old-screen", "loc-1");
        inactive.is_active = false;
        let mut deleted = Station::printer("old-bar", "loc-1", "10.0.0.3", 9100);
        deleted.deleted_at = Some(1_700_000_000_000);

        vec![
            Station::printer("grill", "loc-1", "10.0.0.1", 9100),
            inactive,
            Station::printer("bar", "loc-1", "10.0.0.2", 9100),
            deleted,
            Station::printer("grill-2", "loc-2", "10.1.0.1", 9100).with_name("Other grill"),
        ]
    }

    #[test]
    fn test_active_stations_filtered_and_ordered() {
        let registry = StationRegistry::from_stations(stations());
        let ids: Vec<_> = registry
            .active_stations_for("loc-1")
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["grill", "bar"]);
        assert!(registry.active_stations_for("nowhere").is_empty());
    }

    #[test]
    fn test_station_lookup_skips_inactive() {
        let registry = StationRegistry::from_stations(stations());
        assert!(registry.station("bar").is_some());
        assert!(registry.station("old-screen").is_none());
        assert!(registry.station("old-bar").is_none());
    }

    #[test]
    fn test_replace_snapshot_bumps_version() {
        let registry = StationRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.version(), 0);

        registry.replace_snapshot(stations());
        let first = registry.version();
        registry.replace_snapshot(vec![Station::kds("pass", "loc-1").expo()]);

        assert!(registry.version() > first);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.active_stations_for("loc-1")[0].id, "pass");
    }
}
