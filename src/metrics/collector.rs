use crate::stores::patient_directory::PatientDirectory;
use crate::stores::user_directory::UserDirectory;
use crate::utils::time::current_timestamp;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct Metrics {
    pub events_received: AtomicU64,
    pub events_updated: AtomicU64,
    pub events_skipped: AtomicU64,
    pub events_failed: AtomicU64,
    pub start_time: i64,
}

#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct MetricsSnapshot {
    pub events_received: u64,
    pub events_updated: u64,
    pub events_skipped: u64,
    pub events_failed: u64,
    pub failure_rate: f64,
    #[serde(rename = "cached_patients")]
    pub patients: usize,
    #[serde(rename = "cached_users")]
    pub users: usize,
    pub uptime_seconds: i64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            events_received: AtomicU64::new(0),
            events_updated: AtomicU64::new(0),
            events_skipped: AtomicU64::new(0),
            events_failed: AtomicU64::new(0),
            start_time: current_timestamp(),
        }
    }

    pub fn increment_received(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_updated(&self) {
        self.events_updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_skipped(&self) {
        self.events_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_failed(&self) {
        self.events_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Collect counters and directory sizes into a serializable snapshot
    pub fn get_snapshot(&self, patients: &PatientDirectory, users: &UserDirectory) -> MetricsSnapshot {
        let events_received = self.events_received.load(Ordering::Relaxed);
        let events_failed = self.events_failed.load(Ordering::Relaxed);

        let failure_rate = if events_received > 0 {
            (events_failed as f64 / events_received as f64) * 100.0
        } else {
            0.0
        };

        MetricsSnapshot {
            events_received,
            events_updated: self.events_updated.load(Ordering::Relaxed),
            events_skipped: self.events_skipped.load(Ordering::Relaxed),
            events_failed,
            failure_rate,
            patients: patients.len(),
            users: users.len(),
            uptime_seconds: current_timestamp() - self.start_time,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
