// Application state (AppState)

use crate::core::config::Config;
use crate::events::bus::EventBus;
use crate::events::listener::PatientViewedListener;
use crate::metrics::collector::Metrics;
use crate::stores::patient_directory::PatientDirectory;
use crate::stores::recent_writer::UserPropertyWriter;
use crate::stores::user_directory::UserDirectory;
use crate::wal::wal::Wal;
use std::sync::Arc;

/// Shared application state
///
/// Contains all shared components that are accessed by request handlers and
/// the patient viewed listener.
#[derive(Clone)]
pub struct AppState {
    /// Known patients, resolved by uuid and id
    pub patients: Arc<PatientDirectory>,

    /// Known users and their stored last viewed lists
    pub users: Arc<UserDirectory>,

    /// Carries patient viewed notifications to the listener
    pub bus: Arc<EventBus>,

    pub metrics: Arc<Metrics>,

    /// Write-Ahead Log for persistence
    pub wal: Arc<Wal>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, wal: Wal) -> Self {
        let config = Arc::new(config);

        Self {
            patients: Arc::new(PatientDirectory::with_capacity(config.memory.patient_cache_size)),
            users: Arc::new(UserDirectory::with_capacity(config.memory.user_cache_size)),
            bus: Arc::new(EventBus::new(config.recent.event_buffer)),
            metrics: Arc::new(Metrics::new()),
            wal: Arc::new(wal),
            config,
        }
    }

    /// Build a listener wired to this state's directories and WAL
    pub fn patient_viewed_listener(&self) -> PatientViewedListener {
        let writer = UserPropertyWriter::new(Arc::clone(&self.users), Arc::clone(&self.wal));

        PatientViewedListener::new(
            self.patients.clone(),
            self.users.clone(),
            Arc::new(writer),
            Arc::new(self.config.recent.clone()),
            Arc::clone(&self.metrics),
        )
    }
}
