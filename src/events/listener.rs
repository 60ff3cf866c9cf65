use crate::core::error::EventError;
use crate::events::bus::{EventMessage, PATIENT_UUID_KEY, PATIENT_VIEWED_TOPIC, USER_UUID_KEY};
use crate::events::collaborators::{
    LimitProvider, OperationContext, PatientResolver, Privilege, RecentListWriter, UserResolver,
};
use crate::metrics::collector::Metrics;
use crate::models::user::UserId;
use crate::recent::{self, RecentList};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

const ACTOR: &str = "patient-viewed-listener";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Updated { user_id: UserId, list: RecentList },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The patient exists but has no id yet
    PatientNotSaved,
    UnknownUser,
}

/// Adds the patient of each patient viewed notification to the last viewed
/// list of the user named in the message.
pub struct PatientViewedListener {
    patients: Arc<dyn PatientResolver>,
    users: Arc<dyn UserResolver>,
    writer: Arc<dyn RecentListWriter>,
    limits: Arc<dyn LimitProvider>,
    metrics: Arc<Metrics>,
}

impl PatientViewedListener {
    pub fn new(
        patients: Arc<dyn PatientResolver>,
        users: Arc<dyn UserResolver>,
        writer: Arc<dyn RecentListWriter>,
        limits: Arc<dyn LimitProvider>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            patients,
            users,
            writer,
            limits,
            metrics,
        }
    }

    fn operation_context() -> OperationContext {
        OperationContext::new(ACTOR).grant(Privilege::EditUserProperties)
    }

    /// Process one message, reporting what happened.
    ///
    /// Unresolvable users and unsaved patients are skips, not errors. A
    /// missing key or unknown patient is an error, as is any failure to store.
    pub fn handle(&self, message: &EventMessage) -> Result<Outcome, EventError> {
        let patient_uuid = message
            .get(PATIENT_UUID_KEY)
            .ok_or(EventError::MissingKey(PATIENT_UUID_KEY))?;
        let user_uuid = message
            .get(USER_UUID_KEY)
            .ok_or(EventError::MissingKey(USER_UUID_KEY))?;

        let patient = self
            .patients
            .patient_by_uuid(patient_uuid)
            .ok_or_else(|| EventError::PatientNotFound(patient_uuid.to_string()))?;

        let Some(patient_id) = patient.id else {
            return Ok(Outcome::Skipped(SkipReason::PatientNotSaved));
        };

        let Some(user) = self.users.user_by_uuid(user_uuid) else {
            return Ok(Outcome::Skipped(SkipReason::UnknownUser));
        };

        let limit = self.limits.last_viewed_limit();
        let existing = if limit > 0 {
            recent::last_viewed_patient_ids(&user, self.patients.as_ref())
        } else {
            Vec::new()
        };

        let list = RecentList::new(recent::update(&existing, patient_id, limit));

        self.writer
            .store(&Self::operation_context(), user.id, &list)
            .map_err(|source| EventError::Persistence {
                user_id: user.id,
                source,
            })?;

        Ok(Outcome::Updated {
            user_id: user.id,
            list,
        })
    }

    /// Process one message, logging and counting the result.
    ///
    /// Messages on other topics are ignored and yield `None`, as do failures.
    pub fn on_message(&self, message: &EventMessage) -> Option<Outcome> {
        if message.topic != PATIENT_VIEWED_TOPIC {
            debug!(topic = %message.topic, "Ignoring message on unrelated topic");
            return None;
        }

        self.metrics.increment_received();

        match self.handle(message) {
            Ok(outcome) => {
                match &outcome {
                    Outcome::Updated { user_id, list } => {
                        self.metrics.increment_updated();
                        debug!(
                            user_id = *user_id,
                            last_viewed = %list.to_property_value(),
                            "Last viewed patients updated"
                        );
                    }
                    Outcome::Skipped(reason) => {
                        self.metrics.increment_skipped();
                        info!(
                            reason = ?reason,
                            patient_uuid = ?message.get(PATIENT_UUID_KEY),
                            user_uuid = ?message.get(USER_UUID_KEY),
                            "Patient viewed event skipped"
                        );
                    }
                }
                Some(outcome)
            }
            Err(e) => {
                self.metrics.increment_failed();
                error!(error = %e, "Failed to process patient viewed event message");
                None
            }
        }
    }

    /// Consume the bus until it closes
    pub async fn run(self: Arc<Self>, mut receiver: broadcast::Receiver<EventMessage>) {
        loop {
            match receiver.recv().await {
                Ok(message) => {
                    self.on_message(&message);
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(
                        skipped = n,
                        "Patient viewed listener lagged, some events were dropped"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    info!("Event bus closed, patient viewed listener shutting down");
                    break;
                }
            }
        }
    }
}
