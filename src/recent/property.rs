// Stored form of the recent list: comma-separated patient ids, oldest first

use crate::events::collaborators::PatientResolver;
use crate::models::patient::{Patient, PatientId};
use crate::models::user::User;
use std::sync::Arc;
use tracing::warn;

/// Recent list in stored order, least recently viewed first
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecentList(Vec<PatientId>);

impl RecentList {
    pub fn new(ids: Vec<PatientId>) -> Self {
        Self(ids)
    }

    pub fn ids(&self) -> &[PatientId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialize to the stored property value
    pub fn to_property_value(&self) -> String {
        let mut value = String::with_capacity(self.0.len() * 6);
        let mut buffer = itoa::Buffer::new();

        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                value.push(',');
            }
            value.push_str(buffer.format(*id));
        }

        value
    }

    /// Parse a stored property value.
    ///
    /// Whitespace anywhere in the value is ignored. Segments that are not
    /// patient ids are skipped, so a partly corrupted value still yields the
    /// ids that can be read.
    pub fn parse(value: &str) -> Self {
        let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();

        let ids = compact
            .split(',')
            .filter(|segment| !segment.is_empty())
            .filter_map(|segment| match segment.parse::<PatientId>() {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!(segment = %segment, error = %e, "Invalid patient id in last viewed list, skipping");
                    None
                }
            })
            .collect();

        Self(ids)
    }
}

impl From<Vec<PatientId>> for RecentList {
    fn from(ids: Vec<PatientId>) -> Self {
        Self(ids)
    }
}

/// Resolve the patients a user viewed last, most recently viewed first.
///
/// Ids that no longer resolve, voided patients and repeated ids are dropped.
pub fn last_viewed_patients(user: &User, patients: &dyn PatientResolver) -> Vec<Arc<Patient>> {
    let Some(value) = user.last_viewed_patient_ids.as_deref() else {
        return Vec::new();
    };

    let mut resolved: Vec<Arc<Patient>> = Vec::new();

    for id in RecentList::parse(value).ids() {
        let Some(patient) = patients.patient_by_id(*id) else {
            continue;
        };
        if patient.voided || resolved.iter().any(|p| p.id == patient.id) {
            continue;
        }
        resolved.push(patient);
    }

    resolved.reverse();
    resolved
}

/// Ids of the patients a user viewed last, most recently viewed first
pub fn last_viewed_patient_ids(user: &User, patients: &dyn PatientResolver) -> Vec<PatientId> {
    last_viewed_patients(user, patients)
        .iter()
        .filter_map(|patient| patient.id)
        .collect()
}
