use crate::events::collaborators::PatientResolver;
use crate::models::patient::{Patient, PatientId};
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory directory of known patients, keyed by uuid
pub struct PatientDirectory {
    patients: DashMap<String, Arc<Patient>>,
    /// Saved patients only
    by_id: DashMap<PatientId, String>,
}

impl PatientDirectory {
    pub fn new() -> Self {
        Self {
            patients: DashMap::new(),
            by_id: DashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            patients: DashMap::with_capacity(capacity),
            by_id: DashMap::with_capacity(capacity),
        }
    }

    /// Add a patient, replacing any patient with the same uuid
    pub fn add_patient(&self, patient: Patient) {
        if let Some(previous) = self.patients.get(&patient.uuid).and_then(|p| p.id) {
            self.by_id.remove(&previous);
        }
        if let Some(id) = patient.id {
            self.by_id.insert(id, patient.uuid.clone());
        }
        self.patients.insert(patient.uuid.clone(), Arc::new(patient));
    }

    /// Remove a patient by uuid, returning it if it existed
    pub fn remove_patient(&self, uuid: &str) -> Option<Arc<Patient>> {
        let (_, patient) = self.patients.remove(uuid)?;
        if let Some(id) = patient.id {
            self.by_id.remove_if(&id, |_, owner| owner == uuid);
        }
        Some(patient)
    }

    pub fn get_by_uuid(&self, uuid: &str) -> Option<Arc<Patient>> {
        self.patients.get(uuid).map(|entry| Arc::clone(entry.value()))
    }

    pub fn get_by_id(&self, id: PatientId) -> Option<Arc<Patient>> {
        let uuid = self.by_id.get(&id).map(|entry| entry.value().clone())?;
        self.get_by_uuid(&uuid)
    }

    pub fn clear(&self) {
        self.patients.clear();
        self.by_id.clear();
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}

impl Default for PatientDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl PatientResolver for PatientDirectory {
    fn patient_by_uuid(&self, uuid: &str) -> Option<Arc<Patient>> {
        self.get_by_uuid(uuid)
    }

    fn patient_by_id(&self, id: PatientId) -> Option<Arc<Patient>> {
        self.get_by_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_lookup() {
        let directory = PatientDirectory::new();
        directory.add_patient(Patient::new(Some(1), "a", false));
        directory.add_patient(Patient::new(None, "b", false));

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.get_by_uuid("a").unwrap().id, Some(1));
        assert_eq!(directory.get_by_id(1).unwrap().uuid, "a");
        assert!(directory.get_by_uuid("b").unwrap().id.is_none());
        assert!(directory.get_by_id(2).is_none());
    }

    #[test]
    fn test_replace_updates_id_index() {
        let directory = PatientDirectory::new();
        directory.add_patient(Patient::new(None, "a", false));
        directory.add_patient(Patient::new(Some(5), "a", false));
        assert_eq!(directory.get_by_id(5).unwrap().uuid, "a");

        directory.add_patient(Patient::new(Some(6), "a", true));
        assert!(directory.get_by_id(5).is_none());
        assert!(directory.get_by_id(6).unwrap().voided);
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_remove() {
        let directory = PatientDirectory::new();
        directory.add_patient(Patient::new(Some(1), "a", false));

        assert!(directory.remove_patient("a").is_some());
        assert!(directory.remove_patient("a").is_none());
        assert!(directory.get_by_id(1).is_none());
        assert!(directory.is_empty());
    }

    #[test]
    fn test_clear() {
        let directory = PatientDirectory::with_capacity(8);
        directory.add_patient(Patient::new(Some(1), "a", false));
        directory.clear();

        assert!(directory.is_empty());
        assert!(directory.get_by_id(1).is_none());
    }
}
