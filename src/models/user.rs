/// Name of the user property holding the recently viewed patient ids
pub const LAST_VIEWED_PATIENT_IDS_PROPERTY: &str = "emrapi.lastViewedPatientIds";

pub type UserId = u32;

#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: UserId,
    pub uuid: String,
    /// Raw stored value of the last viewed property: comma-separated patient
    /// ids, least recently viewed first
    pub last_viewed_patient_ids: Option<String>,
}

impl User {
    pub fn new(id: UserId, uuid: impl Into<String>) -> Self {
        Self {
            id,
            uuid: uuid.into(),
            last_viewed_patient_ids: None,
        }
    }

    pub fn with_last_viewed(mut self, value: impl Into<String>) -> Self {
        self.last_viewed_patient_ids = Some(value.into());
        self
    }
}
