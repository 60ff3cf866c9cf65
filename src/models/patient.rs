pub type PatientId = u32;

#[derive(Clone, Debug, PartialEq)]
pub struct Patient {
    /// Database id, absent until the patient has been saved
    pub id: Option<PatientId>,
    pub uuid: String,
    /// Voided patients are kept for history but never shown as recently viewed
    pub voided: bool,
}

impl Patient {
    pub fn new(id: Option<PatientId>, uuid: impl Into<String>, voided: bool) -> Self {
        Self {
            id,
            uuid: uuid.into(),
            voided,
        }
    }
}
