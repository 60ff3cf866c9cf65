pub mod property;
pub mod tracker;

pub use property::{last_viewed_patient_ids, last_viewed_patients, RecentList};
pub use tracker::update;
