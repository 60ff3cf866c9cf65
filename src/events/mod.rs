pub mod bus;
pub mod collaborators;
pub mod listener;

pub use bus::{EventBus, EventMessage};
pub use listener::PatientViewedListener;
