pub mod patient_directory;
pub mod recent_writer;
pub mod user_directory;
