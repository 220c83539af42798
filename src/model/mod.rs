pub mod attendance;
pub mod batch;
pub mod comparison;
pub mod employee;
pub mod role;
pub mod serde_date;
pub mod time_entry;
