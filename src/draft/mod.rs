pub mod error;
pub mod medium;
pub mod store;
pub mod values;
