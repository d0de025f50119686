pub mod controller;
pub mod error;
pub mod notify;
pub mod session_model;
pub mod submit;
