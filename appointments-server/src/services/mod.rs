//! Business services layer for the appointments server
//!
//! Services own transaction boundaries: each public operation opens exactly
//! one unit of work on the store and commits it before returning.

pub mod appointment_service;

pub use appointment_service::{AppointmentError, AppointmentService};
