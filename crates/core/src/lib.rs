//! # Courtside Core
//!
//! Domain types shared by the database and API crates: models and their
//! request/response shapes, the error taxonomy, and the pure rules that decide
//! whether a booking may proceed, which slots a facility should have, and how
//! reports are aggregated. Nothing in here performs I/O.

pub mod booking;
pub mod errors;
pub mod models;
pub mod reporting;
pub mod slots;
