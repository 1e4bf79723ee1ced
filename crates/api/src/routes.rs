pub mod activities;
pub mod auth;
pub mod facilities;
pub mod health;
pub mod reports;
pub mod reservations;
pub mod settings;
pub mod shifts;
pub mod time_slots;
pub mod users;
