pub mod activity;
pub mod facility;
pub mod report;
pub mod reservation;
pub mod settings;
pub mod shift;
pub mod time_slot;
pub mod user;
