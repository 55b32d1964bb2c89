pub mod appointment;
pub mod auth;
pub mod error;
pub mod events;
pub mod state;
