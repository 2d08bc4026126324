pub mod appointment;
pub mod rules;
pub mod slot;
pub mod user;
