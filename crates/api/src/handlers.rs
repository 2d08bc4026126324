pub mod booking;
pub mod rules;
pub mod slots;
