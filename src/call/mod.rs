pub mod event;
pub mod incoming;
