//! API handlers.

pub mod health;
pub mod mpesa;
pub mod telegram;
