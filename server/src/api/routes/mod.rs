//! API route modules

pub mod directory;
pub mod health;
