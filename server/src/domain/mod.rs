//! Domain logic

pub mod directory;
