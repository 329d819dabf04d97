//! OrgLens server library

pub mod api;
pub(crate) mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
