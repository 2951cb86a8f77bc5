//! HTTP handlers.

pub mod health;
pub mod mvp;
pub mod ops;
pub mod orchestrate;
