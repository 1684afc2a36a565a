//! Application layer: services implementing the business rules.

pub mod services;
