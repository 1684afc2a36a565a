//! API layer: handlers, DTOs, middleware, and routing.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
