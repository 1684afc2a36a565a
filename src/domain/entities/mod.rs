//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without infrastructure concerns.
//! Creation inputs are separate structs (`NewLink`, `NewUser`).

pub mod link;
pub mod user;

pub use link::{Link, NewLink};
pub use user::{NewUser, User};
