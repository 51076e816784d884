//! Server-side domain models and parameter types.
//!
//! Domain models are converted from entity models at the repository boundary and
//! transformed to DTOs at the controller boundary. Parameter types carry validated
//! controller input into the service layer.

pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod user;
