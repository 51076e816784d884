//! Service layer for business logic and orchestration.
//!
//! Services sit between the controllers and the data layer. They validate input,
//! enforce business rules such as stock and ownership checks, coordinate repositories
//! inside a `UnitOfWork` when several writes must succeed together, and call out to
//! the mailer, file storage and payment providers. Services work with domain models,
//! never DTOs.

pub mod auth;
pub mod cart;
pub mod category;
pub mod email;
pub mod order;
pub mod password;
pub mod payment;
pub mod product;
pub mod storage;
pub mod token;
pub mod user;

#[cfg(test)]
mod test;
