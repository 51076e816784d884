//! Database repository layer.
//!
//! `Repository` provides soft-delete aware CRUD for any entity and `UnitOfWork` groups
//! repositories into one transaction. The entity specific repositories hold the joined
//! and filtered queries, converting entities to domain models at this boundary.

pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod repository;
pub mod unit_of_work;
pub mod user;

#[cfg(test)]
mod test;
