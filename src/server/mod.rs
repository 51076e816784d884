//! Storefront API backend.
//!
//! The backend uses Axum as the web framework and SeaORM for database operations, with
//! Stripe and PayPal reached over `reqwest`.
//!
//! # Architecture
//!
//! The server follows a layered architecture:
//!
//! - **Controller Layer** (`controller/`) - HTTP request handlers, access control, and DTO conversion
//! - **Service Layer** (`service/`) - Business rules, payments, email and file storage
//! - **Data Layer** (`data/`) - Soft-delete aware repositories, the unit of work, and entity-to-domain conversion
//! - **Model Layer** (`model/`) - Domain models and operation-specific parameter types
//! - **Error Layer** (`error/`) - Application error types and HTTP response mapping
//! - **Middleware** (`middleware/`) - Bearer token guard and rate limiting
//!
//! # Infrastructure
//!
//! - **Configuration** (`config`) - Environment-based application configuration
//! - **State** (`state`) - Shared application state (DB, token service, mailer, HTTP client)
//! - **Startup** (`startup`) - Database, mailer and admin account initialization
//! - **Router** (`router`) - Route table, OpenAPI document and HTTP layers
//!
//! # Request Flow
//!
//! 1. **Router** receives the request, applies CORS, tracing and rate limiting
//! 2. **Controller** authenticates the caller through `AuthGuard`, converts DTOs to params
//! 3. **Service** executes business logic, opening a unit of work for multi-step writes
//! 4. **Data** queries the database, converting entities to domain models
//! 5. **Controller** converts the domain model to a DTO and returns the response

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod middleware;
pub mod model;
pub mod router;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;
