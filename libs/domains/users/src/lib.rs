//! Users Domain
//!
//! User onboarding: nickname, gender, favourite genres and favourite movie.
//!
//! # Features
//!
//! - User CRUD operations
//! - Onboarding upsert keyed by nickname
//! - Nickname uniqueness (service check plus unique index)
//! - Genre list persisted as JSON text
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, validation, conflict rules
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Entity    │  ← SeaORM model, genre text shim
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{
//!     handlers,
//!     repository::InMemoryUserRepository,
//!     service::UserService,
//! };
//!
//! // Create repository and service
//! let repository = InMemoryUserRepository::new();
//! let service = UserService::new(repository);
//!
//! // Create Axum router
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod genre;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod sql;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{CreateUser, Gender, UpdateUser, User, UserQuery};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
pub use sql::SqlUserRepository;
