//! Persistence adapters for the domain repository ports.
//!
//! - Diesel adapters talk to PostgreSQL through a `bb8` pool of
//!   `diesel-async` connections. Row structs and the schema stay private to
//!   this module.
//! - The in-memory adapter backs local runs without a database and tests.
//!
//! Every adapter reports failures as
//! [`PersistenceError`](crate::domain::ports::PersistenceError).

mod diesel_movie_repository;
mod memory_movie_repository;
mod models;
mod pool;
mod schema;

pub use diesel_movie_repository::DieselMovieRepository;
pub use memory_movie_repository::InMemoryMovieRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
