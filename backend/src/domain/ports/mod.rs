//! Domain ports implemented by outbound adapters.

mod macros;
mod movie_repository;
mod persistence_error;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use movie_repository::MockMovieRepository;
pub use movie_repository::MovieRepository;
pub use persistence_error::PersistenceError;
