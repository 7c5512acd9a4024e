//! Domain primitives, entities, and ports.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: client-facing error payload.
//! - `TraceId`: request correlation identifier.
//! - `Movie` / `MovieId` / `NewMovie`: catalogue entity.
//! - `Models`: bundle of repository ports handed to HTTP handlers.

pub mod error;
pub mod models;
pub mod movie;
pub mod ports;
pub mod trace_id;

pub use self::error::{Error, ErrorCode};
pub use self::models::Models;
pub use self::movie::{Movie, MovieId, NewMovie};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
