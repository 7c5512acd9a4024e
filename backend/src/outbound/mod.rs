//! Outbound adapters implementing domain ports.
//!
//! Adapters translate between domain types and infrastructure
//! representations and carry no business logic.

pub mod persistence;
