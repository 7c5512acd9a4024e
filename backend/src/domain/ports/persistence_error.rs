//! Failure taxonomy shared by every persistence port.
//!
//! `NotFound` and `EditConflict` are sentinels: handlers decide the HTTP
//! outcome by matching on the variant, never on the rendered message. Any
//! other variant is opaque and ends up as a server error.
//!
//! Repository methods return this type directly, so `?` keeps the sentinel
//! intact all the way up to the handler that maps it.

use super::define_port_error;

define_port_error! {
    /// Errors returned by persistence adapters.
    pub enum PersistenceError {
        /// The targeted record does not exist.
        NotFound => "record not found",
        /// The record changed since the caller read it; the write was not
        /// applied.
        EditConflict => "edit conflict",
        /// The store could not be reached.
        Connection { message: String } => "persistence connection failed: {message}",
        /// The store rejected or failed the statement.
        Query { message: String } => "persistence query failed: {message}",
    }
}

impl PersistenceError {
    /// Whether the error is the [`PersistenceError::NotFound`] sentinel.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Whether the error is the [`PersistenceError::EditConflict`] sentinel.
    #[must_use]
    pub const fn is_edit_conflict(&self) -> bool {
        matches!(self, Self::EditConflict)
    }

    /// Whether the error is one of the client-facing sentinels rather than an
    /// opaque storage failure.
    #[must_use]
    pub const fn is_sentinel(&self) -> bool {
        self.is_not_found() || self.is_edit_conflict()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn sentinels_are_distinct() {
        assert_ne!(PersistenceError::NotFound, PersistenceError::EditConflict);
    }

    #[rstest]
    fn sentinels_equal_themselves_across_lookups() {
        let first = PersistenceError::not_found();
        let second = PersistenceError::not_found();

        assert_eq!(first, second);
        assert_eq!(first, PersistenceError::NotFound);
    }

    #[rstest]
    fn sentinel_identity_ignores_message_text() {
        let lookalike = PersistenceError::query("record not found");

        assert_ne!(lookalike, PersistenceError::NotFound);
        assert!(!lookalike.is_not_found());
        assert_eq!(lookalike.to_string(), "persistence query failed: record not found");
    }

    #[rstest]
    #[case(PersistenceError::NotFound, true, false)]
    #[case(PersistenceError::EditConflict, false, true)]
    #[case(PersistenceError::connection("refused"), false, false)]
    #[case(PersistenceError::query("syntax"), false, false)]
    fn predicates_match_variants(
        #[case] error: PersistenceError,
        #[case] not_found: bool,
        #[case] conflict: bool,
    ) {
        assert_eq!(error.is_not_found(), not_found);
        assert_eq!(error.is_edit_conflict(), conflict);
        assert_eq!(error.is_sentinel(), not_found || conflict);
    }

    #[rstest]
    fn sentinel_survives_question_mark_propagation() {
        fn lookup() -> Result<(), PersistenceError> {
            Err(PersistenceError::EditConflict)
        }
        fn service() -> Result<(), PersistenceError> {
            lookup()?;
            Ok(())
        }

        assert_eq!(service(), Err(PersistenceError::EditConflict));
    }
}
