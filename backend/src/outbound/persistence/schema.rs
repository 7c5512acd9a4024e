//! Diesel table definitions. Keep in step with `backend/migrations`.

diesel::table! {
    /// Movie catalogue.
    movies (id) {
        id -> Int8,
        created_at -> Timestamptz,
        title -> Text,
        year -> Int4,
        runtime -> Int4,
        genres -> Array<Text>,
        version -> Int4,
    }
}
