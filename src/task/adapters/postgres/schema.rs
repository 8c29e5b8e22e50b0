//! Diesel schema for task persistence.

diesel::table! {
    /// Client-posted tasks.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Owning client.
        client_id -> Uuid,
        /// Short summary.
        #[max_length = 100]
        title -> Varchar,
        /// Full description.
        description -> Text,
        /// Catalog category.
        #[max_length = 100]
        category -> Varchar,
        /// Free-text location.
        #[max_length = 200]
        location_text -> Varchar,
        /// Geocoded latitude.
        latitude -> Nullable<Float8>,
        /// Geocoded longitude.
        longitude -> Nullable<Float8>,
        /// Photo URLs as a JSON array.
        photos -> Jsonb,
        /// Budget pricing model.
        #[max_length = 20]
        budget_type -> Varchar,
        /// Budget amount.
        budget -> Numeric,
        /// Requested time of the work.
        scheduled_at -> Nullable<Timestamptz>,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Provider assigned on offer acceptance.
        assigned_provider_id -> Nullable<Uuid>,
        /// Denormalized count of offers received.
        offers_count -> Int4,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
