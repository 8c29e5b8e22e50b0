//! Diesel schema for service listings and their feedback.

diesel::table! {
    /// Fixed-price service listings.
    services (id) {
        /// Listing identifier.
        id -> Uuid,
        /// Providing user.
        owner_id -> Uuid,
        /// Listing title.
        #[max_length = 200]
        title -> Varchar,
        /// Listing description.
        description -> Text,
        /// Catalog category.
        #[max_length = 100]
        category -> Varchar,
        /// Current price.
        price -> Numeric,
        /// Free-form tags.
        tags -> Array<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Listing reviews.
    reviews (id) {
        /// Review identifier.
        id -> Uuid,
        /// Reviewed listing.
        service_id -> Uuid,
        /// Reviewing user.
        author_id -> Uuid,
        /// Star rating, 1 to 5.
        rating -> Int2,
        /// Review text, empty when none was given.
        body -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-user favorite listings.
    favorites (user_id, service_id) {
        /// Owning user.
        user_id -> Uuid,
        /// Favorite listing.
        service_id -> Uuid,
        /// When the listing was added.
        created_at -> Timestamptz,
    }
}
