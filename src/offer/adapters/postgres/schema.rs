//! Diesel schema for offer persistence.

diesel::table! {
    /// Provider bids; unique per `(task_id, provider_id)`.
    offers (id) {
        /// Offer identifier.
        id -> Uuid,
        /// Targeted task.
        task_id -> Uuid,
        /// Bidding provider.
        provider_id -> Uuid,
        /// Message to the task owner.
        #[max_length = 500]
        message -> Varchar,
        /// Proposed price.
        proposed_price -> Numeric,
        /// Proposed time window.
        #[max_length = 100]
        proposed_time_window -> Nullable<Varchar>,
        /// Offer status.
        #[max_length = 20]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
