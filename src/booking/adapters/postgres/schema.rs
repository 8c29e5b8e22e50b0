//! Diesel schema for booking persistence.

diesel::table! {
    /// Bookings; exactly one of `service_id` and `task_id` is set, and
    /// `task_id` is unique.
    bookings (id) {
        /// Booking identifier.
        id -> Uuid,
        /// Origin kind, `service` or `task`.
        #[max_length = 20]
        source -> Varchar,
        /// Booked listing for direct bookings.
        service_id -> Nullable<Uuid>,
        /// Originating task for offer acceptances.
        task_id -> Nullable<Uuid>,
        /// Paying party.
        customer_id -> Uuid,
        /// Party doing the work.
        provider_id -> Uuid,
        /// Price snapshot.
        total_price -> Numeric,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Payment status.
        #[max_length = 20]
        payment_status -> Varchar,
        /// Agreed start.
        scheduled_at -> Nullable<Timestamptz>,
        /// Customer note.
        notes -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
