//! Application services for bookings.

mod bookings;

pub use bookings::{
    BookingService, BookingServiceError, BookingServiceResult, DirectBookingRequest,
};
