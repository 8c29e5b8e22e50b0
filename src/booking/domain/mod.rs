//! Domain model for bookings.

mod booking;
mod error;
mod ids;
mod origin;
mod status;

pub use booking::{Booking, NewBooking, PersistedBookingData};
pub use error::{BookingDomainError, ParseBookingStatusError};
pub use ids::BookingId;
pub use origin::BookingOrigin;
pub use status::{BookingStatus, PaymentStatus};
