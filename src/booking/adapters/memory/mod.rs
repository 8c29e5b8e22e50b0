//! In-memory booking adapters.

mod booking;

pub use booking::InMemoryBookingRepository;
