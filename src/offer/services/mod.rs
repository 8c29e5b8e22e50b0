//! Application services for offers.

mod bidding;

pub use bidding::{OfferService, OfferServiceError, OfferServiceResult, SubmitOfferRequest};
