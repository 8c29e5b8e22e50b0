//! Application services for the service catalog.

mod catalog;
mod feedback;

pub use catalog::{
    CatalogService, CatalogServiceError, CatalogServiceResult, CreateServiceRequest,
    UpdateServiceRequest,
};
pub use feedback::{
    CreateReviewRequest, FeedbackService, FeedbackServiceError, FeedbackServiceResult,
};
