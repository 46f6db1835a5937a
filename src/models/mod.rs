pub mod feedback;

pub use feedback::{FeedbackCreated, FeedbackRecord};
