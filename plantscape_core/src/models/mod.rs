pub mod contact;
pub mod feed;
pub mod response;

pub use contact::{SubmissionInput, ValidatedSubmission};
pub use feed::{FeedPost, FeedResponse};
pub use response::ApiResponse;
