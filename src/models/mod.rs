pub mod relay;
pub mod response;
pub mod submission;

pub use relay::{RelayOutcome, RelayPayload};
pub use response::SubmissionResponse;
pub use submission::{RawFields, SubmissionRequest};
