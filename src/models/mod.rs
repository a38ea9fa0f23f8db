pub mod email;
pub mod invitation;
pub mod job;

pub use email::{
    Attachment, BatchItemError, BatchRequest, BatchSendResponse, DispatchResult, RenderedEmail,
    SentEmail,
};
pub use invitation::InvitationRecord;
pub use job::{
    EnqueueBatchRequest, EnqueueBatchResponse, InvitationBatchJob, JobId, JobRecord, JobStatus,
};
