//! Core probe types.

mod reply;
mod status;

pub use reply::{CodeRange, ReplyCode, ReplyLine};
pub use status::ServiceStatus;
