pub mod audit;
pub mod chat;
pub mod error;
pub mod gate;
pub mod logger;
pub mod reply;

// Re-exports for convenience
pub use audit::AuditLog;
pub use chat::{ChatRequest, ChatResponse};
pub use error::HalError;
pub use gate::RequestGate;
pub use reply::{FixedReply, ReplyOutcome, ReplySource};
