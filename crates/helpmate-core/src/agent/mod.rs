pub mod r#loop;
pub mod model;
pub mod transcript;

pub use model::{ChatModel, ChatRequest, ModelReply, RigChatModel};
pub use r#loop::{Orchestrator, OrchestratorError, Reply};
pub use transcript::ChatTurn;
