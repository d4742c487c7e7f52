pub mod agent;
pub mod error;
pub mod task;
pub mod tools;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types
pub use agent::{ChatModel, ChatTurn, ModelReply, Orchestrator, OrchestratorError, Reply, RigChatModel};
pub use error::ToolError;
pub use task::TaskStore;
pub use tools::{ToolDescriptor, ToolInvocationResult, ToolRegistry};
