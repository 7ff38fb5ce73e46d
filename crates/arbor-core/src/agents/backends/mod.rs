//! Agent backend implementations.

mod claude;
mod codex;
mod gemini;
mod opencode;
mod qwen;

pub use claude::ClaudeBackend;
pub use codex::CodexBackend;
pub use gemini::GeminiBackend;
pub use opencode::OpencodeBackend;
pub use qwen::QwenBackend;
