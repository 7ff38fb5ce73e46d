//! Per-tool session store strategies.
//!
//! Each supported agent persists sessions in its own on-disk layout. One
//! strategy struct per tool implements [`SessionStore`] against that layout;
//! the concrete store is selected by [`store_for`] from the explicit
//! [`AgentType`] enum.
//!
//! Stores are read-only and idempotent: they never write to another tool's
//! storage, and every I/O or parse failure is folded into "no candidate
//! from this source".

use std::path::Path;

use crate::agents::AgentType;
use crate::sessions::types::SessionInfo;

mod claude;
mod codex;
mod gemini;
mod opencode;
mod qwen;

pub use claude::ClaudeStore;
pub use codex::CodexStore;
pub use gemini::GeminiStore;
pub use opencode::OpencodeStore;
pub use qwen::QwenStore;

/// Search contract implemented by every per-tool store.
pub trait SessionStore: Send + Sync {
    /// Collect every candidate session visible for the given working
    /// directory. `None` means the search is unscoped; stores whose layout
    /// is keyed by working directory contribute nothing in that case.
    ///
    /// Time filtering and ranking happen in the resolver, so stores return
    /// raw candidates.
    fn collect(&self, cwd: Option<&Path>) -> Vec<SessionInfo>;

    /// Check whether a session file for `id` still exists under this
    /// store's layout for `cwd`, used to validate a persisted id before a
    /// resume operation trusts it.
    fn session_file_exists(&self, id: &str, cwd: &Path) -> bool;
}

/// Build the store strategy for an agent, rooted at the conventional
/// (env-overridable) storage locations.
pub fn store_for(agent: AgentType) -> Box<dyn SessionStore> {
    match agent {
        AgentType::Claude => Box::new(ClaudeStore::from_env()),
        AgentType::Codex => Box::new(CodexStore::from_env()),
        AgentType::Gemini => Box::new(GeminiStore::from_env()),
        AgentType::Opencode => Box::new(OpencodeStore::from_env()),
        AgentType::Qwen => Box::new(QwenStore::from_env()),
    }
}
