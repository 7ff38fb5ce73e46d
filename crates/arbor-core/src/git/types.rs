use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Classification of a local branch by its role in the repository.
///
/// Only `main` and `develop` are classified; everything else, including the
/// literal name `master`, is `Other`. The merge orchestrator treats `master`
/// specially by name when choosing a source branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchKind {
    Main,
    Develop,
    Other,
}

/// A local branch with its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchEntry {
    pub name: String,
    pub kind: BranchKind,
}

impl BranchEntry {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = classify_branch(&name);
        Self { name, kind }
    }
}

/// Classify a branch name into its [`BranchKind`].
pub fn classify_branch(name: &str) -> BranchKind {
    match name {
        "main" => BranchKind::Main,
        "develop" => BranchKind::Develop,
        _ => BranchKind::Other,
    }
}

/// A registered worktree: its checkout path and checked-out branch.
///
/// `branch` is `None` for a detached-HEAD worktree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorktreeEntry {
    pub path: PathBuf,
    pub branch: Option<String>,
}

/// Parameters for creating a worktree.
#[derive(Debug, Clone, PartialEq)]
pub struct WorktreeCreateRequest {
    pub repo_root: PathBuf,
    pub path: PathBuf,
    pub branch: String,
    /// When true, create `branch` at `base_branch` as part of the add.
    /// When false, check out the existing branch.
    pub is_new_branch: bool,
    pub base_branch: Option<String>,
}
