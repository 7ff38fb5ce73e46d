//! End-to-end batch merge against real git repositories.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use arbor_core::git::SystemGit;
use arbor_core::GitGateway;
use arbor_core::merge::{
    BatchMergeConfig, BatchMergeOrchestrator, MergeOutcome, MergeProgress, PushStatus,
    never_cancelled,
};

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
    std::fs::write(dir.join(name), content).unwrap();
    git(dir, &["add", "."]);
    git(dir, &["commit", "-m", message]);
}

fn is_clean(dir: &Path) -> bool {
    let output = Command::new("git")
        .args(["status", "--porcelain"])
        .current_dir(dir)
        .output()
        .unwrap();
    output.status.success() && output.stdout.is_empty()
}

/// Repo fixture: `main` advanced past three branches, one of which
/// (`feature/conflict`) edits the same line as `main`.
fn build_fixture() -> (TempDir, std::path::PathBuf) {
    let temp = TempDir::new().unwrap();
    let repo = temp.path().join("repo");
    std::fs::create_dir(&repo).unwrap();

    git(&repo, &["init"]);
    git(&repo, &["config", "user.email", "test@test.com"]);
    git(&repo, &["config", "user.name", "Test User"]);
    commit_file(&repo, "shared.txt", "base\n", "initial");
    git(&repo, &["branch", "-M", "main"]);

    git(&repo, &["branch", "feature/clean"]);
    git(&repo, &["checkout", "-b", "feature/conflict"]);
    commit_file(&repo, "shared.txt", "feature version\n", "feature edit");
    git(&repo, &["checkout", "main"]);
    commit_file(&repo, "shared.txt", "main version\n", "main edit");

    (temp, repo)
}

#[test]
fn batch_merge_mixes_success_and_conflict_skip() {
    let (_temp, repo) = build_fixture();
    let orchestrator = BatchMergeOrchestrator::new(SystemGit::new(repo.clone()));

    assert_eq!(orchestrator.determine_source_branch().unwrap(), "main");
    let targets = orchestrator.target_branches().unwrap();
    assert_eq!(
        targets,
        vec!["feature/clean".to_string(), "feature/conflict".to_string()]
    );

    let config = BatchMergeConfig {
        source_branch: "main".to_string(),
        target_branches: targets,
        dry_run: false,
        auto_push: false,
        remote: None,
    };

    let mut snapshots: Vec<MergeProgress> = Vec::new();
    let cancel = never_cancelled();
    let result = orchestrator
        .execute_batch_merge(&config, &mut |p: MergeProgress| snapshots.push(p), &cancel)
        .unwrap();

    assert_eq!(result.statuses.len(), 2);
    assert_eq!(snapshots.len(), 2);

    let clean = &result.statuses[0];
    assert_eq!(clean.branch_name, "feature/clean");
    assert_eq!(clean.status, MergeOutcome::Success);
    assert!(clean.worktree_created);
    assert_eq!(clean.push_status, PushStatus::NotExecuted);

    let conflict = &result.statuses[1];
    assert_eq!(conflict.branch_name, "feature/conflict");
    assert_eq!(conflict.status, MergeOutcome::Skipped);

    // The clean branch's worktree now carries main's edit
    let worktrees = orchestrator.git().list_worktrees().unwrap();
    let clean_wt = worktrees
        .iter()
        .find(|w| w.branch.as_deref() == Some("feature/clean"))
        .unwrap();
    assert_eq!(
        std::fs::read_to_string(clean_wt.path.join("shared.txt")).unwrap(),
        "main version\n"
    );

    // The conflicted worktree was restored to a clean state by the abort
    let conflict_wt = worktrees
        .iter()
        .find(|w| w.branch.as_deref() == Some("feature/conflict"))
        .unwrap();
    assert!(is_clean(&conflict_wt.path));
    assert_eq!(
        std::fs::read_to_string(conflict_wt.path.join("shared.txt")).unwrap(),
        "feature version\n"
    );
}

#[test]
fn batch_merge_dry_run_leaves_no_trace() {
    let (_temp, repo) = build_fixture();
    let orchestrator = BatchMergeOrchestrator::new(SystemGit::new(repo.clone()));

    let config = BatchMergeConfig {
        source_branch: "main".to_string(),
        target_branches: vec!["feature/clean".to_string(), "feature/conflict".to_string()],
        dry_run: true,
        auto_push: false,
        remote: None,
    };

    let cancel = never_cancelled();
    let result = orchestrator
        .execute_batch_merge(&config, &mut |_p: MergeProgress| {}, &cancel)
        .unwrap();

    assert_eq!(result.summary.success_count, 1);
    assert_eq!(result.summary.skipped_count, 1);

    // Every worktree is back to its pre-merge state
    for worktree in orchestrator.git().list_worktrees().unwrap() {
        assert!(
            is_clean(&worktree.path),
            "worktree {} left dirty by dry run",
            worktree.path.display()
        );
    }
    let worktrees = orchestrator.git().list_worktrees().unwrap();
    let clean_wt = worktrees
        .iter()
        .find(|w| w.branch.as_deref() == Some("feature/clean"))
        .unwrap();
    // Dry run must not have kept main's edit on the target branch
    assert_eq!(
        std::fs::read_to_string(clean_wt.path.join("shared.txt")).unwrap(),
        "base\n"
    );
}

#[test]
fn batch_merge_is_repeatable_after_dry_run() {
    // A dry run followed by a real run reuses the worktrees it created
    let (_temp, repo) = build_fixture();
    let orchestrator = BatchMergeOrchestrator::new(SystemGit::new(repo.clone()));

    let mut config = BatchMergeConfig {
        source_branch: "main".to_string(),
        target_branches: vec!["feature/clean".to_string()],
        dry_run: true,
        auto_push: false,
        remote: None,
    };

    let cancel = never_cancelled();
    let first = orchestrator
        .execute_batch_merge(&config, &mut |_p: MergeProgress| {}, &cancel)
        .unwrap();
    assert!(first.statuses[0].worktree_created);

    config.dry_run = false;
    let second = orchestrator
        .execute_batch_merge(&config, &mut |_p: MergeProgress| {}, &cancel)
        .unwrap();
    assert!(!second.statuses[0].worktree_created);
    assert_eq!(second.statuses[0].status, MergeOutcome::Success);
}

#[test]
fn auto_push_to_local_remote_succeeds() {
    let (temp, repo) = build_fixture();

    let remote_dir = temp.path().join("remote.git");
    std::fs::create_dir(&remote_dir).unwrap();
    git(&remote_dir, &["init", "--bare"]);
    git(
        &repo,
        &["remote", "add", "origin", remote_dir.to_str().unwrap()],
    );

    let orchestrator = BatchMergeOrchestrator::new(SystemGit::new(repo.clone()));
    let config = BatchMergeConfig {
        source_branch: "main".to_string(),
        target_branches: vec!["feature/clean".to_string()],
        dry_run: false,
        auto_push: true,
        remote: Some("origin".to_string()),
    };

    let cancel = never_cancelled();
    let result = orchestrator
        .execute_batch_merge(&config, &mut |_p: MergeProgress| {}, &cancel)
        .unwrap();

    assert_eq!(result.statuses[0].status, MergeOutcome::Success);
    assert_eq!(result.statuses[0].push_status, PushStatus::Success);

    // The remote now knows the branch
    let output = Command::new("git")
        .args(["branch", "--list", "feature/clean"])
        .current_dir(&remote_dir)
        .output()
        .unwrap();
    assert!(
        String::from_utf8_lossy(&output.stdout).contains("feature/clean"),
        "remote should have the pushed branch"
    );
}
