use std::path::PathBuf;

use clap::ArgMatches;
use tracing::warn;

use arbor_core::config::ArborConfig;
use arbor_core::merge::{BatchMergeConfig, BatchMergeOrchestrator, MergeProgress, never_cancelled};
use arbor_core::sessions::{SessionSearchOptions, WaitOptions};
use arbor_core::{AgentType, GitGateway, SystemGit};

/// Load configuration with warning on errors.
///
/// Falls back to defaults if config loading fails, but notifies the user via:
/// - stderr message for immediate visibility
/// - structured log event `cli.config.load_failed` for debugging
fn load_config_with_warning() -> ArborConfig {
    match ArborConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.arbor/config.toml and ./.arbor/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            ArborConfig::default()
        }
    }
}

fn parse_agent(sub_matches: &ArgMatches) -> Result<AgentType, Box<dyn std::error::Error>> {
    let name = sub_matches
        .get_one::<String>("agent")
        .ok_or("agent argument is required")?;
    AgentType::parse(name).ok_or_else(|| format!("Unknown agent '{name}'").into())
}

fn cwd_or_current(sub_matches: &ArgMatches) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match sub_matches.get_one::<String>("cwd") {
        Some(cwd) => Ok(PathBuf::from(cwd)),
        None => Ok(std::env::current_dir()?),
    }
}

fn discover_git() -> Result<SystemGit, Box<dyn std::error::Error>> {
    let current_dir = std::env::current_dir()?;
    Ok(SystemGit::discover(&current_dir)?)
}

fn format_progress(progress: &MergeProgress) -> String {
    format!(
        "[{}/{}] {} ... {:?} ({} ok, {} skipped, {} failed)",
        progress.completed,
        progress.total,
        progress.branch,
        progress.status,
        progress.success_count,
        progress.skipped_count,
        progress.failed_count
    )
}

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("branches", sub_matches)) => handle_branches_command(sub_matches),
        Some(("worktrees", sub_matches)) => handle_worktrees_command(sub_matches),
        Some(("rm", sub_matches)) => handle_rm_command(sub_matches),
        Some(("merge", sub_matches)) => handle_merge_command(sub_matches),
        Some(("resolve", sub_matches)) => handle_resolve_command(sub_matches),
        Some(("wait", sub_matches)) => handle_wait_command(sub_matches),
        Some(("check", sub_matches)) => handle_check_command(sub_matches),
        Some(("agents", sub_matches)) => handle_agents_command(sub_matches),
        Some(("completions", sub_matches)) => handle_completions_command(sub_matches),
        _ => Err("Unknown command".into()),
    }
}

fn handle_branches_command(sub_matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let git = discover_git()?;
    let branches = git.list_local_branches()?;

    if sub_matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&branches)?);
        return Ok(());
    }

    for branch in branches {
        println!("{:<10} {}", format!("{:?}", branch.kind).to_lowercase(), branch.name);
    }
    Ok(())
}

fn handle_worktrees_command(sub_matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let git = discover_git()?;
    let worktrees = git.list_worktrees()?;

    if sub_matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&worktrees)?);
        return Ok(());
    }

    for worktree in worktrees {
        println!(
            "{:<30} {}",
            worktree.branch.as_deref().unwrap_or("(detached)"),
            worktree.path.display()
        );
    }
    Ok(())
}

fn handle_rm_command(sub_matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let branch = sub_matches
        .get_one::<String>("branch")
        .ok_or("branch argument is required")?;
    let force = sub_matches.get_flag("force");

    let git = discover_git()?;
    let worktrees = git.list_worktrees()?;
    let Some(entry) = worktrees
        .iter()
        .find(|w| w.branch.as_deref() == Some(branch.as_str()))
    else {
        return Err(format!("No worktree is checked out to branch '{branch}'").into());
    };

    git.remove_worktree(&entry.path, force)?;
    println!("Removed worktree {}", entry.path.display());
    Ok(())
}

fn handle_merge_command(sub_matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_warning();
    let json = sub_matches.get_flag("json");

    let git = discover_git()?;
    let orchestrator = BatchMergeOrchestrator::new(git);

    let source_branch = match sub_matches.get_one::<String>("source") {
        Some(source) => source.clone(),
        None => orchestrator.determine_source_branch()?,
    };

    let target_branches: Vec<String> = match sub_matches.get_many::<String>("branches") {
        Some(branches) => branches.cloned().collect(),
        None => orchestrator.target_branches()?,
    };
    if target_branches.is_empty() {
        println!("No target branches to merge into.");
        return Ok(());
    }

    let auto_push = sub_matches.get_flag("push") || config.merge.auto_push.unwrap_or(false);
    let remote = sub_matches
        .get_one::<String>("remote")
        .cloned()
        .or_else(|| config.merge.remote.clone())
        .or_else(|| auto_push.then(|| "origin".to_string()));

    let merge_config = BatchMergeConfig {
        source_branch,
        target_branches,
        dry_run: sub_matches.get_flag("dry-run"),
        auto_push,
        remote,
    };

    let cancel = never_cancelled();
    let mut on_progress = |progress: MergeProgress| {
        if !json {
            println!("{}", format_progress(&progress));
        }
    };
    let result = orchestrator.execute_batch_merge(&merge_config, &mut on_progress, &cancel)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "Merged '{}' into {} branches: {} ok, {} skipped (conflicts), {} failed.",
        merge_config.source_branch,
        result.summary.total_count,
        result.summary.success_count,
        result.summary.skipped_count,
        result.summary.failed_count
    );
    for status in &result.statuses {
        if let Some(error) = &status.error {
            println!("  {}: {}", status.branch_name, error);
        }
    }
    Ok(())
}

fn handle_resolve_command(sub_matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let agent = parse_agent(sub_matches)?;

    let options = if let Some(branch) = sub_matches.get_one::<String>("branch") {
        SessionSearchOptions::for_branch(branch.clone())
    } else {
        SessionSearchOptions::for_cwd(cwd_or_current(sub_matches)?)
    };

    // Branch scoping needs worktree enumeration; a plain cwd search works
    // outside any repository too.
    let current_dir = std::env::current_dir()?;
    let git = SystemGit::discover(&current_dir)
        .unwrap_or_else(|_| SystemGit::new(current_dir.clone()));

    match arbor_core::find_latest_session(agent, &options, &git)? {
        Some(info) => {
            if sub_matches.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{} (modified {})", info.id, info.mtime.to_rfc3339());
                if let Some(hint) = resume_hint(agent, &info.id) {
                    println!("Resume with: {hint}");
                }
            }
            Ok(())
        }
        None => Err(format!("No {agent} session found").into()),
    }
}

/// Command line that resumes a resolved session, for agents that take an
/// explicit id.
fn resume_hint(agent: AgentType, session_id: &str) -> Option<String> {
    let backend = arbor_core::agents::get_agent_by_type(agent)?;
    let flag = backend.resume_flag()?;
    Some(format!(
        "{} {} {}",
        backend.default_command(),
        flag,
        session_id
    ))
}

fn handle_wait_command(sub_matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let agent = parse_agent(sub_matches)?;
    let cwd = cwd_or_current(sub_matches)?;
    let config = load_config_with_warning();

    let wait = WaitOptions {
        timeout_ms: sub_matches
            .get_one::<u64>("timeout-ms")
            .copied()
            .unwrap_or_else(|| config.resolver.effective_timeout_ms()),
        poll_interval_ms: sub_matches
            .get_one::<u64>("poll-interval-ms")
            .copied()
            .unwrap_or_else(|| config.resolver.effective_poll_interval_ms()),
        window_ms: config.resolver.window_ms,
        ..WaitOptions::default()
    };

    match arbor_core::wait_for_session_id(agent, &cwd, &wait)? {
        Some(id) => {
            println!("{id}");
            Ok(())
        }
        None => Err(format!(
            "No {agent} session appeared within {} ms",
            wait.timeout_ms
        )
        .into()),
    }
}

fn handle_check_command(sub_matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let agent = parse_agent(sub_matches)?;
    let id = sub_matches
        .get_one::<String>("session-id")
        .ok_or("session-id argument is required")?;
    let cwd = cwd_or_current(sub_matches)?;

    if arbor_core::session_file_exists(agent, id, &cwd) {
        println!("Session file for '{id}' exists.");
        Ok(())
    } else {
        Err(format!("No session file found for '{id}' under {}", cwd.display()).into())
    }
}

fn handle_agents_command(sub_matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_warning();

    #[derive(serde::Serialize)]
    struct AgentRow {
        name: String,
        display_name: String,
        command: String,
        available: Option<bool>,
        builtin: bool,
    }

    let mut rows: Vec<AgentRow> = AgentType::all()
        .iter()
        .filter_map(|agent_type| arbor_core::agents::get_agent_by_type(*agent_type))
        .map(|backend| AgentRow {
            name: backend.name().to_string(),
            display_name: backend.display_name().to_string(),
            command: config
                .get_agent_command(backend.name())
                .unwrap_or_else(|_| backend.default_command().to_string()),
            available: Some(backend.is_available()),
            builtin: true,
        })
        .collect();

    for (name, custom) in &config.agents {
        if arbor_core::agents::is_valid_agent(name) {
            continue; // already listed as a built-in with its override
        }
        rows.push(AgentRow {
            name: name.clone(),
            display_name: custom.display_name.clone().unwrap_or_else(|| name.clone()),
            command: custom.command.clone(),
            available: None,
            builtin: false,
        });
    }

    if sub_matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for row in rows {
        let availability = match row.available {
            Some(true) => "installed",
            Some(false) => "not installed",
            None => "custom",
        };
        println!(
            "{:<10} {:<14} {:<16} {}",
            row.name, availability, row.display_name, row.command
        );
    }
    Ok(())
}

fn handle_completions_command(sub_matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let shell = *sub_matches
        .get_one::<clap_complete::Shell>("shell")
        .ok_or("shell argument is required")?;
    let mut app = crate::app::build_cli();
    clap_complete::generate(shell, &mut app, "arbor", &mut std::io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::merge::MergeOutcome;

    #[test]
    fn test_format_progress_line() {
        let line = format_progress(&MergeProgress {
            branch: "feature/a".to_string(),
            status: MergeOutcome::Skipped,
            completed: 2,
            total: 5,
            success_count: 1,
            skipped_count: 1,
            failed_count: 0,
        });
        assert_eq!(line, "[2/5] feature/a ... Skipped (1 ok, 1 skipped, 0 failed)");
    }

    #[test]
    fn test_parse_agent_from_matches() {
        let matches = crate::app::build_cli()
            .try_get_matches_from(["arbor", "resolve", "opencode"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(parse_agent(sub).unwrap(), AgentType::Opencode);
    }

    #[test]
    fn test_resume_hint_for_id_taking_agents() {
        assert_eq!(
            resume_hint(AgentType::Claude, "abc-123").as_deref(),
            Some("claude --resume abc-123")
        );
        // Gemini resumes from the working directory, no id flag
        assert_eq!(resume_hint(AgentType::Gemini, "abc-123"), None);
    }

    #[test]
    fn test_cwd_or_current_prefers_flag() {
        let matches = crate::app::build_cli()
            .try_get_matches_from(["arbor", "resolve", "claude", "--cwd", "/work/repo"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(cwd_or_current(sub).unwrap(), PathBuf::from("/work/repo"));
    }
}
