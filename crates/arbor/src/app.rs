use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("arbor")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Manage git worktrees bound to coding-agent sessions")
        .long_about(
            "arbor binds git worktrees to coding-agent sessions (Claude Code, Codex CLI, \
             Gemini, OpenCode, Qwen, or custom agents), resolves session ids from each \
             tool's own on-disk storage so sessions can be resumed later, and batch-merges \
             a source branch across every feature branch's worktree.",
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only emit error-level log events")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("branches")
                .about("List local branches with their classification")
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("worktrees")
                .about("List the repository's worktrees")
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("rm")
                .about("Remove the worktree checked out to a branch")
                .arg(
                    Arg::new("branch")
                        .help("Branch whose worktree should be removed")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .short('f')
                        .help("Remove even with uncommitted changes")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("merge")
                .about("Merge a source branch into every eligible branch's worktree")
                .arg(
                    Arg::new("source")
                        .long("source")
                        .short('s')
                        .help("Source branch (default: main, develop, or master)"),
                )
                .arg(
                    Arg::new("branches")
                        .long("branches")
                        .short('b')
                        .num_args(1..)
                        .help("Target branches (default: every non-source local branch)"),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help("Detect conflicts without keeping any merge result")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("push")
                        .long("push")
                        .help("Push each successfully merged branch")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("remote")
                        .long("remote")
                        .help("Remote to push to (default: merge.remote from config, else 'origin')"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("resolve")
                .about("Locate the latest agent session for a directory or branch")
                .arg(agent_arg())
                .arg(
                    Arg::new("cwd")
                        .long("cwd")
                        .help("Working directory to search (default: current directory)"),
                )
                .arg(
                    Arg::new("branch")
                        .long("branch")
                        .help("Search every worktree checked out to this branch"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("wait")
                .about("Poll until an agent session appears, or time out")
                .arg(agent_arg())
                .arg(
                    Arg::new("cwd")
                        .long("cwd")
                        .help("Working directory to watch (default: current directory)"),
                )
                .arg(
                    Arg::new("timeout-ms")
                        .long("timeout-ms")
                        .value_parser(clap::value_parser!(u64))
                        .help("Overall timeout in milliseconds (default: resolver.timeout_ms)"),
                )
                .arg(
                    Arg::new("poll-interval-ms")
                        .long("poll-interval-ms")
                        .value_parser(clap::value_parser!(u64))
                        .help("Poll interval in milliseconds (default: resolver.poll_interval_ms)"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Check that a persisted session id still has a session file")
                .arg(agent_arg())
                .arg(
                    Arg::new("session-id")
                        .help("Session id to validate")
                        .required(true)
                        .index(2),
                )
                .arg(
                    Arg::new("cwd")
                        .long("cwd")
                        .help("Worktree the session belongs to (default: current directory)"),
                ),
        )
        .subcommand(
            Command::new("agents")
                .about("List agents and whether their CLIs are installed")
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .help("Shell to generate completions for")
                        .required(true)
                        .value_parser(clap::value_parser!(clap_complete::Shell))
                        .index(1),
                ),
        )
}

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Emit machine-readable JSON")
        .action(ArgAction::SetTrue)
}

fn agent_arg() -> Arg {
    Arg::new("agent")
        .help("Agent tool")
        .required(true)
        .value_parser(["claude", "codex", "gemini", "opencode", "qwen"])
        .index(1)
}
