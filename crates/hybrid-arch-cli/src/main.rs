mod host_config;
mod watch;

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::{Value, json};

use hybrid_arch_config::paths::home_dir;
use hybrid_arch_hooks::HookEvent;
use hybrid_arch_tools::{ArchSession, BufferedHost, HybridArchPlugin, ToolContext};

#[derive(Parser)]
#[command(name = "hybrid-arch", about = "Hybrid Architecture plugin CLI")]
struct Cli {
    /// Project directory (defaults to the current directory)
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add the plugin to the host config
    Install,
    /// Remove the plugin from the host config
    Uninstall,
    /// Show the global, skill and project layers
    Status,
    /// Create the project scaffold
    Init {
        /// Do not copy built-in skills into the project
        #[arg(long)]
        no_builtin_skills: bool,

        /// Do not write the /arch-* command files
        #[arg(long)]
        no_commands: bool,
    },
    /// Manage project skills
    Skills {
        #[command(subcommand)]
        command: SkillsCommand,
    },
    /// Run any registered tool, including skill launch tools
    Tool {
        /// Tool name (e.g. "arch_status" or "skills_nextjs_debug")
        name: String,

        /// JSON arguments
        #[arg(long, default_value = "{}")]
        args: String,

        /// Session id passed to the tool
        #[arg(long, default_value = "cli")]
        session_id: String,
    },
    /// Dispatch one JSON hook event read from stdin
    Hook,
    /// Reload whenever an architecture file changes
    Watch,
}

#[derive(Subcommand)]
enum SkillsCommand {
    /// List discovered and requested skills
    List,
    /// Install a built-in skill into the project
    Install { name: String },
    /// Remove a project skill
    Uninstall { name: String },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let project_dir = match cli.project {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Install => {
            let path = host_config_path(&project_dir)?;
            host_config::add_plugin(&path).await?;
            println!("Installed plugin reference into:");
            println!("   {}", path.display());
            println!("\nNext:");
            println!("- Run: opencode");
            println!("- Then run command: /arch-init");
        }
        Commands::Uninstall => {
            let path = host_config_path(&project_dir)?;
            match host_config::remove_plugin(&path).await? {
                None => println!("No OpenCode config found."),
                Some(_) => {
                    println!("Removed plugin from:");
                    println!("   {}", path.display());
                }
            }
        }
        Commands::Status => {
            print_tool(&project_dir, "arch_status", json!({}), "cli").await?;
        }
        Commands::Init {
            no_builtin_skills,
            no_commands,
        } => {
            let args = json!({
                "installBuiltinSkills": !no_builtin_skills,
                "writeCommands": !no_commands,
            });
            print_tool(&project_dir, "arch_init", args, "cli").await?;
        }
        Commands::Skills { command } => {
            let (tool, args) = match command {
                SkillsCommand::List => ("arch_skill_list", json!({})),
                SkillsCommand::Install { name } => ("arch_skill_install", json!({ "name": name })),
                SkillsCommand::Uninstall { name } => {
                    ("arch_skill_uninstall", json!({ "name": name }))
                }
            };
            print_tool(&project_dir, tool, args, "cli").await?;
        }
        Commands::Tool {
            name,
            args,
            session_id,
        } => {
            let args: Value = serde_json::from_str(&args)?;
            print_tool(&project_dir, &name, args, &session_id).await?;
        }
        Commands::Hook => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            let event: HookEvent = serde_json::from_str(&input)?;

            let host = Arc::new(BufferedHost::new());
            let session = Arc::new(ArchSession::detect(&project_dir).await?);
            let plugin = HybridArchPlugin::new(session, host.clone()).await;
            let outputs = plugin.handle(event).await?;

            let reply = json!({ "outputs": outputs, "messages": host.drain() });
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }
        Commands::Watch => {
            let session = Arc::new(ArchSession::detect(&project_dir).await?);
            watch::run(session).await?;
        }
    }

    Ok(())
}

/// The host config lives under the home directory, not the project.
fn host_config_path(project_dir: &std::path::Path) -> anyhow::Result<PathBuf> {
    Ok(hybrid_arch_config::ArchPaths::new(project_dir, home_dir()?).host_config_file())
}

/// Run one tool against the project's plugin and print its reply.
///
/// Messages a skill tool sends to the session are printed first.
async fn print_tool(
    project_dir: &std::path::Path,
    name: &str,
    args: Value,
    session_id: &str,
) -> anyhow::Result<()> {
    let host = Arc::new(BufferedHost::new());
    let session = Arc::new(ArchSession::detect(project_dir).await?);
    let plugin = HybridArchPlugin::new(session, host.clone()).await;

    let tools = plugin.tools().await?;
    let Some(tool) = tools.get(name) else {
        let mut names: Vec<_> = tools.keys().map(String::as_str).collect();
        names.sort();
        anyhow::bail!("Unknown tool: {name}. Available: {}", names.join(", "));
    };

    let reply = tool.execute(&ToolContext::new(session_id), args).await?;
    for message in host.drain() {
        if let hybrid_arch_tools::HostMessage::Context { text, .. } = message {
            println!("{text}\n");
        }
    }
    println!("{reply}");
    Ok(())
}
