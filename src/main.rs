// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! ai-extension entry point - MCP server and command-line helpers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tokio::io::AsyncReadExt;

use ai_extension::compose::classify_path;
use ai_extension::config::{self, CliOptions, McpConfigDetector, ResolvedConfig};
use ai_extension::mcp::{
    run_stdio_server, ComposeTool, McpClient, McpContent, McpServer, McpToolResult, ServerInfo,
    ToolHandler, ToolRegistry, PROTOCOL_VERSION,
};
use ai_extension::telemetry::{init_telemetry, TelemetryConfig};
use ai_extension::types::{workspace_name, AttachmentItem, ComposeInput, ImageRef, RawAttachment};
use ai_extension::VERSION;

/// Compose messages with attachments and hand them to an AI assistant over MCP.
#[derive(Parser)]
#[command(name = "ai-extension")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Reply language code
    #[arg(short, long, global = true, env = "AI_EXTENSION_LANGUAGE")]
    language: Option<String>,

    /// Name of the compose tool
    #[arg(long, global = true, env = "AI_EXTENSION_TOOL_NAME")]
    tool_name: Option<String>,

    /// MCP config file checked before the IDE locations
    #[arg(long, global = true, env = "AI_EXTENSION_MCP_CONFIG")]
    mcp_config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Classify attachments by name only, without touching the filesystem
    #[arg(long, global = true)]
    no_metadata: bool,

    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Subcommands for ai-extension.
#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server on stdin/stdout (default)
    Serve,

    /// Compose a payload locally and print it
    Compose {
        #[command(flatten)]
        message: MessageArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show how names or paths are classified
    Classify {
        /// Names or paths to classify
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Call the compose tool on a spawned MCP server
    Call {
        #[command(flatten)]
        message: MessageArgs,

        #[command(flatten)]
        server: ServerArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List the tools of a spawned MCP server
    Tools {
        #[command(flatten)]
        server: ServerArgs,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    /// Show version information
    Version,
}

/// Config subcommand actions.
#[derive(Subcommand)]
enum ConfigAction {
    /// Show resolved settings and MCP detection status
    Show,
}

/// Message contents shared by `compose` and `call`.
#[derive(clap::Args)]
struct MessageArgs {
    /// Message text
    #[arg(short, long, default_value = "")]
    message: String,

    /// File or folder to attach (repeatable)
    #[arg(short, long = "attach")]
    attachments: Vec<PathBuf>,

    /// Image to attach (repeatable)
    #[arg(short, long = "image")]
    images: Vec<PathBuf>,

    /// Workspace root; defaults to the current directory
    #[arg(short, long)]
    workspace: Option<PathBuf>,

    /// Ask the assistant to call the tool again after answering
    #[arg(long)]
    continue_chat: bool,

    /// Read a JSON compose input from a file, or `-` for stdin
    #[arg(long, conflicts_with_all = ["message", "attachments", "images"])]
    input: Option<String>,
}

/// How to reach the MCP server for `call` and `tools`.
#[derive(clap::Args)]
struct ServerArgs {
    /// Server command; overrides the detected entry
    #[arg(long)]
    command: Option<String>,

    /// Server argument (repeatable, with --command)
    #[arg(long = "arg", requires = "command", allow_hyphen_values = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let telemetry = match (&cli.command, cli.verbose) {
        (_, true) => TelemetryConfig::development(),
        (None | Some(Commands::Serve), false) => TelemetryConfig::server(),
        _ => TelemetryConfig::default(),
    };
    init_telemetry(&telemetry)?;

    let cli_options = CliOptions {
        language: cli.language.clone(),
        continue_chat: None,
        tool_name: cli.tool_name.clone(),
        request_timeout_sec: cli.timeout,
        no_metadata: cli.no_metadata.then_some(true),
        mcp_config: cli.mcp_config.clone(),
    };

    let config = config::load_config(&std::env::current_dir()?, cli_options)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&config).await,
        Commands::Compose { message, format } => {
            let input = build_input(&message, &config).await?;
            let result = compose_locally(input, &config).await?;
            print_result(&result, format)?;
            if result.is_error {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Classify { paths } => {
            for path in paths {
                let name = path.to_string_lossy();
                let kind = classify_path(&path, &name, config.use_metadata);
                println!("{:<8} {}", kind.as_str().bright_cyan(), name);
            }
            Ok(())
        }
        Commands::Call {
            message,
            server,
            format,
        } => {
            let input = build_input(&message, &config).await?;
            let arguments = serde_json::to_value(&input)?;
            let client = connect(&server, &config).await?;
            let result = client.call_tool(&config.tool_name, arguments).await;
            client.shutdown().await?;
            let result = result?;
            print_result(&result, format)?;
            if result.is_error {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Tools { server } => {
            let mut client = connect(&server, &config).await?;
            let tools = client.list_tools().await;
            client.shutdown().await?;
            for tool in tools? {
                println!("{}", tool.name.bright_white().bold());
                if let Some(description) = tool.description {
                    println!("  {}", description.dimmed());
                }
            }
            Ok(())
        }
        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => show_config(&config),
        },
        Commands::Version => {
            println!("ai-extension {}", VERSION);
            println!("MCP protocol {}", PROTOCOL_VERSION);
            Ok(())
        }
    }
}

async fn serve(config: &ResolvedConfig) -> anyhow::Result<()> {
    let registry = ToolRegistry::with_compose_tool(&config.tool_name, &config.language);
    let info = ServerInfo {
        name: config.server_name.clone(),
        ..ServerInfo::this_server()
    };
    let server = McpServer::new(registry, info);
    run_stdio_server(server).await?;
    Ok(())
}

/// Build the compose input from flags, or read it from `--input`.
async fn build_input(args: &MessageArgs, config: &ResolvedConfig) -> anyhow::Result<ComposeInput> {
    if let Some(source) = &args.input {
        let content = if source == "-" {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        } else {
            tokio::fs::read_to_string(source)
                .await
                .with_context(|| format!("Failed to read {source}"))?
        };
        let mut input: ComposeInput =
            serde_json::from_str(&content).context("Invalid compose input")?;
        if input.language.is_none() {
            input.language = Some(config.language.clone());
        }
        input.continue_chat |= args.continue_chat || config.continue_chat;
        return Ok(input);
    }

    let root = match &args.workspace {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };
    let root = std::fs::canonicalize(&root).unwrap_or(root);

    let attached_files = args
        .attachments
        .iter()
        .map(|path| {
            let path = absolute(&root, path);
            RawAttachment::from(AttachmentItem::from_path(&path, Some(&root), config.use_metadata))
        })
        .collect();

    let attached_images = args
        .images
        .iter()
        .map(|path| ImageRef::load(&absolute(&root, path)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ComposeInput {
        message: args.message.clone(),
        attached_files,
        attached_images,
        workspace: workspace_name(&root.to_string_lossy()),
        continue_chat: args.continue_chat || config.continue_chat,
        language: Some(config.language.clone()),
    })
}

fn absolute(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Run the compose tool in-process, exactly as the server would.
async fn compose_locally(input: ComposeInput, config: &ResolvedConfig) -> anyhow::Result<McpToolResult> {
    let tool = ComposeTool::new(&config.tool_name, &config.language);
    Ok(tool.call(serde_json::to_value(&input)?).await)
}

async fn connect(server: &ServerArgs, config: &ResolvedConfig) -> anyhow::Result<McpClient> {
    let mut options = config.client_options();

    let (command, args, env) = match &server.command {
        Some(command) => (command.clone(), server.args.clone(), HashMap::new()),
        None => {
            let entry = McpConfigDetector::from_home_dir()
                .with_explicit(config.mcp_config.clone())
                .server_entry();
            if let Some(secs) = entry.timeout.filter(|s| *s > 0) {
                options.request_timeout = std::time::Duration::from_secs(secs);
            }
            (entry.command, entry.args, entry.env)
        }
    };

    McpClient::spawn(&command, &args, &env, options)
        .await
        .with_context(|| format!("MCP handshake with '{command}' failed"))
}

fn print_result(result: &McpToolResult, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Text => {
            for item in &result.content {
                match item {
                    McpContent::Text { text } if result.is_error => eprintln!("{}", text.red()),
                    McpContent::Text { text } => println!("{text}"),
                    McpContent::Image { data, mime_type } => println!(
                        "{}",
                        format!("[image {mime_type}, {} base64 chars]", data.len()).dimmed()
                    ),
                }
            }
        }
    }
    Ok(())
}

fn show_config(config: &ResolvedConfig) -> anyhow::Result<()> {
    println!("{}", "Settings".bright_blue().bold());
    println!("{}", serde_json::to_string_pretty(config)?);

    let detector = McpConfigDetector::from_home_dir().with_explicit(config.mcp_config.clone());

    println!("\n{}", "MCP config files".bright_blue().bold());
    for status in detector.status() {
        let mark = if status.exists { "✓".green() } else { "✗".red() };
        println!("{mark} {:<20} {}", status.source.label(), status.path.display());
    }

    let detected = detector.detect();
    let entry = detected.server_entry();
    println!("\n{}", "MCP server entry".bright_blue().bold());
    println!("Source:  {}", detected.source.label().bright_magenta());
    println!("Command: {} {}", entry.command.bright_white(), entry.args.join(" "));
    if let Some(timeout) = entry.timeout {
        println!("Timeout: {timeout}s");
    }

    if detected.find_server().is_none() && !detected.server_names().is_empty() {
        println!(
            "{}",
            format!(
                "No enabled ai-extension entry among [{}]; using default",
                detected.server_names().join(", ")
            )
            .yellow()
        );
    }
    Ok(())
}
