//! deskpilot - Entry Point
//!
//! Loads configuration, wires the reasoning tiers to the desktop, and either
//! runs a single command, prints a plan, serves HTTP, or drops into a REPL.

use clap::{Parser, Subcommand};
use deskpilot::command::{ActionDispatcher, CommandOutcome, CommandPipeline, IntentResolver};
use deskpilot::core::config::AgentConfig;
use deskpilot::core::error::Result;
use deskpilot::platform::Desktop;
use deskpilot::server::Server;
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

/// Control the desktop with natural-language commands
#[derive(Parser, Debug)]
#[command(name = "deskpilot", version)]
#[command(about = "Turn natural-language commands into desktop actions")]
struct Args {
    /// TOML configuration file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Log actions instead of performing them
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Resolve and execute one command
    Run {
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Resolve one command and print the plan without executing it
    Plan {
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Interactive prompt (default)
    Repl,
    /// Serve the HTTP API
    Serve {
        /// Listen address, overrides the configuration
        #[arg(long)]
        addr: Option<SocketAddr>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("deskpilot=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut config = AgentConfig::load(args.config.as_deref())?;
    if args.dry_run {
        config.executor.dry_run = true;
    }

    let desktop = if config.executor.dry_run {
        tracing::info!("Dry run: actions are logged, not performed");
        Desktop::dry_run()
    } else {
        Desktop::native()
    };

    let resolver = IntentResolver::from_config(&config.reasoning);
    let dispatcher = ActionDispatcher::from_config(desktop, &config);
    let pipeline = Arc::new(CommandPipeline::new(resolver, dispatcher));

    let rt = Runtime::new()?;

    match args.command.unwrap_or(Mode::Repl) {
        Mode::Run { words } => {
            let outcome = rt.block_on(pipeline.handle(&words.join(" ")))?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            if !outcome.is_success() {
                std::process::exit(1);
            }
        }
        Mode::Plan { words } => {
            let plan = rt.block_on(pipeline.think(&words.join(" ")));
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Mode::Serve { addr } => {
            let addr = match addr {
                Some(addr) => addr,
                None => config.server.socket_addr()?,
            };
            rt.block_on(serve(addr, pipeline))?;
        }
        Mode::Repl => repl(&rt, &pipeline)?,
    }

    Ok(())
}

async fn serve(addr: SocketAddr, pipeline: Arc<CommandPipeline>) -> Result<()> {
    let mut server = Server::start(addr, pipeline).await?;
    println!("deskpilot API on http://{} (Ctrl-C to stop)", server.addr());

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    server.shutdown()?;
    server.wait().await;
    Ok(())
}

fn repl(rt: &Runtime, pipeline: &CommandPipeline) -> Result<()> {
    println!("\n=== DESKPILOT ===");
    println!("Type a command in plain language, e.g. \"abre el bloc de notas y escribe hola\".");
    println!();
    println!("Commands:");
    println!("  status / s      - Show reasoning tiers and supported actions");
    println!("  quit / q        - Exit");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "q" {
            break;
        }

        if input == "status" || input == "s" {
            for tier in rt.block_on(pipeline.resolver().tier_status()) {
                let state = if tier.available { "available" } else { "offline" };
                println!("  {:<8} {}", tier.name, state);
            }
            println!("  actions: {}", pipeline.dispatcher().supported_actions().join(", "));
            continue;
        }

        match rt.block_on(pipeline.handle(input)) {
            Ok(outcome) => display_outcome(&outcome),
            Err(e) => println!("Internal error: {}", e),
        }
    }

    println!("\nGoodbye!");
    Ok(())
}

fn display_outcome(outcome: &CommandOutcome) {
    println!();
    if let Some(thought) = &outcome.plan.thought {
        println!("  Thought: {}", thought);
    }
    println!("  Plan:    {}", outcome.plan);
    println!("  Status:  {:?}", outcome.status);
    if let Some(text) = &outcome.response_text {
        println!("  Reply:   {}", text);
    }
    if let Some(message) = &outcome.message {
        println!("  Note:    {}", message);
    }
    println!();
}
