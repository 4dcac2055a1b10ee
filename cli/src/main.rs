use clap::{Parser, Subcommand};
use simon_cli::{CliContext, TerminalBoard, TerminalTones, commands, logging, readline};
use simon_core::{GameConfig, GameConfigExt, GameService, Tile};
use std::io::Write;
use std::path::PathBuf;

/// Launch options, parsed once from the process arguments
#[derive(Parser)]
#[command(version, about = "Simon memory game")]
struct LaunchArgs {
    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let _log_guard = logging::init();
    let args = LaunchArgs::parse();

    let config = match &args.config {
        Some(path) => GameConfig::load_path(path).map_err(|e| e.to_string())?,
        None => GameConfig::load(),
    };

    let (service, handle) = GameService::new(config.clone(), TerminalBoard::new(), TerminalTones::new());
    let service_task = tokio::spawn(service.run());
    let ctx = CliContext::new(config, args.config, handle);

    loop {
        let Some(line) = readline()? else {
            let _ = ctx.game.shutdown().await;
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    let game = service_task.await.map_err(|e| e.to_string())?;
    tracing::info!(round = game.round(), phase = ?game.phase(), "session ended");
    Ok(())
}

#[derive(Parser)]
#[command(version, about = "simon")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new game
    Start,
    /// Hold a tile down
    Press {
        tile: Tile,
        /// Press as a touch (no transition effect)
        #[arg(short, long)]
        touch: bool,
    },
    /// Let go of the held tile
    Release,
    /// Press and release a tile
    Tap { tile: Tile },
    Config,
    Exit,
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "simon".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match cli.command {
        Some(Commands::Start) => commands::start(ctx).await?,
        Some(Commands::Press { tile, touch }) => commands::press(ctx, tile, touch).await?,
        Some(Commands::Release) => commands::release(ctx).await?,
        Some(Commands::Tap { tile }) => commands::tap(ctx, tile).await?,
        Some(Commands::Config) => commands::show_config(ctx)?,
        Some(Commands::Exit) => {
            commands::exit(ctx).await?;
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
