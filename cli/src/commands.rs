use simon_core::{PressKind, Tile};
use std::io::Write;

use crate::CliContext;

pub async fn start(ctx: &CliContext) -> Result<(), String> {
    ctx.game.start().await.map_err(|e| e.to_string())
}

pub async fn press(ctx: &CliContext, tile: Tile, touch: bool) -> Result<(), String> {
    let kind = if touch {
        PressKind::Touch
    } else {
        PressKind::Mouse
    };
    ctx.game.press(tile, kind).await.map_err(|e| e.to_string())
}

pub async fn release(ctx: &CliContext) -> Result<(), String> {
    ctx.game.release().await.map_err(|e| e.to_string())
}

/// Press and immediately release a tile.
pub async fn tap(ctx: &CliContext, tile: Tile) -> Result<(), String> {
    press(ctx, tile, false).await?;
    release(ctx).await
}

pub fn show_config(ctx: &CliContext) -> Result<(), String> {
    let source = match &ctx.config_path {
        Some(path) => path.display().to_string(),
        None => "default location".to_string(),
    };
    let rendered = toml::to_string_pretty(&ctx.config).map_err(|e| e.to_string())?;
    println!("# config: {source}");
    println!("{rendered}");
    Ok(())
}

pub async fn exit(ctx: &CliContext) -> Result<(), String> {
    // the service may already be gone; quitting is still fine
    let _ = ctx.game.shutdown().await;
    writeln!(std::io::stdout(), "quitting...").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())
}
