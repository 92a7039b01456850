//! A pretend music player: the queue and volume live in memory only.

use std::sync::Arc;

use parking_lot::Mutex;
use sigil::prelude::*;

#[derive(Debug)]
struct Player {
    volume: u8,
    queue: Vec<String>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            volume: 50,
            queue: Vec::new(),
        }
    }
}

fn player(ctx: &CommandContext) -> Result<Arc<Mutex<Player>>, HandlerError> {
    ctx.state::<Mutex<Player>>()
        .ok_or_else(|| HandlerError::failed("music player is not registered"))
}

async fn play(ctx: CommandContext, song: String) -> Result<String, HandlerError> {
    let player = player(&ctx)?;
    let mut player = player.lock();
    player.queue.push(song.clone());
    Ok(format!("Queued \"{song}\" at position {}", player.queue.len()))
}

async fn playlist(_ctx: CommandContext, name: String) -> String {
    format!("Loading playlist {name}")
}

async fn volume(ctx: CommandContext, level: u8) -> Result<String, HandlerError> {
    if level > 100 {
        return Ok("Volume goes from 0 to 100.".to_owned());
    }
    player(&ctx)?.lock().volume = level;
    Ok(format!("Volume set to {level}"))
}

async fn queue(ctx: CommandContext) -> Result<String, HandlerError> {
    let player = player(&ctx)?;
    let player = player.lock();
    if player.queue.is_empty() {
        return Ok(format!("The queue is empty (volume {}).", player.volume));
    }
    let mut lines = vec![format!("Volume {}", player.volume)];
    lines.extend(
        player
            .queue
            .iter()
            .enumerate()
            .map(|(i, song)| format!("{}. {song}", i + 1)),
    );
    Ok(lines.join("\n"))
}

/// Builds the `music` module.
pub fn module() -> ModuleBuilder {
    Module::builder("music")
        .describe("Control the music player")
        .state(Mutex::new(Player::default()))
        .command(
            Command::new("play", "play {song}")
                .pattern(".+")
                .describe("Queue a song")
                .handler(play),
        )
        .command(
            Command::new("playlist", "playlist {name}")
                .pattern(r"\S+")
                .describe("Load a playlist")
                .handler(playlist),
        )
        .command(
            Command::new("volume", "volume {level}")
                .describe("Set the volume (0-100)")
                .handler(volume),
        )
        .command(
            Command::new("queue", "queue")
                .describe("Show the queue")
                .handler(queue),
        )
}
