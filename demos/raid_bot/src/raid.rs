//! Raid planning: create, list and cancel scheduled raids.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Deserialize;
use sigil::prelude::*;
use tracing::info;

/// `[modules.raid.settings]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RaidSettings {
    /// Raids that may be scheduled at the same time.
    pub max_raids: usize,
}

impl Default for RaidSettings {
    fn default() -> Self {
        Self { max_raids: 10 }
    }
}

#[derive(Debug, Clone)]
struct Raid {
    id: u32,
    day: u8,
    month: u8,
    hour: u8,
    minute: u8,
    utc_offset: i8,
    title: String,
    organizer: String,
}

impl fmt::Display for Raid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {:02}/{:02} {:02}:{:02} UTC{:+} {} (by {})",
            self.id,
            self.day,
            self.month,
            self.hour,
            self.minute,
            self.utc_offset,
            self.title,
            self.organizer
        )
    }
}

#[derive(Debug, Default)]
struct Schedule {
    raids: Vec<Raid>,
    next_id: u32,
}

/// Module state shared by the raid commands.
#[derive(Debug)]
pub struct RaidBoard {
    settings: RaidSettings,
    schedule: Mutex<Schedule>,
}

impl RaidBoard {
    pub fn new(settings: RaidSettings) -> Self {
        Self {
            settings,
            schedule: Mutex::new(Schedule::default()),
        }
    }
}

fn board(ctx: &CommandContext) -> Result<Arc<RaidBoard>, HandlerError> {
    ctx.state::<RaidBoard>()
        .ok_or_else(|| HandlerError::failed("raid board is not registered"))
}

async fn create(
    ctx: CommandContext,
    day: u8,
    month: u8,
    hour: u8,
    minute: u8,
    utc_offset: i8,
    title: String,
) -> Result<String, HandlerError> {
    if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
        return Ok(format!("{day:02}/{month:02} is not a valid date."));
    }
    if hour > 23 || minute > 59 {
        return Ok(format!("{hour:02}:{minute:02} is not a valid time."));
    }
    if !(-12..=14).contains(&utc_offset) {
        return Ok(format!("UTC{utc_offset:+} is not a valid offset."));
    }

    let board = board(&ctx)?;
    let mut schedule = board.schedule.lock();
    if schedule.raids.len() >= board.settings.max_raids {
        return Ok(format!(
            "The board is full ({} raids). Cancel one first.",
            board.settings.max_raids
        ));
    }

    schedule.next_id += 1;
    let raid = Raid {
        id: schedule.next_id,
        day,
        month,
        hour,
        minute,
        utc_offset,
        title: title.trim().to_owned(),
        organizer: ctx.author().to_owned(),
    };
    info!(id = raid.id, title = %raid.title, "Raid scheduled");
    let reply = format!("Scheduled {raid}");
    schedule.raids.push(raid);
    Ok(reply)
}

async fn list(ctx: CommandContext) -> Result<String, HandlerError> {
    let board = board(&ctx)?;
    let schedule = board.schedule.lock();
    if schedule.raids.is_empty() {
        return Ok("No raids scheduled.".to_owned());
    }
    Ok(schedule
        .raids
        .iter()
        .map(Raid::to_string)
        .collect::<Vec<_>>()
        .join("\n"))
}

async fn cancel(ctx: CommandContext, id: u32) -> Result<String, HandlerError> {
    let board = board(&ctx)?;
    let mut schedule = board.schedule.lock();
    let Some(position) = schedule.raids.iter().position(|raid| raid.id == id) else {
        return Ok(format!("There is no raid #{id}."));
    };
    if !schedule.raids[position]
        .organizer
        .eq_ignore_ascii_case(ctx.author())
    {
        return Ok(format!("Only the organizer can cancel raid #{id}."));
    }

    let raid = schedule.raids.remove(position);
    info!(id = raid.id, "Raid cancelled");
    Ok(format!("Cancelled {raid}"))
}

/// Builds the `raid` module.
pub fn module(settings: RaidSettings) -> ModuleBuilder {
    Module::builder("raid")
        .describe("Plan raids")
        .state(RaidBoard::new(settings))
        .command(
            Command::new(
                "create",
                "raid create {day}/{month} {hour}:{minute} UTC{offset} {title}",
            )
            .pattern(".+")
            .describe("Schedule a raid")
            .handler(create),
        )
        .command(
            Command::new("list", "raid list")
                .describe("Show scheduled raids")
                .handler(list),
        )
        .command(
            Command::new("cancel", "raid cancel {id}")
                .describe("Cancel one of your raids")
                .handler(cancel),
        )
}
