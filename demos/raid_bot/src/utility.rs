//! Small commands that do not belong anywhere else.

use sigil::prelude::*;

/// Answers through the responder instead of returning text.
async fn ping(ctx: CommandContext) -> Result<(), ResponderError> {
    ctx.reply("pong").await
}

async fn echo(_ctx: CommandContext, text: String) -> String {
    text
}

async fn whoami(ctx: CommandContext) -> String {
    format!("{} in #{}", ctx.author(), ctx.channel())
}

/// Builds the `utility` module.
pub fn module() -> ModuleBuilder {
    Module::builder("utility")
        .command(Command::new("ping", "ping").handler(ping))
        .command(
            Command::new("echo", "echo {text}")
                .pattern(".+")
                .handler(echo),
        )
        .command(Command::new("whoami", "whoami").handler(whoami))
}
