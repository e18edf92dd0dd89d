use tracing::debug;

use crate::cli::{Cli, Command};
use crate::commands;
use crate::context::AppContext;
use crate::error::AppResult;

pub async fn run(cli: Cli) -> AppResult<()> {
    let Cli {
        profile,
        json,
        verbose: _,
        user_id,
        token_file,
        command,
    } = cli;

    let ctx = AppContext::bootstrap(profile, json, user_id, token_file)?;
    debug!(?command, "dispatching command");

    match command {
        Command::Labels => commands::labels::run(&ctx).await,
        Command::LabelIds(args) => commands::label_ids::run(&ctx, args).await,
        Command::Messages(args) => commands::messages::run(&ctx, args).await,
        Command::Send(args) => commands::send::run(&ctx, args).await,
    }
}
