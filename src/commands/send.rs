use std::fs;
use std::path::Path;

use tracing::info;

use crate::api::models::OutboundMessage;
use crate::cli::SendArgs;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};

pub async fn run(ctx: &AppContext, args: SendArgs) -> AppResult<()> {
    let message = build_message(args, ctx.settings.sender.as_deref())?;
    let session = ctx.session()?;
    let result = ctx.gmail_client.send(&session, &message).await?;
    info!(message_id = %result.id, "message sent");

    let text = format!("sent message {}", result.id);
    ctx.output.emit(&text, &result)
}

fn build_message(args: SendArgs, default_sender: Option<&str>) -> AppResult<OutboundMessage> {
    let sender = args
        .sender
        .or_else(|| default_sender.map(ToOwned::to_owned))
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            AppError::InvalidInput(
                "missing sender; pass --from or set `sender` in the profile settings".to_string(),
            )
        })?;

    Ok(OutboundMessage {
        subject: args.subject,
        body: read_body(&args.message_file)?,
        sender,
        to: args.to,
        cc: args.cc,
        bcc: args.bcc,
        attachments: args.attachments,
    })
}

fn read_body(path: &Path) -> AppResult<String> {
    fs::read_to_string(path).map_err(|err| {
        AppError::Io(std::io::Error::new(
            err.kind(),
            format!("failed to read message file {}: {err}", path.display()),
        ))
    })
}
