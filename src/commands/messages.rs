use serde::Serialize;
use tracing::{info, warn};

use crate::api::labels;
use crate::api::models::{MessageDetail, MessageQuery};
use crate::api::session::Session;
use crate::cli::MessagesArgs;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::output::OutputMode;

#[derive(Debug, Serialize)]
struct MessageBatch {
    label_id: Option<String>,
    messages: Vec<MessageDetail>,
}

pub async fn run(ctx: &AppContext, args: MessagesArgs) -> AppResult<()> {
    let count = args.count.unwrap_or_else(|| ctx.settings.count());
    if count == 0 {
        return Err(AppError::InvalidInput(
            "--count must be greater than 0".to_string(),
        ));
    }

    let session = ctx.session()?;
    let label_ids = resolve_labels(ctx, &session, &args).await?;
    let query = args
        .q
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let mut batches = Vec::with_capacity(label_ids.len());
    for label_id in label_ids {
        let filter = MessageQuery {
            query: query.map(ToOwned::to_owned),
            label_id: label_id.clone(),
            count,
        };

        let Some(ids) = ctx.gmail_client.list_message_ids(&session, &filter).await? else {
            warn!(label_id = ?label_id, "no result data");
            continue;
        };

        let messages = ctx.gmail_client.fetch_messages(&session, &ids).await?;
        info!(label_id = ?label_id, count = messages.len(), "fetched messages");
        batches.push(MessageBatch { label_id, messages });
    }

    if ctx.output.mode() == OutputMode::Text {
        let text = format_batches(&batches);
        if !text.is_empty() {
            println!("{text}");
        }
        return Ok(());
    }

    ctx.output.emit("", &batches)
}

/// One listing per requested label, or a single unfiltered-by-label listing
/// when none were requested.
async fn resolve_labels(
    ctx: &AppContext,
    session: &Session,
    args: &MessagesArgs,
) -> AppResult<Vec<Option<String>>> {
    if args.label.is_empty() {
        return Ok(vec![None]);
    }

    let ids = if args.skip_missing {
        let known = ctx.gmail_client.list_labels(session).await?;
        let (found, missing) = labels::resolve_label_ids_lenient(&known, &args.label);
        for name in &missing {
            warn!(label = %name, "label not found; skipping");
        }
        found
    } else {
        ctx.gmail_client
            .resolve_label_ids(session, &args.label)
            .await?
    };

    Ok(ids.into_iter().map(Some).collect())
}

fn format_batches(batches: &[MessageBatch]) -> String {
    let mut blocks = Vec::new();
    for batch in batches {
        if let Some(label_id) = &batch.label_id {
            blocks.push(format!("== label {label_id}"));
        }
        for (index, message) in batch.messages.iter().enumerate() {
            blocks.push(format_message(index, message));
        }
    }
    blocks.join("\n\n")
}

fn format_message(index: usize, message: &MessageDetail) -> String {
    let labels = message
        .label_ids
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let from = message.header("from").unwrap_or("(unknown sender)");
    let subject = message.header("subject").unwrap_or("(no subject)");
    let date = message.header("date").unwrap_or("(no date)");

    let mut out = format!(
        "{}. {}\n   labels: {labels}\n   size: {}\n   from: {from}\n   subject: {subject}\n   date: {date}\n",
        index + 1,
        message.id,
        message.size,
    );
    for line in message.body.lines() {
        out.push_str("\n   ");
        out.push_str(line);
    }
    out
}
