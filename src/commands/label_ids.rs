use serde::Serialize;
use tracing::{info, warn};

use crate::api::labels;
use crate::cli::LabelIdsArgs;
use crate::context::AppContext;
use crate::error::AppResult;

#[derive(Debug, Serialize)]
struct ResolvedLabel<'a> {
    name: &'a str,
    id: &'a str,
}

pub async fn run(ctx: &AppContext, args: LabelIdsArgs) -> AppResult<()> {
    let session = ctx.session()?;
    let known = ctx.gmail_client.list_labels(&session).await?;

    let mut resolved = Vec::with_capacity(args.names.len());
    for name in &args.names {
        match labels::find_label_id(&known, name) {
            Ok(id) => resolved.push(ResolvedLabel { name, id }),
            Err(err) if args.skip_missing => warn!("{err}; skipping"),
            Err(err) => return Err(err),
        }
    }
    info!(
        requested = args.names.len(),
        resolved = resolved.len(),
        "resolved label ids"
    );

    let text = resolved
        .iter()
        .map(|label| format!("{}: {}", label.name, label.id))
        .collect::<Vec<_>>()
        .join("\n");
    ctx.output.emit(&text, &resolved)
}
