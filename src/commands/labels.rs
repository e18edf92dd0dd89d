use tracing::info;

use crate::api::models::Label;
use crate::context::AppContext;
use crate::error::AppResult;

pub async fn run(ctx: &AppContext) -> AppResult<()> {
    let session = ctx.session()?;
    let labels = ctx.gmail_client.list_labels(&session).await?;
    info!(count = labels.len(), "fetched labels");

    let text = if labels.is_empty() {
        "0 labels".to_string()
    } else {
        labels
            .iter()
            .enumerate()
            .map(|(index, label)| format_label(index, label))
            .collect::<Vec<_>>()
            .join("\n")
    };

    ctx.output.emit(&text, &labels)
}

fn format_label(index: usize, label: &Label) -> String {
    let kind = label.kind.as_deref().unwrap_or("unknown");
    if label.id == label.name {
        format!("{}. {} [{}]", index + 1, label.name, kind)
    } else {
        format!("{}. {} [{}] (id: {})", index + 1, label.name, kind, label.id)
    }
}
