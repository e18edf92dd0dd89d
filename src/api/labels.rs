use crate::error::{AppError, AppResult};

use super::models::Label;

pub fn list_labels_endpoint(user_id: &str) -> String {
    format!("/gmail/v1/users/{user_id}/labels")
}

/// Looks up the id of the first label named exactly `name` (case-sensitive).
pub fn find_label_id<'a>(labels: &'a [Label], name: &str) -> AppResult<&'a str> {
    labels
        .iter()
        .find(|label| label.name == name)
        .map(|label| label.id.as_str())
        .ok_or_else(|| AppError::LabelNotFound(name.to_string()))
}

/// Resolves every name in order, failing on the first unknown one.
pub fn resolve_label_ids(labels: &[Label], names: &[String]) -> AppResult<Vec<String>> {
    names
        .iter()
        .map(|name| find_label_id(labels, name).map(ToOwned::to_owned))
        .collect()
}

/// Resolves what it can. Returns the found ids and the names that matched
/// nothing, both in input order.
pub fn resolve_label_ids_lenient(
    labels: &[Label],
    names: &[String],
) -> (Vec<String>, Vec<String>) {
    let mut found = Vec::new();
    let mut missing = Vec::new();

    for name in names {
        match find_label_id(labels, name) {
            Ok(id) => found.push(id.to_string()),
            Err(_) => missing.push(name.clone()),
        }
    }

    (found, missing)
}
