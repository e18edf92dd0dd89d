use crate::error::{AppError, AppResult};

const DEFAULT_PROFILE: &str = "default";

/// Profile names become file names, so path separators are refused.
pub fn resolve_profile(requested: &str) -> AppResult<String> {
    let name = requested.trim();
    if name.is_empty() {
        return Ok(DEFAULT_PROFILE.to_string());
    }

    if name.contains(['/', '\\']) || name.starts_with('.') {
        return Err(AppError::InvalidInput(format!("invalid profile name `{name}`")));
    }

    Ok(name.to_string())
}
