use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::api::resources::GmailMessagePart;
use crate::error::{AppError, AppResult};

/// Gmail hands out base64url with or without trailing `=`.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Top-level parts plus one level of children.
const MAX_PART_DEPTH: usize = 2;

const PLAIN_TEXT: &str = "text/plain";

pub fn decode_base64url_text(data: &str) -> AppResult<String> {
    let bytes = URL_SAFE_LENIENT.decode(data.trim())?;
    Ok(String::from_utf8(bytes)?)
}

/// Extracts the plain-text body of a fetched message.
///
/// Inline payload data is decoded directly. Otherwise the parts tree is
/// searched for the first `text/plain` leaf, see [`find_plain_text_part`].
pub fn message_body(id: &str, payload: &GmailMessagePart) -> AppResult<String> {
    if let Some(data) = payload.inline_data() {
        return decode_base64url_text(data);
    }

    let part = payload
        .children()
        .and_then(find_plain_text_part)
        .ok_or_else(|| AppError::MissingTextBody(id.to_string()))?;

    let data = part
        .inline_data()
        .ok_or_else(|| AppError::MissingTextBody(id.to_string()))?;

    decode_base64url_text(data)
}

/// First-match search bounded to two levels.
///
/// Parts are scanned in order. The first part that has children ends the
/// scan: only its immediate children are examined. A `text/plain` part met
/// before any container is returned as-is.
pub fn find_plain_text_part(parts: &[GmailMessagePart]) -> Option<&GmailMessagePart> {
    search(parts, MAX_PART_DEPTH)
}

fn search(parts: &[GmailMessagePart], depth: usize) -> Option<&GmailMessagePart> {
    for part in parts {
        match part.children() {
            Some(children) if depth > 1 => return search(children, depth - 1),
            _ => {}
        }

        if part.mime_type.eq_ignore_ascii_case(PLAIN_TEXT) {
            return Some(part);
        }
    }

    None
}
