use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use rand::Rng;
use tracing::debug;

use crate::api::models::{EncodedEnvelope, OutboundMessage};
use crate::error::{AppError, AppResult};

const CRLF: &str = "\r\n";
const OCTET_STREAM: &str = "application/octet-stream";

/// Extensions that name a compression wrapper rather than a content type,
/// including the single-suffix forms of compressed tarballs.
const COMPRESSION_SUFFIXES: [&str; 11] = [
    "gz", "z", "bz2", "xz", "br", "tgz", "taz", "tz", "tbz2", "txz", "svgz",
];

/// Raw bytes per RFC 2047 encoded-word. 45 bytes is 60 base64 characters,
/// which keeps `=?utf-8?b?...?=` within 75.
const ENCODED_WORD_BYTES: usize = 45;

/// How an attachment's payload is laid out in its part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Application,
    Image,
    Audio,
    /// Payload bytes go into the part unencoded.
    Raw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentType {
    pub kind: PartKind,
    pub main_type: String,
    pub sub_type: String,
}

impl AttachmentType {
    pub fn content_type(&self) -> String {
        format!("{}/{}", self.main_type, self.sub_type)
    }
}

pub fn encode(message: &OutboundMessage) -> AppResult<EncodedEnvelope> {
    if message.attachments.is_empty() {
        Ok(encode_simple(message))
    } else {
        encode_with_attachments(message)
    }
}

/// Single-part text message. Attachments on `message` are ignored.
pub fn encode_simple(message: &OutboundMessage) -> EncodedEnvelope {
    let mut out = Vec::new();
    push_line(&mut out, &base_headers(message).join(CRLF));
    push_line(&mut out, "MIME-Version: 1.0");
    push_text_part_headers(&mut out);
    out.extend_from_slice(CRLF.as_bytes());
    push_text_body(&mut out, &message.body);

    debug!(bytes = out.len(), "encoded single-part message");
    envelope(&out)
}

/// `multipart/mixed` message: the text body first, then one part per file
/// in the order given. Any unreadable file fails the whole message.
pub fn encode_with_attachments(message: &OutboundMessage) -> AppResult<EncodedEnvelope> {
    let boundary = random_boundary();

    let mut out = Vec::new();
    push_line(&mut out, &base_headers(message).join(CRLF));
    push_line(&mut out, "MIME-Version: 1.0");
    push_line(
        &mut out,
        &format!("Content-Type: multipart/mixed; boundary=\"{boundary}\""),
    );
    out.extend_from_slice(CRLF.as_bytes());

    push_line(&mut out, &format!("--{boundary}"));
    push_text_part_headers(&mut out);
    out.extend_from_slice(CRLF.as_bytes());
    push_text_body(&mut out, &message.body);

    for (index, path) in message.attachments.iter().enumerate() {
        let attachment_type = classify(path);
        let filename = file_name(path)?;
        debug!(
            index = index + 1,
            path = %path.display(),
            content_type = %attachment_type.content_type(),
            kind = ?attachment_type.kind,
            "attaching file"
        );

        let data = fs::read(path).map_err(|err| {
            AppError::Io(std::io::Error::new(
                err.kind(),
                format!("failed to read attachment {}: {err}", path.display()),
            ))
        })?;

        push_line(&mut out, &format!("--{boundary}"));
        push_attachment_part(&mut out, &attachment_type, &filename, &data);
    }

    push_line(&mut out, &format!("--{boundary}--"));

    debug!(
        bytes = out.len(),
        attachments = message.attachments.len(),
        "encoded multipart message"
    );
    Ok(envelope(&out))
}

/// Guesses the content type from the file extension and picks the part
/// layout from its main type.
pub fn classify(path: &Path) -> AttachmentType {
    let guessed = if has_compression_suffix(path) {
        None
    } else {
        mime_guess::from_path(path).first()
    };

    let content_type = guessed
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| OCTET_STREAM.to_string());
    let (main_type, sub_type) = content_type
        .split_once('/')
        .unwrap_or(("application", "octet-stream"));

    match main_type {
        "text" | "application" => AttachmentType {
            kind: PartKind::Application,
            main_type: "application".to_string(),
            sub_type: sub_type.to_string(),
        },
        "image" => AttachmentType {
            kind: PartKind::Image,
            main_type: "image".to_string(),
            sub_type: sub_type.to_string(),
        },
        "audio" => AttachmentType {
            kind: PartKind::Audio,
            main_type: "audio".to_string(),
            sub_type: sub_type.to_string(),
        },
        other => AttachmentType {
            kind: PartKind::Raw,
            main_type: other.to_string(),
            sub_type: sub_type.to_string(),
        },
    }
}

fn has_compression_suffix(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            COMPRESSION_SUFFIXES
                .iter()
                .any(|suffix| ext.eq_ignore_ascii_case(suffix))
        })
}

fn file_name(path: &Path) -> AppResult<String> {
    path.file_name()
        .map(|value| value.to_string_lossy().to_string())
        .ok_or_else(|| {
            AppError::InvalidInput(format!("invalid attachment path: {}", path.display()))
        })
}

fn base_headers(message: &OutboundMessage) -> Vec<String> {
    let mut headers = vec![
        format!("From: {}", encode_address_list(&message.sender)),
        format!("To: {}", encode_address_list(&message.to)),
    ];

    if let Some(cc) = non_empty(message.cc.as_deref()) {
        headers.push(format!("Cc: {}", encode_address_list(cc)));
    }

    if let Some(bcc) = non_empty(message.bcc.as_deref()) {
        headers.push(format!("Bcc: {}", encode_address_list(bcc)));
    }

    headers.push(format!(
        "Subject: {}",
        encode_header_word(&sanitize_header_value(&message.subject))
    ));

    headers
}

fn push_text_part_headers(out: &mut Vec<u8>) {
    push_line(out, "Content-Type: text/plain; charset=\"utf-8\"");
    push_line(out, "Content-Transfer-Encoding: base64");
}

fn push_text_body(out: &mut Vec<u8>, body: &str) {
    let encoded = STANDARD.encode(body.as_bytes());
    out.extend_from_slice(fold_base64_lines(&encoded).as_bytes());
}

fn push_attachment_part(
    out: &mut Vec<u8>,
    attachment_type: &AttachmentType,
    filename: &str,
    data: &[u8],
) {
    push_line(
        out,
        &format!(
            "Content-Type: {}; {}",
            attachment_type.content_type(),
            file_param("name", filename)
        ),
    );

    if attachment_type.kind != PartKind::Raw {
        push_line(out, "Content-Transfer-Encoding: base64");
    }

    push_line(
        out,
        &format!(
            "Content-Disposition: attachment; {}",
            file_param("filename", filename)
        ),
    );
    out.extend_from_slice(CRLF.as_bytes());

    match attachment_type.kind {
        PartKind::Raw => {
            out.extend_from_slice(data);
            out.extend_from_slice(CRLF.as_bytes());
        }
        PartKind::Application | PartKind::Image | PartKind::Audio => {
            let encoded = STANDARD.encode(data);
            out.extend_from_slice(fold_base64_lines(&encoded).as_bytes());
        }
    }
}

fn push_line(out: &mut Vec<u8>, line: &str) {
    out.extend_from_slice(line.as_bytes());
    out.extend_from_slice(CRLF.as_bytes());
}

fn envelope(bytes: &[u8]) -> EncodedEnvelope {
    EncodedEnvelope {
        raw: URL_SAFE.encode(bytes),
    }
}

fn fold_base64_lines(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 76 + 8);
    let mut start = 0;
    while start < input.len() {
        let end = (start + 76).min(input.len());
        out.push_str(&input[start..end]);
        out.push_str(CRLF);
        start = end;
    }
    out
}

fn random_boundary() -> String {
    let mut bytes = [0_u8; 12];
    rand::thread_rng().fill(&mut bytes);
    let token = URL_SAFE.encode(bytes);
    format!("=_gmail-mailer-{token}")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

fn sanitize_header_value(input: &str) -> String {
    input
        .chars()
        .filter(|value| *value != '\r' && *value != '\n')
        .collect()
}

/// RFC 2047 encoded-words for non-ASCII header text, folded onto
/// continuation lines. Characters are never split across words.
fn encode_header_word(value: &str) -> String {
    if value.is_ascii() {
        return value.to_string();
    }

    let mut words = Vec::new();
    let mut chunk = String::new();
    for ch in value.chars() {
        if !chunk.is_empty() && chunk.len() + ch.len_utf8() > ENCODED_WORD_BYTES {
            words.push(encoded_word(&chunk));
            chunk.clear();
        }
        chunk.push(ch);
    }
    if !chunk.is_empty() {
        words.push(encoded_word(&chunk));
    }

    words.join("\r\n ")
}

fn encoded_word(text: &str) -> String {
    format!("=?utf-8?b?{}?=", STANDARD.encode(text.as_bytes()))
}

/// Encodes non-ASCII display names in a comma-separated address list.
/// The `<addr>` part is left as written.
fn encode_address_list(value: &str) -> String {
    let value = sanitize_header_value(value);
    if value.is_ascii() {
        return value;
    }

    split_addresses(&value)
        .into_iter()
        .map(encode_mailbox)
        .collect::<Vec<_>>()
        .join(", ")
}

fn encode_mailbox(mailbox: &str) -> String {
    let mailbox = mailbox.trim();
    let Some(open) = mailbox.rfind('<') else {
        return mailbox.to_string();
    };

    let phrase = mailbox[..open].trim();
    let address = &mailbox[open..];
    let phrase = phrase
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(phrase);

    if phrase.is_empty() {
        return address.to_string();
    }
    if phrase.is_ascii() {
        return format!("{} {address}", mailbox[..open].trim());
    }

    format!("{} {address}", encode_header_word(phrase))
}

/// Splits on commas outside double quotes.
fn split_addresses(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (index, ch) in value.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&value[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);

    parts
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .collect()
}

/// `key="..."`, or the RFC 2231 form for non-ASCII names.
fn file_param(key: &str, filename: &str) -> String {
    if filename.is_ascii() {
        return format!("{key}=\"{}\"", filename.replace(['"', '\\'], ""));
    }

    let mut encoded = String::new();
    for byte in filename.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'-' | b'_') {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    format!("{key}*=utf-8''{encoded}")
}
