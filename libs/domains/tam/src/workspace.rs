//! Drive and Gmail records used by the assistant tools.

use base64::{Engine, engine::general_purpose::URL_SAFE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
}

/// A Drive file with its content decoded as UTF-8.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveDocument {
    pub name: String,
    pub content: String,
}

/// Builds a plain-text RFC 2822 message and encodes it for the Gmail `raw` field.
pub fn encode_raw_message(to: &str, subject: &str, message_text: &str) -> String {
    let mut message = String::new();
    message.push_str("Content-Type: text/plain; charset=\"utf-8\"\r\n");
    message.push_str("MIME-Version: 1.0\r\n");
    message.push_str("Content-Transfer-Encoding: 8bit\r\n");
    message.push_str(&format!("to: {}\r\n", strip_line_breaks(to)));
    message.push_str(&format!("subject: {}\r\n", strip_line_breaks(subject)));
    message.push_str("\r\n");
    message.push_str(message_text);

    URL_SAFE.encode(message.as_bytes())
}

// Header values must stay on one line.
fn strip_line_breaks(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}
