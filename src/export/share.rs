//! Message-based sharing.
//!
//! Builds a prefilled message from the document text and the addressing URI
//! that opens an external composer. Composers truncate or refuse long URIs;
//! the limits below are reported, not enforced.

use std::fmt;

/// Fixed message content around the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareSettings {
    /// Subject: a header for email, the first line for WhatsApp.
    pub subject: String,
    /// Line placed before the document text.
    pub prefix: String,
}

impl Default for ShareSettings {
    fn default() -> Self {
        Self {
            subject: "Legal document".to_string(),
            prefix: "Please find the generated document below:".to_string(),
        }
    }
}

/// External composer to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShareChannel {
    Email,
    WhatsApp,
}

impl ShareChannel {
    /// Longest URI the channel reliably accepts.
    pub fn uri_length_limit(self) -> usize {
        match self {
            ShareChannel::Email => 2_000,
            ShareChannel::WhatsApp => 4_096,
        }
    }
}

impl fmt::Display for ShareChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShareChannel::Email => f.write_str("email"),
            ShareChannel::WhatsApp => f.write_str("whatsapp"),
        }
    }
}

/// Addressing URI ready to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareMessage {
    /// Channel the URI addresses.
    pub channel: ShareChannel,
    /// Percent-encoded addressing URI.
    pub uri: String,
    /// `true` when `uri` is longer than the channel's limit.
    pub exceeds_limit: bool,
}

/// Build the composer URI for `text` on `channel`.
pub fn build_share_message(text: &str, channel: ShareChannel, settings: &ShareSettings) -> ShareMessage {
    let body = format!("{}\n\n{}", settings.prefix, text);
    let uri = match channel {
        ShareChannel::Email => format!(
            "mailto:?subject={}&body={}",
            percent_encode(&settings.subject),
            // RFC 6068 line breaks are CRLF.
            percent_encode(&body.replace("\r\n", "\n").replace('\n', "\r\n"))
        ),
        ShareChannel::WhatsApp => {
            format!("https://wa.me/?text={}", percent_encode(&format!("{}\n{}", settings.subject, body)))
        }
    };

    let limit = channel.uri_length_limit();
    let exceeds_limit = uri.len() > limit;
    if exceeds_limit {
        tracing::warn!(%channel, uri_len = uri.len(), limit, "share message exceeds channel limit");
    }

    ShareMessage {
        channel,
        uri,
        exceeds_limit,
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
pub fn percent_encode(input: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(input.len() * 3);
    for &byte in input.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => out.push(byte as char),
            _ => {
                out.push('%');
                out.push(HEX[(byte >> 4) as usize] as char);
                out.push(HEX[(byte & 0x0F) as usize] as char);
            }
        }
    }
    out
}
