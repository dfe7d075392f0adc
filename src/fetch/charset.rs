//! Text decoding for archive pages.
//!
//! Older pages are Latin-1 and often say so only in the `Content-Type`
//! header, if at all.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use tracing::debug;

/// `charset` parameter of a `Content-Type` value
fn declared_charset(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}

/// Decode a page body. A declared charset wins; otherwise UTF-8 is used
/// when the bytes are valid UTF-8 and windows-1252 when they are not.
pub(crate) fn decode_page(body: &[u8], content_type: Option<&str>) -> String {
    let declared = content_type
        .and_then(declared_charset)
        .and_then(|label| Encoding::for_label(label.as_bytes()));

    let encoding = match declared {
        Some(encoding) => encoding,
        None if std::str::from_utf8(body).is_ok() => UTF_8,
        None => WINDOWS_1252,
    };
    let (text, used, had_errors) = encoding.decode(body);
    if had_errors {
        debug!(encoding = used.name(), "page contained undecodable bytes");
    }
    text.into_owned()
}
