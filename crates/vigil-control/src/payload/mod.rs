//! Payload validation and tokenisation for write endpoints.

use vigil_checks::CheckError;

/// Exclusive upper bound on the size of a tokenised payload, in bytes.
pub const MAX_PAYLOAD_LEN: usize = 256;

const SEPARATORS: [char; 3] = [' ', '\t', ','];

/// Validates a raw payload and returns its text without the trailing newline.
///
/// # Errors
///
/// Returns [`CheckError::InvalidArgument`] when the payload is empty, is
/// [`MAX_PAYLOAD_LEN`] bytes or longer, or is not valid UTF-8.
pub fn decode(payload: &[u8]) -> Result<&str, CheckError> {
    if payload.is_empty() || payload.len() >= MAX_PAYLOAD_LEN {
        return Err(CheckError::invalid_argument(format!(
            "payload must be 1 to {} bytes, got {}",
            MAX_PAYLOAD_LEN - 1,
            payload.len()
        )));
    }
    let text = std::str::from_utf8(payload)
        .map_err(|error| CheckError::invalid_argument(format!("payload is not UTF-8: {error}")))?;
    Ok(text.strip_suffix('\n').unwrap_or(text))
}

/// Splits `text` on spaces, tabs, and commas, skipping empty tokens.
///
/// ```
/// let tokens: Vec<&str> = vigil_control::tokens("plugina,\tpluginb  pluginc").collect();
/// assert_eq!(tokens, ["plugina", "pluginb", "pluginc"]);
/// ```
pub fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(SEPARATORS).filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests;
