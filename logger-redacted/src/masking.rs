//! Natural-key masking for log output.

use std::fmt;

/// Number of trailing alphanumeric characters left visible by [`mask_ssn`].
pub const VISIBLE_SUFFIX: usize = 4;

/// Mask a natural key for logging.
///
/// Alphanumeric characters are replaced with `*` except the last
/// [`VISIBLE_SUFFIX`] of them; separators are kept so the shape stays
/// recognizable. Keys with no more than [`VISIBLE_SUFFIX`] alphanumerics are
/// masked entirely.
pub fn mask_ssn(ssn: &str) -> String {
    let total = ssn.chars().filter(|c| c.is_alphanumeric()).count();
    let keep_from = if total > VISIBLE_SUFFIX {
        total - VISIBLE_SUFFIX
    } else {
        total
    };

    let mut seen = 0;
    ssn.chars()
        .map(|c| {
            if !c.is_alphanumeric() {
                return c;
            }
            seen += 1;
            if seen > keep_from {
                c
            } else {
                '*'
            }
        })
        .collect()
}

/// Replace every occurrence of `key` in `text` with its masked form.
pub fn redact_key(text: &str, key: &str) -> String {
    if key.is_empty() {
        return text.to_string();
    }
    text.replace(key, &mask_ssn(key))
}

/// `Display` wrapper that prints a natural key masked.
///
/// Use it for structured fields: `info!(ssn = %MaskedSsn(ssn), "...")`.
#[derive(Clone, Copy)]
pub struct MaskedSsn<'a>(pub &'a str);

impl fmt::Display for MaskedSsn<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&mask_ssn(self.0))
    }
}

impl fmt::Debug for MaskedSsn<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MaskedSsn({})", mask_ssn(self.0))
    }
}
