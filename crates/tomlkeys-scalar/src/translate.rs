//! Translation of scalars into the canonical text stored in the key tree.

use std::borrow::Cow;

use tracing::trace;

use crate::{Scalar, ScalarKind};

/// Why a scalar could not be translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// The integer does not fit the target width.
    IntegerOutOfRange,
    /// The digits are not valid for the scalar's kind.
    InvalidDigits,
}

impl std::fmt::Display for TranslateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslateError::IntegerOutOfRange => write!(f, "integer out of range"),
            TranslateError::InvalidDigits => write!(f, "invalid digits"),
        }
    }
}

impl std::error::Error for TranslateError {}

impl Scalar {
    /// Translate into canonical text.
    ///
    /// Integers of every base become decimal, booleans become `1`/`0`,
    /// float specials become `inf`/`-inf`/`nan`, datetimes get an upper-case
    /// `T` separator and `Z` offset. String and comment text is returned as is.
    pub fn translate(&self) -> Result<Cow<'_, str>, TranslateError> {
        let translated = match self.kind {
            ScalarKind::Bare
            | ScalarKind::Basic
            | ScalarKind::Literal
            | ScalarKind::MultilineBasic
            | ScalarKind::MultilineLiteral
            | ScalarKind::Comment
            | ScalarKind::LocalDate
            | ScalarKind::LocalTime => Cow::Borrowed(self.text.as_str()),
            ScalarKind::Boolean => match self.text.as_str() {
                "true" => Cow::Borrowed("1"),
                "false" => Cow::Borrowed("0"),
                _ => return Err(TranslateError::InvalidDigits),
            },
            ScalarKind::Decimal => Cow::Owned(translate_decimal(&self.text)?),
            ScalarKind::Binary => Cow::Owned(translate_radix(&self.text, "0b", 2)?),
            ScalarKind::Octal => Cow::Owned(translate_radix(&self.text, "0o", 8)?),
            ScalarKind::Hex => Cow::Owned(translate_radix(&self.text, "0x", 16)?),
            ScalarKind::Float => translate_float(&self.text)?,
            ScalarKind::Inf | ScalarKind::PosInf => Cow::Borrowed("inf"),
            ScalarKind::NegInf => Cow::Borrowed("-inf"),
            ScalarKind::Nan | ScalarKind::PosNan | ScalarKind::NegNan => Cow::Borrowed("nan"),
            ScalarKind::OffsetDateTime | ScalarKind::LocalDateTime => {
                translate_datetime(&self.text)
            }
        };
        trace!(kind = ?self.kind, text = %self.text, %translated, "translated scalar");
        Ok(translated)
    }
}

fn strip_underscores(text: &str) -> String {
    text.chars().filter(|&c| c != '_').collect()
}

fn translate_decimal(text: &str) -> Result<String, TranslateError> {
    let digits = strip_underscores(text);
    let digits = digits.strip_prefix('+').unwrap_or(&digits);
    let unsigned = digits.strip_prefix('-').unwrap_or(digits);
    if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TranslateError::InvalidDigits);
    }
    let value: i64 = digits
        .parse()
        .map_err(|_| TranslateError::IntegerOutOfRange)?;
    Ok(value.to_string())
}

fn translate_radix(text: &str, prefix: &str, radix: u32) -> Result<String, TranslateError> {
    let digits = strip_underscores(text);
    let digits = digits.strip_prefix(prefix).unwrap_or(&digits);
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(TranslateError::InvalidDigits);
    }
    let value =
        u64::from_str_radix(digits, radix).map_err(|_| TranslateError::IntegerOutOfRange)?;
    Ok(value.to_string())
}

fn translate_float(text: &str) -> Result<Cow<'_, str>, TranslateError> {
    let translated = if text.contains('_') || text.starts_with('+') {
        let digits = strip_underscores(text);
        Cow::Owned(digits.strip_prefix('+').unwrap_or(&digits).to_string())
    } else {
        Cow::Borrowed(text)
    };
    if translated.parse::<f64>().is_err() {
        return Err(TranslateError::InvalidDigits);
    }
    Ok(translated)
}

fn translate_datetime(text: &str) -> Cow<'_, str> {
    let needs_separator = matches!(text.as_bytes().get(10), Some(b't' | b' '));
    let needs_zulu = text.ends_with('z');
    if !needs_separator && !needs_zulu {
        return Cow::Borrowed(text);
    }
    let mut canonical = text.to_string();
    if needs_separator {
        canonical.replace_range(10..11, "T");
    }
    if needs_zulu {
        canonical.pop();
        canonical.push('Z');
    }
    Cow::Owned(canonical)
}
