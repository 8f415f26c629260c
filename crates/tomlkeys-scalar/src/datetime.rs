//! Well-formedness checks for TOML datetimes (RFC 3339 profile).

use crate::ScalarKind;

fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u32, month: u32) -> u32 {
    const DAYS: [u32; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS[month as usize]
    }
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> Option<()> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Some(())
        } else {
            None
        }
    }

    fn eat_any(&mut self, choices: &[u8]) -> Option<u8> {
        let byte = self.peek()?;
        if choices.contains(&byte) {
            self.pos += 1;
            Some(byte)
        } else {
            None
        }
    }

    fn digits(&mut self, count: usize) -> Option<u32> {
        let mut value = 0;
        for _ in 0..count {
            let byte = self.peek().filter(u8::is_ascii_digit)?;
            value = value * 10 + (byte - b'0') as u32;
            self.pos += 1;
        }
        Some(value)
    }

    fn at_end(&self) -> bool {
        self.pos == self.bytes.len()
    }

    fn date(&mut self) -> Option<()> {
        let year = self.digits(4)?;
        self.eat(b'-')?;
        let month = self.digits(2)?;
        self.eat(b'-')?;
        let day = self.digits(2)?;
        if !(1..=12).contains(&month) || day < 1 || day > days_in_month(year, month) {
            return None;
        }
        Some(())
    }

    fn time(&mut self) -> Option<()> {
        let hour = self.digits(2)?;
        self.eat(b':')?;
        let minute = self.digits(2)?;
        if hour > 23 || minute > 59 {
            return None;
        }
        if self.eat(b':').is_some() {
            // 60 is allowed for leap seconds
            let second = self.digits(2)?;
            if second > 60 {
                return None;
            }
            if self.eat(b'.').is_some() {
                let start = self.pos;
                while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 1;
                }
                if self.pos == start {
                    return None;
                }
            }
        }
        Some(())
    }

    fn offset(&mut self) -> Option<()> {
        if self.eat_any(b"Zz").is_some() {
            return Some(());
        }
        self.eat_any(b"+-")?;
        let hour = self.digits(2)?;
        self.eat(b':')?;
        let minute = self.digits(2)?;
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(())
    }

    fn separator(&mut self) -> Option<()> {
        self.eat_any(b"Tt ").map(|_| ())
    }
}

/// Check whether `text` is a well-formed datetime of the given kind.
///
/// Returns `false` for kinds that are not datetimes.
pub fn is_valid_datetime(kind: ScalarKind, text: &str) -> bool {
    let mut cursor = Cursor::new(text);
    let parsed = match kind {
        ScalarKind::LocalDate => cursor.date(),
        ScalarKind::LocalTime => cursor.time(),
        ScalarKind::LocalDateTime => cursor
            .date()
            .and_then(|_| cursor.separator())
            .and_then(|_| cursor.time()),
        ScalarKind::OffsetDateTime => cursor
            .date()
            .and_then(|_| cursor.separator())
            .and_then(|_| cursor.time())
            .and_then(|_| cursor.offset()),
        _ => None,
    };
    parsed.is_some() && cursor.at_end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    fn valid(kind: ScalarKind, text: &str) -> bool {
        is_valid_datetime(kind, text)
    }

    #[test]
    fn test_offset_datetime() {
        assert!(valid(ScalarKind::OffsetDateTime, "1979-05-27T07:32:00Z"));
        assert!(valid(ScalarKind::OffsetDateTime, "1979-05-27T00:32:00.999999-07:00"));
        assert!(valid(ScalarKind::OffsetDateTime, "1979-05-27 07:32:00+01:30"));
        assert!(valid(ScalarKind::OffsetDateTime, "1979-05-27t07:32:00z"));
        assert!(!valid(ScalarKind::OffsetDateTime, "1979-05-27T07:32:00"));
        assert!(!valid(ScalarKind::OffsetDateTime, "1979-05-27T07:32:00+24:00"));
        assert!(!valid(ScalarKind::OffsetDateTime, "1979-05-27T07:32:00+01:60"));
    }

    #[test]
    fn test_day_of_month() {
        assert!(!valid(ScalarKind::OffsetDateTime, "1999-02-30T00:00:00Z"));
        assert!(!valid(ScalarKind::LocalDate, "1999-02-29"));
        assert!(valid(ScalarKind::LocalDate, "2000-02-29"));
        assert!(!valid(ScalarKind::LocalDate, "1900-02-29"));
        assert!(valid(ScalarKind::LocalDate, "2024-02-29"));
        assert!(!valid(ScalarKind::LocalDate, "2023-04-31"));
        assert!(valid(ScalarKind::LocalDate, "2023-12-31"));
        assert!(!valid(ScalarKind::LocalDate, "2023-13-01"));
        assert!(!valid(ScalarKind::LocalDate, "2023-00-01"));
        assert!(!valid(ScalarKind::LocalDate, "2023-01-00"));
    }

    #[test]
    fn test_local_time() {
        assert!(valid(ScalarKind::LocalTime, "07:32:00"));
        assert!(valid(ScalarKind::LocalTime, "00:32:00.5"));
        assert!(valid(ScalarKind::LocalTime, "23:59:60"));
        assert!(valid(ScalarKind::LocalTime, "07:32"));
        assert!(!valid(ScalarKind::LocalTime, "24:00:00"));
        assert!(!valid(ScalarKind::LocalTime, "12:60:00"));
        assert!(!valid(ScalarKind::LocalTime, "12:00:61"));
        assert!(!valid(ScalarKind::LocalTime, "12:00:00."));
        assert!(!valid(ScalarKind::LocalTime, "12:00:00Z"));
    }

    #[test]
    fn test_components_must_match_kind() {
        assert!(!valid(ScalarKind::LocalDate, "1979-05-27T07:32:00"));
        assert!(valid(ScalarKind::LocalDateTime, "1979-05-27T07:32:00"));
        assert!(!valid(ScalarKind::LocalDateTime, "1979-05-27"));
        assert!(!valid(ScalarKind::LocalDateTime, "1979-05-27X07:32:00"));
        assert!(!valid(ScalarKind::Basic, "1979-05-27"));
        assert!(!valid(ScalarKind::LocalDate, "79-05-27"));
    }
}
