use crate::constants::{DEFAULT_LIMIT, DEFAULT_PAGE};

/// A normalized `(page, limit)` pair. Both values are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Zero falls back to the default for that field
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
        }
    }

    /// Build from raw query-string values.
    ///
    /// Missing, non-numeric, zero or negative inputs silently become the
    /// defaults. A leading integer is accepted ("2abc" reads as 2).
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: page.and_then(parse_positive_int).unwrap_or(DEFAULT_PAGE),
            limit: limit.and_then(parse_positive_int).unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// Cap `limit` at `max_limit` (a zero cap disables the bound)
    pub fn with_max_limit(self, max_limit: usize) -> Self {
        if max_limit == 0 {
            return self;
        }
        Self {
            limit: self.limit.min(max_limit),
            ..self
        }
    }

    /// Zero-based `[start, end)` offsets; saturates instead of overflowing
    pub fn offsets(&self) -> (usize, usize) {
        let start = (self.page - 1).saturating_mul(self.limit);
        (start, start.saturating_add(self.limit))
    }
}

/// Lenient integer read: optional leading whitespace and sign, then digits up
/// to the first non-digit. Returns `None` unless the result is positive.
fn parse_positive_int(raw: &str) -> Option<usize> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits: &str = {
        let end = digits
            .bytes()
            .position(|b| !b.is_ascii_digit())
            .unwrap_or(digits.len());
        &digits[..end]
    };
    if digits.is_empty() {
        return None;
    }

    // Oversized values saturate; they only ever produce an empty page
    let value = digits.bytes().fold(0usize, |acc, b| {
        acc.saturating_mul(10).saturating_add((b - b'0') as usize)
    });

    if negative || value == 0 { None } else { Some(value) }
}
