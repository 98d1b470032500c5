//! Query Parser
//!
//! Turns the raw search box text into the pieces the tiers compare against:
//! the case-folded text, the integer the query starts with, and whether the
//! query as a whole reads as a number.
//!
//! Number reading follows the web page the data is served to: the integer is
//! the leading digits (`"5abc"` is 5), and a query is numeric when a browser
//! would convert it to a number (`"0x10"`, `"Infinity"` and blank text are).

/// Parsed and processed search query. Never built from an empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    /// Original unmodified query
    pub original: String,
    /// Lowercased query for name/category comparisons
    pub folded: String,
    /// Leading integer of the trimmed query (`"5"`, `" -3 "`, `"5.0"`, `"5abc"`)
    pub integer: Option<i64>,
    /// Set when the whole trimmed query is a number literal (`"1.5"`, `"1e3"`,
    /// `"0x10"`, `"Infinity"`) or is blank.
    /// Numeric queries never partially match text fields.
    pub is_numeric: bool,
}

/// Query parser
pub struct QueryParser;

impl QueryParser {
    /// Parse a search query. Returns `None` for the empty query, which means
    /// "no filter" and must never reach the match tiers.
    pub fn parse(query: &str) -> Option<ParsedQuery> {
        if query.is_empty() {
            return None;
        }

        let trimmed = query.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');

        Some(ParsedQuery {
            original: query.to_string(),
            folded: query.to_lowercase(),
            integer: Self::leading_integer(trimmed),
            is_numeric: Self::is_number_literal(trimmed),
        })
    }

    /// Optional sign, then the longest run of digits. A `0x` prefix switches
    /// to hexadecimal. Out-of-range values are `None`.
    fn leading_integer(text: &str) -> Option<i64> {
        let (negative, unsigned) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };

        let (radix, body) = match unsigned.get(..2) {
            Some("0x") | Some("0X") => (16, &unsigned[2..]),
            _ => (10, unsigned),
        };

        let end = body
            .find(|c: char| !c.is_digit(radix))
            .unwrap_or(body.len());
        if end == 0 {
            return None;
        }

        let magnitude = i64::from_str_radix(&body[..end], radix).ok()?;
        Some(if negative { -magnitude } else { magnitude })
    }

    /// Blank text, `Infinity`, unsigned `0x`/`0o`/`0b` literals and plain
    /// decimals with an optional exponent
    fn is_number_literal(text: &str) -> bool {
        if text.is_empty() {
            return true;
        }

        let radix = match text.get(..2) {
            Some("0x") | Some("0X") => Some(16),
            Some("0o") | Some("0O") => Some(8),
            Some("0b") | Some("0B") => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            let digits = &text[2..];
            return !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
        }

        let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
        unsigned == "Infinity" || Self::is_decimal_literal(unsigned)
    }

    /// `12`, `1.5`, `5.`, `.5`, each optionally followed by `e[+-]digits`
    fn is_decimal_literal(text: &str) -> bool {
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

        let (mantissa, exponent) = match text.find(['e', 'E']) {
            Some(at) => (&text[..at], Some(&text[at + 1..])),
            None => (text, None),
        };

        let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let mantissa_ok = (!whole.is_empty() || !fraction.is_empty())
            && all_digits(whole)
            && all_digits(fraction);

        let exponent_ok = exponent.map_or(true, |exp| {
            let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !digits.is_empty() && all_digits(digits)
        });

        mantissa_ok && exponent_ok
    }
}
