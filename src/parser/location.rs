//! Location-expression parsing.
//!
//! Feature and reference locations use a small expression language:
//!
//! ```text
//! expr     := range | function
//! range    := digits separator digits      (separator: any run of non-digits)
//! function := identifier "(" expr ("," expr)* ")"
//! ```
//!
//! `266..805` covers the inclusive base range 266 to 805;
//! `join(266..13468,13468..21555)` is the union of its argument ranges.
//! `join` is the only recognized function. Parsing is recursive descent over
//! an explicit cursor threaded by `&mut`, so ranges nest inside function
//! argument lists without re-tokenization.

use crate::parser::ParseError;
use crate::ranges::RangeSet;

/// A shared read position over the location text.
pub(crate) struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }
}

/// Parses one expression starting at the cursor, leaving the cursor just
/// past it. An inclusive `a..b` is stored as the half-open span `a..b+1`.
pub(crate) fn parse_range_set(cursor: &mut Cursor) -> Result<RangeSet, ParseError> {
    match cursor.peek() {
        None => Err(ParseError::ReachedEndOfRange),
        Some(b) if b.is_ascii_digit() => parse_range(cursor),
        Some(_) => parse_function(cursor),
    }
}

fn parse_int(digits: &str) -> Result<usize, ParseError> {
    digits
        .parse()
        .map_err(|_| ParseError::ExpectedInteger(digits.to_string()))
}

fn parse_range(cursor: &mut Cursor) -> Result<RangeSet, ParseError> {
    // First endpoint. A bare number with nothing after it is not a range.
    let mut digits = String::new();
    while let Some(b) = cursor.peek().filter(u8::is_ascii_digit) {
        digits.push(b as char);
        cursor.bump();
        if cursor.at_end() {
            return Err(ParseError::ReachedEndOfRange);
        }
    }
    let start = parse_int(&digits)?;

    // Separator: any run of non-digits, commonly "..".
    while cursor.peek().is_some_and(|b| !b.is_ascii_digit()) {
        cursor.bump();
        if cursor.at_end() {
            return Err(ParseError::ReachedEndOfRange);
        }
    }

    // Second endpoint, ending at the first non-digit or end of input.
    let mut digits = String::new();
    while let Some(b) = cursor.peek().filter(u8::is_ascii_digit) {
        digits.push(b as char);
        cursor.bump();
    }
    let end = parse_int(&digits)?;

    Ok(RangeSet::from(start..end + 1))
}

fn parse_function(cursor: &mut Cursor) -> Result<RangeSet, ParseError> {
    let mut name = String::new();
    loop {
        match cursor.peek() {
            None => return Err(ParseError::ReachedEndOfRange),
            Some(b) => {
                cursor.bump();
                if b == b'(' {
                    break;
                }
                name.push(b as char);
            }
        }
    }

    if name != "join" {
        return Err(ParseError::UnrecognizedRangeFunction(name));
    }

    let mut set = RangeSet::new();
    let mut ready_for_argument = true;
    loop {
        match cursor.peek() {
            None => return Err(ParseError::ReachedEndOfRange),
            Some(b')') => {
                cursor.bump();
                return Ok(set);
            }
            Some(b',') => {
                ready_for_argument = true;
                cursor.bump();
            }
            Some(_) => {
                if !ready_for_argument {
                    return Err(ParseError::ExpectedCommaInRangeFunction);
                }
                set.union(&parse_range_set(cursor)?);
                ready_for_argument = false;
            }
        }
    }
}
