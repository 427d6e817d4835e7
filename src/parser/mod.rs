//! GenBank flat-file record parser.
//!
//! The entry point is [`parse_genbank`]: one buffered pass that splits the
//! input into lines, builds indentation-driven metadata trees (`metadata`),
//! dispatches the well-known section names through the fixed-format parsers
//! (`fields`, `location`), decodes the ORIGIN section into a packed
//! [`GeneSequence`], and assembles the final [`Genome`].
//!
//! Parsing is synchronous and single-pass with no internal state beyond the
//! lookup tables compiled once per process; independent calls never
//! interfere, and any error aborts the whole parse (no partial `Genome` is
//! ever returned).

pub(crate) mod fields;
pub(crate) mod location;
pub(crate) mod metadata;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use thiserror::Error;

use crate::model::Genome;
use crate::sequence::{Base, GeneSequence};

/// A section whose absence fails the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Locus,
    Source,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredField::Locus => write!(f, "LOCUS"),
            RequiredField::Source => write!(f, "SOURCE"),
        }
    }
}

/// Errors that can occur while parsing a record.
///
/// Every error is raised at the point of detection and propagates straight
/// to the [`parse_genbank`] caller; there is no recovery or partial result.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to read record: {0}")]
    Io(#[from] std::io::Error),

    #[error("line contains bytes that do not decode as UTF-8")]
    MalformedData,

    #[error("expected a section key but the line is blank")]
    ReachedEndOfLine,

    #[error("unrecognized location function '{0}'")]
    UnrecognizedRangeFunction(String),

    #[error("location expression ended unexpectedly")]
    ReachedEndOfRange,

    #[error("expected ',' between location function arguments")]
    ExpectedCommaInRangeFunction,

    #[error("expected an integer, found '{0}'")]
    ExpectedInteger(String),

    #[error("feature qualifier lines must start with '/'")]
    UnexpectedTokenInFeature,

    #[error("feature qualifier ended unexpectedly")]
    ReachedEndOfFeature,

    #[error("record ended before an ORIGIN section")]
    ReachedEndOfData,

    #[error("LOCUS line does not match the expected layout")]
    MalformedLocus,

    #[error("REFERENCE section does not match the expected shape")]
    MalformedReference,

    #[error("record is missing its {0} section")]
    Missing(RequiredField),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Splits the buffer into lines on `\n`. Empty lines are dropped; a line of
/// spaces is kept (and rejected later if a section key was expected there).
fn split_lines(bytes: &[u8]) -> Vec<&[u8]> {
    bytes
        .split(|&b| b == b'\n')
        .filter(|line| !line.is_empty())
        .collect()
}

/// Parses one record from a byte buffer.
///
/// The metadata loop consumes top-level items until the ORIGIN marker, then
/// every remaining byte is matched against the sequence alphabet (`a c g t`,
/// lowercase); unrecognized bytes such as position numbers and spaces are
/// skipped. LOCUS and SOURCE are required; the declared LOCUS length is
/// deliberately not checked against the decoded sequence length.
pub fn parse_genbank(bytes: &[u8]) -> ParseResult<Genome> {
    let lines = split_lines(bytes);
    let mut current = 0;

    let mut locus = None;
    let mut source = None;
    let mut references = Vec::new();
    let mut features = Vec::new();
    let mut metadata_map = HashMap::new();

    loop {
        if current >= lines.len() {
            return Err(ParseError::ReachedEndOfData);
        }

        let (item, lines_read) = metadata::parse_item(&lines, current)?;
        match item.name.as_str() {
            "LOCUS" => locus = Some(fields::parse_locus(&item.content)?),
            "SOURCE" => source = Some(fields::parse_source(&item)),
            "REFERENCE" => references.push(fields::parse_reference(&item)?),
            "FEATURES" => {
                for child in &item.children {
                    features.push(fields::parse_feature(child)?);
                }
            }
            // Sequence decoding starts at the ORIGIN line itself; its
            // uppercase letters fall outside the alphabet and are skipped.
            "ORIGIN" => break,
            other => {
                metadata_map.insert(other.to_string(), item.content);
            }
        }
        current += lines_read;
    }

    let mut sequence = GeneSequence::new();
    for line in &lines[current..] {
        for &byte in *line {
            if let Some(base) = Base::from_ascii(byte) {
                sequence.push(base);
            }
        }
    }

    Ok(Genome {
        locus: locus.ok_or(ParseError::Missing(RequiredField::Locus))?,
        metadata: metadata_map,
        source: source.ok_or(ParseError::Missing(RequiredField::Source))?,
        references,
        features,
        sequence,
    })
}

/// Parses one record from a string slice.
pub fn parse_genbank_str(content: &str) -> ParseResult<Genome> {
    parse_genbank(content.as_bytes())
}

/// Reads and parses one record from a file.
pub fn parse_genbank_file<P: AsRef<Path>>(path: P) -> ParseResult<Genome> {
    let bytes = std::fs::read(path)?;
    parse_genbank(&bytes)
}
