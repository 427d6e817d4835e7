//! Data model for a parsed genome record.
//!
//! [`Genome`] is the root value produced by one parse call: the LOCUS
//! header, free-form metadata, literature references, annotated features,
//! and the packed nucleotide sequence. Everything here is plain data; the
//! structure is built exactly once per parse and read-only in spirit
//! afterwards.

use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;

use crate::ranges::RangeSet;
use crate::sequence::GeneSequence;

/// Well-known top-level metadata keys.
///
/// The metadata map is intentionally open-ended (any key the record carries
/// is stored verbatim); these constants just name the common ones.
pub mod keys {
    pub const DEFINITION: &str = "DEFINITION";
    pub const ACCESSION: &str = "ACCESSION";
    pub const VERSION: &str = "VERSION";
    pub const KEYWORDS: &str = "KEYWORDS";
    pub const COMMENT: &str = "COMMENT";
    pub const DBLINK: &str = "DBLINK";
}

/// A fully parsed genome record.
#[derive(Debug, Clone, PartialEq)]
pub struct Genome {
    /// The LOCUS header line.
    pub locus: Locus,
    /// Top-level sections not otherwise modeled (DEFINITION, ACCESSION, ...),
    /// keyed by section name. Last occurrence wins on key collision.
    pub metadata: HashMap<String, String>,
    /// The SOURCE section.
    pub source: Source,
    /// REFERENCE sections, in record order.
    pub references: Vec<Reference>,
    /// FEATURES table entries, in record order.
    pub features: Vec<Feature>,
    /// The decoded ORIGIN sequence.
    pub sequence: GeneSequence,
}

/// Fields of the fixed-grammar LOCUS line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locus {
    /// Locus name (e.g. an accession like `NC_045512`).
    pub name: String,
    /// Sequence length as declared by the header. Never cross-checked
    /// against the decoded sequence.
    pub sequence_length: usize,
    /// Molecule type (e.g. `ss-RNA`).
    pub molecule_type: String,
    /// Three-letter division code (e.g. `VRL`).
    pub division: String,
    /// Modification date text (e.g. `18-JUL-2020`).
    pub modified: String,
}

/// The SOURCE section: organism description plus optional taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// The free-text organism line.
    pub name: String,
    /// Content of the nested ORGANISM entry, when present.
    pub organism: Option<String>,
}

/// A literature REFERENCE section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Citation number within the record.
    pub id: usize,
    /// The 1-based inclusive base range the citation annotates.
    pub bases: RangeInclusive<usize>,
    /// AUTHORS text, when present.
    pub authors: Option<String>,
    /// CONSRTM (consortium) text, when present.
    pub consortium: Option<String>,
    /// TITLE text.
    pub title: String,
    /// Where the citation appeared.
    pub journal: Journal,
}

/// Publication status of a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Journal {
    Unpublished,
    Published {
        /// Journal citation text.
        name: String,
        /// PubMed id, when the record carries one.
        pubmed: Option<usize>,
    },
}

/// How completely a feature's location is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Fully bounded on both ends.
    Complete,
    /// 5' end extends beyond the annotated range (`<` marker).
    Partial5,
    /// 3' end extends beyond the annotated range (`>` marker).
    Partial3,
    /// Expressed on the complementary strand (`complement(...)` wrapper).
    Complement,
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::Complete => write!(f, "complete"),
            Completion::Partial5 => write!(f, "5' partial"),
            Completion::Partial3 => write!(f, "3' partial"),
            Completion::Complement => write!(f, "complement"),
        }
    }
}

/// One FEATURES table entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Feature kind (e.g. `gene`, `CDS`).
    pub kind: String,
    /// The base positions the feature covers. A feature may span disjoint
    /// segments via `join(...)`.
    pub bases: RangeSet,
    /// Completion marker from the location expression.
    pub completion: Completion,
    /// `/key=value` qualifiers. Duplicate keys overwrite, last wins.
    pub qualifiers: HashMap<String, String>,
}

impl Feature {
    /// Looks up a qualifier value by key.
    pub fn qualifier(&self, key: &str) -> Option<&str> {
        self.qualifiers.get(key).map(String::as_str)
    }
}
