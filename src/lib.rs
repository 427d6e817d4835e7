//! # gbparse - GenBank flat-file record parser
//!
//! Parses a GenBank text record into a structured [`Genome`] value: the
//! LOCUS header, free-form metadata sections, literature references, the
//! annotated feature table with its location expressions, and the
//! nucleotide sequence packed at 2 bits per base.
//!
//! ## Architecture
//!
//! - `model`: the parsed record (`Genome`, `Locus`, `Reference`, `Feature`)
//! - `sequence`: 2-bit packed nucleotide container with slice views
//! - `ranges`: coalesced sets of base-position spans
//! - `parser`: the recursive-descent reader (metadata tree, location
//!   expressions, fixed-format sections, top-level assembly)
//!
//! ## Example
//!
//! ```no_run
//! let genome = gbparse::parse_genbank_file("NC_045512.gb")?;
//! println!("{}: {} features", genome.locus.name, genome.features.len());
//! # Ok::<(), gbparse::ParseError>(())
//! ```

pub mod model;
pub mod parser;
pub mod ranges;
pub mod sequence;

pub use model::Genome;
pub use parser::{parse_genbank, parse_genbank_file, parse_genbank_str, ParseError};
