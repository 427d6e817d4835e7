//! Fixed-format section parsers.
//!
//! Each of these consumes a [`MetadataItem`] produced by the tree builder:
//! the LOCUS header line, the SOURCE/ORGANISM pair, REFERENCE citations with
//! their nested TITLE/AUTHORS/JOURNAL/PUBMED entries, and FEATURES table
//! entries (location expression, completion marker, qualifiers).

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Completion, Feature, Journal, Locus, Reference, Source};
use crate::parser::location::{parse_range_set, Cursor};
use crate::parser::metadata::MetadataItem;
use crate::parser::ParseError;

/// LOCUS layout: name, declared length, "bp", molecule type, optional
/// topology-style tokens (discarded), 3-letter division code, date tail.
static LOCUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+) +(\d+) bp +(\S+)(?: +\S+)* +([A-Z]{3}) +(\S.*)$").unwrap()
});

/// REFERENCE first-line layout: `1  (bases 1 to 29903)`.
static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+) +\(bases (\d+) to (\d+)\)$").unwrap());

/// Parses the content of a LOCUS item.
pub(crate) fn parse_locus(content: &str) -> Result<Locus, ParseError> {
    let caps = LOCUS_RE.captures(content).ok_or(ParseError::MalformedLocus)?;
    let sequence_length = caps[2].parse().map_err(|_| ParseError::MalformedLocus)?;

    Ok(Locus {
        name: caps[1].to_string(),
        sequence_length,
        molecule_type: caps[3].to_string(),
        division: caps[4].to_string(),
        modified: caps[5].to_string(),
    })
}

/// Parses a SOURCE item. The content is the organism free text; the last
/// ORGANISM child, if any, supplies the taxonomy string.
pub(crate) fn parse_source(item: &MetadataItem) -> Source {
    Source {
        name: item.content.clone(),
        organism: item
            .children
            .iter()
            .rev()
            .find(|child| child.name == "ORGANISM")
            .map(|child| child.content.clone()),
    }
}

/// Parses a REFERENCE item and its TITLE/AUTHORS/CONSRTM/JOURNAL children.
pub(crate) fn parse_reference(item: &MetadataItem) -> Result<Reference, ParseError> {
    let caps = REFERENCE_RE
        .captures(&item.content)
        .ok_or(ParseError::MalformedReference)?;
    let id = caps[1].parse().map_err(|_| ParseError::MalformedReference)?;
    let start: usize = caps[2].parse().map_err(|_| ParseError::MalformedReference)?;
    let end: usize = caps[3].parse().map_err(|_| ParseError::MalformedReference)?;

    let mut title = None;
    let mut authors = None;
    let mut consortium = None;
    let mut journal = None;

    for child in &item.children {
        match child.name.as_str() {
            "TITLE" => title = Some(child.content.clone()),
            "AUTHORS" => authors = Some(child.content.clone()),
            "CONSRTM" => consortium = Some(child.content.clone()),
            "JOURNAL" => {
                journal = Some(if child.content == "Unpublished" {
                    Journal::Unpublished
                } else {
                    Journal::Published {
                        name: child.content.clone(),
                        pubmed: child
                            .children
                            .iter()
                            .rev()
                            .find(|grandchild| grandchild.name == "PUBMED")
                            .and_then(|grandchild| grandchild.content.parse().ok()),
                    }
                });
            }
            _ => {}
        }
    }

    Ok(Reference {
        id,
        bases: start..=end,
        authors,
        consortium,
        title: title.ok_or(ParseError::MalformedReference)?,
        journal: journal.ok_or(ParseError::MalformedReference)?,
    })
}

/// Parses one FEATURES table entry: the item name is the feature kind, the
/// first content line is the location expression, and each remaining line is
/// a `/key=value` qualifier.
pub(crate) fn parse_feature(item: &MetadataItem) -> Result<Feature, ParseError> {
    let content = item.content.as_str();
    let (first_line, rest) = match content.find('\n') {
        Some(i) => (&content[..i], &content[i + 1..]),
        None => (content, ""),
    };

    let (completion, location) = if let Some(stripped) = first_line.strip_prefix('<') {
        (Completion::Partial5, stripped)
    } else if let Some(stripped) = first_line.strip_suffix('>') {
        (Completion::Partial3, stripped)
    } else if let Some(inner) = first_line.strip_prefix("complement(") {
        let inner = inner
            .strip_suffix(')')
            .ok_or(ParseError::ReachedEndOfRange)?;
        (Completion::Complement, inner)
    } else {
        (Completion::Complete, first_line)
    };

    if location.is_empty() {
        return Err(ParseError::ReachedEndOfRange);
    }

    let mut cursor = Cursor::new(location);
    let bases = parse_range_set(&mut cursor)?;

    Ok(Feature {
        kind: item.name.clone(),
        bases,
        completion,
        qualifiers: parse_qualifiers(rest)?,
    })
}

/// Parses the qualifier lines following a feature's location.
///
/// Quoted values run to the next `"` with no escape mechanism (they may span
/// lines; an embedded quote terminates the value). A key with no `=` before
/// the end of its line is a flag with an empty value.
fn parse_qualifiers(rest: &str) -> Result<HashMap<String, String>, ParseError> {
    let bytes = rest.as_bytes();
    let mut qualifiers = HashMap::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'/' {
            return Err(ParseError::UnexpectedTokenInFeature);
        }

        let key_start = pos + 1;
        let (key, value, mut next): (&str, &str, usize) =
            match rest[key_start..].find(['=', '\n']).map(|i| key_start + i) {
                // Bare flag ending the content.
                None => (&rest[key_start..], "", bytes.len()),
                // Bare flag ending at its newline.
                Some(i) if bytes[i] == b'\n' => (&rest[key_start..i], "", i),
                // `=` present: quoted or plain value.
                Some(i) => {
                    let key = &rest[key_start..i];
                    let value_start = i + 1;
                    if value_start == bytes.len() {
                        return Err(ParseError::ReachedEndOfFeature);
                    }
                    if bytes[value_start] == b'"' {
                        let quote = rest[value_start + 1..]
                            .find('"')
                            .map(|q| value_start + 1 + q)
                            .ok_or(ParseError::ReachedEndOfFeature)?;
                        (key, &rest[value_start + 1..quote], quote + 1)
                    } else {
                        let value_end = rest[value_start..]
                            .find('\n')
                            .map(|n| value_start + n)
                            .unwrap_or(bytes.len());
                        (key, &rest[value_start..value_end], value_end)
                    }
                }
            };

        qualifiers.insert(key.to_string(), value.to_string());

        if next != bytes.len() {
            if bytes[next] != b'\n' {
                return Err(ParseError::UnexpectedTokenInFeature);
            }
            next += 1;
        }
        pos = next;
    }

    Ok(qualifiers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranges::RangeSet;

    fn item(name: &str, content: &str, children: Vec<MetadataItem>) -> MetadataItem {
        MetadataItem {
            name: name.to_string(),
            content: content.to_string(),
            children,
        }
    }

    #[test]
    fn test_parse_locus() {
        let locus = parse_locus("NC_045512 29903 bp ss-RNA linear VRL 18-JUL-2020").unwrap();
        assert_eq!(
            locus,
            Locus {
                name: "NC_045512".to_string(),
                sequence_length: 29903,
                molecule_type: "ss-RNA".to_string(),
                division: "VRL".to_string(),
                modified: "18-JUL-2020".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_locus_without_topology() {
        let locus = parse_locus("AB000001 1234 bp DNA PRI 01-JAN-1999").unwrap();
        assert_eq!(locus.molecule_type, "DNA");
        assert_eq!(locus.division, "PRI");
    }

    #[test]
    fn test_parse_locus_malformed() {
        assert!(matches!(
            parse_locus("not a locus line"),
            Err(ParseError::MalformedLocus)
        ));
        assert!(matches!(
            parse_locus("NC_045512 many bp ss-RNA VRL 18-JUL-2020"),
            Err(ParseError::MalformedLocus)
        ));
    }

    #[test]
    fn test_parse_source() {
        let source = parse_source(&item(
            "SOURCE",
            "severe acute respiratory syndrome coronavirus 2",
            vec![item("ORGANISM", "SARS-CoV-2\nViruses; Riboviria.", vec![])],
        ));
        assert_eq!(source.name, "severe acute respiratory syndrome coronavirus 2");
        assert_eq!(
            source.organism.as_deref(),
            Some("SARS-CoV-2\nViruses; Riboviria.")
        );
    }

    #[test]
    fn test_parse_source_last_organism_wins() {
        let source = parse_source(&item(
            "SOURCE",
            "some organism",
            vec![
                item("ORGANISM", "first", vec![]),
                item("ORGANISM", "second", vec![]),
            ],
        ));
        assert_eq!(source.organism.as_deref(), Some("second"));
    }

    #[test]
    fn test_parse_reference_published() {
        let reference = parse_reference(&item(
            "REFERENCE",
            "1  (bases 1 to 29903)",
            vec![
                item("AUTHORS", "Wu,F., Zhao,S. and Yu,B.", vec![]),
                item("TITLE", "A new coronavirus associated with human respiratory disease", vec![]),
                item(
                    "JOURNAL",
                    "Nature 579 (7798), 265-269 (2020)",
                    vec![item("PUBMED", "32015508", vec![])],
                ),
            ],
        ))
        .unwrap();

        assert_eq!(reference.id, 1);
        assert_eq!(reference.bases, 1..=29903);
        assert_eq!(reference.authors.as_deref(), Some("Wu,F., Zhao,S. and Yu,B."));
        assert_eq!(
            reference.journal,
            Journal::Published {
                name: "Nature 579 (7798), 265-269 (2020)".to_string(),
                pubmed: Some(32015508),
            }
        );
    }

    #[test]
    fn test_parse_reference_unpublished() {
        let reference = parse_reference(&item(
            "REFERENCE",
            "2  (bases 1 to 100)",
            vec![
                item("TITLE", "Direct Submission", vec![]),
                item("JOURNAL", "Unpublished", vec![]),
            ],
        ))
        .unwrap();
        assert_eq!(reference.journal, Journal::Unpublished);
        assert_eq!(reference.consortium, None);
    }

    #[test]
    fn test_parse_reference_requires_title() {
        let result = parse_reference(&item(
            "REFERENCE",
            "1  (bases 1 to 100)",
            vec![item("JOURNAL", "Unpublished", vec![])],
        ));
        assert!(matches!(result, Err(ParseError::MalformedReference)));
    }

    #[test]
    fn test_parse_reference_malformed_header() {
        let result = parse_reference(&item("REFERENCE", "1 (spanning 1 to 100)", vec![]));
        assert!(matches!(result, Err(ParseError::MalformedReference)));
    }

    #[test]
    fn test_parse_feature_complete() {
        let feature = parse_feature(&item("gene", "266..805", vec![])).unwrap();
        assert_eq!(feature.kind, "gene");
        assert_eq!(feature.completion, Completion::Complete);
        assert_eq!(feature.bases, RangeSet::from(266..806));
        assert!(feature.qualifiers.is_empty());
    }

    #[test]
    fn test_parse_feature_partial5_strips_marker() {
        let feature = parse_feature(&item("CDS", "<1..30", vec![])).unwrap();
        assert_eq!(feature.completion, Completion::Partial5);
        assert_eq!(feature.bases, RangeSet::from(1..31));
    }

    #[test]
    fn test_parse_feature_partial3_strips_marker() {
        let feature = parse_feature(&item("CDS", "100..200>", vec![])).unwrap();
        assert_eq!(feature.completion, Completion::Partial3);
        assert_eq!(feature.bases, RangeSet::from(100..201));
    }

    #[test]
    fn test_parse_feature_complement() {
        let feature = parse_feature(&item(
            "gene",
            "complement(100..200)\n/gene=\"rev\"",
            vec![],
        ))
        .unwrap();
        assert_eq!(feature.completion, Completion::Complement);
        assert_eq!(feature.bases, RangeSet::from(100..201));
        assert_eq!(feature.qualifier("gene"), Some("rev"));
    }

    #[test]
    fn test_parse_feature_complement_unterminated() {
        assert!(matches!(
            parse_feature(&item("gene", "complement(100..200", vec![])),
            Err(ParseError::ReachedEndOfRange)
        ));
    }

    #[test]
    fn test_parse_feature_empty_location() {
        assert!(matches!(
            parse_feature(&item("gene", "", vec![])),
            Err(ParseError::ReachedEndOfRange)
        ));
    }

    #[test]
    fn test_parse_feature_qualifiers() {
        let feature =
            parse_feature(&item("gene", "1..10\n/gene=\"ORF1\"\n/pseudo", vec![])).unwrap();
        assert_eq!(feature.qualifier("gene"), Some("ORF1"));
        assert_eq!(feature.qualifier("pseudo"), Some(""));
        assert_eq!(feature.qualifiers.len(), 2);
    }

    #[test]
    fn test_parse_feature_unquoted_value() {
        let feature =
            parse_feature(&item("CDS", "1..10\n/codon_start=1", vec![])).unwrap();
        assert_eq!(feature.qualifier("codon_start"), Some("1"));
    }

    #[test]
    fn test_parse_feature_quoted_value_spans_lines() {
        let feature = parse_feature(&item(
            "CDS",
            "1..10\n/translation=\"MESLVPGFNE\nKTHVQLSLPV\"",
            vec![],
        ))
        .unwrap();
        assert_eq!(
            feature.qualifier("translation"),
            Some("MESLVPGFNE\nKTHVQLSLPV")
        );
    }

    #[test]
    fn test_parse_feature_duplicate_qualifier_last_wins() {
        let feature = parse_feature(&item(
            "gene",
            "1..10\n/note=\"first\"\n/note=\"second\"",
            vec![],
        ))
        .unwrap();
        assert_eq!(feature.qualifier("note"), Some("second"));
        assert_eq!(feature.qualifiers.len(), 1);
    }

    #[test]
    fn test_parse_feature_qualifier_without_slash() {
        assert!(matches!(
            parse_feature(&item("gene", "1..10\ngene=\"ORF1\"", vec![])),
            Err(ParseError::UnexpectedTokenInFeature)
        ));
    }

    #[test]
    fn test_parse_feature_unterminated_quote() {
        assert!(matches!(
            parse_feature(&item("gene", "1..10\n/gene=\"ORF1", vec![])),
            Err(ParseError::ReachedEndOfFeature)
        ));
    }

    #[test]
    fn test_parse_feature_dangling_equals() {
        assert!(matches!(
            parse_feature(&item("gene", "1..10\n/gene=", vec![])),
            Err(ParseError::ReachedEndOfFeature)
        ));
    }

    #[test]
    fn test_parse_feature_junk_after_quoted_value() {
        assert!(matches!(
            parse_feature(&item("gene", "1..10\n/gene=\"ORF1\"junk", vec![])),
            Err(ParseError::UnexpectedTokenInFeature)
        ));
    }

    #[test]
    fn test_parse_feature_join_location() {
        let feature = parse_feature(&item(
            "CDS",
            "join(266..13468,13468..21555)\n/gene=\"ORF1ab\"",
            vec![],
        ))
        .unwrap();
        let expected: RangeSet = [266..13469, 13468..21556].into_iter().collect();
        assert_eq!(feature.bases, expected);
        assert_eq!(feature.bases.span_count(), 1);
    }
}
