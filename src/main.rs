//! gbparse - GenBank record inspector
//!
//! Parses a GenBank flat-file record and prints a summary of what it
//! contains.
//!
//! ## Usage
//!
//! ```bash
//! gbparse <record.gb>             # locus, source, references, statistics
//! gbparse --features <record.gb>  # also list the feature table
//! gbparse --sequence <record.gb>  # also dump the decoded sequence
//! ```

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use gbparse::model::Journal;
use gbparse::parse_genbank_file;
use gbparse::sequence::Base;

/// Inspect a GenBank flat-file genome record
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GenBank record to parse (.gb, .gbk)
    file: PathBuf,

    /// List the feature table
    #[arg(short = 'f', long = "features")]
    features: bool,

    /// List the free-form metadata sections
    #[arg(short = 'm', long = "metadata")]
    metadata: bool,

    /// Dump the decoded sequence as one line of letters
    #[arg(short = 's', long = "sequence")]
    sequence: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let genome = parse_genbank_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;

    let locus = &genome.locus;
    println!(
        "{}  {} bp  {}  {}  {}",
        locus.name, locus.sequence_length, locus.molecule_type, locus.division, locus.modified
    );
    println!("source: {}", genome.source.name);
    if let Some(organism) = &genome.source.organism {
        // Taxonomy continuation lines are newline-joined; show the first.
        let first = organism.lines().next().unwrap_or_default();
        println!("organism: {}", first);
    }

    if !genome.references.is_empty() {
        println!();
        for reference in &genome.references {
            let status = match &reference.journal {
                Journal::Unpublished => "unpublished".to_string(),
                Journal::Published { name, pubmed } => match pubmed {
                    Some(id) => format!("{} [PubMed {}]", name.lines().next().unwrap_or_default(), id),
                    None => name.lines().next().unwrap_or_default().to_string(),
                },
            };
            println!(
                "reference {} (bases {}..{}): {}",
                reference.id,
                reference.bases.start(),
                reference.bases.end(),
                reference.title.split('\n').collect::<Vec<_>>().join(" "),
            );
            println!("  {}", status);
        }
    }

    if args.metadata {
        println!();
        let mut names: Vec<&String> = genome.metadata.keys().collect();
        names.sort();
        for name in names {
            let value = &genome.metadata[name];
            println!("{}: {}", name, value.split('\n').collect::<Vec<_>>().join(" "));
        }
    }

    if args.features {
        println!();
        for feature in &genome.features {
            let spans: Vec<String> = feature
                .bases
                .iter()
                .map(|span| format!("{}..{}", span.start, span.end - 1))
                .collect();
            print!(
                "{:<16} {} ({})",
                feature.kind,
                spans.join(","),
                feature.completion
            );
            if let Some(gene) = feature.qualifier("gene") {
                print!("  /gene={}", gene);
            }
            if let Some(product) = feature.qualifier("product") {
                print!("  /product={}", product);
            }
            println!();
        }
    }

    println!();
    let counts = base_counts(&genome.sequence);
    let total = genome.sequence.len();
    println!("decoded sequence: {} bases", total);
    if total > 0 {
        for (base, count) in Base::ALL.iter().zip(counts) {
            println!("  {}: {:>8} ({:.1}%)", base, count, 100.0 * count as f64 / total as f64);
        }
        let gc = genome
            .sequence
            .iter()
            .filter(|&b| b == Base::G || b == Base::C)
            .count();
        println!("  GC content: {:.1}%", 100.0 * gc as f64 / total as f64);
    }

    if args.sequence {
        println!();
        println!("{}", genome.sequence);
    }

    Ok(())
}

fn base_counts(sequence: &gbparse::sequence::GeneSequence) -> [usize; 4] {
    let mut counts = [0usize; 4];
    for base in sequence.iter() {
        counts[base.code() as usize] += 1;
    }
    counts
}
