//! zonelabel CLI - layout feature extraction and markup reconstruction

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use zonelabel::{
    labels_from_tei, lines_to_markup, token_features, tokens_to_markup, wrap_tei,
    zones_from_labels, Document, EncoderOptions, LabelStream, MarkupOptions, MarkupResult,
    SyncPolicy, Taxonomy, Zone,
};

#[derive(Parser)]
#[command(name = "zonelabel")]
#[command(version)]
#[command(about = "Layout feature extraction and labeled markup reconstruction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the feature vectors of a document
    Features {
        /// Input document (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Unit of the feature vectors
        #[arg(long, value_enum, default_value = "line")]
        level: Level,

        /// Restrict token-level encoding to a stored zone
        #[arg(long, value_name = "LABEL")]
        zone: Option<String>,

        /// Maximum number of tokens
        #[arg(long)]
        max_tokens: Option<usize>,

        /// Maximum number of blocks
        #[arg(long)]
        max_blocks: Option<usize>,
    },

    /// Write features of many documents into a directory
    Batch {
        /// Input documents (JSON)
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,
    },

    /// Write unlabeled TEI training text
    Blank {
        /// Input document (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Restrict to a stored zone
        #[arg(long, value_name = "LABEL")]
        zone: Option<String>,

        /// Document identifier for the TEI header
        #[arg(long)]
        id: Option<String>,
    },

    /// Rebuild markup from a labeled feature stream
    Reconstruct {
        /// Input document (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Labeler output
        #[arg(short, long, value_name = "FILE")]
        labels: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Unit of the labeled stream
        #[arg(long, value_enum, default_value = "line")]
        level: Level,

        /// Zone the token-level stream was encoded from
        #[arg(long, value_name = "LABEL")]
        zone: Option<String>,

        /// Label set (segmentation, monograph, body-segmentation)
        #[arg(long, default_value = "segmentation")]
        taxonomy: String,

        /// Tabs written before every opening element
        #[arg(long, default_value = "3")]
        indent: usize,

        /// Wrap the result in a TEI envelope
        #[arg(long)]
        tei: bool,

        /// Document identifier for the TEI header
        #[arg(long)]
        id: Option<String>,

        /// Language of the TEI text element
        #[arg(long, default_value = "fr")]
        lang: String,

        /// Fail when the labels outrun the document
        #[arg(long)]
        strict: bool,
    },

    /// Store the zones of a line-level labeled stream in the document
    Zones {
        /// Input document (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Labeler output
        #[arg(short, long, value_name = "FILE")]
        labels: PathBuf,

        /// Output document (overwrites input if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Convert an annotated TEI file into labeled training lines
    TrainLabels {
        /// Annotated TEI file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Label set (segmentation, monograph, body-segmentation)
        #[arg(long, default_value = "segmentation")]
        taxonomy: String,
    },

    /// Show document information
    Info {
        /// Input document (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the layout statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Level {
    /// One vector per text line of the whole document
    Line,
    /// One vector per token of a zone
    Token,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Features {
            input,
            output,
            level,
            zone,
            max_tokens,
            max_blocks,
        } => {
            let mut options = EncoderOptions::new();
            if let Some(limit) = max_tokens {
                options = options.with_max_tokens(limit);
            }
            if let Some(limit) = max_blocks {
                options = options.with_max_blocks(limit);
            }
            cmd_features(&input, output.as_deref(), level, zone.as_deref(), &options)
        }
        Commands::Batch { inputs, output } => cmd_batch(&inputs, &output),
        Commands::Blank {
            input,
            output,
            zone,
            id,
        } => cmd_blank(&input, output.as_deref(), zone.as_deref(), id.as_deref()),
        Commands::Reconstruct {
            input,
            labels,
            output,
            level,
            zone,
            taxonomy,
            indent,
            tei,
            id,
            lang,
            strict,
        } => parse_taxonomy(&taxonomy).and_then(|taxonomy| {
            let policy = if strict {
                SyncPolicy::Abort
            } else {
                SyncPolicy::Placeholder
            };
            let options = MarkupOptions::new()
                .with_taxonomy(taxonomy)
                .with_indent(indent)
                .with_sync_policy(policy);
            let envelope = tei.then(|| (id.as_deref(), lang.as_str()));
            cmd_reconstruct(
                &input,
                &labels,
                output.as_deref(),
                level,
                zone.as_deref(),
                &options,
                envelope,
            )
        }),
        Commands::Zones {
            input,
            labels,
            output,
        } => cmd_zones(&input, &labels, output.as_deref()),
        Commands::TrainLabels {
            input,
            output,
            taxonomy,
        } => parse_taxonomy(&taxonomy)
            .and_then(|taxonomy| cmd_train_labels(&input, output.as_deref(), &taxonomy)),
        Commands::Info { input, json } => cmd_info(&input, json),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn parse_taxonomy(name: &str) -> Result<Taxonomy, Box<dyn std::error::Error>> {
    Taxonomy::by_name(name).ok_or_else(|| format!("Unknown taxonomy: {}", name).into())
}

/// The stored zone `label`, or the whole document.
fn select_zone(doc: &Document, label: Option<&str>) -> Result<Zone, Box<dyn std::error::Error>> {
    match label {
        Some(label) => doc
            .zone(label)
            .cloned()
            .ok_or_else(|| format!("Document has no zone {}", label).into()),
        None => Ok(doc.whole_document().unwrap_or_default()),
    }
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", content);
    }
    Ok(())
}

fn report_sync(result: &MarkupResult) {
    let stats = &result.stats;
    if !stats.is_clean() {
        eprintln!(
            "{} {} desynchronized, {} unknown labels, {} malformed lines",
            "Warning:".yellow(),
            stats.desync_count,
            stats.unknown_labels,
            stats.malformed_lines
        );
    }
}

fn cmd_features(
    input: &Path,
    output: Option<&Path>,
    level: Level,
    zone: Option<&str>,
    options: &EncoderOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = Document::load(input)?;

    let features = match level {
        Level::Line => {
            if zone.is_some() {
                return Err("Line-level features cover the whole document".into());
            }
            zonelabel::line_feature_string(&doc, options)?
        }
        Level::Token => {
            let zone = select_zone(&doc, zone)?;
            zonelabel::token_feature_string(&doc, &zone, options)?
        }
    };

    match features {
        Some(features) => write_output(output, &features),
        None => {
            println!("{}", "Document is empty, nothing to encode".yellow());
            Ok(())
        }
    }
}

fn cmd_batch(inputs: &[PathBuf], output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output)?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let options = EncoderOptions::default();
    let mut written = 0;
    let mut failed = 0;
    for input in inputs {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        pb.set_message(stem.to_string());

        let result = Document::load(input)
            .and_then(|doc| zonelabel::line_feature_string(&doc, &options));
        match result {
            Ok(Some(features)) => {
                fs::write(output.join(format!("{}.features", stem)), features)?;
                written += 1;
            }
            Ok(None) => log::debug!("{} is empty, skipped", input.display()),
            Err(e) => {
                pb.println(format!("{} {}: {}", "Failed".red(), input.display(), e));
                failed += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done!");
    println!(
        "\n{} {} written, {} failed",
        "Done!".green().bold(),
        written,
        failed
    );
    Ok(())
}

fn cmd_blank(
    input: &Path,
    output: Option<&Path>,
    zone: Option<&str>,
    id: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = Document::load(input)?;
    let zone = select_zone(&doc, zone)?;
    let tei = zonelabel::blank_training(&doc, &zone, id);
    write_output(output, &tei)
}

fn cmd_reconstruct(
    input: &Path,
    labels: &Path,
    output: Option<&Path>,
    level: Level,
    zone: Option<&str>,
    options: &MarkupOptions,
    envelope: Option<(Option<&str>, &str)>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = Document::load(input)?;
    let labels = fs::read_to_string(labels)?;

    let result = match level {
        Level::Line => lines_to_markup(&doc, &labels, options)?,
        Level::Token => {
            let zone = select_zone(&doc, zone)?;
            let encoded = token_features(&doc, &zone, &EncoderOptions::default())?;
            let tokens = encoded.map(|f| f.tokens).unwrap_or_default();
            tokens_to_markup(&tokens, &labels, options)?
        }
    };
    report_sync(&result);

    let content = match envelope {
        Some((id, lang)) => wrap_tei(&result.content, id, lang),
        None => result.content,
    };
    write_output(output, &content)
}

fn cmd_zones(
    input: &Path,
    labels: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = Document::load(input)?;
    let stream = LabelStream::parse(&fs::read_to_string(labels)?);

    let zones = zones_from_labels(&doc, &stream);
    for (label, zone) in &zones {
        println!(
            "  {} {} ({} pieces, {} chars)",
            "├─".dimmed(),
            label,
            zone.len(),
            doc.full_text_length(zone)
        );
    }
    doc.set_zones(zones);

    let path = output.unwrap_or(input);
    fs::write(path, doc.to_json()?)?;
    println!("{} {}", "Saved to".green(), path.display());
    Ok(())
}

fn cmd_train_labels(
    input: &Path,
    output: Option<&Path>,
    taxonomy: &Taxonomy,
) -> Result<(), Box<dyn std::error::Error>> {
    let xml = fs::read_to_string(input)?;
    let lines = labels_from_tei(&xml, taxonomy)?;

    let mut content = String::new();
    for line in &lines {
        content.push_str(&line.to_string());
        content.push('\n');
    }
    write_output(output, &content)
}

fn cmd_info(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let doc = Document::load(input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&doc.statistics)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!("{}: {}", "Blocks".bold(), doc.block_count());
    println!("{}: {}", "Tokens".bold(), doc.token_count());

    println!();
    println!("{}", "Layout Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let stats = &doc.statistics;
    println!(
        "{}: {:.2} - {:.2}",
        "Block spacing".bold(),
        stats.min_block_spacing,
        stats.max_block_spacing
    );
    println!(
        "{}: {:.4} - {:.4}",
        "Char density".bold(),
        stats.min_char_density,
        stats.max_char_density
    );

    if !doc.zones().is_empty() {
        println!();
        println!("{}", "Zones".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for (label, zone) in doc.zones() {
            println!(
                "{}: {} pieces, {} chars",
                label.bold(),
                zone.len(),
                doc.full_text_length(zone)
            );
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "zonelabel".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Layout feature extraction and labeled markup reconstruction");
}
