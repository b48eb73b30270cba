use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;

use khmer_segmenter::{kdic, Dictionary, KhmerSegmenter, RuleEngine};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to dictionary file (plain text word list, or compiled .kdic)
    #[arg(short, long, default_value = "data/khmer_dictionary_words.txt")]
    dict: PathBuf,

    /// Path to frequency file (JSON word -> count; ignored for .kdic)
    #[arg(short, long, default_value = "data/khmer_word_frequencies.json")]
    freq: PathBuf,

    /// Rule table overriding the built-in one
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Input text file
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (JSONL) - optional, skip to benchmark only
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Limit number of lines to process
    #[arg(short, long)]
    limit: Option<usize>,

    /// Write the loaded dictionary as a compiled KDIC file and exit
    #[arg(long)]
    compile_dict: Option<PathBuf>,
}

#[derive(Serialize)]
struct Record<'a> {
    id: usize,
    input: &'a str,
    segments: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("Initializing Segmenter...");
    println!("Dictionary: {}", args.dict.display());

    let start_load = Instant::now();
    let dictionary = if args.dict.extension().is_some_and(|e| e == "kdic") {
        kdic::read_file(&args.dict)?
    } else {
        println!("Frequencies: {}", args.freq.display());
        Dictionary::load(&args.dict, &args.freq)?
    };
    println!(
        "Loaded {} words (max length {}) in {:.2}s",
        dictionary.len(),
        dictionary.max_word_len(),
        start_load.elapsed().as_secs_f32()
    );

    if let Some(ref out) = args.compile_dict {
        kdic::write_file(&dictionary, out)?;
        println!("Compiled dictionary written to {}", out.display());
        return Ok(());
    }

    let rules = match &args.rules {
        Some(path) => RuleEngine::from_path(path)?,
        None => RuleEngine::default(),
    };
    let segmenter = KhmerSegmenter::with_rules(dictionary, rules);

    let Some(ref input) = args.input else {
        anyhow::bail!("--input is required unless --compile-dict is given");
    };

    println!("Reading source: {}", input.display());
    let file = File::open(input)?;
    let reader = BufReader::new(file);
    let mut lines: Vec<String> = reader
        .lines()
        .collect::<Result<Vec<String>, _>>()?
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();

    if let Some(limit) = args.limit {
        if limit < lines.len() {
            lines.truncate(limit);
        }
    }

    println!("Processing {} lines...", lines.len());
    let start_process = Instant::now();

    // The segmenter is read-only, so lines fan out across the pool.
    let results: Vec<String> = lines
        .par_iter()
        .enumerate()
        .map(|(id, line)| -> anyhow::Result<String> {
            let segments = segmenter.segment(line)?;
            Ok(serde_json::to_string(&Record {
                id,
                input: line,
                segments,
            })?)
        })
        .collect::<anyhow::Result<_>>()?;

    if let Some(ref output_path) = args.output {
        let output_file = File::create(output_path)?;
        let mut writer = BufWriter::with_capacity(262144, output_file);
        for result in &results {
            writeln!(writer, "{result}")?;
        }
        writer.flush()?;
        println!("Done. Saved to {}", output_path.display());
    }

    let duration = start_process.elapsed();
    println!("Time taken: {:.2}s", duration.as_secs_f32());
    println!(
        "Speed: {:.2} lines/sec",
        lines.len() as f32 / duration.as_secs_f32()
    );

    Ok(())
}
