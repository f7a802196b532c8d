use clap::{Parser, Subcommand};
use stmotif_lib::constants::QUIT_COMMAND;
use stmotif_lib::source::read_text;
use stmotif_lib::{SuffixTree, TreeBuilder, TreeConfiguration, TreeError};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "stmotif")]
#[command(version = "0.1.0")]
#[command(about = "Suffix tree motif search over DNA sequences", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the suffix tree of an input file and report its size
    Build {
        /// Input sequence (FASTA/FASTQ or plain text)
        #[arg(short, long)]
        input: String,

        /// Print every path label of the tree to stdout
        #[arg(long, default_value = "false")]
        print: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Count motif occurrences
    Query {
        /// Input sequence (FASTA/FASTQ or plain text)
        #[arg(short, long)]
        input: String,

        /// Motif to count (repeatable); without motifs an interactive prompt starts
        #[arg(short, long)]
        motif: Vec<String>,

        /// File with one motif per line
        #[arg(short, long)]
        query: Option<String>,

        /// Number of threads for batch queries (0 = all available cores)
        #[arg(short = 't', long, default_value = "0")]
        threads: usize,
    },

    /// Check tree counts against a brute-force scan of the input
    Check {
        /// Input sequence (FASTA/FASTQ or plain text)
        #[arg(short, long)]
        input: String,

        /// Longest motif to sample
        #[arg(long, default_value = "12")]
        max_len: usize,

        /// Number of sampled motifs
        #[arg(long, default_value = "1000")]
        samples: usize,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing: use RUST_LOG if set, otherwise default to info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, print, verbose } => {
            build_command(input, print, verbose)?;
        }
        Commands::Query { input, motif, query, threads } => {
            query_command(input, motif, query, threads)?;
        }
        Commands::Check { input, max_len, samples } => {
            check_command(input, max_len, samples)?;
        }
    }

    Ok(())
}

/// Read the input file and build its suffix tree
fn load_tree(input: &str, config: TreeConfiguration) -> anyhow::Result<SuffixTree> {
    let text = read_text(input, &config.alphabet)?;
    info!("Length of the input string (including terminal character): {}", text.len());

    let builder = TreeBuilder::new(config)?;
    Ok(builder.build_from_text(&text)?)
}

/// Build a tree and report construction time and memory
fn build_command(input: String, print: bool, verbose: bool) -> anyhow::Result<()> {
    info!("Building suffix tree...");
    info!("  Input: {}", input);

    let config = TreeConfiguration {
        verbose,
        ..TreeConfiguration::default()
    };

    let start = Instant::now();
    let tree = load_tree(&input, config)?;
    let elapsed = start.elapsed();

    println!("Size of the input string: {:.2} KB", tree.len() as f64 / 1024.0);
    println!(
        "Time taken to construct suffix tree: {:.3} ms",
        elapsed.as_secs_f64() * 1000.0
    );
    println!(
        "Memory occupied by the suffix tree: {:.2} KB",
        tree.num_bytes() as f64 / 1024.0
    );
    println!("Nodes: {} ({} leaves)", tree.num_nodes(), tree.num_leaves());
    tree.print_space_breakdown();

    if print {
        println!("Suffix Tree:");
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        tree.write_tree(&mut out)?;
        out.flush()?;
    }

    Ok(())
}

/// Count motifs given on the command line or in a file, or prompt for them
fn query_command(
    input: String,
    motifs: Vec<String>,
    query: Option<String>,
    threads: usize,
) -> anyhow::Result<()> {
    let config = TreeConfiguration {
        num_threads: threads,
        verbose: false,
        ..TreeConfiguration::default()
    };

    let start = Instant::now();
    let tree = load_tree(&input, config)?;
    println!(
        "Time taken to build the suffix tree: {} milliseconds.",
        start.elapsed().as_millis()
    );

    let mut motifs = motifs;
    if let Some(path) = query {
        motifs.extend(parse_motif_file(&path)?);
    }

    if motifs.is_empty() {
        return interactive_loop(&tree);
    }

    info!("Querying {} motifs...", motifs.len());
    let start = Instant::now();
    let results = tree.count_many_with_threads(&motifs, threads)?;
    let elapsed = start.elapsed();

    let mut found = 0usize;
    for (motif, result) in motifs.iter().zip(&results) {
        report(motif, result);
        if matches!(result, Ok(count) if *count > 0) {
            found += 1;
        }
    }

    println!("\nResults:");
    println!("  Present: {}", found);
    println!("  Absent or invalid: {}", motifs.len() - found);
    println!(
        "  Time: {:.3} ms ({:.3} us per motif)",
        elapsed.as_secs_f64() * 1000.0,
        elapsed.as_secs_f64() * 1e6 / motifs.len() as f64
    );

    Ok(())
}

/// Prompt for motifs on stdin until `Q` or end of input
fn interactive_loop(tree: &SuffixTree) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("\nEnter the motif to search for (or '{}' to quit): ", QUIT_COMMAND);
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let motif = line.trim();
        if motif.is_empty() {
            continue;
        }
        if motif.eq_ignore_ascii_case(QUIT_COMMAND) {
            break;
        }

        let start = Instant::now();
        let result = tree.count(motif.as_bytes());
        let elapsed = start.elapsed();
        println!(
            "Time taken to search for the motif: {} milliseconds.",
            elapsed.as_millis()
        );
        debug!("  {} searched in {:?}", motif, elapsed);
        report(motif, &result);
    }

    Ok(())
}

fn report(motif: &str, result: &Result<u64, TreeError>) {
    match result {
        Ok(0) => println!("The motif \"{}\" is not present in the string.", motif),
        Ok(count) => println!(
            "The motif \"{}\" is present in the string {} times.",
            motif, count
        ),
        Err(e) => warn!("Skipping motif \"{}\": {}", motif, e),
    }
}

/// Verify counts for sampled substrings against a direct scan
fn check_command(input: String, max_len: usize, samples: usize) -> anyhow::Result<()> {
    info!("Checking suffix tree correctness...");
    info!("  Input: {}", input);

    let config = TreeConfiguration {
        verbose: false,
        ..TreeConfiguration::default()
    };
    let tree = load_tree(&input, config)?;

    if let Err(violation) = tree.check_structure() {
        warn!("STRUCTURE CHECK FAILED: {}", violation);
        println!("\n✗ STRUCTURE CHECK FAILED!");
        println!("  {}", violation);
        std::process::exit(1);
    }

    // Sample motifs from the text itself so most of them are present
    let text = tree.text();
    let body = &text[..text.len() - 1];
    let max_len = max_len.max(1);
    let mut checked = 0usize;
    let mut num_mismatches = 0usize;
    let mut mismatches = Vec::new();
    let mut rng_state: u64 = 42;

    if !body.is_empty() {
        for i in 0..samples {
            rng_state = rng_state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let start = ((rng_state >> 33) as usize) % body.len();
            let len = 1 + ((rng_state >> 16) as usize) % max_len;
            let motif = &body[start..body.len().min(start + len)];

            let expected = body
                .windows(motif.len())
                .filter(|window| *window == motif)
                .count() as u64;
            let actual = tree.count(motif)?;
            checked += 1;

            if actual != expected {
                num_mismatches += 1;
                if mismatches.len() < 10 {
                    mismatches.push(format!(
                        "{} (tree: {}, scan: {})",
                        String::from_utf8_lossy(motif),
                        actual,
                        expected
                    ));
                }
            }

            if (i + 1) % 100 == 0 {
                debug!("  Checked {} motifs...", i + 1);
            }
        }
    }

    println!("\n=== Check Results ===");
    println!("  Nodes: {}", tree.num_nodes());
    println!("  Motifs checked: {}", checked);
    println!("  Mismatches: {}", num_mismatches);

    if num_mismatches > 0 {
        warn!("CORRECTNESS CHECK FAILED! {} mismatching motifs", num_mismatches);
        println!("\n✗ CORRECTNESS CHECK FAILED!");
        println!("\nFirst {} mismatches:", mismatches.len());
        for mismatch in &mismatches {
            println!("  {}", mismatch);
        }
        std::process::exit(1);
    } else {
        println!("\n✓ CORRECTNESS CHECK PASSED!");
        println!("  All sampled motifs match a direct scan of the input");
    }

    Ok(())
}

/// Parse a plain text file with one motif per line
fn parse_motif_file(path: &str) -> anyhow::Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut motifs = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let motif = line.trim().to_uppercase();
        if !motif.is_empty() {
            motifs.push(motif);
        }
    }

    Ok(motifs)
}
