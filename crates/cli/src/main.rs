use std::fs;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use xelis_hash_corelib::{self as xh, HashConfig, HashError, Hasher};

/// Exit code for `verify` when the digests differ.
const EXIT_MISMATCH: u8 = 1;
/// Exit code for `verify` when either digest is not valid hex.
const EXIT_BAD_HEX: u8 = 2;

#[derive(Parser)]
#[command(name = "xhash", version, about = "XELIS hash CLI")]
struct Cli {
    /// Hash engine id (overrides the config file and XELIS_HASH_ENGINE)
    #[arg(long, global = true)]
    engine: Option<String>,
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Exactly one input source.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct InputArgs {
    /// UTF-8 text to hash
    text: Option<String>,
    /// Hex-encoded bytes to hash
    #[arg(long)]
    hex: Option<String>,
    /// File whose raw contents are hashed
    #[arg(short, long)]
    file: Option<PathBuf>,
}

impl InputArgs {
    fn read(&self) -> Result<Vec<u8>> {
        if let Some(text) = &self.text {
            return Ok(text.as_bytes().to_vec());
        }
        if let Some(hex) = &self.hex {
            return Ok(xh::hex_to_bytes(hex)?);
        }
        match &self.file {
            Some(path) => fs::read(path).with_context(|| format!("reading {}", path.display())),
            None => anyhow::bail!("no input given"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Hash one input and print the hex digest
    Hash {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Apply the hash N times, feeding each digest back in
    Iter {
        /// Number of hash applications (0 echoes the input)
        iterations: u32,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Hash every line of a file (or stdin) independently, in order.
    /// Lines are raw bytes split on '\n'; a trailing '\r' is dropped.
    Batch {
        /// Read lines from this file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Treat each line as hex-encoded bytes
        #[arg(long)]
        hex: bool,
    },
    /// Compare two hex digests (exit 0 = equal, 1 = different, 2 = malformed)
    Verify { first: String, second: String },
    /// Print lengths and both encodings of the digest as JSON
    Meta {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print the digest size in bytes
    Size,
    /// List available hash engines
    Engines,
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn build_hasher(cli: &Cli) -> Result<Hasher> {
    let mut cfg = match &cli.config {
        Some(path) => HashConfig::load(path)?,
        None => HashConfig::from_env_or_default(),
    };
    if let Some(engine) = &cli.engine {
        cfg.engine = engine.clone();
    }
    tracing::debug!(engine = %cfg.engine, "resolved configuration");
    Ok(Hasher::from_config(&cfg)?)
}

fn read_lines(file: Option<&PathBuf>) -> Result<Vec<Vec<u8>>> {
    let reader: Box<dyn BufRead> = match file {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("reading {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    reader
        .split(b'\n')
        .map(|line| {
            let mut line = line.context("reading batch input")?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            Ok(line)
        })
        .collect()
}

fn main() -> Result<ExitCode> {
    init_logging();
    xh::init();
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Hash { input }) => {
            let hasher = build_hasher(&cli)?;
            println!("{}", hasher.hash_hex(&input.read()?)?);
        }
        Some(Commands::Iter { iterations, input }) => {
            let hasher = build_hasher(&cli)?;
            let out = hasher.hash_iterated(&input.read()?, *iterations)?;
            println!("{}", xh::bytes_to_hex(&out));
        }
        Some(Commands::Batch { file, hex }) => {
            let hasher = build_hasher(&cli)?;
            let lines = read_lines(file.as_ref())?;
            let inputs = if *hex {
                lines
                    .iter()
                    .enumerate()
                    .map(|(i, line)| {
                        let text = std::str::from_utf8(line)
                            .with_context(|| format!("line {} is not UTF-8", i + 1))?;
                        xh::hex_to_bytes(text.trim()).with_context(|| format!("line {}", i + 1))
                    })
                    .collect::<Result<Vec<_>>>()?
            } else {
                lines
            };
            for digest in hasher.hash_batch(&inputs)? {
                println!("{digest}");
            }
        }
        Some(Commands::Verify { first, second }) => match xh::verify(first, second) {
            Ok(true) => println!("match"),
            Ok(false) => {
                println!("mismatch");
                return Ok(ExitCode::from(EXIT_MISMATCH));
            }
            Err(e @ HashError::InvalidEncoding { .. }) => {
                eprintln!("error: {e}");
                return Ok(ExitCode::from(EXIT_BAD_HEX));
            }
            Err(e) => return Err(e.into()),
        },
        Some(Commands::Meta { input }) => {
            let hasher = build_hasher(&cli)?;
            let meta = hasher.hash_with_metadata(&input.read()?)?;
            println!("{}", serde_json::to_string_pretty(&meta)?);
        }
        Some(Commands::Size) => {
            println!("{}", xh::get_hash_size());
        }
        Some(Commands::Engines) => {
            for e in xh::list_engines() {
                let marker = if e.default { "  (default)" } else { "" };
                println!("{}  memory_hard={}{}", e.id, e.memory_hard, marker);
            }
        }
        None => {
            println!("xhash {} ready", xh::version());
            println!("Try: `xhash hash \"Hello, XELIS!\"` or `xhash engines`");
        }
    }
    Ok(ExitCode::SUCCESS)
}
