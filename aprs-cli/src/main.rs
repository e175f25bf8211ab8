//! aprs-cli: Line-oriented APRS decoder.
//!
//! Reads TNC2 text lines from a file or stdin, decodes each with
//! `aprs-core`, and prints one JSON record per packet to stdout. Decode
//! failures and diagnostics go to stderr so stdout stays pipeable.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use aprs_core::decode::decode_packet;
use aprs_core::passcode::aprs_passcode;

#[derive(Parser)]
#[command(name = "aprs", version, about = "APRS TNC2 packet decoding")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode TNC2 lines from a file (or stdin) into JSON records
    Decode {
        /// Input file; reads stdin when omitted
        file: Option<PathBuf>,
    },
    /// Print the APRS-IS login passcode for a callsign
    Passcode {
        /// Station callsign, SSID allowed
        callsign: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode { file } => cmd_decode(file),
        Commands::Passcode { callsign } => {
            println!("{}", aprs_passcode(&callsign));
        }
    }
}

fn cmd_decode(file: Option<PathBuf>) {
    let reader: Box<dyn BufRead> = match &file {
        Some(path) => match File::open(path) {
            Ok(f) => Box::new(BufReader::new(f)),
            Err(e) => {
                eprintln!("Error opening {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut decoded_count = 0u64;
    let mut failed_count = 0u64;

    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Read error: {e}");
                break;
            }
        };
        let trimmed = line.trim_end();
        // APRS-IS interleaves server chatter prefixed with '#'
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match decode_packet(trimmed) {
            Ok(d) => {
                decoded_count += 1;
                for diag in &d.diagnostics {
                    eprintln!("diagnostic: {}: {}", diag.message, diag.raw);
                }
                match serde_json::to_string(&d.packet) {
                    Ok(json) => println!("{json}"),
                    Err(e) => eprintln!("JSON error: {e}"),
                }
            }
            Err(e) => {
                failed_count += 1;
                eprintln!("decode failed: {e}: {trimmed}");
            }
        }
    }

    eprintln!("{decoded_count} decoded, {failed_count} failed");
}
