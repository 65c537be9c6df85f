//! sms-count: live SMS segment counts from the command line.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::Read;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use sms_segments::{
    CodecConfig, Encoding, MaxParts, SmsCounter, decode_with_config, encode_with_config,
};

/// Count SMS parts and characters remaining for a message
#[derive(Parser)]
#[command(name = "sms-count")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print `remaining/parts` for a message
    Count(CountArgs),

    /// Encode a message to GSM septets, printed as hex
    Encode(EncodeArgs),

    /// Decode hex GSM septets to text
    Decode(DecodeArgs),
}

#[derive(Args)]
struct CountArgs {
    /// Message text; read from stdin when omitted
    text: Option<String>,

    /// Maximum number of parts the message may use
    #[arg(short = 'p', long, default_value = "1", allow_negative_numbers = true)]
    max_parts: String,

    /// Print the full count as JSON
    #[arg(long)]
    json: bool,

    /// Fail when the message needs more parts than allowed
    #[arg(long)]
    check: bool,
}

#[derive(Args)]
struct EncodeArgs {
    /// Message text; read from stdin when omitted
    text: Option<String>,

    /// Fail on characters outside the GSM table instead of replacing them
    #[arg(long)]
    strict: bool,
}

#[derive(Args)]
struct DecodeArgs {
    /// Space separated hex bytes, e.g. "48 1B 65"
    hex: String,

    /// Fail on invalid bytes instead of replacing them
    #[arg(long)]
    strict: bool,
}

#[derive(Serialize)]
struct CountReport {
    encoding: Encoding,
    length: usize,
    parts: usize,
    remaining: i64,
    max_parts: MaxParts,
    maximum_length: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG takes precedence; otherwise WARN, or DEBUG with --verbose.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" }));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Count(args) => count(args),
        Commands::Encode(args) => encode(args),
        Commands::Decode(args) => decode(args),
    }
}

fn count(args: CountArgs) -> Result<()> {
    let counter = SmsCounter::new(MaxParts::parse(Some(args.max_parts.as_str())));
    let text = message_text(args.text)?;

    let segments = if args.check {
        counter.validate(&text)?
    } else {
        counter.count(&text)
    };

    if args.json {
        let report = CountReport {
            encoding: segments.encoding,
            length: segments.length,
            parts: segments.parts,
            remaining: segments.remaining,
            max_parts: counter.max_parts(),
            maximum_length: counter.maximum_length(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{segments}");
    }
    Ok(())
}

fn encode(args: EncodeArgs) -> Result<()> {
    let text = message_text(args.text)?;
    let config = codec_config(args.strict);
    let bytes = encode_with_config(&text, &config)?;
    println!("{}", format_hex(&bytes));
    Ok(())
}

fn decode(args: DecodeArgs) -> Result<()> {
    let bytes = parse_hex(&args.hex)?;
    if bytes.is_empty() {
        bail!("No bytes to decode");
    }
    let config = codec_config(args.strict);
    let text = decode_with_config(&bytes, &config)?;
    println!("{text}");
    Ok(())
}

fn codec_config(strict: bool) -> CodecConfig {
    if strict {
        CodecConfig::strict()
    } else {
        CodecConfig::default()
    }
}

/// Parse space separated hex bytes, such as `"48 1B 65"` or `"0x48 0x1b"`.
fn parse_hex(input: &str) -> Result<Vec<u8>> {
    input
        .split_whitespace()
        .map(|token| {
            let digits = token.strip_prefix("0x").unwrap_or(token);
            match hex::decode(digits) {
                Ok(bytes) if bytes.len() == 1 => Ok(bytes[0]),
                Ok(_) => bail!("Invalid hex byte: '{token}'"),
                Err(err) => bail!("Invalid hex byte: '{token}' ({err})"),
            }
        })
        .collect()
}

fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| hex::encode_upper([*b]))
        .collect::<Vec<_>>()
        .join(" ")
}

fn message_text(text: Option<String>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read message from stdin")?;
    // a single trailing newline comes from the shell, not the message
    if buf.ends_with('\n') {
        buf.pop();
        if buf.ends_with('\r') {
            buf.pop();
        }
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let bytes = parse_hex("48 1b 65 0x41").unwrap();
        assert_eq!(bytes, vec![0x48, 0x1B, 0x65, 0x41]);
        assert_eq!(format_hex(&bytes), "48 1B 65 41");
        assert!(parse_hex("").unwrap().is_empty());
    }

    #[test]
    fn test_hex_invalid() {
        let err = parse_hex("48 zz").unwrap_err();
        assert!(err.to_string().contains("Invalid hex byte: 'zz'"));
        assert!(parse_hex("123").is_err());
        assert!(parse_hex("4142").is_err());
        assert!(parse_hex("0x").is_err());
    }
}
