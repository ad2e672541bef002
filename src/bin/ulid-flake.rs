use std::process::ExitCode;
use std::time::SystemTime;

use chrono::DateTime;
use clap::{CommandFactory, Parser};
use ulid_flake::{Config, ConfigBuilder, FlakeId, Layout, ScalableUlidFlake, UlidFlake};

#[derive(Parser)]
#[command(name = "ulid-flake")]
#[command(about = "Generate and inspect Ulid-Flake identifiers")]
struct Cli {
    /// Generate a new Ulid-Flake
    #[arg(long)]
    generate: bool,
    /// Parse a Ulid-Flake string
    #[arg(long, value_name = "STR")]
    parse: Option<String>,
    /// Custom epoch time (e.g., 2024-01-01T00:00:00Z)
    #[arg(
        long,
        value_name = "RFC3339",
        default_value = "2024-01-01T00:00:00Z",
        value_parser = parse_epoch
    )]
    epoch: SystemTime,
    /// Custom entropy size in bytes, from 1 to 3 (0 keeps the default)
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    entropy: i32,
    /// Custom scalability ID, from 0 to 31
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    sid: i32,
    /// Use the scalable layout with an embedded scalability ID
    #[arg(long)]
    scalable: bool,
}

fn parse_epoch(s: &str) -> Result<SystemTime, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(SystemTime::from)
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("ulid-flake: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    ulid_flake::configure(config_builder(&cli))?;

    if cli.generate {
        if cli.scalable {
            let e = ulid_flake::new_scalable()?;
            print_fields("Generated", e, Some(e.sid()));
        } else {
            print_fields("Generated", ulid_flake::new()?, None);
        }
    } else if let Some(s) = cli.parse {
        if cli.scalable {
            let e = s.parse::<ScalableUlidFlake>()?;
            print_fields("Parsed", e, Some(e.sid()));
        } else {
            print_fields("Parsed", s.parse::<UlidFlake>()?, None);
        }
    } else {
        Cli::command().print_help()?;
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Builds the configuration draft from the flags; `0` leaves the entropy size at its default.
fn config_builder(cli: &Cli) -> ConfigBuilder {
    let builder = Config::builder().epoch(cli.epoch).sid(cli.sid);
    if cli.entropy != 0 {
        builder.entropy_size(cli.entropy)
    } else {
        builder
    }
}

fn print_fields<L: Layout>(verb: &str, e: FlakeId<L>, sid: Option<i64>) {
    println!("{} Ulid-Flake:", verb);
    println!("  Base32:     {}", e);
    println!("  Integer:    {}", e.to_i64());
    println!("  Timestamp:  {}", e.timestamp());
    println!("  Randomness: {}", e.randomness());
    if let Some(sid) = sid {
        println!("  SID:        {}", sid);
    }
    println!("  Hex:        {}", e.to_hex());
    println!("  Bin:        {}", e.to_bin());
}
