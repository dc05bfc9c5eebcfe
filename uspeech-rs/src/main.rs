//! UniversalSpeech CLI
//!
//! Command-line interface for speech and braille output through whichever
//! screen reader UniversalSpeech finds.

use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use universal_speech::loader::{self, LIB_DIR_ENV};
use universal_speech::params::parse_param;
use universal_speech::{Loader, Prosody, SpeechBackend, SpeechError, UniversalSpeech};

#[derive(Parser)]
#[command(name = "uspeech")]
#[command(about = "Speech and braille output through UniversalSpeech")]
#[command(version)]
struct Cli {
    /// Folder holding the lib/lib64 dll folders (defaults to the executable's folder)
    #[arg(long, global = true, env = LIB_DIR_ENV)]
    lib_dir: Option<PathBuf>,

    /// Never fall back to the native speech engines (SAPI)
    #[arg(long, global = true)]
    no_native_speech: bool,

    /// More log output (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify that the dll files are in place without loading them
    Check,

    /// List the engines UniversalSpeech knows about
    Engines {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the active engine and what it supports
    Status,

    /// Speak text
    Say {
        /// Text to speak
        text: String,

        /// Queue after the current utterance instead of cutting it off
        #[arg(long)]
        no_interrupt: bool,

        /// Speak only the first letter
        #[arg(long)]
        first_letter: bool,

        /// Also show the text on the braille display
        #[arg(long)]
        braille: bool,

        /// Return immediately instead of waiting for speech to finish
        #[arg(long)]
        no_wait: bool,
    },

    /// Show text on the braille display
    Braille {
        /// Text to display
        text: String,
    },

    /// Stop speaking
    Stop,

    /// Read a numeric parameter (name such as `rate` or `engine_available+1`, or a number)
    Get { param: String },

    /// Write a numeric parameter
    Set {
        param: String,
        #[arg(allow_negative_numbers = true)]
        value: i32,
    },

    /// Read a string parameter (e.g. `engine+0`, `voice+2`)
    GetString { param: String },

    /// Show or set the speech rate
    Rate(ProsodyArgs),

    /// Show or set the speech volume
    Volume(ProsodyArgs),

    /// Show or set the speech pitch
    Pitch(ProsodyArgs),

    /// Show or set the speech inflexion
    Inflexion(ProsodyArgs),

    /// List the voices of the active engine, or select one
    Voices {
        /// Index of the voice to select
        #[arg(long)]
        select: Option<i32>,
    },

    /// Select the engine to use
    UseEngine {
        /// Engine id as listed by `engines`
        #[arg(required_unless_present = "auto", conflicts_with = "auto")]
        id: Option<i32>,

        /// Let UniversalSpeech pick the engine
        #[arg(long)]
        auto: bool,
    },
}

#[derive(Args)]
struct ProsodyArgs {
    /// New value (omit to print the current value and range)
    #[arg(allow_negative_numbers = true)]
    value: Option<i32>,

    /// Lower bound of the allowed range
    #[arg(long, allow_negative_numbers = true, requires = "value")]
    min: Option<i32>,

    /// Upper bound of the allowed range
    #[arg(long, allow_negative_numbers = true, requires = "value")]
    max: Option<i32>,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn param(name: &str) -> Result<i32, Box<dyn Error>> {
    parse_param(name).ok_or_else(|| format!("Unknown parameter: {}", name).into())
}

fn check(loader: &Loader) -> Result<(), Box<dyn Error>> {
    println!("Looking for UniversalSpeech in {}", loader.lib_dir().display());
    match loader.check() {
        Ok(path) => {
            println!("All files present ({}).", path.display());
            Ok(())
        }
        Err(SpeechError::MissingFiles { files, .. }) => {
            for file in &files {
                println!("  missing: {}", file);
            }
            Err(format!("{} of {} files missing", files.len(), loader::REQUIRED_FILES.len()).into())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg_attr(not(windows), allow(dead_code))]
fn print_status<B: SpeechBackend>(speech: &UniversalSpeech<B>) {
    match speech.engine_used() {
        Ok(name) => println!("Engine: {}", name),
        Err(_) => println!("Engine: (none)"),
    }
    println!(
        "Native speech: {}",
        if speech.native_speech_enabled() { "enabled" } else { "disabled" }
    );
    for prosody in Prosody::ALL {
        match (speech.prosody(prosody), speech.range(prosody)) {
            (Ok(value), Ok((min, max))) => {
                println!("  {:<10} {} (range {}..{})", prosody, value, min, max)
            }
            _ => println!("  {:<10} not supported", prosody),
        }
    }
}

#[cfg_attr(not(windows), allow(dead_code))]
fn prosody<B: SpeechBackend>(
    speech: &UniversalSpeech<B>,
    prosody: Prosody,
    args: ProsodyArgs,
) -> Result<(), Box<dyn Error>> {
    match args.value {
        Some(value) => speech.set_prosody(prosody, value, args.min, args.max)?,
        None => {
            let value = speech.prosody(prosody)?;
            let (min, max) = speech.range(prosody)?;
            println!("{} (range {}..{})", value, min, max);
        }
    }
    Ok(())
}

#[cfg_attr(not(windows), allow(dead_code))]
fn run<B: SpeechBackend>(
    speech: &mut UniversalSpeech<B>,
    command: Commands,
    native_speech: bool,
) -> Result<(), Box<dyn Error>> {
    if !native_speech {
        speech.enable_native_speech(false);
    }

    match command {
        Commands::Check => unreachable!("handled before loading"),

        Commands::Engines { json } => {
            let engines = speech.get_engines();
            if json {
                println!("{}", serde_json::to_string_pretty(&engines)?);
            } else if engines.is_empty() {
                println!("No engines reported by UniversalSpeech.");
            } else {
                println!("{:<4} {:<30} {}", "Id", "Name", "Available");
                println!("{:-<46}", "");
                for engine in engines {
                    println!(
                        "{:<4} {:<30} {}",
                        engine.id,
                        engine.name,
                        if engine.available { "yes" } else { "no" }
                    );
                }
            }
        }

        Commands::Status => print_status(speech),

        Commands::Say {
            text,
            no_interrupt,
            first_letter,
            braille,
            no_wait,
        } => {
            let interrupt = !no_interrupt;
            if first_letter {
                speech.say_first_letter(&text, interrupt);
            } else {
                speech.say(&text, interrupt);
            }
            if braille {
                speech.braille(&text)?;
            }
            if !no_wait {
                // Speech through SAPI ends with the process
                if let Err(e) = speech.wait() {
                    debug!("not waiting: {}", e);
                }
            }
        }

        Commands::Braille { text } => speech.braille(&text)?,

        Commands::Stop => speech.stop(),

        Commands::Get { param: name } => println!("{}", speech.get_value(param(&name)?)?),

        Commands::Set { param: name, value } => speech.set_value(param(&name)?, value)?,

        Commands::GetString { param: name } => println!("{}", speech.get_string(param(&name)?)?),

        Commands::Rate(args) => prosody(speech, Prosody::Rate, args)?,
        Commands::Volume(args) => prosody(speech, Prosody::Volume, args)?,
        Commands::Pitch(args) => prosody(speech, Prosody::Pitch, args)?,
        Commands::Inflexion(args) => prosody(speech, Prosody::Inflexion, args)?,

        Commands::Voices { select } => match select {
            Some(index) => speech.set_voice(index),
            None => {
                let voices = speech.get_voices();
                if voices.is_empty() {
                    println!("The current engine does not list any voices.");
                }
                for (i, voice) in voices.iter().enumerate() {
                    println!("{:>3}  {}", i, voice);
                }
            }
        },

        Commands::UseEngine { id, auto } => {
            if auto {
                speech.set_auto_engine(true);
            } else if let Some(id) = id {
                speech.set_auto_engine(false);
                speech.set_engine(id);
            }
        }
    }

    Ok(())
}

#[cfg(windows)]
fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let loader = cli.lib_dir.map(Loader::with_dir).unwrap_or_default();
    if let Commands::Check = cli.command {
        return check(&loader);
    }

    let mut speech = UniversalSpeech::from_loader(&loader)?;
    run(&mut speech, cli.command, !cli.no_native_speech)
}

#[cfg(not(windows))]
fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let loader = cli.lib_dir.map(Loader::with_dir).unwrap_or_default();
    if let Commands::Check = cli.command {
        return check(&loader);
    }

    eprintln!("UniversalSpeech is a Windows library; only `check` works on this platform.");
    std::process::exit(1);
}
