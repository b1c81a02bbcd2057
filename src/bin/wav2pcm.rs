//! wav2pcm CLI - stream WAV files to raw 16-bit PCM
//!
//! A thin command-line front end over the wavstream library.

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use wavstream::{FileSource, WavSession, WriteSink};

#[derive(Parser)]
#[command(name = "wav2pcm")]
#[command(about = "Stream WAV files to raw 16-bit PCM", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the stream parameters of a WAV file
    Info {
        /// Input file path
        input: PathBuf,
    },

    /// Decode a WAV file to headerless little-endian s16 PCM
    Decode {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .init();

    let result = match cli.command {
        Commands::Info { input } => info_command(&input),
        Commands::Decode { input, output } => decode_command(&input, &output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn info_command(input: &PathBuf) -> wavstream::Result<()> {
    let mut source = FileSource::open(input)?;
    let mut sink = wavstream::NullSink::new();
    let mut session = WavSession::new();
    session.begin(&mut source, &mut sink)?;

    let Some(format) = session.format() else {
        return Err(wavstream::Error::invalid_state("no format after begin"));
    };
    println!("format tag:      {:?}", format.format_tag);
    println!("channels:        {}", format.channels);
    println!("sample rate:     {} Hz", format.sample_rate);
    println!("bits per sample: {}", format.bits_per_sample);
    println!("block align:     {}", format.block_align);
    println!("byte rate:       {}", format.byte_rate);

    session.stop();
    Ok(())
}

fn decode_command(input: &PathBuf, output: &PathBuf) -> wavstream::Result<()> {
    let mut source = FileSource::open(input)?;
    let file = File::create(output)?;
    let mut sink = WriteSink::new(BufWriter::new(file));

    let frames = {
        let mut session = WavSession::new();
        session.begin(&mut source, &mut sink)?;
        let frames = session.run()?;
        session.stop();
        frames
    };

    info!("decoded {} frames from {}", frames, input.display());
    Ok(())
}
