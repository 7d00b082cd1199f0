// CLI configuration
use clap::{Parser, Subcommand, ValueEnum};

/// opus-headers - OggOpus header tool
#[derive(Parser, Debug)]
#[command(name = "opus-headers")]
#[command(about = "Write and inspect the OpusHead/OpusTags pages of Ogg Opus streams", long_about = None)]
#[command(version)]
pub struct Config {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub format: OutputFormat,

    /// Quiet mode (suppress progress messages)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (info-level logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Debug mode (debug-level logging)
    #[arg(long, global = true)]
    pub debug: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Pretty,
    /// Compact JSON
    Json,
    /// Key-value pairs
    KeyValue,
    /// Table format
    Table,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the two header pages of a new stream to a file
    Write {
        /// Output file path
        #[arg(value_name = "OUTPUT")]
        output: String,

        /// Channel count written into OpusHead
        #[arg(short, long, default_value_t = 2)]
        channels: u8,

        /// Input sample rate in Hz written into OpusHead
        #[arg(short, long, default_value_t = 48000)]
        sample_rate: u32,

        /// Bitstream serial number (derived from the clock if omitted)
        #[arg(long)]
        serial: Option<u32>,
    },

    /// Show the header pages of existing Ogg Opus file(s)
    Inspect {
        /// File paths or glob patterns (e.g. "*.opus")
        #[arg(value_name = "FILE")]
        files: Vec<String>,
    },

    /// Print the raw header payloads as hex
    Payload {
        /// Channel count written into OpusHead
        #[arg(short, long, default_value_t = 2)]
        channels: u8,

        /// Input sample rate in Hz written into OpusHead
        #[arg(short, long, default_value_t = 48000)]
        sample_rate: u32,
    },
}

impl Config {
    /// Log filter implied by the flags, if logging was requested
    pub fn log_level(&self) -> Option<&'static str> {
        if self.debug {
            Some("debug")
        } else if self.verbose {
            Some("info")
        } else {
            None
        }
    }
}
