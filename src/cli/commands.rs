// CLI command implementations
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::info;

use opus_headers::utils::io::hex_string;
use opus_headers::{
    read_headers, write_headers, CommentHeader, IdentificationHeader, OggStream, StreamParameters,
};

use crate::cli::{CliError, CliResult, Commands, Config, OutputFormatter};

/// Dispatch the parsed command line
pub fn run(config: &Config) -> CliResult<()> {
    let formatter = OutputFormatter::new(config.format, config.quiet);
    let stdout = io::stdout();
    let mut writer = stdout.lock();

    match &config.command {
        Commands::Write { output, channels, sample_rate, serial } => {
            let params = StreamParameters::new(*channels, *sample_rate);
            let serial = serial.unwrap_or_else(clock_serial);
            command_write(Path::new(output), &params, serial, &formatter)
        }
        Commands::Inspect { files } => command_inspect(files, &formatter, &mut writer),
        Commands::Payload { channels, sample_rate } => {
            let params = StreamParameters::new(*channels, *sample_rate);
            command_payload(&params, &formatter, &mut writer)
        }
    }
}

/// Serial number derived from the wall clock
fn clock_serial() -> u32 {
    let now = chrono::Utc::now();
    (now.timestamp() as u32) ^ now.timestamp_subsec_nanos().rotate_left(16)
}

/// Write the header pages of a new stream to `output`
pub fn command_write(
    output: &Path,
    params: &StreamParameters,
    serial: u32,
    formatter: &OutputFormatter,
) -> CliResult<()> {
    // Build in memory first so a failed write never leaves a partial file
    let mut stream = OggStream::new(serial);
    let mut buffer = Vec::new();
    write_headers(params, &mut stream, &mut buffer)?;

    fs::write(output, &buffer)?;
    info!(path = %output.display(), serial, bytes = buffer.len(), "wrote header pages");

    formatter.print_success(&format!("Wrote OpusHead/OpusTags pages to {}", output.display()));
    formatter.print_info(&format!(
        "channels={} sample_rate={} serial=0x{:08x} bytes={}",
        params.channels,
        params.sample_rate,
        serial,
        buffer.len()
    ));
    Ok(())
}

/// Print a header report for every matching file
pub fn command_inspect(
    files: &[String],
    formatter: &OutputFormatter,
    writer: &mut impl Write,
) -> CliResult<()> {
    if files.is_empty() {
        return Err(CliError::Other("No files specified".to_string()));
    }

    let mut failed = 0usize;
    for path in expand_paths(files)? {
        match inspect_file(&path) {
            Ok(report) => formatter.output_report(&report, writer)?,
            Err(e) => {
                formatter.print_error(&format!("{}: {}", path.display(), e));
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(CliError::Other(format!("{} file(s) could not be inspected", failed)));
    }
    Ok(())
}

fn inspect_file(path: &Path) -> CliResult<serde_json::Value> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    let mut reader = BufReader::new(File::open(path)?);
    let headers = read_headers(&mut reader)?;

    let mut report = serde_json::to_value(&headers)?;
    if let Some(obj) = report.as_object_mut() {
        obj.insert("file".to_string(), path.display().to_string().into());
        obj.insert("opus_head_base64".to_string(), BASE64.encode(&headers.head_packet).into());
        obj.insert("opus_tags_base64".to_string(), BASE64.encode(&headers.tags_packet).into());
    }
    Ok(report)
}

/// Expand glob patterns; plain paths pass through untouched
fn expand_paths(args: &[String]) -> CliResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for arg in args {
        if arg.contains(['*', '?', '[']) {
            for entry in glob::glob(arg)? {
                paths.push(entry.map_err(|e| CliError::IoError(e.into()))?);
            }
        } else {
            paths.push(PathBuf::from(arg));
        }
    }
    Ok(paths)
}

/// Print both header payloads as hex, without page framing
pub fn command_payload(
    params: &StreamParameters,
    formatter: &OutputFormatter,
    writer: &mut impl Write,
) -> CliResult<()> {
    let head = IdentificationHeader::from_params(params).to_bytes()?;
    let tags = CommentHeader::vendor_only().to_bytes()?;

    let report = serde_json::json!({
        "opus_head": hex_string(&head),
        "opus_tags": hex_string(&tags),
    });
    formatter.output_report(&report, writer)
}
