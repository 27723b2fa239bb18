use std::borrow::Cow;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use hex_to_ascii::logging::{init_logger_with_level, level_for_verbosity, log_error, log_warn};
use hex_to_ascii::config::DEFAULT_FIELD;
use hex_to_ascii::{log_info, Event, FilterConfig, FilterOutcome, HexToAsciiFilter};

/// Decode prefixed hex values in log lines read from stdin.
///
/// Example, decoding the `cmd=` value emitted by auditd:
///
///   echo 'msg=cwd="/" cmd=2F62696E2F66696E64 res=success' | hex-to-ascii --prefix cmd=
#[derive(Parser)]
#[command(name = "hex-to-ascii")]
#[command(about = "Decode prefixed hex-encoded values in log lines")]
struct Cli {
    /// JSON filter configuration; command-line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Field to operate on in --json mode
    #[arg(short, long, requires = "json")]
    field: Option<String>,

    /// Literal marker preceding a hex run
    #[arg(short, long)]
    prefix: Option<String>,

    /// Keep the prefix in front of decoded values
    #[arg(short, long)]
    keep_prefix: bool,

    /// Tag to add to each filtered event in --json mode (repeatable)
    #[arg(long = "add-tag", requires = "json")]
    add_tag: Vec<String>,

    /// Treat each input line as a JSON event instead of a plain message
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn filter_config(&self) -> Result<FilterConfig> {
        let mut config = match &self.config {
            Some(path) => FilterConfig::from_path(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => FilterConfig::default(),
        };
        if let Some(field) = &self.field {
            config.field = field.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.prefix = prefix.clone();
        }
        if self.keep_prefix {
            config.remove_prefix = false;
        }
        config.add_tag.extend(self.add_tag.iter().cloned());
        Ok(config)
    }

    fn build_filter(&self) -> Result<HexToAsciiFilter> {
        let config = self.filter_config()?;
        if !self.json && (config.field != DEFAULT_FIELD || !config.add_tag.is_empty()) {
            log_warn("'field' and 'add_tag' only apply with --json; plain lines are decoded whole");
        }
        HexToAsciiFilter::new(config).context("invalid filter configuration")
    }
}

/// Counters reported once all input has been read.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct RunStats {
    lines: usize,
    substituted: usize,
    /// Lines that were not valid UTF-8 and were decoded lossily.
    lossy: usize,
    /// `--json` lines that were not events and were written back unchanged.
    passed_through: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger_with_level(level_for_verbosity(cli.verbose));

    match execute(&cli) {
        Ok(stats) => {
            log_info(&format!(
                "Processed {} lines, {} hex values decoded, {} lossy, {} passed through",
                stats.lines, stats.substituted, stats.lossy, stats.passed_through
            ));
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &Cli) -> Result<RunStats> {
    let filter = cli.build_filter()?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    run(&filter, cli.json, stdin.lock(), BufWriter::new(stdout.lock()))
}

/// Filter every line of `input` into `output`.
///
/// Lines are split on `\n` (a trailing `\r` is dropped). Bytes that are not
/// valid UTF-8 are replaced with U+FFFD so the rest of the line still decodes.
fn run<R: BufRead, W: Write>(
    filter: &HexToAsciiFilter,
    json: bool,
    mut input: R,
    mut output: W,
) -> Result<RunStats> {
    let mut stats = RunStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf).context("failed to read input")? == 0 {
            break;
        }
        stats.lines += 1;

        let raw = trim_line_ending(&buf);
        let line = String::from_utf8_lossy(raw);
        if matches!(line, Cow::Owned(_)) {
            log_warn(&format!("line {}: invalid UTF-8, replacing undecodable bytes", stats.lines));
            stats.lossy += 1;
        }

        let rendered = if json {
            match Event::from_json_str(&line) {
                Ok(mut event) => {
                    if let FilterOutcome::Decoded { substitutions } = filter.apply(&mut event) {
                        stats.substituted += substitutions;
                    }
                    Cow::Owned(event.to_json_string()?)
                }
                Err(e) => {
                    log_warn(&format!("line {}: {e}; passing through unchanged", stats.lines));
                    stats.passed_through += 1;
                    line
                }
            }
        } else {
            let result = filter.decoder().decode(&line);
            stats.substituted += result.substitutions;
            Cow::Owned(result.into_string())
        };

        writeln!(output, "{rendered}").context("failed to write output")?;
    }

    output.flush().context("failed to flush output")?;
    Ok(stats)
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
