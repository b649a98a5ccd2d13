use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use sqlscan::mode::Mode;
use sqlscan::ScanError;

/// sqlscan - A multi-dialect SQL scanner.
/// Tokenizes SQL and audits comments for injection patterns.
#[derive(Parser, Debug)]
#[command(name = "sqlscan", version, about)]
struct Cli {
    /// Files or directories to scan. Use "-" to read from stdin.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// SQL dialect: ansi, mysql, postgresql, sqlite.
    #[arg(short = 'd', long)]
    dialect: Option<String>,

    /// Record comment text while scanning.
    #[arg(long)]
    keep_comments: bool,

    /// Emit comments as tokens instead of skipping them.
    #[arg(long)]
    no_skip_comments: bool,

    /// Treat any comment as a security violation.
    #[arg(long)]
    deny_comments: bool,

    /// Reject comments that contain SQL-looking fragments.
    #[arg(long)]
    safe_comments: bool,

    /// Remove name quotes from aliases.
    #[arg(long)]
    strip_quotes: bool,

    /// Print the input with literals replaced by `?` (stdin only).
    #[arg(long)]
    parameterize: bool,

    /// Glob patterns to exclude.
    #[arg(long)]
    exclude: Vec<String>,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only).
    #[arg(short, long)]
    quiet: bool,

    /// Force color output.
    #[arg(long)]
    force_color: bool,

    /// Disable color output.
    #[arg(long)]
    no_color: bool,

    /// Number of threads for parallel processing (0 = all cores).
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// Disable multi-threaded processing.
    #[arg(long)]
    single_process: bool,

    /// Path to config file (sqlscan.toml or pyproject.toml).
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Layer command-line flags over the loaded configuration.
    fn apply(self, base: Mode) -> (Vec<PathBuf>, bool, Mode) {
        let mode = Mode {
            dialect_name: self.dialect.unwrap_or(base.dialect_name),
            keep_comments: self.keep_comments || base.keep_comments,
            skip_comments: !self.no_skip_comments && base.skip_comments,
            allow_comments: !self.deny_comments && base.allow_comments,
            safe_comments_only: self.safe_comments || base.safe_comments_only,
            strip_name_quotes: self.strip_quotes || base.strip_name_quotes,
            use_insert_columns_cache: base.use_insert_columns_cache,
            exclude: if self.exclude.is_empty() {
                base.exclude
            } else {
                self.exclude
            },
            verbose: self.verbose,
            quiet: self.quiet,
            no_color: self.no_color,
            force_color: self.force_color,
            threads: self.threads.unwrap_or(base.threads),
            single_process: self.single_process || base.single_process,
        };
        (self.files, self.parameterize, mode)
    }
}

fn main() -> ExitCode {
    sqlscan::logging::init_tracing();
    let cli = Cli::parse();

    let base_mode = match sqlscan::load_config(&cli.files, cli.config.as_deref()) {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(2);
        }
    };
    let (files, parameterize, mode) = cli.apply(base_mode);

    let is_stdin = files.len() == 1 && files[0].to_string_lossy() == "-";
    if is_stdin {
        return match scan_stdin(&mode, parameterize) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                let rejected = e
                    .downcast_ref::<ScanError>()
                    .is_some_and(ScanError::is_security);
                ExitCode::from(if rejected { 1 } else { 2 })
            }
        };
    }

    let report = sqlscan::run(&files, &mode);
    let color = mode.color();

    if !mode.quiet {
        if mode.verbose {
            let _ = report.print_results(color);
        }
        eprintln!("{}", report.summary());
    }
    let _ = report.print_errors(color);

    if report.has_errors() {
        ExitCode::from(2)
    } else if report.has_rejections() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

/// Tokenize stdin, printing `line:pos NAME text` per token, or the
/// parameterized SQL.
fn scan_stdin(mode: &Mode, parameterize: bool) -> anyhow::Result<()> {
    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .context("reading stdin")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if parameterize {
        let sql = sqlscan::parameterize(&source, mode.dialect()?);
        write!(out, "{}", sql).context("writing stdout")?;
        return Ok(());
    }

    for record in sqlscan::tokenize(&source, mode)? {
        writeln!(
            out,
            "{}:{} {} {}",
            record.line, record.pos, record.token, record.text
        )
        .context("writing stdout")?;
    }
    Ok(())
}
