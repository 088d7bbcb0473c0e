use clap::{Parser, ValueEnum};
use cfonb::{AccountKey, CfonbData, ParseError, ParseResult, write_csv, write_limpeed};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;


#[derive(Parser, Debug)]
#[command(
    name = "cli_converter",
    version,
    about = "Конвертирует выписки CFONB 120 в CSV.",
    long_about = None,
)]
struct Args {
    /// Входной файл CFONB
    #[arg(long)]
    input: PathBuf,

    /// Формат выходного файла
    #[arg(long, value_enum, default_value = "csv")]
    output_format: Format,

    /// Экспортировать только один счёт, в виде BANK-BRANCH-ACCOUNT
    #[arg(long)]
    account: Option<AccountKey>,
}

/// Поддерживаемые форматы для CLI
#[derive(Copy, Clone, Debug, ValueEnum)]
enum Format {
    /// общий CSV со всеми записями
    Csv,
    /// CSV для LIMPEED, только операции
    Limpeed,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), ParseError> {
    let args = Args::parse();

    if !args.input.exists() {
        eprintln!("input file does not exist: {}", args.input.display());
        process::exit(1)
    }

    let file = File::open(&args.input)?;
    let result = ParseResult::from(CfonbData::parse(io::BufReader::new(file))?);

    for err in result.errors() {
        eprintln!("{err}");
    }

    let records = match &args.account {
        Some(account) => result.records_for_account(account),
        None => result.records().iter().collect(),
    };

    if records.is_empty() {
        return Err(ParseError::BadInput("no records to export".into()));
    }

    let stdout = io::stdout();
    let handle = stdout.lock();

    match args.output_format {
        Format::Csv => write_csv(records, handle)?,
        Format::Limpeed => write_limpeed(records, handle)?,
    }

    Ok(())
}
