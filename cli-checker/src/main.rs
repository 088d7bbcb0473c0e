use clap::Parser;
use cfonb::{
    AccountSummary, CfonbData, DuplicateCriteria, DuplicateStats, ParseError, ParseResult,
    RecordType, find_duplicates,
};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "cli_checker",
    version,
    about = "Проверяет выписку CFONB 120: статистика, балансы, возможные дубликаты.",
    long_about = None,
)]
struct Args {
    /// Входной файл CFONB
    #[arg(long)]
    input: PathBuf,

    /// Не сравнивать дату проводки
    #[arg(long)]
    no_date: bool,

    /// Не сравнивать сумму
    #[arg(long)]
    no_amount: bool,

    /// Не сравнивать описание
    #[arg(long)]
    no_label: bool,

    /// Не сравнивать счёт
    #[arg(long)]
    no_account: bool,

    /// Сравнивать ещё и код операции
    #[arg(long)]
    operation_code: bool,
}

impl Args {
    fn criteria(&self) -> DuplicateCriteria {
        DuplicateCriteria {
            date: !self.no_date,
            amount: !self.no_amount,
            label: !self.no_label,
            account: !self.no_account,
            operation_code: self.operation_code,
        }
    }
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

fn print_stats(result: &ParseResult) {
    let stats = result.stats();

    println!("Строк: {}", stats.total_lines);
    for record_type in RecordType::ALL {
        println!("  {record_type}: {}", stats.count_of(record_type));
    }
    println!("Ошибок разбора: {}", stats.errors);
}

fn print_errors(result: &ParseResult) {
    if result.errors().is_empty() {
        println!("Ошибок нет");
        return;
    }

    println!("Ошибки:");
    for err in result.errors() {
        println!("  {err}");
    }
}

fn print_accounts(result: &ParseResult) {
    println!("Счета:");
    for account in result.accounts() {
        println!("  {}", AccountSummary::new(&account, result.records()));
    }
}

fn print_duplicates(result: &ParseResult, criteria: &DuplicateCriteria) {
    let groups = find_duplicates(result.records(), criteria);
    let stats = DuplicateStats::new(result.records(), &groups);

    let names: Vec<&str> = criteria.enabled().into_iter().map(|c| c.label()).collect();
    println!("Критерии дубликатов: {}", names.join(", "));
    println!(
        "Операций: {}, в группах: {}, групп: {}, без дубликатов: {}",
        stats.total_movements, stats.duplicate_records, stats.groups, stats.clean_records,
    );

    for group in &groups {
        println!("Группа ({} записей):", group.len());
        for (role, record) in group.members() {
            println!("  {:<12} {record}", role.to_string());
        }
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

    print_stats(&result);
    print_errors(&result);
    print_accounts(&result);
    print_duplicates(&result, &args.criteria());

    Ok(())
}
