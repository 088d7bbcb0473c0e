mod decoder;
mod utils;

use std::io::Read;

use crate::error::{FormatError, ParseError};
use crate::model::{LineError, LineErrorKind, ParseResult, Record, Stats};
use crate::sniffer::detect_foreign_format;
use crate::validation::validate_balances;
pub use decoder::decode_line;
use utils::decode_latin1;

/// Непустая строка файла вместе с её номером
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfonbLine {
    /// номер строки, считаются только непустые строки
    pub number: usize,
    /// строка как есть, включая возможный '\r'
    pub text: String,
}

/// Структура с сырыми строками файла CFONB 120.
///
/// Для чтения используйте [`CfonbData::parse`] или [`CfonbData::parse_str`],
/// разбор строк в записи - через `ParseResult::from(data)`.
///
/// Пример:
/// ```rust,no_run
/// use std::fs::File;
/// use cfonb::{CfonbData, ParseResult};
/// # use cfonb::ParseError;
/// # fn main() -> Result<(), ParseError> {
/// let file = File::open("releve.cfonb")?;
/// let data = CfonbData::parse(file)?;
/// let result = ParseResult::from(data);
/// println!("{} records", result.records().len());
/// #     Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CfonbData {
    pub lines: Vec<CfonbLine>,
}

impl CfonbData {
    /// Читает байты из reader, декодирует их как ISO-8859-1 и отбирает непустые строки
    ///
    /// При ошибке чтения или неподходящем формате возвращает [`ParseError`]
    pub fn parse<R: Read>(mut reader: R) -> Result<Self, ParseError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        let content = decode_latin1(&bytes);
        Ok(Self::parse_str(&content)?)
    }

    /// То же, что [`CfonbData::parse`], для уже декодированного текста
    pub fn parse_str(content: &str) -> Result<Self, FormatError> {
        detect_foreign_format(content)?;

        let lines: Vec<CfonbLine> = content
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(idx, line)| CfonbLine {
                number: idx + 1,
                text: line.to_string(),
            })
            .collect();

        if lines.is_empty() {
            return Err(FormatError::Empty);
        }

        Ok(CfonbData { lines })
    }
}

impl From<CfonbData> for ParseResult {
    fn from(data: CfonbData) -> Self {
        let mut records: Vec<Record> = Vec::with_capacity(data.lines.len());
        let mut errors: Vec<LineError> = Vec::new();
        let mut stats = Stats {
            total_lines: data.lines.len(),
            ..Stats::default()
        };

        for line in data.lines {
            match decode_line(&line.text, line.number) {
                Ok(record) => {
                    stats.count(record.record_type());
                    records.push(record);
                }
                Err(err) => {
                    tracing::debug!(line = line.number, error = %err, "skipped line");
                    stats.errors += 1;
                    errors.push(LineError {
                        line_number: line.number,
                        line: line.text.trim_end_matches('\r').to_string(),
                        kind: LineErrorKind::Decode(err),
                    });
                }
            }
        }

        // расхождения балансов не входят в stats.errors
        errors.extend(validate_balances(&records));

        tracing::info!(
            lines = stats.total_lines,
            records = records.len(),
            errors = errors.len(),
            "parsed CFONB file"
        );

        ParseResult::new(records, stats, errors)
    }
}

/// Разбирает содержимое файла целиком: проверка формата, строки, балансы
pub fn parse_cfonb(content: &str) -> Result<ParseResult, ParseError> {
    let data = CfonbData::parse_str(content)?;
    Ok(ParseResult::from(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordType;
    use crate::utils::test_support::{balance_line, movement_line};
    use std::io::Cursor;

    #[test]
    fn blank_lines_are_not_numbered() {
        let content = format!(
            "\n{}\n   \n{}\n\n",
            balance_line("01", "010125", 10000),
            movement_line("020125", "VIR", 5000),
        );
        let data = CfonbData::parse_str(&content).unwrap();

        assert_eq!(data.lines.len(), 2);
        assert_eq!(data.lines[0].number, 1);
        assert_eq!(data.lines[1].number, 2);
    }

    #[test]
    fn empty_input_is_a_format_error() {
        assert_eq!(CfonbData::parse_str("").unwrap_err(), FormatError::Empty);
        assert_eq!(CfonbData::parse_str("\n  \n\r\n").unwrap_err(), FormatError::Empty);
    }

    #[test]
    fn xml_is_rejected_before_decoding() {
        let content = format!(
            "<?xml version=\"1.0\"?>\n{}",
            balance_line("01", "010125", 10000)
        );
        let err = parse_cfonb(&content).unwrap_err();
        assert!(matches!(err, ParseError::Format(FormatError::Xml)));
    }

    #[test]
    fn bad_lines_are_isolated() {
        let content = format!(
            "{}\n{}\nTOO SHORT\n{}\n",
            balance_line("01", "010125", 10000),
            balance_line("99", "010125", 0),
            movement_line("020125", "VIR", 5000),
        );
        let result = parse_cfonb(&content).unwrap();

        assert_eq!(result.records().len(), 2);
        assert_eq!(result.stats().total_lines, 4);
        assert_eq!(result.stats().errors, 2);
        assert_eq!(result.stats().count_of(RecordType::OldBalance), 1);
        assert_eq!(result.stats().count_of(RecordType::Movement), 1);

        let lines: Vec<usize> = result.errors().iter().map(|e| e.line_number).collect();
        assert_eq!(lines, vec![2, 3]);
        assert_eq!(result.errors()[0].message(), "unknown record type: 99");
        assert_eq!(result.errors()[1].line, "TOO SHORT");

        // записи идут в порядке строк
        assert_eq!(result.records()[1].line_number, 4);
    }

    #[test]
    fn crlf_lines_are_accepted() {
        let content = format!(
            "{}\r\n{}\r\n",
            balance_line("01", "010125", 10000),
            movement_line("020125", "VIR", 5000),
        );
        let result = parse_cfonb(&content).unwrap();

        assert_eq!(result.records().len(), 2);
        assert!(result.errors().is_empty());
        assert!(!result.records()[0].raw_line.ends_with('\r'));
    }

    #[test]
    fn reader_input_is_decoded_as_latin1() {
        let line = movement_line("020125", "CB CAFE", -350).replace("CAFE", "CAF\u{00C9}");
        let mut bytes: Vec<u8> = line.chars().map(|c| c as u8).collect();
        bytes.push(b'\n');

        let data = CfonbData::parse(Cursor::new(bytes)).unwrap();
        let result = ParseResult::from(data);

        assert!(result.errors().is_empty(), "{:?}", result.errors());
        assert_eq!(result.records()[0].label(), "CB CAFÉ");
    }

    #[test]
    fn euro_sign_and_apostrophe_survive_reader_decoding() {
        // '#' и '\'' заменяются байтами 0x80 и 0x92
        let line = movement_line("020125", "FRAIS 10 # COMPTE L'AGENCE", -1000);
        let mut bytes: Vec<u8> = line
            .chars()
            .map(|c| match c {
                '#' => 0x80,
                '\'' => 0x92,
                c => c as u8,
            })
            .collect();
        bytes.push(b'\n');

        let result = ParseResult::from(CfonbData::parse(Cursor::new(bytes)).unwrap());

        assert!(result.errors().is_empty(), "{:?}", result.errors());
        assert_eq!(result.records()[0].label(), "FRAIS 10 € COMPTE L’AGENCE");
    }

    #[test]
    fn non_digit_amount_skips_only_that_line() {
        let bad = movement_line("030125", "CB INCONNU", -700).replace("0000000000070}", "00000X0000070}");
        let content = format!(
            "{}\n{}\n{}\n",
            balance_line("01", "010125", 10000),
            bad,
            movement_line("040125", "VIR RECU", 5000),
        );
        let result = parse_cfonb(&content).unwrap();

        assert_eq!(result.records().len(), 2);
        assert_eq!(result.stats().errors, 1);
        assert_eq!(result.stats().count_of(RecordType::Movement), 1);
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].line_number, 2);
        assert!(matches!(
            result.errors()[0].kind,
            LineErrorKind::Decode(crate::error::DecodeError::InvalidAmount { .. })
        ));
        assert_eq!(result.records()[1].line_number, 3);
        assert_eq!(result.records()[1].label(), "VIR RECU");
    }
}
