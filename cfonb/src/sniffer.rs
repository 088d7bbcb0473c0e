use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FormatError;

static CSV_DELIMITER_RE: Lazy<Regex> = Lazy::new(|| {
    // запятая или точка с запятой
    Regex::new(r"[,;]").unwrap()
});

/// Минимальное количество полей, после которого строка считается CSV
const CSV_MIN_FIELDS: usize = 6;

/// Отсекает файлы, которые явно не CFONB: XML, JSON, CSV.
///
/// Эвристика нужна только для понятного сообщения об ошибке,
/// настоящая проверка строк происходит при разборе.
pub fn detect_foreign_format(content: &str) -> Result<(), FormatError> {
    let trimmed = content.trim();

    // "<?xml" тоже начинается с '<'
    if trimmed.starts_with('<') {
        return Err(FormatError::Xml);
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Err(FormatError::Json);
    }

    if let Some(first_line) = content.lines().find(|l| !l.trim().is_empty())
        && first_line.contains(',')
        && first_line.contains(';')
        && CSV_DELIMITER_RE.split(first_line).count() >= CSV_MIN_FIELDS
    {
        return Err(FormatError::Csv);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_support::{balance_line, movement_line};

    #[test]
    fn rejects_xml() {
        let content = "<?xml version=\"1.0\"?>\n<Document></Document>";
        assert_eq!(detect_foreign_format(content), Err(FormatError::Xml));
        assert_eq!(detect_foreign_format("  <Document/>"), Err(FormatError::Xml));
    }

    #[test]
    fn rejects_json() {
        assert_eq!(detect_foreign_format("{\"a\": 1}"), Err(FormatError::Json));
        assert_eq!(detect_foreign_format("\n[1, 2]"), Err(FormatError::Json));
    }

    #[test]
    fn rejects_csv_with_mixed_delimiters() {
        let content = "date;label;amount,currency;account;bank\n01/01/2025;X;1,00;EUR;1;2";
        assert_eq!(detect_foreign_format(content), Err(FormatError::Csv));
    }

    #[test]
    fn short_delimited_line_is_not_csv() {
        // только 4 поля
        assert_eq!(detect_foreign_format("a,b;c,d"), Ok(()));
        // нет точки с запятой
        assert_eq!(detect_foreign_format("a,b,c,d,e,f,g"), Ok(()));
    }

    #[test]
    fn accepts_cfonb_content() {
        let content = format!(
            "{}\n{}\n",
            balance_line("01", "010125", 10000),
            movement_line("020125", "VIR SEPA M. DUPONT, LOYER; JANV", 5000),
        );
        assert_eq!(detect_foreign_format(&content), Ok(()));
    }
}
