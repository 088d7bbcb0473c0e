use std::io::Write;

use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};

use crate::error::ParseError;

/// BOM, чтобы Excel открывал файл как UTF-8
const UTF8_BOM: &str = "\u{FEFF}";

/// Пишет BOM и создаёт csv-writer без автоматических кавычек.
///
/// Кавычки у текстовых полей расставляются явно через [`quoted`].
pub(super) fn bom_writer<W: Write>(mut writer: W, delimiter: u8) -> Result<Writer<W>, ParseError> {
    writer.write_all(UTF8_BOM.as_bytes())?;

    Ok(WriterBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer))
}

/// Заключает текст в двойные кавычки, удваивая кавычки внутри
pub(super) fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_and_escapes_text() {
        assert_eq!(quoted("VIR SEPA"), "\"VIR SEPA\"");
        assert_eq!(quoted("SAY \"HI\""), "\"SAY \"\"HI\"\"\"");
        assert_eq!(quoted(""), "\"\"");
    }

    #[test]
    fn writer_starts_with_bom() {
        let mut buf: Vec<u8> = Vec::new();
        {
            let mut wtr = bom_writer(&mut buf, b';').unwrap();
            wtr.write_record(["a", "b"]).unwrap();
            wtr.flush().unwrap();
        }
        assert_eq!(buf, "\u{FEFF}a;b\n".as_bytes());
    }
}
