use std::{error::Error, io::Error as IoError, fmt};

/// Фатальные ошибки разбора: файл целиком не является выпиской CFONB
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// содержимое похоже на XML (например, camt.053)
    #[error("XML content detected: only CFONB 120/121 fixed-width statements are supported")]
    Xml,
    /// содержимое похоже на JSON
    #[error("JSON content detected: only CFONB 120/121 fixed-width statements are supported")]
    Json,
    /// содержимое похоже на CSV с разделителями
    #[error("CSV content detected: only CFONB 120/121 fixed-width statements are supported")]
    Csv,
    /// в файле нет ни одной непустой строки
    #[error("the file is empty or contains no valid line")]
    Empty,
}

/// Ошибки разбора одной строки.
///
/// Не прерывают разбор файла: строка попадает в список ошибок и пропускается.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// длина строки не 120 и не 121 символ
    #[error("invalid length: {actual} characters instead of 120")]
    InvalidLength { actual: usize },
    /// код записи не 01/04/05/07
    #[error("unknown record type: {code}")]
    UnknownRecordType { code: String },
    /// поле суммы не раскодировалось в число
    #[error("invalid amount: '{raw}'")]
    InvalidAmount { raw: String },
}

/// Ошибки уровня библиотеки
#[derive(Debug)]
pub enum ParseError {
    // обёртки

    /// обёртка csv::Error
    Csv(csv::Error),
    /// обёртка std::io::Error
    Io(IoError),
    /// входной файл не CFONB
    Format(FormatError),

    // логические ошибки

    /// строка счёта не в формате BANK-BRANCH-ACCOUNT
    InvalidAccountKey(String),
    /// очень общая ошибка плохих входных данных
    BadInput(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Csv(e) => write!(f, "CSV error: {e}"),
            ParseError::Io(e) => write!(f, "io error: {e}"),
            ParseError::Format(e) => write!(f, "unsupported format: {e}"),
            ParseError::InvalidAccountKey(s) => {
                write!(f, "invalid account key (expected BANK-BRANCH-ACCOUNT): {s}")
            }
            ParseError::BadInput(msg) => write!(f, "bad input: {msg}"),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParseError::Csv(e) => Some(e),
            ParseError::Io(e) => Some(e),
            ParseError::Format(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IoError> for ParseError {
    fn from(e: IoError) -> Self {
        ParseError::Io(e)
    }
}

impl From<csv::Error> for ParseError {
    fn from(e: csv::Error) -> Self {
        ParseError::Csv(e)
    }
}

impl From<FormatError> for ParseError {
    fn from(e: FormatError) -> Self {
        ParseError::Format(e)
    }
}
