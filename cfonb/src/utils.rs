use lazy_regex::regex_is_match;

use crate::error::DecodeError;
use crate::model::{Amount, IsoDate};

/// Знак и последняя цифра, закодированные одним символом
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Overpunch {
    pub symbol: char,
    /// +1 или -1
    pub sign: i8,
    pub digit: char,
}

const fn op(symbol: char, sign: i8, digit: char) -> Overpunch {
    Overpunch { symbol, sign, digit }
}

/// Таблица замены последнего символа суммы
pub(crate) static OVERPUNCH_TABLE: [Overpunch; 20] = [
    op('{', 1, '0'),
    op('A', 1, '1'),
    op('B', 1, '2'),
    op('C', 1, '3'),
    op('D', 1, '4'),
    op('E', 1, '5'),
    op('F', 1, '6'),
    op('G', 1, '7'),
    op('H', 1, '8'),
    op('I', 1, '9'),
    op('}', -1, '0'),
    op('J', -1, '1'),
    op('K', -1, '2'),
    op('L', -1, '3'),
    op('M', -1, '4'),
    op('N', -1, '5'),
    op('O', -1, '6'),
    op('P', -1, '7'),
    op('Q', -1, '8'),
    op('R', -1, '9'),
];

fn lookup_overpunch(symbol: char) -> Option<&'static Overpunch> {
    OVERPUNCH_TABLE.iter().find(|o| o.symbol == symbol)
}

/// Раскодирует сумму CFONB в "центы".
///
/// Последний символ несёт и знак, и последнюю цифру: "0000000000500{" = +50.00,
/// "0000000000200}" = -20.00. Символ вне таблицы считается обычной цифрой со знаком "+".
/// Пустое поле - это 0.
pub fn decode_amount(raw: &str) -> Result<Amount, DecodeError> {
    if raw.trim().is_empty() {
        return Ok(0);
    }

    let invalid = || DecodeError::InvalidAmount { raw: raw.to_string() };

    let mut chars = raw.chars();
    // raw точно не пустая строка
    let last = chars.next_back().ok_or_else(invalid)?;
    let base = chars.as_str();

    let (sign, digit) = match lookup_overpunch(last) {
        Some(o) => (o.sign, o.digit),
        None => (1, last),
    };

    let digits = format!("{base}{digit}");
    if !regex_is_match!(r"^[0-9]+$", &digits) {
        return Err(invalid());
    }

    let value: Amount = digits.parse().map_err(|_| invalid())?;

    Ok(value * Amount::from(sign))
}

/// Переводит дату DDMMYY в YYYY-MM-DD.
///
/// Годы 00-49 считаются 2000-ми, 50-99 - 1900-ми.
/// День и месяц не проверяются. Поле не из 6 символов или из одних пробелов даёт `None`.
pub fn normalize_date(raw: &str) -> Option<IsoDate> {
    if raw.chars().count() != 6 || raw.trim().is_empty() {
        return None;
    }

    let chars: Vec<char> = raw.chars().collect();
    let day: String = chars[0..2].iter().collect();
    let month: String = chars[2..4].iter().collect();
    let yy: String = chars[4..6].iter().collect();

    // нечисловой год уходит в 1900-е
    let century = match yy.parse::<u32>() {
        Ok(y) if y <= 49 => "20",
        _ => "19",
    };

    Some(IsoDate::new(format!("{century}{yy}-{month}-{day}")))
}

/// Форматирует целочисленное значение (центы) в человекочитаемый формат, без знака
pub(crate) fn format_minor_units<T>(value: T, decimal_separator: char) -> String
where
    T: Into<i128>,
{
    let v: i128 = value.into();
    let v = v.unsigned_abs();
    let units = v / 100;
    let frac = v % 100;

    format!("{units}{decimal_separator}{frac:02}")
}

/// То же, что [`format_minor_units`], но с минусом для отрицательных значений
pub(crate) fn format_signed_minor_units<T>(value: T, decimal_separator: char) -> String
where
    T: Into<i128>,
{
    let v: i128 = value.into();
    let abs = format_minor_units(v, decimal_separator);
    if v < 0 { format!("-{abs}") } else { abs }
}


#[cfg(test)]
mod tests {
    use super::test_support::encode_amount;
    use super::*;

    #[test]
    fn decodes_positive_and_negative_amounts() {
        assert_eq!(decode_amount("0000000000500{").unwrap(), 5000);
        assert_eq!(decode_amount("0000000000200}").unwrap(), -2000);
        assert_eq!(decode_amount("0000000012345H").unwrap(), 1_234_58);
        assert_eq!(decode_amount("0000000012345M").unwrap(), -1_234_54);
    }

    #[test]
    fn every_overpunch_symbol_roundtrips() {
        for o in OVERPUNCH_TABLE {
            let digit = o.digit.to_digit(10).unwrap() as Amount;
            let cents = (12_345_670 + digit) * Amount::from(o.sign);

            let field = encode_amount(cents);
            assert_eq!(field.len(), 14);
            assert!(field.ends_with(o.symbol), "field {field} should end with {}", o.symbol);
            assert_eq!(decode_amount(&field).unwrap(), cents, "symbol {}", o.symbol);
        }
    }

    #[test]
    fn unmapped_last_char_is_a_positive_digit() {
        assert_eq!(decode_amount("00000000001234").unwrap(), 1234);
    }

    #[test]
    fn blank_amount_is_zero() {
        assert_eq!(decode_amount("").unwrap(), 0);
        assert_eq!(decode_amount("              ").unwrap(), 0);
    }

    #[test]
    fn non_digit_amount_is_rejected() {
        let err = decode_amount("00000X0000500{").unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidAmount {
                raw: "00000X0000500{".into()
            }
        );

        assert!(decode_amount("0000000000500Z").is_err());
    }

    #[test]
    fn normalizes_dates_with_century_inference() {
        assert_eq!(normalize_date("010125").unwrap().as_str(), "2025-01-01");
        assert_eq!(normalize_date("010170").unwrap().as_str(), "1970-01-01");
        assert_eq!(normalize_date("311249").unwrap().as_str(), "2049-12-31");
        assert_eq!(normalize_date("010150").unwrap().as_str(), "1950-01-01");
    }

    #[test]
    fn date_components_are_not_range_checked() {
        let date = normalize_date("321325").unwrap();
        assert_eq!(date.as_str(), "2025-13-32");
        assert_eq!(date.to_naive_date(), None);
    }

    #[test]
    fn wrong_sized_or_blank_dates_are_absent() {
        assert_eq!(normalize_date("01012025"), None);
        assert_eq!(normalize_date("0101"), None);
        assert_eq!(normalize_date("      "), None);
    }

    #[test]
    fn formats_signed_minor_units() {
        assert_eq!(format_signed_minor_units(13000_i128, '.'), "130.00");
        assert_eq!(format_signed_minor_units(-2000_i128, '.'), "-20.00");
        assert_eq!(format_signed_minor_units(-5_i64, ','), "-0,05");
        assert_eq!(format_minor_units(-12345_i32, ','), "123,45");
    }
}
