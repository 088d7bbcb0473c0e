use serde::Serialize;

use crate::model::{IsoDate, Record};
use crate::utils::format_minor_units;
use super::common::quoted;

/// Строка экспорта LIMPEED
#[derive(Debug, Serialize)]
pub(crate) struct LimpeedRow {
    pub date: String,
    pub label: String,
    pub debit: String,
    pub credit: String,
}

/// Заголовок пишется отдельно, writer создаётся без `has_headers`
pub(crate) const HEADER: [&str; 4] = ["Date", "Libellé", "Débit", "Crédit"];

/// YYYY-MM-DD -> DD/MM/YYYY
pub(crate) fn format_french_date(date: &IsoDate) -> String {
    if let Some(d) = date.to_naive_date() {
        return d.format("%d/%m/%Y").to_string();
    }

    // даты без проверки диапазона переставляем как есть
    let parts: Vec<&str> = date.as_str().split('-').collect();
    match parts.as_slice() {
        [year, month, day] => format!("{day}/{month}/{year}"),
        _ => date.to_string(),
    }
}

impl From<&Record> for LimpeedRow {
    fn from(r: &Record) -> Self {
        let amount = r.amount();

        let debit = if amount < 0 {
            format_minor_units(amount, ',')
        } else {
            String::new()
        };
        let credit = if amount > 0 {
            format_minor_units(amount, ',')
        } else {
            String::new()
        };

        LimpeedRow {
            date: r.accounting_date().map(format_french_date).unwrap_or_default(),
            label: quoted(r.label()),
            debit,
            credit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_french_dates() {
        let date = IsoDate::new("2025-01-15".to_string());
        assert_eq!(format_french_date(&date), "15/01/2025");

        // невозможная дата всё равно переставляется
        let date = IsoDate::new("2025-02-30".to_string());
        assert_eq!(format_french_date(&date), "30/02/2025");
    }
}
