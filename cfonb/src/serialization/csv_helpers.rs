use serde::Serialize;

use crate::model::Record;
use crate::utils::format_signed_minor_units;
use super::common::quoted;

/// Заголовок общего CSV-экспорта
pub(crate) const HEADER: [&str; 16] = [
    "ligne",
    "type_enregistrement",
    "banque",
    "guichet",
    "compte",
    "devise",
    "date_comptable",
    "date_valeur",
    "date_solde",
    "libelle",
    "montant",
    "solde",
    "code_operation",
    "numero_ecriture",
    "qualifiant",
    "complement",
];

/// Строка общего CSV-экспорта, поля в порядке [`HEADER`]
#[derive(Debug, Serialize)]
pub(crate) struct CsvRow<'a> {
    pub line: usize,
    pub record_type: &'static str,
    pub bank: &'a str,
    pub branch: &'a str,
    pub account: &'a str,
    pub currency: &'a str,
    pub accounting_date: String,
    pub value_date: String,
    pub balance_date: String,
    pub label: String,
    pub amount: String,
    pub balance: String,
    pub operation_code: &'a str,
    pub entry_number: &'a str,
    pub qualifier: &'a str,
    pub complement: String,
}

impl<'a> From<&'a Record> for CsvRow<'a> {
    fn from(r: &'a Record) -> Self {
        let date = |d: Option<&crate::model::IsoDate>| d.map(|d| d.to_string()).unwrap_or_default();

        CsvRow {
            line: r.line_number,
            record_type: r.record_type().code(),
            bank: r.bank_code(),
            branch: r.branch_code(),
            account: r.account_number(),
            currency: &r.currency,
            accounting_date: date(r.accounting_date()),
            value_date: date(r.value_date()),
            balance_date: date(r.balance_date()),
            label: quoted(r.label()),
            amount: format_signed_minor_units(r.amount(), '.'),
            balance: r
                .balance()
                .map(|b| format_signed_minor_units(b, '.'))
                .unwrap_or_default(),
            operation_code: r.operation_code().unwrap_or(""),
            entry_number: r.entry_number().unwrap_or(""),
            qualifier: r.qualifier().unwrap_or(""),
            complement: r
                .complement_text()
                .filter(|t| !t.is_empty())
                .map(quoted)
                .unwrap_or_default(),
        }
    }
}
