use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use crate::error::{DecodeError, ParseError};
use crate::utils::format_signed_minor_units;
use crate::validation::BalanceDiscrepancy;

/// Денежная сумма в "центах", signed
pub type Amount = i128;

/// Тип записи CFONB 120.
///
/// Поддерживаются только четыре типа, всё остальное - [`DecodeError::UnknownRecordType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordType {
    /// 01 - ancien solde
    OldBalance,
    /// 04 - mouvement
    Movement,
    /// 05 - complément de mouvement
    Complement,
    /// 07 - nouveau solde
    NewBalance,
}

impl RecordType {
    /// Все поддерживаемые типы в порядке кодов
    pub const ALL: [RecordType; 4] = [
        RecordType::OldBalance,
        RecordType::Movement,
        RecordType::Complement,
        RecordType::NewBalance,
    ];

    /// Двухсимвольный код записи
    pub fn code(self) -> &'static str {
        match self {
            RecordType::OldBalance => "01",
            RecordType::Movement => "04",
            RecordType::Complement => "05",
            RecordType::NewBalance => "07",
        }
    }

    pub fn from_code(code: &str) -> Result<Self, DecodeError> {
        match code {
            "01" => Ok(RecordType::OldBalance),
            "04" => Ok(RecordType::Movement),
            "05" => Ok(RecordType::Complement),
            "07" => Ok(RecordType::NewBalance),
            other => Err(DecodeError::UnknownRecordType {
                code: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Дата в формате YYYY-MM-DD, собранная из поля DDMMYY.
///
/// Важно:
/// Корректность дня и месяца не проверяется, "320125" превратится в "2025-01-32".
/// Для настоящей календарной даты используйте [`IsoDate::to_naive_date`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IsoDate(String);

impl IsoDate {
    pub(crate) fn new(iso: String) -> Self {
        IsoDate(iso)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Календарная дата, если строка действительно является датой
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, "%Y-%m-%d").ok()
    }
}

impl fmt::Display for IsoDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Идентификатор счёта: банк, отделение (guichet), номер счёта
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountKey {
    pub bank_code: String,
    pub branch_code: String,
    /// номер счёта без пробелов-заполнителей
    pub account_number: String,
}

impl AccountKey {
    pub fn new(
        bank_code: impl Into<String>,
        branch_code: impl Into<String>,
        account_number: impl Into<String>,
    ) -> Self {
        AccountKey {
            bank_code: bank_code.into(),
            branch_code: branch_code.into(),
            account_number: account_number.into(),
        }
    }
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.bank_code, self.branch_code, self.account_number)
    }
}

impl FromStr for AccountKey {
    type Err = ParseError;

    /// Разбирает строку вида "30004-00550-00012345678"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('-').collect();
        match parts.as_slice() {
            [bank, branch, account]
                if !bank.is_empty() && !branch.is_empty() && !account.is_empty() =>
            {
                Ok(AccountKey::new(*bank, *branch, *account))
            }
            _ => Err(ParseError::InvalidAccountKey(s.to_string())),
        }
    }
}

/// Данные записей 01 и 07
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceEntry {
    /// дата баланса
    pub date: Option<IsoDate>,
    /// сумма баланса (в "центах")
    pub balance: Amount,
}

/// Данные записи 04
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementEntry {
    /// код операции interbancaire, как в файле
    pub operation_code: String,
    /// дата проводки
    pub accounting_date: Option<IsoDate>,
    /// дата валютирования
    pub value_date: Option<IsoDate>,
    /// описание операции от банка
    pub label: String,
    /// номер проводки, как в файле
    pub entry_number: String,
    /// сумма (в "центах")
    pub amount: Amount,
}

/// Данные записи 05
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplementEntry {
    /// qualifiant, как в файле (например "LIB", "NPY")
    pub qualifier: String,
    /// текст дополнения
    pub text: String,
}

/// Поля, зависящие от типа записи.
///
/// Набор полей полностью определяется вариантом, поэтому поля другого типа
/// у записи появиться не могут.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordDetail {
    OldBalance(BalanceEntry),
    Movement(MovementEntry),
    Complement(ComplementEntry),
    NewBalance(BalanceEntry),
}

/// Центральная структура библиотеки: одна разобранная строка CFONB.
///
/// Создаётся только парсером и после этого не меняется.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// номер строки (с 1, пустые строки не считаются)
    pub line_number: usize,
    /// исходная строка без завершающего '\r'
    pub raw_line: String,
    /// счёт, которому принадлежит запись
    pub account: AccountKey,
    /// код валюты, как в файле: "EUR", ...
    pub currency: String,
    pub detail: RecordDetail,
}

impl Record {
    pub fn record_type(&self) -> RecordType {
        match self.detail {
            RecordDetail::OldBalance(_) => RecordType::OldBalance,
            RecordDetail::Movement(_) => RecordType::Movement,
            RecordDetail::Complement(_) => RecordType::Complement,
            RecordDetail::NewBalance(_) => RecordType::NewBalance,
        }
    }

    pub fn is_movement(&self) -> bool {
        matches!(self.detail, RecordDetail::Movement(_))
    }

    pub fn bank_code(&self) -> &str {
        &self.account.bank_code
    }

    pub fn branch_code(&self) -> &str {
        &self.account.branch_code
    }

    pub fn account_number(&self) -> &str {
        &self.account.account_number
    }

    /// Текст записи: описание для 04 и фиксированные значения для остальных типов
    pub fn label(&self) -> &str {
        match &self.detail {
            RecordDetail::OldBalance(_) => "ANCIEN SOLDE",
            RecordDetail::Movement(m) => &m.label,
            RecordDetail::Complement(_) => "COMPLEMENT",
            RecordDetail::NewBalance(_) => "NOUVEAU SOLDE",
        }
    }

    /// Сумма операции, 0 для всего, кроме 04
    pub fn amount(&self) -> Amount {
        match &self.detail {
            RecordDetail::Movement(m) => m.amount,
            _ => 0,
        }
    }

    /// Баланс, только для 01 и 07
    pub fn balance(&self) -> Option<Amount> {
        match &self.detail {
            RecordDetail::OldBalance(b) | RecordDetail::NewBalance(b) => Some(b.balance),
            _ => None,
        }
    }

    pub fn balance_date(&self) -> Option<&IsoDate> {
        match &self.detail {
            RecordDetail::OldBalance(b) | RecordDetail::NewBalance(b) => b.date.as_ref(),
            _ => None,
        }
    }

    pub fn accounting_date(&self) -> Option<&IsoDate> {
        match &self.detail {
            RecordDetail::Movement(m) => m.accounting_date.as_ref(),
            _ => None,
        }
    }

    pub fn value_date(&self) -> Option<&IsoDate> {
        match &self.detail {
            RecordDetail::Movement(m) => m.value_date.as_ref(),
            _ => None,
        }
    }

    pub fn operation_code(&self) -> Option<&str> {
        match &self.detail {
            RecordDetail::Movement(m) => Some(&m.operation_code),
            _ => None,
        }
    }

    pub fn entry_number(&self) -> Option<&str> {
        match &self.detail {
            RecordDetail::Movement(m) => Some(&m.entry_number),
            _ => None,
        }
    }

    pub fn qualifier(&self) -> Option<&str> {
        match &self.detail {
            RecordDetail::Complement(c) => Some(&c.qualifier),
            _ => None,
        }
    }

    pub fn complement_text(&self) -> Option<&str> {
        match &self.detail {
            RecordDetail::Complement(c) => Some(&c.text),
            _ => None,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = self
            .accounting_date()
            .or_else(|| self.balance_date())
            .map(|d| d.to_string())
            .unwrap_or_default();

        let value = match self.balance() {
            Some(balance) => balance,
            None => self.amount(),
        };

        write!(
            f,
            "#{:<5} {} {:<24} {:<10} {:>15} {}",
            self.line_number,
            self.record_type(),
            self.account.to_string(),
            date,
            format_signed_minor_units(value, '.'),
            self.label(),
        )
    }
}

/// Агрегированная статистика разбора
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    /// количество непустых строк
    pub total_lines: usize,
    pub old_balances: usize,
    pub movements: usize,
    pub complements: usize,
    pub new_balances: usize,
    /// количество строк, которые не удалось разобрать
    pub errors: usize,
}

impl Stats {
    pub(crate) fn count(&mut self, record_type: RecordType) {
        match record_type {
            RecordType::OldBalance => self.old_balances += 1,
            RecordType::Movement => self.movements += 1,
            RecordType::Complement => self.complements += 1,
            RecordType::NewBalance => self.new_balances += 1,
        }
    }

    pub fn count_of(&self, record_type: RecordType) -> usize {
        match record_type {
            RecordType::OldBalance => self.old_balances,
            RecordType::Movement => self.movements,
            RecordType::Complement => self.complements,
            RecordType::NewBalance => self.new_balances,
        }
    }
}

/// Причина попадания строки в список ошибок
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineErrorKind {
    /// строку не удалось разобрать
    Decode(DecodeError),
    /// баланс счёта не сходится
    Balance(BalanceDiscrepancy),
}

impl fmt::Display for LineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineErrorKind::Decode(e) => write!(f, "{e}"),
            LineErrorKind::Balance(d) => write!(f, "{d}"),
        }
    }
}

/// Ошибка, привязанная к строке файла
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    pub line_number: usize,
    /// исходная строка
    pub line: String,
    pub kind: LineErrorKind,
}

impl LineError {
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line_number, self.kind)
    }
}

/// Результат разбора одного файла.
///
/// Записи идут в порядке строк файла. Изменять результат после разбора нельзя,
/// все потребители получают его только на чтение.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    records: Vec<Record>,
    stats: Stats,
    errors: Vec<LineError>,
}

impl ParseResult {
    pub(crate) fn new(records: Vec<Record>, stats: Stats, errors: Vec<LineError>) -> Self {
        ParseResult { records, stats, errors }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Ошибки разбора строк и расхождения балансов
    pub fn errors(&self) -> &[LineError] {
        &self.errors
    }

    /// Только операции (04)
    pub fn movements(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(|r| r.is_movement())
    }

    /// Уникальные счета файла в отсортированном виде
    pub fn accounts(&self) -> Vec<AccountKey> {
        let mut accounts: Vec<AccountKey> = self.records.iter().map(|r| r.account.clone()).collect();
        accounts.sort();
        accounts.dedup();
        accounts
    }

    /// Записи одного счёта в исходном порядке
    pub fn records_for_account(&self, account: &AccountKey) -> Vec<&Record> {
        self.records.iter().filter(|r| &r.account == account).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movement(line_number: usize, amount: Amount) -> Record {
        Record {
            line_number,
            raw_line: String::new(),
            account: AccountKey::new("30004", "00550", "00012345678"),
            currency: "EUR".to_string(),
            detail: RecordDetail::Movement(MovementEntry {
                operation_code: "05".to_string(),
                accounting_date: Some(IsoDate::new("2025-01-15".to_string())),
                value_date: None,
                label: "VIR SEPA".to_string(),
                entry_number: "0000001".to_string(),
                amount,
            }),
        }
    }

    #[test]
    fn record_type_codes_roundtrip() {
        for rt in RecordType::ALL {
            assert_eq!(RecordType::from_code(rt.code()).unwrap(), rt);
        }
        assert_eq!(
            RecordType::from_code("99").unwrap_err(),
            DecodeError::UnknownRecordType { code: "99".into() }
        );
    }

    #[test]
    fn movement_has_no_balance_fields() {
        let rec = movement(3, -2000);

        assert_eq!(rec.record_type(), RecordType::Movement);
        assert_eq!(rec.amount(), -2000);
        assert_eq!(rec.balance(), None);
        assert_eq!(rec.balance_date(), None);
        assert_eq!(rec.qualifier(), None);
        assert_eq!(rec.label(), "VIR SEPA");
    }

    #[test]
    fn balance_record_has_fixed_label_and_zero_amount() {
        let rec = Record {
            line_number: 1,
            raw_line: String::new(),
            account: AccountKey::new("30004", "00550", "00012345678"),
            currency: "EUR".to_string(),
            detail: RecordDetail::NewBalance(BalanceEntry {
                date: None,
                balance: 13000,
            }),
        };

        assert_eq!(rec.label(), "NOUVEAU SOLDE");
        assert_eq!(rec.amount(), 0);
        assert_eq!(rec.balance(), Some(13000));
        assert_eq!(rec.operation_code(), None);
    }

    #[test]
    fn account_key_display_and_parse() {
        let key = AccountKey::new("30004", "00550", "00012345678");
        assert_eq!(key.to_string(), "30004-00550-00012345678");

        let parsed: AccountKey = "30004-00550-00012345678".parse().unwrap();
        assert_eq!(parsed, key);

        assert!("30004-00550".parse::<AccountKey>().is_err());
        assert!("30004--123".parse::<AccountKey>().is_err());
    }

    #[test]
    fn iso_date_to_naive_date_rejects_impossible_dates() {
        let ok = IsoDate::new("2025-01-31".to_string());
        assert_eq!(ok.to_naive_date(), NaiveDate::from_ymd_opt(2025, 1, 31));

        let bad = IsoDate::new("2025-01-32".to_string());
        assert_eq!(bad.to_naive_date(), None);
    }

    #[test]
    fn accounts_are_sorted_and_unique() {
        let mut other = movement(2, 100);
        other.account = AccountKey::new("10278", "00001", "00099999999");

        let result = ParseResult::new(
            vec![movement(1, 100), other, movement(3, 200)],
            Stats::default(),
            Vec::new(),
        );

        let accounts = result.accounts();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].bank_code, "10278");

        let own = result.records_for_account(&accounts[1]);
        let lines: Vec<usize> = own.iter().map(|r| r.line_number).collect();
        assert_eq!(lines, vec![1, 3]);
    }
}
