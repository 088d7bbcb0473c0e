use std::collections::HashMap;
use std::fmt;

use crate::model::{AccountKey, Amount, LineError, LineErrorKind, Record, RecordType};
use crate::utils::format_signed_minor_units;

/// Допустимое расхождение баланса, в "центах"
pub const BALANCE_TOLERANCE: Amount = 1;

/// Расхождение: ancien solde + операции != nouveau solde
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceDiscrepancy {
    pub account: AccountKey,
    /// ancien solde + сумма операций
    pub computed: Amount,
    /// nouveau solde из файла
    pub declared: Amount,
    /// строка записи 07, к которой относится ошибка
    pub line_number: usize,
}

impl BalanceDiscrepancy {
    pub fn difference(&self) -> Amount {
        self.computed - self.declared
    }
}

impl fmt::Display for BalanceDiscrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "balance mismatch for account {}: computed {}, declared {}",
            self.account,
            format_signed_minor_units(self.computed, '.'),
            format_signed_minor_units(self.declared, '.'),
        )
    }
}

/// Группирует записи по счёту, сохраняя порядок первого появления счёта
fn group_by_account(records: &[Record]) -> Vec<(&AccountKey, Vec<&Record>)> {
    let mut index: HashMap<&AccountKey, usize> = HashMap::new();
    let mut groups: Vec<(&AccountKey, Vec<&Record>)> = Vec::new();

    for record in records {
        let idx = *index.entry(&record.account).or_insert_with(|| {
            groups.push((&record.account, Vec::new()));
            groups.len() - 1
        });
        groups[idx].1.push(record);
    }

    groups
}

/// Проверяет баланс одного счёта.
///
/// Нет ancien solde, nouveau solde или ни одной операции - проверять нечего.
fn check_account(account: &AccountKey, records: &[&Record]) -> Option<BalanceDiscrepancy> {
    let old = records.iter().find(|r| r.record_type() == RecordType::OldBalance)?;
    let new = records.iter().find(|r| r.record_type() == RecordType::NewBalance)?;

    let movements: Vec<&&Record> = records.iter().filter(|r| r.is_movement()).collect();
    if movements.is_empty() {
        return None;
    }

    let total: Amount = movements.iter().map(|r| r.amount()).sum();
    let computed = old.balance().unwrap_or_default() + total;
    let declared = new.balance().unwrap_or_default();

    if (computed - declared).abs() > BALANCE_TOLERANCE {
        Some(BalanceDiscrepancy {
            account: account.clone(),
            computed,
            declared,
            line_number: new.line_number,
        })
    } else {
        None
    }
}

/// Проверка целостности балансов по всем счетам файла.
///
/// Возвращает ошибки, привязанные к строкам записей 07; сами записи не меняются.
pub fn validate_balances(records: &[Record]) -> Vec<LineError> {
    let mut errors = Vec::new();

    for (account, account_records) in group_by_account(records) {
        let Some(discrepancy) = check_account(account, &account_records) else {
            continue;
        };

        tracing::warn!(
            account = %discrepancy.account,
            computed = %format_signed_minor_units(discrepancy.computed, '.'),
            declared = %format_signed_minor_units(discrepancy.declared, '.'),
            "balance mismatch"
        );

        // строка 07 точно есть среди записей счёта
        let line = account_records
            .iter()
            .find(|r| r.line_number == discrepancy.line_number)
            .map(|r| r.raw_line.clone())
            .unwrap_or_default();

        errors.push(LineError {
            line_number: discrepancy.line_number,
            line,
            kind: LineErrorKind::Balance(discrepancy),
        });
    }

    errors
}
