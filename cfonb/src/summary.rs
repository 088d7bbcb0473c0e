use std::fmt;

use crate::model::{AccountKey, Amount, Record, RecordType};
use crate::utils::format_signed_minor_units;

/// Операция вместе с её дополнениями (05)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementWithComplements<'a> {
    pub movement: &'a Record,
    pub complements: Vec<&'a Record>,
}

impl MovementWithComplements<'_> {
    /// Тексты всех дополнений через пробел
    pub fn complement_text(&self) -> String {
        self.complements
            .iter()
            .filter_map(|c| c.complement_text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Привязывает записи 05 к предшествующей операции 04.
///
/// Дополнения берутся до следующей операции, записи других типов между ними пропускаются.
/// Дополнения до первой операции ни к чему не относятся и не возвращаются.
pub fn movements_with_complements(records: &[Record]) -> Vec<MovementWithComplements<'_>> {
    let mut result: Vec<MovementWithComplements<'_>> = Vec::new();

    for record in records {
        match record.record_type() {
            RecordType::Movement => result.push(MovementWithComplements {
                movement: record,
                complements: Vec::new(),
            }),
            RecordType::Complement => {
                if let Some(current) = result.last_mut() {
                    current.complements.push(record);
                }
            }
            _ => {}
        }
    }

    result
}

/// Итоги по операциям
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub movements: usize,
    /// сумма поступлений
    pub total_credit: Amount,
    /// сумма списаний, отрицательная
    pub total_debit: Amount,
}

impl Summary {
    pub fn of<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records
            .into_iter()
            .filter(|r| r.is_movement())
            .fold(Summary::default(), |mut acc, r| {
                let amount = r.amount();
                acc.movements += 1;
                if amount > 0 {
                    acc.total_credit += amount;
                } else {
                    acc.total_debit += amount;
                }
                acc
            })
    }

    pub fn net(&self) -> Amount {
        self.total_credit + self.total_debit
    }
}

/// Сводка по одному счёту
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub account: AccountKey,
    pub currency: String,
    /// ancien solde, 0 если его нет в файле
    pub opening_balance: Amount,
    pub movements: Summary,
    /// nouveau solde из файла
    pub declared_closing: Option<Amount>,
}

impl AccountSummary {
    pub fn new(account: &AccountKey, records: &[Record]) -> Self {
        let own: Vec<&Record> = records.iter().filter(|r| &r.account == account).collect();

        let opening_balance = own
            .iter()
            .find(|r| r.record_type() == RecordType::OldBalance)
            .and_then(|r| r.balance())
            .unwrap_or_default();

        let declared_closing = own
            .iter()
            .find(|r| r.record_type() == RecordType::NewBalance)
            .and_then(|r| r.balance());

        let currency = own.first().map(|r| r.currency.clone()).unwrap_or_default();

        AccountSummary {
            account: account.clone(),
            currency,
            opening_balance,
            movements: Summary::of(own.iter().copied()),
            declared_closing,
        }
    }

    /// ancien solde + все операции
    pub fn current_balance(&self) -> Amount {
        self.opening_balance + self.movements.net()
    }
}

impl fmt::Display for AccountSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let declared = self
            .declared_closing
            .map(|d| format_signed_minor_units(d, '.'))
            .unwrap_or_else(|| "-".to_string());

        write!(
            f,
            "{} {}: opening {}, {} movements (credit {}, debit {}), balance {}, declared {}",
            self.account,
            self.currency,
            format_signed_minor_units(self.opening_balance, '.'),
            self.movements.movements,
            format_signed_minor_units(self.movements.total_credit, '.'),
            format_signed_minor_units(self.movements.total_debit, '.'),
            format_signed_minor_units(self.current_balance(), '.'),
            declared,
        )
    }
}
