use std::collections::HashMap;
use std::fmt;

use crate::model::Record;
use crate::utils::format_signed_minor_units;

/// Критерий сравнения операций
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    /// дата проводки
    Date,
    /// сумма, до центов
    Amount,
    /// описание без учёта регистра и пробелов по краям
    Label,
    /// банк-отделение-счёт
    Account,
    /// код операции
    OperationCode,
}

impl Criterion {
    /// Название критерия для отчёта
    pub fn label(self) -> &'static str {
        match self {
            Criterion::Date => "Date",
            Criterion::Amount => "Montant",
            Criterion::Label => "Libellé",
            Criterion::Account => "Compte",
            Criterion::OperationCode => "Code op.",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Criterion::Date => "date",
            Criterion::Amount => "amount",
            Criterion::Label => "label",
            Criterion::Account => "account",
            Criterion::OperationCode => "code",
        }
    }

    /// Значение критерия для записи, пустая строка если значения нет
    fn value_of(self, record: &Record) -> String {
        match self {
            Criterion::Date => record
                .accounting_date()
                .map(|d| d.to_string())
                .unwrap_or_default(),
            Criterion::Amount => format_signed_minor_units(record.amount(), '.'),
            Criterion::Label => record.label().trim().to_lowercase(),
            Criterion::Account => record.account.to_string(),
            Criterion::OperationCode => record
                .operation_code()
                .map(|c| c.trim().to_string())
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Набор включённых критериев.
///
/// По умолчанию включено всё, кроме кода операции.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateCriteria {
    pub date: bool,
    pub amount: bool,
    pub label: bool,
    pub account: bool,
    pub operation_code: bool,
}

impl Default for DuplicateCriteria {
    fn default() -> Self {
        DuplicateCriteria {
            date: true,
            amount: true,
            label: true,
            account: true,
            operation_code: false,
        }
    }
}

impl DuplicateCriteria {
    /// Включённые критерии в порядке построения ключа
    pub fn enabled(&self) -> Vec<Criterion> {
        [
            (self.date, Criterion::Date),
            (self.amount, Criterion::Amount),
            (self.label, Criterion::Label),
            (self.account, Criterion::Account),
            (self.operation_code, Criterion::OperationCode),
        ]
        .into_iter()
        .filter_map(|(on, c)| on.then_some(c))
        .collect()
    }

    /// Ключ сравнения записи.
    ///
    /// `None`, если ни один включённый критерий не дал значения.
    pub fn fingerprint(&self, record: &Record) -> Option<String> {
        let mut has_value = false;
        let segments: Vec<String> = self
            .enabled()
            .into_iter()
            .map(|c| {
                let value = c.value_of(record);
                has_value |= !value.is_empty();
                format!("{}:{value}", c.prefix())
            })
            .collect();

        has_value.then(|| segments.join("|"))
    }
}

/// Позиция записи в группе дубликатов.
///
/// Только подпись для отчёта, записи никогда не удаляются.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateRole {
    Original,
    /// номер дубликата, с 1
    Duplicate(usize),
}

impl fmt::Display for DuplicateRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateRole::Original => write!(f, "original"),
            DuplicateRole::Duplicate(n) => write!(f, "duplicate {n}"),
        }
    }
}

/// Операции с одинаковым ключом, минимум две
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup<'a> {
    pub key: String,
    /// отсортированы по номеру строки
    pub records: Vec<&'a Record>,
    pub criteria: Vec<Criterion>,
}

impl<'a> DuplicateGroup<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Номер строки первой записи группы
    pub fn first_line(&self) -> usize {
        self.records.first().map(|r| r.line_number).unwrap_or_default()
    }

    /// Записи группы с их ролями: первая - оригинал, остальные - дубликаты
    pub fn members(&self) -> impl Iterator<Item = (DuplicateRole, &'a Record)> + '_ {
        self.records.iter().enumerate().map(|(idx, &r)| {
            let role = if idx == 0 {
                DuplicateRole::Original
            } else {
                DuplicateRole::Duplicate(idx)
            };
            (role, r)
        })
    }
}

/// Ищет возможные дубликаты среди операций (04).
///
/// Остальные типы записей игнорируются. Группы отсортированы по первой строке.
pub fn find_duplicates<'a>(
    records: &'a [Record],
    criteria: &DuplicateCriteria,
) -> Vec<DuplicateGroup<'a>> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&'a Record>> = HashMap::new();

    for record in records.iter().filter(|r| r.is_movement()) {
        let Some(key) = criteria.fingerprint(record) else {
            continue;
        };

        groups
            .entry(key)
            .or_insert_with_key(|k| {
                order.push(k.clone());
                Vec::new()
            })
            .push(record);
    }

    let enabled = criteria.enabled();

    let mut duplicates: Vec<DuplicateGroup<'a>> = order
        .into_iter()
        .filter_map(|key| {
            let mut members = groups.remove(&key)?;
            if members.len() < 2 {
                return None;
            }
            members.sort_by_key(|r| r.line_number);
            Some(DuplicateGroup {
                key,
                records: members,
                criteria: enabled.clone(),
            })
        })
        .collect();

    duplicates.sort_by_key(|g| g.first_line());
    duplicates
}

/// Сводка по дубликатам
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DuplicateStats {
    /// всего операций (04)
    pub total_movements: usize,
    /// операций, попавших в какую-либо группу
    pub duplicate_records: usize,
    /// количество групп
    pub groups: usize,
    /// операций вне групп
    pub clean_records: usize,
}

impl DuplicateStats {
    pub fn new(records: &[Record], groups: &[DuplicateGroup<'_>]) -> Self {
        let total_movements = records.iter().filter(|r| r.is_movement()).count();
        let duplicate_records: usize = groups.iter().map(|g| g.len()).sum();

        DuplicateStats {
            total_movements,
            duplicate_records,
            groups: groups.len(),
            clean_records: total_movements.saturating_sub(duplicate_records),
        }
    }
}
