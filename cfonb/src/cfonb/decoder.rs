use super::utils::{FixedLine, RECORD_LEN, RECORD_LEN_WITH_FILLER};
use crate::error::DecodeError;
use crate::model::{
    AccountKey, BalanceEntry, ComplementEntry, MovementEntry, Record, RecordDetail, RecordType,
};
use crate::utils::{decode_amount, normalize_date};

// позиции полей: [начало, конец), по символам
const BANK_CODE: (usize, usize) = (2, 7);
const BRANCH_CODE: (usize, usize) = (11, 16);
const CURRENCY: (usize, usize) = (16, 19);
const ACCOUNT_NUMBER: (usize, usize) = (21, 32);
const OPERATION_CODE: (usize, usize) = (32, 34);
const DATE: (usize, usize) = (34, 40);
const VALUE_DATE: (usize, usize) = (42, 48);
const QUALIFIER: (usize, usize) = (45, 48);
const LABEL: (usize, usize) = (48, 79);
const COMPLEMENT_TEXT: (usize, usize) = (48, 118);
const ENTRY_NUMBER: (usize, usize) = (81, 88);
const AMOUNT: (usize, usize) = (90, 104);

/// Разбирает одну непустую строку файла в [`Record`].
///
/// `line` - строка как есть (может заканчиваться на '\r'), `line_number` считается с 1.
pub fn decode_line(line: &str, line_number: usize) -> Result<Record, DecodeError> {
    let fixed = FixedLine::new(line);

    let actual = fixed.len();
    if actual != RECORD_LEN && actual != RECORD_LEN_WITH_FILLER {
        return Err(DecodeError::InvalidLength { actual });
    }

    let record_type = RecordType::from_code(&fixed.field(0, 2))?;

    let detail = match record_type {
        RecordType::OldBalance => RecordDetail::OldBalance(decode_balance(&fixed)?),
        RecordType::Movement => RecordDetail::Movement(decode_movement(&fixed)?),
        RecordType::Complement => RecordDetail::Complement(decode_complement(&fixed)),
        RecordType::NewBalance => RecordDetail::NewBalance(decode_balance(&fixed)?),
    };

    Ok(Record {
        line_number,
        raw_line: line.trim_end_matches('\r').to_string(),
        account: decode_account(&fixed),
        currency: fixed.field(CURRENCY.0, CURRENCY.1),
        detail,
    })
}

fn decode_account(line: &FixedLine) -> AccountKey {
    AccountKey {
        bank_code: line.field(BANK_CODE.0, BANK_CODE.1),
        branch_code: line.field(BRANCH_CODE.0, BRANCH_CODE.1),
        account_number: line.trimmed(ACCOUNT_NUMBER.0, ACCOUNT_NUMBER.1),
    }
}

/// 01 и 07 устроены одинаково
fn decode_balance(line: &FixedLine) -> Result<BalanceEntry, DecodeError> {
    Ok(BalanceEntry {
        date: normalize_date(&line.field(DATE.0, DATE.1)),
        balance: decode_amount(&line.field(AMOUNT.0, AMOUNT.1))?,
    })
}

fn decode_movement(line: &FixedLine) -> Result<MovementEntry, DecodeError> {
    Ok(MovementEntry {
        operation_code: line.field(OPERATION_CODE.0, OPERATION_CODE.1),
        accounting_date: normalize_date(&line.field(DATE.0, DATE.1)),
        value_date: normalize_date(&line.field(VALUE_DATE.0, VALUE_DATE.1)),
        label: line.trimmed(LABEL.0, LABEL.1),
        entry_number: line.field(ENTRY_NUMBER.0, ENTRY_NUMBER.1),
        amount: decode_amount(&line.field(AMOUNT.0, AMOUNT.1))?,
    })
}

fn decode_complement(line: &FixedLine) -> ComplementEntry {
    ComplementEntry {
        qualifier: line.field(QUALIFIER.0, QUALIFIER.1),
        text: line.trimmed(COMPLEMENT_TEXT.0, COMPLEMENT_TEXT.1),
    }
}
