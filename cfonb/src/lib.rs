pub mod error;
pub mod model;
pub mod cfonb;
pub mod sniffer;
pub mod validation;
pub mod duplicates;
pub mod summary;
pub mod serialization;

mod utils;

pub use crate::model::{
    AccountKey, Amount, IsoDate, LineError, LineErrorKind, ParseResult, Record, RecordDetail,
    RecordType, Stats,
};
pub use crate::cfonb::{CfonbData, decode_line, parse_cfonb};
pub use crate::duplicates::{
    Criterion, DuplicateCriteria, DuplicateGroup, DuplicateRole, DuplicateStats, find_duplicates,
};
pub use crate::error::{DecodeError, FormatError, ParseError};
pub use crate::serialization::{write_csv, write_limpeed};
pub use crate::summary::{AccountSummary, MovementWithComplements, Summary, movements_with_complements};
pub use crate::utils::{decode_amount, normalize_date};
pub use crate::validation::{BalanceDiscrepancy, validate_balances};
