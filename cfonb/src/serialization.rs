mod common;
mod csv_helpers;
mod limpeed_helpers;

use std::io::Write;

use crate::error::ParseError;
use crate::model::{ParseResult, Record};
use csv_helpers::CsvRow;
use limpeed_helpers::LimpeedRow;

/// Записывает записи в общий CSV: ',' как разделитель, UTF-8 с BOM.
///
/// Одна строка на запись в переданном порядке, текстовые поля в кавычках.
pub fn write_csv<'a, W, I>(records: I, writer: W) -> Result<(), ParseError>
where
    W: Write,
    I: IntoIterator<Item = &'a Record>,
{
    let mut wtr = common::bom_writer(writer, b',')?;

    wtr.write_record(csv_helpers::HEADER)?;
    for record in records {
        wtr.serialize(CsvRow::from(record))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Записывает операции (04) в CSV для LIMPEED: ';' как разделитель, UTF-8 с BOM.
///
/// Остальные типы записей пропускаются.
pub fn write_limpeed<'a, W, I>(records: I, writer: W) -> Result<(), ParseError>
where
    W: Write,
    I: IntoIterator<Item = &'a Record>,
{
    let mut wtr = common::bom_writer(writer, b';')?;

    wtr.write_record(limpeed_helpers::HEADER)?;
    for record in records.into_iter().filter(|r| r.is_movement()) {
        wtr.serialize(LimpeedRow::from(record))?;
    }

    wtr.flush()?;
    Ok(())
}

impl ParseResult {
    /// Go to [`write_csv`]
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ParseError> {
        write_csv(self.records(), writer)
    }

    /// Go to [`write_limpeed`]
    pub fn write_limpeed<W: Write>(&self, writer: W) -> Result<(), ParseError> {
        write_limpeed(self.records(), writer)
    }
}
