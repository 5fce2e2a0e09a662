use std::path::Path;

use anyhow::Result;
use csv::ReaderBuilder;
use log::info;

use crate::{
    csv_writer::TableCSVWriter,
    errors::AssistantError,
    repository::Repository,
    traits::{CSVWrite, CsvExchange, Record, SnapshotStore},
};

/// Writes the header row and one row per record, in current order.
///
/// # Returns
/// The number of rows written, or `EmptyCollection` when there is nothing to
/// export.
pub fn export<R, S>(repository: &Repository<R, S>, writer: &mut impl CSVWrite) -> Result<usize>
where
    R: CsvExchange,
    S: SnapshotStore,
{
    let records = repository.list()?;
    writer.write_header(R::HEADERS)?;
    for record in records {
        writer.write_record(&record.to_row())?;
    }
    writer.flush()?;
    Ok(records.len())
}

/// Exports into a file. No file is created for an empty collection.
pub fn export_to_path<R, S>(repository: &Repository<R, S>, path: &Path) -> Result<usize>
where
    R: CsvExchange,
    S: SnapshotStore,
{
    repository.list()?;
    let mut writer = TableCSVWriter::create(path)?;
    let written = export(repository, &mut writer)?;
    info!(
        "event=csv_export kind={} rows={} path={}",
        R::KIND,
        written,
        path.display()
    );
    Ok(written)
}

fn unreadable_table(err: csv::Error) -> AssistantError {
    AssistantError::InvalidInput(format!("Некорректный CSV-файл: {err}"))
}

/// Adds one record per data row of the table at `path`.
///
/// Any id column is ignored and fresh ids are allocated. Short rows take the
/// defaults of their missing columns. All rows are read before the first one
/// is added, so an unreadable table adds nothing and fails with `InvalidInput`.
///
/// # Returns
/// The ids of the new records, in table order.
pub fn import<R, S>(path: &Path, repository: &mut Repository<R, S>) -> Result<Vec<u32>>
where
    R: CsvExchange,
    S: SnapshotStore,
{
    if !path.is_file() {
        return Err(AssistantError::ResourceMissing(path.to_path_buf()))?;
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(unreadable_table)?;
    let rows = reader
        .deserialize::<R::Row>()
        .collect::<Result<Vec<_>, csv::Error>>()
        .map_err(unreadable_table)?;

    let mut ids = Vec::with_capacity(rows.len());
    for row in rows {
        let record = repository.add(R::draft_from_row(row))?;
        ids.push(record.id());
    }
    info!(
        "event=csv_import kind={} rows={} path={}",
        R::KIND,
        ids.len(),
        path.display()
    );
    Ok(ids)
}
