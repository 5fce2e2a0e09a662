use std::{cmp::Ordering, str::FromStr};

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};

use crate::models::RecordKind;

/// Record trait describes one kind of record held by a repository.
///
/// A kind is a configuration of the generic repository: its field set comes
/// from the serde derive, its defaults from `create`, its editable fields from
/// `Draft`.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// The user-supplied fields used to create or edit a record.
    type Draft;

    const KIND: RecordKind;

    fn id(&self) -> u32;

    /// Builds a new record with the allocated id and the kind's defaults.
    fn create(id: u32, draft: Self::Draft) -> Self;

    /// Overwrites the editable fields and re-stamps "last modified" fields.
    fn apply(&mut self, draft: Self::Draft);

    /// Checks the draft before anything is allocated or written.
    ///
    /// # Returns
    /// A Result indicating whether the draft can be stored.
    fn validate(_draft: &Self::Draft) -> Result<()> {
        Ok(())
    }
}

/// Sortable trait lets a repository reorder its records by a named field.
pub trait Sortable: Record {
    type Key: FromStr<Err = anyhow::Error> + Copy;

    fn compare(&self, other: &Self, key: Self::Key) -> Ordering;
}

/// CsvExchange trait maps a record kind onto a row of a delimited table.
pub trait CsvExchange: Record {
    type Row: Serialize + DeserializeOwned;

    /// Column labels, in the order `Row` serializes its fields.
    const HEADERS: &'static [&'static str];

    fn to_row(&self) -> Self::Row;

    /// Turns an imported row into a draft; any id column is dropped.
    fn draft_from_row(row: Self::Row) -> Self::Draft;
}

/// SnapshotStore trait persists one collection as a complete snapshot.
pub trait SnapshotStore {
    /// Loads the stored snapshot.
    ///
    /// # Arguments
    /// * `default` - Written as the initial snapshot and returned when
    ///   nothing has been stored yet.
    ///
    /// # Returns
    /// The records of the snapshot, in stored order.
    fn load<R: Serialize + DeserializeOwned>(&self, default: Vec<R>) -> Result<Vec<R>>;

    /// Overwrites the snapshot with `records`.
    fn save<R: Serialize>(&self, records: &[R]) -> Result<()>;
}

/// CSVWrite trait provides a method to write a record to a CSV file.
pub trait CSVWrite {
    /// Writes the header row.
    ///
    /// # Arguments
    /// * `labels` - The column labels.
    ///
    /// # Returns
    /// A Result indicating success or failure.
    fn write_header(&mut self, labels: &[&str]) -> Result<()>;

    /// Writes a record to a CSV file.
    ///
    /// # Arguments
    /// * `record` - The record to write to the CSV file that is Serializable.
    ///
    /// # Returns
    /// A Result indicating success or failure.
    fn write_record<T: Serialize>(&mut self, record: &T) -> Result<()>;

    fn flush(&mut self) -> Result<()>;
}

/// Prompt trait reads one line of user input.
pub trait Prompt {
    fn input(&mut self, prompt: &str) -> Result<String>;
}
