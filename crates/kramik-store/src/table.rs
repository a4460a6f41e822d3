use std::collections::HashSet;
use std::hash::Hash;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use snafu::ResultExt as _;
use tracing::debug;

use crate::{IoSnafu, LOG_TARGET, StorageResult, TableSnafu};

/// Read all rows of a table. A missing file is a table with zero
/// rows; a header-only file is created as a side effect so the next
/// reader finds it.
pub(crate) fn read_table<T>(path: &Path, columns: &[&str]) -> StorageResult<Vec<T>>
where
    T: DeserializeOwned,
{
    if !path.exists() {
        create_empty_table(path, columns)?;
        return Ok(vec![]);
    }

    let mut reader = csv::Reader::from_path(path).context(TableSnafu { path })?;
    let mut rows = vec![];
    for row in reader.deserialize() {
        rows.push(row.context(TableSnafu { path })?);
    }
    Ok(rows)
}

/// Rewrite a table whole. Exact-duplicate rows are dropped; the first
/// occurrence keeps its position.
pub(crate) fn write_table<T>(path: &Path, columns: &[&str], rows: &[T]) -> StorageResult<()>
where
    T: Serialize + Eq + Hash,
{
    let mut seen = HashSet::new();
    let mut writer = table_writer(path, columns)?;
    for row in rows.iter().filter(|row| seen.insert(*row)) {
        writer.serialize(row).context(TableSnafu { path })?;
    }
    writer.flush().context(IoSnafu { path })?;
    Ok(())
}

fn create_empty_table(path: &Path, columns: &[&str]) -> StorageResult<()> {
    let mut writer = table_writer(path, columns)?;
    writer.flush().context(IoSnafu { path })?;
    debug!(target: LOG_TARGET, path = %path.display(), "Created empty table");
    Ok(())
}

/// Open a writer with the header row already written, so that a
/// zero-row table still carries its column names.
fn table_writer(path: &Path, columns: &[&str]) -> StorageResult<csv::Writer<std::fs::File>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .context(TableSnafu { path })?;
    writer.write_record(columns).context(TableSnafu { path })?;
    Ok(writer)
}
