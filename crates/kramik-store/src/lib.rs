mod table;

pub mod products;
pub mod sessions;
pub mod users;

use std::path::{Path, PathBuf};
use std::{fs, io};

use snafu::{Location, ResultExt as _, Snafu};
use tokio::sync::Mutex;
use tracing::info;

pub use self::products::ProductSelector;
pub use self::sessions::SessionStore;

pub(crate) const LOG_TARGET: &str = "kramik::store";

#[derive(Debug, Snafu)]
pub enum StorageError {
    #[snafu(visibility(pub(crate)))]
    #[snafu(display("Failed to access {}", path.display()))]
    Io {
        source: io::Error,
        path: PathBuf,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(visibility(pub(crate)))]
    #[snafu(display("Malformed table file {}", path.display()))]
    Table {
        source: csv::Error,
        path: PathBuf,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(visibility(pub(crate)))]
    #[snafu(display(
        "No free user id left in {}..={}",
        kramik_core::UserId::MIN,
        kramik_core::UserId::MAX
    ))]
    IdSpaceExhausted {
        #[snafu(implicit)]
        location: Location,
    },
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Flat-file table storage rooted at a data directory.
///
/// Each table is a single file that is re-read on every operation and
/// rewritten whole on every mutation; last writer wins. The per-table
/// mutexes serialize each read-modify-write cycle, and plain reads
/// take the same lock so they never observe a file mid-rewrite.
pub struct Storage {
    data_dir: PathBuf,
    pub(crate) products_lock: Mutex<()>,
    pub(crate) users_lock: Mutex<()>,
}

impl Storage {
    pub const PRODUCTS_FILE: &'static str = "products.csv";
    pub const USERS_FILE: &'static str = "customers.csv";

    pub fn open(data_dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).context(IoSnafu {
            path: data_dir.as_path(),
        })?;

        info!(target: LOG_TARGET, dir = %data_dir.display(), "Opened storage");

        Ok(Self {
            data_dir,
            products_lock: Mutex::new(()),
            users_lock: Mutex::new(()),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn products_path(&self) -> PathBuf {
        self.data_dir.join(Self::PRODUCTS_FILE)
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(Self::USERS_FILE)
    }
}
