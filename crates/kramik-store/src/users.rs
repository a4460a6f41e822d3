use std::collections::HashSet;
use std::fs;

use kramik_core::{NewUser, UserId, UserRecord};
use rand::Rng as _;
use snafu::ResultExt as _;
use tracing::debug;

use crate::table::{read_table, write_table};
use crate::{IdSpaceExhaustedSnafu, IoSnafu, LOG_TARGET, Storage, StorageResult};

pub(crate) const USER_COLUMNS: &[&str] =
    &["id", "name", "surname", "age", "login", "password", "admin"];

/// Random draws attempted before falling back to a scan of the id
/// range.
const ID_DRAW_ATTEMPTS: usize = 64;

impl Storage {
    /// All accounts, read fresh from the table file.
    pub async fn list_users(&self) -> StorageResult<Vec<UserRecord>> {
        let _guard = self.users_lock.lock().await;
        read_table(&self.users_path(), USER_COLUMNS)
    }

    /// All rows carrying this exact login. More than one row is a
    /// data-integrity violation that callers report rather than heal.
    pub async fn users_by_login(&self, login: &str) -> StorageResult<Vec<UserRecord>> {
        let _guard = self.users_lock.lock().await;
        let users: Vec<UserRecord> = read_table(&self.users_path(), USER_COLUMNS)?;
        Ok(users.into_iter().filter(|user| user.login == login).collect())
    }

    /// Append an account under a freshly drawn id and rewrite the
    /// table. Also leaves an empty `<id>.txt` marker file next to the
    /// table.
    ///
    /// Login uniqueness is the caller's check; this only guards the id.
    pub async fn insert_user(&self, new: NewUser) -> StorageResult<UserRecord> {
        let _guard = self.users_lock.lock().await;
        let path = self.users_path();

        let mut users: Vec<UserRecord> = read_table(&path, USER_COLUMNS)?;
        let taken: HashSet<u32> = users.iter().map(|user| user.id.get()).collect();
        let id = assign_user_id(&taken)?;

        let user = UserRecord {
            id,
            name: new.name,
            surname: new.surname,
            age: new.age,
            login: new.login,
            password: new.password,
            admin: false,
        };
        users.push(user.clone());
        write_table(&path, USER_COLUMNS, &users)?;

        let marker = self.data_dir().join(format!("{id}.txt"));
        fs::File::create(&marker).context(IoSnafu { path: marker.as_path() })?;

        debug!(target: LOG_TARGET, %id, login = %user.login, "Inserted user");
        Ok(user)
    }

    /// Delete the rows carrying this exact login and rewrite the
    /// table; `false` when no row matched.
    pub async fn remove_user(&self, login: &str) -> StorageResult<bool> {
        let _guard = self.users_lock.lock().await;
        let path = self.users_path();

        let users: Vec<UserRecord> = read_table(&path, USER_COLUMNS)?;
        let remaining: Vec<UserRecord> = users
            .iter()
            .filter(|user| user.login != login)
            .cloned()
            .collect();

        if remaining.len() == users.len() {
            return Ok(false);
        }

        write_table(&path, USER_COLUMNS, &remaining)?;
        debug!(target: LOG_TARGET, login, "Removed user");
        Ok(true)
    }
}

/// Draw a fresh account id from `UserId::MIN..=UserId::MAX`: a
/// bounded number of random draws, then the first free id in order,
/// then an explicit exhaustion error once every id is taken.
fn assign_user_id(taken: &HashSet<u32>) -> StorageResult<UserId> {
    let mut rng = rand::rng();
    for _ in 0..ID_DRAW_ATTEMPTS {
        let candidate = rng.random_range(UserId::MIN..=UserId::MAX);
        if !taken.contains(&candidate) {
            return Ok(UserId::new(candidate));
        }
    }

    (UserId::MIN..=UserId::MAX)
        .find(|id| !taken.contains(id))
        .map(UserId::new)
        .ok_or_else(|| IdSpaceExhaustedSnafu.build())
}
