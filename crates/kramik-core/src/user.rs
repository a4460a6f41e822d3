use serde::{Deserialize, Serialize};

use crate::UserId;

/// A customer account row. Field order is the on-disk column order of
/// the users table.
///
/// `password` is stored and compared as an opaque string; `admin` is
/// set to `false` at registration and is not settable through any
/// endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub surname: String,
    pub age: String,
    pub login: String,
    pub password: String,
    pub admin: bool,
}

/// Registration payload; the store assigns the id and the admin flag
/// starts out false.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub login: String,
    pub password: String,
    pub name: String,
    pub surname: String,
    pub age: String,
}
