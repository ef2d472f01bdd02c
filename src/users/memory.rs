use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::users::repo::{StoreError, UserStore};
use crate::users::repo_types::{NewUser, User};

/// In-process `UserStore` with the same id and uniqueness rules as the
/// Postgres table. Rows are kept in id order.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: Mutex<Rows>,
}

#[derive(Default)]
struct Rows {
    last_id: i64,
    by_id: BTreeMap<i64, User>,
}

impl Rows {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.by_id
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> MutexGuard<'_, Rows> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.rows().by_id.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.rows().by_id.get(&id).cloned())
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, StoreError> {
        let mut rows = self.rows();
        if rows.email_taken(&new_user.email, None) {
            return Err(StoreError::EmailTaken);
        }
        rows.last_id += 1;
        let user = User {
            id: rows.last_id,
            name: new_user.name.clone(),
            email: new_user.email.clone(),
        };
        rows.by_id.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: i64, changes: &NewUser) -> Result<Option<User>, StoreError> {
        let mut rows = self.rows();
        if !rows.by_id.contains_key(&id) {
            return Ok(None);
        }
        if rows.email_taken(&changes.email, Some(id)) {
            return Err(StoreError::EmailTaken);
        }
        let user = User {
            id,
            name: changes.name.clone(),
            email: changes.email.clone(),
        };
        rows.by_id.insert(id, user.clone());
        Ok(Some(user))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.rows().by_id.remove(&id).is_some())
    }
}
