// src/infrastructure/security/authorization_code_store.rs
use crate::application::ports::authorization_code::{AuthorizationCodeStore, CodePredicate};
use crate::application::{ApplicationResult, error::ApplicationError};
use crate::domain::grant::AuthorizationCode;
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Mutex, MutexGuard};

/// Process-local store. Every operation holds the map lock for its whole
/// duration, which makes `delete_if_match` a single atomic step.
#[derive(Default)]
pub struct InMemoryAuthorizationCodeStore {
    // code -> record
    inner: Mutex<HashMap<String, AuthorizationCode>>,
}

impl InMemoryAuthorizationCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|guard| guard.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> ApplicationResult<MutexGuard<'_, HashMap<String, AuthorizationCode>>> {
        self.inner
            .lock()
            .map_err(|_| ApplicationError::infrastructure("authorization code store poisoned"))
    }
}

#[async_trait]
impl AuthorizationCodeStore for InMemoryAuthorizationCodeStore {
    async fn put(&self, record: AuthorizationCode) -> ApplicationResult<()> {
        let mut guard = self.lock()?;
        match guard.entry(record.code.clone()) {
            Entry::Occupied(_) => Err(ApplicationError::conflict(
                "authorization code already exists",
            )),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn get(&self, code: &str) -> ApplicationResult<Option<AuthorizationCode>> {
        Ok(self.lock()?.get(code).cloned())
    }

    async fn delete_if_match(
        &self,
        code: &str,
        predicate: CodePredicate<'_>,
    ) -> ApplicationResult<Option<AuthorizationCode>> {
        let mut guard = self.lock()?;
        let matches = guard.get(code).is_some_and(|record| predicate(record));
        Ok(if matches { guard.remove(code) } else { None })
    }
}
