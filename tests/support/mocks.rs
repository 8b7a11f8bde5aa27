// tests/support/mocks.rs
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use codegrant::application::{
    ApplicationResult,
    error::ApplicationError,
    ports::{
        security::{PasswordHasher, SecretGenerator},
        time::Clock,
    },
};
use codegrant::infrastructure::security::secrets::OsRngSecretGenerator;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(at),
        }
    }

    pub fn starting_now() -> Self {
        // Whole seconds keep JWT timestamps and record timestamps comparable.
        let now = Utc::now().timestamp();
        Self::new(Utc.timestamp_opt(now, 0).unwrap())
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Argon2 is far too slow for debug-mode test suites; this keeps the
/// hash/verify contract without the cost.
#[derive(Default)]
pub struct PlainPasswordHasher;

#[async_trait]
impl PasswordHasher for PlainPasswordHasher {
    async fn hash(&self, password: &str) -> ApplicationResult<String> {
        Ok(format!("plain${password}"))
    }

    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<()> {
        match expected_hash.strip_prefix("plain$") {
            Some(stored) if stored == password => Ok(()),
            Some(_) => Err(ApplicationError::unauthorized("invalid credentials")),
            None => Err(ApplicationError::infrastructure("unknown hash format")),
        }
    }
}

/// Hands out queued values first, then real random ones.
#[derive(Default)]
pub struct ScriptedSecrets {
    queue: Mutex<VecDeque<String>>,
}

impl ScriptedSecrets {
    pub fn push(&self, value: impl Into<String>) {
        self.queue.lock().unwrap().push_back(value.into());
    }
}

impl SecretGenerator for ScriptedSecrets {
    fn generate(&self, bytes: usize) -> String {
        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| OsRngSecretGenerator.generate(bytes))
    }
}
