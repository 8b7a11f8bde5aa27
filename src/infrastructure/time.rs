use crate::application::ports::time::Clock;
use chrono::{DateTime, Utc};

/// Wall clock used by the server binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
