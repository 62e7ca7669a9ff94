//! Event id generation.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source of unique event ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random UUID v4 ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// `<unix-millis>-<base36 suffix>` ids, for environments where UUIDs are
/// unwanted.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampIdGenerator;

impl IdGenerator for TimestampIdGenerator {
    fn next_id(&mut self) -> String {
        let random = Uuid::new_v4().as_u128() as u64;
        format!("{}-{}", Utc::now().timestamp_millis(), to_base36(random, 7))
    }
}

/// Deterministic `prefix-1`, `prefix-2`, ... ids.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        SequentialIds {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Which generator new events get their ids from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    #[default]
    Uuid,
    Timestamp,
}

impl IdScheme {
    pub fn generator(self) -> Box<dyn IdGenerator> {
        match self {
            IdScheme::Uuid => Box::new(UuidGenerator),
            IdScheme::Timestamp => Box::new(TimestampIdGenerator),
        }
    }
}

impl std::fmt::Display for IdScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdScheme::Uuid => write!(f, "uuid"),
            IdScheme::Timestamp => write!(f, "timestamp"),
        }
    }
}

fn to_base36(mut n: u64, len: usize) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
