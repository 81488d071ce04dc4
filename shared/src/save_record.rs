use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Durable snapshot of the lobby economy, as written to the save file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", from = "StoredRecord")]
pub struct SaveRecord {
    pub total_coins: u64,
    pub last_claim_date: Option<NaiveDate>,
    #[serde(rename = "currentDayIndex")]
    pub day_index: usize,
    #[serde(rename = "nextRefillTimeUTC")]
    pub next_refill_at: DateTime<Utc>,
}

impl SaveRecord {
    /// First-run record: no claim yet, ladder at day 0.
    pub fn new_default(starting_coins: u64, next_refill_at: DateTime<Utc>) -> Self {
        Self {
            total_coins: starting_coins,
            last_claim_date: None,
            day_index: 0,
            next_refill_at,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// On-disk shape. Older saves used `lastLoginDate`; when a file carries both
/// keys, `lastClaimDate` wins.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    total_coins: u64,
    #[serde(default, deserialize_with = "calendar_date::deserialize")]
    last_claim_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "calendar_date::deserialize")]
    last_login_date: Option<NaiveDate>,
    #[serde(rename = "currentDayIndex")]
    day_index: usize,
    #[serde(rename = "nextRefillTimeUTC")]
    next_refill_at: DateTime<Utc>,
}

impl From<StoredRecord> for SaveRecord {
    fn from(stored: StoredRecord) -> Self {
        Self {
            total_coins: stored.total_coins,
            last_claim_date: stored.last_claim_date.or(stored.last_login_date),
            day_index: stored.day_index,
            next_refill_at: stored.next_refill_at,
        }
    }
}

/// Older saves stored a full login timestamp instead of a plain date.
mod calendar_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{de::Error, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };

        if let Ok(date) = raw.parse::<NaiveDate>() {
            return Ok(Some(date));
        }
        if let Ok(stamp) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(Some(stamp.date_naive()));
        }
        if let Ok(stamp) = raw.parse::<NaiveDateTime>() {
            return Ok(Some(stamp.date()));
        }

        Err(D::Error::custom(format!("invalid calendar date: {}", raw)))
    }
}
