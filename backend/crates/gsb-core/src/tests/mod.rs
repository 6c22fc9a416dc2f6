mod feed;

use crate::Business;

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

pub(crate) const OWNER: Uuid = Uuid::from_u128(0xA11CE);
pub(crate) const OTHER_OWNER: Uuid = Uuid::from_u128(0xB0B);

pub(crate) fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

/// Minutes after a fixed epoch; larger is newer
pub(crate) fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
}

pub(crate) fn business(n: u128, name: &str, minutes: i64) -> Business {
    Business {
        id: id(n),
        name: name.to_string(),
        category: "Food".to_string(),
        city: Some("NY".to_string()),
        owner: OWNER,
        created_at: at(minutes),
    }
}
