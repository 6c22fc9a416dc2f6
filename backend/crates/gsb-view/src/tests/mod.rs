
use gsb_core::{Business, Identity};

use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

pub(crate) const OWNER: Uuid = Uuid::from_u128(0xA11CE);
pub(crate) const OTHER_OWNER: Uuid = Uuid::from_u128(0xB0B);

pub(crate) fn owner() -> Identity {
    Identity::new(OWNER, "alice@example.com")
}

pub(crate) fn other_user() -> Identity {
    Identity::new(OTHER_OWNER, "bob@example.com")
}

pub(crate) fn business(n: u128, owner: Uuid, city: Option<&str>) -> Business {
    Business {
        id: Uuid::from_u128(n),
        name: format!("Business {n}"),
        category: "Food".to_string(),
        city: city.map(String::from),
        owner,
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(n as i64),
    }
}
