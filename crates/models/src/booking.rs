use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

pub const NOTES_MAX: usize = 2000;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_id: Uuid,
    pub service_title: String,
    pub provider_id: String,
    pub customer_id: String,
    pub customer_email: String,
    pub price_minor: i64,
    pub scheduled_for: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Text")]
    pub notes: String,
    pub status: String,
    pub payment_reference: Option<String>,
    pub reviewed: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::service_listing::Entity",
        from = "Column::ServiceId",
        to = "super::service_listing::Column::Id"
    )]
    ServiceListing,
}

impl Related<super::service_listing::Entity> for Entity {
    fn to() -> RelationDef { Relation::ServiceListing.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Allowed edges: pending -> confirmed | cancelled, confirmed -> completed.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Completed)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for BookingStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(ModelError::validation(format!("unknown booking status `{other}`"))),
        }
    }
}

/// Parse the requested appointment time. Accepts RFC 3339 or the
/// `datetime-local` form `YYYY-MM-DDTHH:MM[:SS]`, the latter read as UTC.
pub fn parse_schedule(raw: &str) -> Result<DateTime<Utc>, ModelError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ModelError::validation("preferred date required"));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ModelError::validation(format!("invalid date `{raw}`")))
}

pub fn validate_notes(notes: &str) -> Result<(), ModelError> {
    if notes.chars().count() > NOTES_MAX {
        return Err(ModelError::validation(format!("notes longer than {NOTES_MAX} characters")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn transition_table() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Confirmed));
    }

    #[test]
    fn parses_datetime_local_and_rfc3339() {
        let local = parse_schedule("2026-03-14T09:30").unwrap();
        assert_eq!((local.year(), local.month(), local.day()), (2026, 3, 14));
        assert_eq!((local.hour(), local.minute()), (9, 30));

        let zoned = parse_schedule("2026-03-14T09:30:00+05:30").unwrap();
        assert_eq!((zoned.hour(), zoned.minute()), (4, 0));
    }

    #[test]
    fn rejects_missing_or_garbled_dates() {
        assert!(parse_schedule("").is_err());
        assert!(parse_schedule("tomorrow").is_err());
    }

    #[test]
    fn status_strings() {
        assert_eq!("cancelled".parse::<BookingStatus>().unwrap(), BookingStatus::Cancelled);
        assert!("done".parse::<BookingStatus>().is_err());
    }
}
