use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

pub const COMMENT_MAX: usize = 2000;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "review")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub booking_id: Uuid,
    pub service_id: Uuid,
    pub customer_id: String,
    pub rating: i16,
    #[sea_orm(column_type = "Text")]
    pub comment: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::service_listing::Entity",
        from = "Column::ServiceId",
        to = "super::service_listing::Column::Id"
    )]
    ServiceListing,
    #[sea_orm(
        belongs_to = "super::booking::Entity",
        from = "Column::BookingId",
        to = "super::booking::Column::Id"
    )]
    Booking,
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_rating(rating: i16) -> Result<(), ModelError> {
    if !(1..=5).contains(&rating) {
        return Err(ModelError::validation("rating must be between 1 and 5"));
    }
    Ok(())
}

pub fn validate_comment(comment: &str) -> Result<(), ModelError> {
    if comment.chars().count() > COMMENT_MAX {
        return Err(ModelError::validation(format!("comment longer than {COMMENT_MAX} characters")));
    }
    Ok(())
}
