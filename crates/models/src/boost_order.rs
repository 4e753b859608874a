use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "boost_order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_id: Uuid,
    pub provider_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub status: String,
    pub payment_reference: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub paid_at: Option<DateTimeWithTimeZone>,
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

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoostStatus {
    Created,
    Paid,
}

impl BoostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoostStatus::Created => "created",
            BoostStatus::Paid => "paid",
        }
    }
}

impl FromStr for BoostStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(BoostStatus::Created),
            "paid" => Ok(BoostStatus::Paid),
            other => Err(ModelError::validation(format!("unknown boost status `{other}`"))),
        }
    }
}

/// Checkout references are opaque ids handed back by the payment widget.
pub fn validate_payment_reference(reference: &str) -> Result<(), ModelError> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(ModelError::validation("payment reference required"));
    }
    if reference.len() > 128 {
        return Err(ModelError::validation("payment reference too long"));
    }
    Ok(())
}
