use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

pub const DISPLAY_NAME_MAX: usize = 80;
pub const BIO_MAX: usize = 1000;
/// Column widths of `user_profile.id` and `user_profile.email`.
pub const UID_MAX: usize = 128;
pub const EMAIL_MAX: usize = 255;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub email: String,
    pub role: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::service_listing::Entity")]
    ServiceListing,
}

impl Related<super::service_listing::Entity> for Entity {
    fn to() -> RelationDef { Relation::ServiceListing.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Marketplace role chosen at sign-up ("Hire" or "Work").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Provider,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Provider => "provider",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "provider" => Ok(Role::Provider),
            other => Err(ModelError::validation(format!("unknown role `{other}`"))),
        }
    }
}

pub fn validate_uid(uid: &str) -> Result<(), ModelError> {
    if uid.trim().is_empty() {
        return Err(ModelError::validation("uid required"));
    }
    if uid.chars().count() > UID_MAX {
        return Err(ModelError::validation(format!("uid longer than {UID_MAX} characters")));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let email = email.trim();
    if email.chars().count() > EMAIL_MAX {
        return Err(ModelError::validation(format!("email longer than {EMAIL_MAX} characters")));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ModelError::validation("invalid email")),
    }
}

/// Trim optional free text, mapping blank input to `None`.
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

pub fn validate_display_name(name: Option<&str>) -> Result<(), ModelError> {
    if name.is_some_and(|n| n.chars().count() > DISPLAY_NAME_MAX) {
        return Err(ModelError::validation(format!("display name longer than {DISPLAY_NAME_MAX} characters")));
    }
    Ok(())
}

pub fn validate_bio(bio: Option<&str>) -> Result<(), ModelError> {
    if bio.is_some_and(|b| b.chars().count() > BIO_MAX) {
        return Err(ModelError::validation(format!("bio longer than {BIO_MAX} characters")));
    }
    Ok(())
}
