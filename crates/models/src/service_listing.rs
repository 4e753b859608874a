use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

pub const TITLE_MAX: usize = 160;
pub const LOCATION_MAX: usize = 160;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_listing")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub provider_id: String,
    pub provider_name: String,
    pub title: String,
    pub category: String,
    pub price_minor: i64,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub location: String,
    #[sea_orm(column_type = "Double")]
    pub average_rating: f64,
    pub review_count: i32,
    pub featured_until: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_profile::Entity",
        from = "Column::ProviderId",
        to = "super::user_profile::Column::Id"
    )]
    Provider,
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef { Relation::Provider.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fixed set of trades a listing can be filed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Electrician,
    Plumber,
    Cleaning,
    Tutor,
    Painter,
    Mechanic,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Electrician,
        Category::Plumber,
        Category::Cleaning,
        Category::Tutor,
        Category::Painter,
        Category::Mechanic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electrician => "Electrician",
            Category::Plumber => "Plumber",
            Category::Cleaning => "Cleaning",
            Category::Tutor => "Tutor",
            Category::Painter => "Painter",
            Category::Mechanic => "Mechanic",
        }
    }

    /// Parse a browse filter; `"All"` (any case) and blank mean "no filter".
    pub fn parse_filter(raw: Option<&str>) -> Result<Option<Category>, ModelError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
            Some(s) => s.parse().map(Some),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Category {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::validation(format!("unknown category `{s}`")))
    }
}

fn required(field: &str, value: &str, max: Option<usize>) -> Result<(), ModelError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ModelError::validation(format!("{field} required")));
    }
    if let Some(max) = max {
        if value.chars().count() > max {
            return Err(ModelError::validation(format!("{field} longer than {max} characters")));
        }
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ModelError> { required("title", title, Some(TITLE_MAX)) }

pub fn validate_description(description: &str) -> Result<(), ModelError> { required("description", description, None) }

pub fn validate_location(location: &str) -> Result<(), ModelError> { required("location", location, Some(LOCATION_MAX)) }

pub fn validate_price(price_minor: i64) -> Result<(), ModelError> {
    if price_minor <= 0 {
        return Err(ModelError::validation("price must be positive"));
    }
    Ok(())
}
