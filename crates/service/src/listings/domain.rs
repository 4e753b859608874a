use chrono::{DateTime, Utc};
use models::service_listing::Category;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A provider's listed service with its review aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceListing {
    pub id: Uuid,
    pub provider_id: String,
    pub provider_name: String,
    pub title: String,
    pub category: Category,
    pub price_minor: i64,
    pub description: String,
    pub location: String,
    pub average_rating: f64,
    pub review_count: i32,
    pub featured_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceListing {
    pub fn is_featured(&self, now: DateTime<Utc>) -> bool {
        self.featured_until.is_some_and(|until| until > now)
    }
}

/// Listing form as submitted by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewListing {
    pub title: String,
    pub category: String,
    pub price_minor: i64,
    pub description: String,
    pub location: String,
}

/// Browse filter. Keyword and location are stored lowercased and trimmed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub category: Option<Category>,
    pub keyword: Option<String>,
    pub location: Option<String>,
}

impl ListingFilter {
    pub fn new(category: Option<Category>, keyword: Option<&str>, location: Option<&str>) -> Self {
        fn norm(v: Option<&str>) -> Option<String> {
            v.map(str::trim).filter(|v| !v.is_empty()).map(str::to_lowercase)
        }
        Self { category, keyword: norm(keyword), location: norm(location) }
    }

    /// In-process evaluation of the filter.
    pub fn matches(&self, listing: &ServiceListing) -> bool {
        if self.category.is_some_and(|c| c != listing.category) {
            return false;
        }
        if let Some(kw) = &self.keyword {
            let hit = listing.title.to_lowercase().contains(kw)
                || listing.description.to_lowercase().contains(kw)
                || listing.category.as_str().to_lowercase().contains(kw);
            if !hit {
                return false;
            }
        }
        if let Some(loc) = &self.location {
            if !listing.location.to_lowercase().contains(loc) {
                return false;
            }
        }
        true
    }
}

/// Build a `LIKE` pattern for a substring match, escaping wildcards.
pub fn like_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(title: &str, category: Category, location: &str) -> ServiceListing {
        let now = Utc::now();
        ServiceListing {
            id: Uuid::new_v4(),
            provider_id: "p".into(),
            provider_name: "P".into(),
            title: title.into(),
            category,
            price_minor: 5_000,
            description: "Licensed and insured".into(),
            location: location.into(),
            average_rating: 0.0,
            review_count: 0,
            featured_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn keyword_matches_title_description_or_category() {
        let l = listing("House Wiring", Category::Electrician, "Austin, TX");
        assert!(ListingFilter::new(None, Some("WIRING"), None).matches(&l));
        assert!(ListingFilter::new(None, Some("insured"), None).matches(&l));
        assert!(ListingFilter::new(None, Some("electric"), None).matches(&l));
        assert!(!ListingFilter::new(None, Some("plumbing"), None).matches(&l));
    }

    #[test]
    fn location_and_category_narrow_results() {
        let l = listing("Pipe repair", Category::Plumber, "New York, NY");
        assert!(ListingFilter::new(Some(Category::Plumber), None, Some("new york")).matches(&l));
        assert!(!ListingFilter::new(Some(Category::Tutor), None, None).matches(&l));
        assert!(!ListingFilter::new(None, None, Some("Boston")).matches(&l));
        assert!(ListingFilter::new(None, Some("   "), Some("")).matches(&l));
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("plain"), "%plain%");
    }

    #[test]
    fn featured_only_while_in_the_future() {
        let now = Utc::now();
        let mut l = listing("x", Category::Painter, "y");
        assert!(!l.is_featured(now));
        l.featured_until = Some(now + chrono::Duration::days(1));
        assert!(l.is_featured(now));
        l.featured_until = Some(now - chrono::Duration::seconds(1));
        assert!(!l.is_featured(now));
    }
}
