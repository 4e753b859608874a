use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// `role` is `customer` or `provider`.
#[derive(ToSchema)]
pub struct RegisterRequestDoc { pub role: String }

#[derive(ToSchema)]
pub struct UserProfileDoc {
    pub id: String,
    pub email: String,
    pub role: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct ProfileUpdateDoc { pub display_name: Option<String>, pub bio: Option<String> }

#[derive(ToSchema)]
pub struct NewListingDoc {
    pub title: String,
    /// Electrician, Plumber, Cleaning, Tutor, Painter or Mechanic
    pub category: String,
    /// Price in minor units (paise)
    pub price_minor: i64,
    pub description: String,
    pub location: String,
}

#[derive(ToSchema)]
pub struct ListingDoc {
    pub id: Uuid,
    pub provider_id: String,
    pub provider_name: String,
    pub title: String,
    pub category: String,
    pub price_minor: i64,
    pub description: String,
    pub location: String,
    pub average_rating: f64,
    pub review_count: i32,
    pub featured_until: Option<String>,
    pub featured: bool,
    pub created_at: String,
}

#[derive(ToSchema)]
pub struct NewBookingDoc {
    pub service_id: Uuid,
    /// RFC 3339 or `YYYY-MM-DDTHH:MM`
    pub scheduled_for: String,
    pub notes: Option<String>,
    pub payment_reference: Option<String>,
}

#[derive(ToSchema)]
pub struct BookingDoc {
    pub id: Uuid,
    pub service_id: Uuid,
    pub service_title: String,
    pub provider_id: String,
    pub customer_id: String,
    pub customer_email: String,
    pub price_minor: i64,
    pub scheduled_for: String,
    pub notes: String,
    /// pending, confirmed, completed or cancelled
    pub status: String,
    pub payment_reference: Option<String>,
    pub reviewed: bool,
}

#[derive(ToSchema)]
pub struct StatusChangeDoc { pub status: String }

#[derive(ToSchema)]
pub struct NewReviewDoc { pub rating: i16, pub comment: Option<String> }

#[derive(ToSchema)]
pub struct SendMessageDoc { pub text: String }

#[derive(ToSchema)]
pub struct ConfirmRequestDoc { pub payment_reference: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::register,
        crate::routes::users::me,
        crate::routes::users::update_profile,
        crate::routes::users::provider_page,
        crate::routes::listings::search,
        crate::routes::listings::create_listing,
        crate::routes::listings::get_listing,
        crate::routes::bookings::create_booking,
        crate::routes::bookings::list_bookings,
        crate::routes::bookings::update_status,
        crate::routes::reviews::submit_review,
        crate::routes::reviews::list_reviews,
        crate::routes::chat::send_message,
        crate::routes::chat::list_messages,
        crate::routes::boosts::create_order,
        crate::routes::boosts::confirm,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequestDoc,
            UserProfileDoc,
            ProfileUpdateDoc,
            NewListingDoc,
            ListingDoc,
            NewBookingDoc,
            BookingDoc,
            StatusChangeDoc,
            NewReviewDoc,
            SendMessageDoc,
            ConfirmRequestDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "users"),
        (name = "services"),
        (name = "bookings"),
        (name = "reviews"),
        (name = "chat"),
        (name = "boosts")
    )
)]
pub struct ApiDoc;
