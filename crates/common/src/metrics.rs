use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static BOOKINGS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "marketplace_bookings_created_total",
        "Total bookings requested by customers"
    )
    .expect("register bookings_created_total")
});

pub static BOOKING_TRANSITIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "marketplace_booking_transitions_total",
        "Booking status transitions by target status",
        &["status"]
    )
    .expect("register booking_transitions_total")
});

pub static REVIEWS_SUBMITTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "marketplace_reviews_submitted_total",
        "Total reviews submitted"
    )
    .expect("register reviews_submitted_total")
});

pub static MESSAGES_SENT_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "marketplace_messages_sent_total",
        "Total chat messages sent"
    )
    .expect("register messages_sent_total")
});

pub static BOOSTS_PAID_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "marketplace_boosts_paid_total",
        "Total boost orders confirmed as paid"
    )
    .expect("register boosts_paid_total")
});

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_export() {
        BOOKINGS_CREATED_TOTAL.inc();
        BOOKING_TRANSITIONS_TOTAL.with_label_values(&["confirmed"]).inc();
        let (status, body) = encode_metrics();
        assert_eq!(status, axum::http::StatusCode::OK);
        assert!(body.contains("marketplace_bookings_created_total"));
        assert!(body.contains("status=\"confirmed\""));
    }
}
