//! Shared building blocks for the marketplace crates: logging setup,
//! HTTP payload types and Prometheus metrics.

pub mod types;
pub mod utils;
pub mod metrics;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }
}
