use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use models::user_profile::Role;
use service::auth::Identity;
use service::listings::domain::{ListingFilter, NewListing};
use service::pagination::Pagination;
use service::repo::{InMemoryRepository, Repositories};
use service::{Marketplace, MarketplaceSettings};

fn seeded_market(rt: &tokio::runtime::Runtime) -> Marketplace {
    let market = Marketplace::new(
        Repositories::from_backend(Arc::new(InMemoryRepository::default())),
        MarketplaceSettings::default(),
    );
    let provider = Identity::new("bench-provider", "bench@test.com");
    rt.block_on(async {
        market.users.register_profile(&provider, Role::Provider).await.unwrap();
        for i in 0..2_000 {
            let category = ["Electrician", "Plumber", "Tutor", "Painter"][i % 4];
            let input = NewListing {
                title: format!("{category} service #{i}"),
                category: category.into(),
                price_minor: 10_000 + i as i64,
                description: "Reliable and insured".into(),
                location: if i % 3 == 0 { "Pune".into() } else { "Mumbai".into() },
            };
            market.listings.create_listing(&provider, input).await.unwrap();
        }
    });
    market
}

fn bench_search(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build().unwrap();
    let market = seeded_market(&rt);

    c.bench_function("search_all_first_page", |b| {
        b.to_async(&rt).iter(|| async {
            market.listings.search_listings(&ListingFilter::default(), Pagination::default()).await.unwrap();
        })
    });

    let narrow = ListingFilter::new(None, Some("tutor"), Some("pune"));
    c.bench_function("search_keyword_location", |b| {
        b.to_async(&rt).iter(|| async {
            market.listings.search_listings(&narrow, Pagination::default()).await.unwrap();
        })
    });
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
