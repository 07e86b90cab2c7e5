//! Integration tests for `CountryRepo` against a real PostgreSQL database.

use atlas_core::query::{CountryFilter, CountrySort};
use atlas_db::models::country::{CountryWrite, UpsertPlan};
use atlas_db::repositories::CountryRepo;
use chrono::{DurationRound, TimeDelta, Utc};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write(name: &str, region: &str, currency: Option<&str>, gdp: Option<f64>) -> CountryWrite {
    CountryWrite {
        name: name.to_string(),
        capital: Some(format!("{name} City")),
        region: Some(region.to_string()),
        population: 1_000_000,
        currency_code: currency.map(str::to_string),
        exchange_rate: currency.map(|_| 10.0),
        estimated_gdp: gdp,
        flag_url: None,
        last_refreshed_at: Utc::now()
            .duration_trunc(TimeDelta::microseconds(1))
            .unwrap(),
    }
}

async fn seed(pool: &PgPool) {
    let plan = UpsertPlan {
        creates: vec![
            write("Nigeria", "Africa", Some("NGN"), Some(100.0)),
            write("Ghana", "Africa", Some("GHS"), Some(5.0)),
            write("Japan", "Asia", Some("JPY"), Some(5_000.0)),
            write("Atlantis", "Oceania", Some("XXX"), None),
        ],
        updates: vec![],
    };
    CountryRepo::apply_upserts(pool, &plan).await.unwrap();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_table_status(pool: PgPool) {
    assert_eq!(CountryRepo::count(&pool).await.unwrap(), 0);
    assert_eq!(CountryRepo::latest_refresh(&pool).await.unwrap(), None);
    assert!(CountryRepo::list(&pool, &CountryFilter::default())
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_by_name_ignores_case(pool: PgPool) {
    seed(&pool).await;
    let found = CountryRepo::find_by_name(&pool, "nIgErIa").await.unwrap().unwrap();
    assert_eq!(found.name, "Nigeria");
    assert_eq!(found.capital.as_deref(), Some("Nigeria City"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_by_names_matches_any_casing(pool: PgPool) {
    seed(&pool).await;
    let rows = CountryRepo::find_by_names(&pool, &["GHANA".into(), "japan".into(), "Mars".into()])
        .await
        .unwrap();
    let names: Vec<&str> = rows.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Ghana", "Japan"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn gdp_desc_orders_nulls_last(pool: PgPool) {
    seed(&pool).await;
    let filter = CountryFilter {
        sort: Some(CountrySort::GdpDesc),
        ..Default::default()
    };
    let names: Vec<String> = CountryRepo::list(&pool, &filter)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Japan", "Nigeria", "Ghana", "Atlantis"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn region_and_currency_filters(pool: PgPool) {
    seed(&pool).await;
    let africa = CountryFilter {
        region: Some("Africa".into()),
        ..Default::default()
    };
    assert_eq!(CountryRepo::list(&pool, &africa).await.unwrap().len(), 2);

    let ngn_in_africa = CountryFilter {
        region: Some("Africa".into()),
        currency: Some("NGN".into()),
        sort: None,
    };
    let rows = CountryRepo::list(&pool, &ngn_in_africa).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].currency_code.as_deref(), Some("NGN"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn updates_overwrite_in_place(pool: PgPool) {
    seed(&pool).await;
    let existing = CountryRepo::find_by_name(&pool, "Ghana").await.unwrap().unwrap();

    let mut replacement = write("GHANA", "West Africa", None, Some(0.0));
    replacement.capital = None;
    let plan = UpsertPlan {
        creates: vec![],
        updates: vec![(existing.id, replacement.clone())],
    };
    let rows = CountryRepo::apply_upserts(&pool, &plan).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, existing.id);
    assert_eq!(rows[0].name, "GHANA");
    assert_eq!(rows[0].capital, None);
    assert_eq!(rows[0].estimated_gdp, Some(0.0));
    assert_eq!(rows[0].last_refreshed_at, replacement.last_refreshed_at);
    assert_eq!(CountryRepo::count(&pool).await.unwrap(), 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn conflicting_create_falls_through_to_update(pool: PgPool) {
    seed(&pool).await;
    let plan = UpsertPlan {
        creates: vec![write("japan", "Asia", Some("JPY"), Some(1.0))],
        updates: vec![],
    };
    CountryRepo::apply_upserts(&pool, &plan).await.unwrap();

    assert_eq!(CountryRepo::count(&pool).await.unwrap(), 4);
    let japan = CountryRepo::find_by_name(&pool, "JAPAN").await.unwrap().unwrap();
    assert_eq!(japan.name, "japan");
    assert_eq!(japan.estimated_gdp, Some(1.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_by_name_removes_one_row(pool: PgPool) {
    seed(&pool).await;
    assert!(CountryRepo::delete_by_name(&pool, "ghana").await.unwrap());
    assert!(!CountryRepo::delete_by_name(&pool, "ghana").await.unwrap());
    assert_eq!(CountryRepo::count(&pool).await.unwrap(), 3);
    assert!(CountryRepo::find_by_name(&pool, "Ghana").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_for_deleted_row_reinserts_it(pool: PgPool) {
    seed(&pool).await;
    let stale = CountryRepo::find_by_name(&pool, "Ghana").await.unwrap().unwrap();
    assert!(CountryRepo::delete_by_name(&pool, "Ghana").await.unwrap());

    let nigeria = CountryRepo::find_by_name(&pool, "Nigeria").await.unwrap().unwrap();
    let plan = UpsertPlan {
        creates: vec![],
        updates: vec![
            (stale.id, write("Ghana", "Africa", Some("GHS"), Some(7.0))),
            (nigeria.id, write("Nigeria", "Africa", Some("NGN"), Some(200.0))),
        ],
    };
    let rows = CountryRepo::apply_upserts(&pool, &plan).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(CountryRepo::count(&pool).await.unwrap(), 4);
    let ghana = CountryRepo::find_by_name(&pool, "ghana").await.unwrap().unwrap();
    assert_ne!(ghana.id, stale.id);
    assert_eq!(ghana.estimated_gdp, Some(7.0));
    let nigeria_after = CountryRepo::find_by_name(&pool, "nigeria").await.unwrap().unwrap();
    assert_eq!(nigeria_after.id, nigeria.id);
    assert_eq!(nigeria_after.estimated_gdp, Some(200.0));
}
