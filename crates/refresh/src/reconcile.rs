//! Pure steps of a refresh: turning fetched records into store writes and
//! splitting them into creates and overwrites.

use std::collections::HashMap;

use atlas_core::gdp::{estimate_gdp, GdpMultiplier};
use atlas_core::query::name_key;
use atlas_core::types::{DbId, RateTable, Timestamp};
use atlas_db::models::country::{Country, CountryWrite, UpsertPlan};
use atlas_sources::RawCountry;

/// Derive one write per distinct (case-insensitive) name, in source order.
///
/// When a name repeats, the later record's values replace the earlier one's
/// but keep its position, matching what sequential per-record upserts would
/// leave behind.
pub fn build_writes(
    countries: &[RawCountry],
    rates: &RateTable,
    multiplier: &GdpMultiplier,
    now: Timestamp,
) -> Vec<CountryWrite> {
    let mut writes: Vec<CountryWrite> = Vec::with_capacity(countries.len());
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(countries.len());

    for raw in countries {
        let write = to_write(raw, rates, multiplier, now);
        match positions.get(&name_key(&write.name)) {
            Some(&idx) => writes[idx] = write,
            None => {
                positions.insert(name_key(&write.name), writes.len());
                writes.push(write);
            }
        }
    }
    writes
}

fn to_write(
    raw: &RawCountry,
    rates: &RateTable,
    multiplier: &GdpMultiplier,
    now: Timestamp,
) -> CountryWrite {
    let currency_code = raw.primary_currency_code().map(str::to_string);
    let population = i64::try_from(raw.population).unwrap_or(i64::MAX);
    let estimate = estimate_gdp(population, currency_code.as_deref(), rates, multiplier);

    CountryWrite {
        name: raw.name.clone(),
        capital: non_empty(&raw.capital),
        region: non_empty(&raw.region),
        population,
        currency_code,
        exchange_rate: estimate.exchange_rate,
        estimated_gdp: estimate.estimated_gdp,
        flag_url: non_empty(&raw.flag),
        last_refreshed_at: now,
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// Pair each write with the existing row of the same name, if any.
pub fn plan_upserts(writes: Vec<CountryWrite>, existing: &[Country]) -> UpsertPlan {
    let ids: HashMap<String, DbId> = existing
        .iter()
        .map(|c| (name_key(&c.name), c.id))
        .collect();

    let mut plan = UpsertPlan::default();
    for write in writes {
        match ids.get(&name_key(&write.name)) {
            Some(&id) => plan.updates.push((id, write)),
            None => plan.creates.push(write),
        }
    }
    plan
}

/// Reorder stored rows to follow `names`; rows with no matching name go last.
pub fn in_source_order(names: &[String], mut rows: Vec<Country>) -> Vec<Country> {
    let order: HashMap<String, usize> = names
        .iter()
        .enumerate()
        .map(|(i, n)| (name_key(n), i))
        .collect();
    rows.sort_by_key(|c| order.get(&name_key(&c.name)).copied().unwrap_or(usize::MAX));
    rows
}

#[cfg(test)]
mod tests {
    use atlas_sources::CurrencyDescriptor;
    use chrono::Utc;

    use super::*;

    fn raw(name: &str, population: u64, currency: Option<&str>) -> RawCountry {
        RawCountry {
            name: name.to_string(),
            capital: Some(String::new()),
            region: Some("Africa".to_string()),
            population,
            flag: None,
            currencies: currency.map(|code| {
                vec![CurrencyDescriptor {
                    code: Some(code.to_string()),
                    name: None,
                    symbol: None,
                }]
            }),
        }
    }

    fn rates() -> RateTable {
        [("NGN".to_string(), 1600.0), ("GHS".to_string(), 15.0)]
            .into_iter()
            .collect()
    }

    fn row(id: DbId, name: &str) -> Country {
        Country {
            id,
            name: name.to_string(),
            capital: None,
            region: None,
            population: 0,
            currency_code: None,
            exchange_rate: None,
            estimated_gdp: None,
            flag_url: None,
            last_refreshed_at: Utc::now(),
        }
    }

    #[test]
    fn writes_follow_estimation_policies() {
        let now = Utc::now();
        let writes = build_writes(
            &[
                raw("Nigeria", 206_139_589, Some("NGN")),
                raw("Antarctica", 1_000, None),
                raw("Atlantis", 10, Some("XXX")),
            ],
            &rates(),
            &GdpMultiplier::seeded(9),
            now,
        );

        assert_eq!(writes.len(), 3);
        assert_eq!(writes[0].exchange_rate, Some(1600.0));
        assert!(writes[0].estimated_gdp.is_some());
        assert_eq!(writes[1].currency_code, None);
        assert_eq!(writes[1].estimated_gdp, Some(0.0));
        assert_eq!(writes[2].currency_code.as_deref(), Some("XXX"));
        assert_eq!(writes[2].estimated_gdp, None);
        assert!(writes.iter().all(|w| w.last_refreshed_at == now));
    }

    #[test]
    fn empty_optional_text_becomes_none() {
        let writes = build_writes(
            &[raw("Chad", 1, None)],
            &rates(),
            &GdpMultiplier::seeded(1),
            Utc::now(),
        );
        assert_eq!(writes[0].capital, None);
        assert_eq!(writes[0].region.as_deref(), Some("Africa"));
    }

    #[test]
    fn repeated_names_collapse_to_last_values_in_first_position() {
        let mut second = raw("GHANA", 2, Some("GHS"));
        second.region = Some("West Africa".to_string());

        let writes = build_writes(
            &[raw("Ghana", 1, None), raw("Togo", 3, None), second],
            &rates(),
            &GdpMultiplier::seeded(1),
            Utc::now(),
        );

        let names: Vec<&str> = writes.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["GHANA", "Togo"]);
        assert_eq!(writes[0].population, 2);
        assert_eq!(writes[0].region.as_deref(), Some("West Africa"));
    }

    #[test]
    fn plan_matches_existing_rows_case_insensitively() {
        let writes = build_writes(
            &[raw("nigeria", 5, None), raw("Kenya", 6, None)],
            &rates(),
            &GdpMultiplier::seeded(1),
            Utc::now(),
        );
        let plan = plan_upserts(writes, &[row(7, "Nigeria")]);

        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].0, 7);
        assert_eq!(plan.updates[0].1.name, "nigeria");
        assert_eq!(plan.creates.len(), 1);
        assert_eq!(plan.creates[0].name, "Kenya");
    }

    #[test]
    fn rows_are_put_back_in_source_order() {
        let names = vec!["Chad".to_string(), "Benin".to_string(), "Angola".to_string()];
        let rows = vec![row(3, "angola"), row(1, "Chad"), row(2, "Benin")];
        let ordered: Vec<DbId> = in_source_order(&names, rows).iter().map(|c| c.id).collect();
        assert_eq!(ordered, vec![1, 2, 3]);
    }
}
