//! Read-side query arguments for the country list.
//!
//! Arguments are validated here, before any store access, so an unsupported
//! sort key never reaches the database.

use std::str::FromStr;

use crate::error::CoreError;

/// Supported orderings for the country list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountrySort {
    /// Descending by estimated GDP, null estimates last.
    GdpDesc,
}

impl FromStr for CountrySort {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "gdp_desc" => Ok(Self::GdpDesc),
            other => Err(CoreError::InvalidArgument {
                field: "sort",
                value: other.to_string(),
            }),
        }
    }
}

/// Conjunctive equality filters plus an optional ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryFilter {
    /// Exact match on `region`.
    pub region: Option<String>,
    /// Exact match on `currency_code`.
    pub currency: Option<String>,
    pub sort: Option<CountrySort>,
}

impl CountryFilter {
    /// Build a filter from raw query-string values.
    ///
    /// Empty strings count as "not given". A non-empty sort value other than
    /// `gdp_desc` is rejected.
    pub fn from_params(
        region: Option<String>,
        currency: Option<String>,
        sort: Option<String>,
    ) -> Result<Self, CoreError> {
        let sort = match non_empty(sort) {
            Some(raw) => Some(raw.parse::<CountrySort>()?),
            None => None,
        };

        Ok(Self {
            region: non_empty(region),
            currency: non_empty(currency),
            sort,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Case-folded form of a country name, used as the natural key.
///
/// Unicode lowercasing here and PostgreSQL's `LOWER(name)` can disagree for
/// some code points. On PostgreSQL the `uq_countries_name_lower` index and the
/// `ON CONFLICT (LOWER(name))` insert decide what counts as the same name.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}
