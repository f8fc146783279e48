//! Derives cross-rates and percentage changes from raw rate tables.
//!
//! Everything here is a pure function of its inputs. Missing currencies,
//! missing baselines and zero divisors all collapse to `0.0` instead of
//! producing errors, `NaN` or infinities.
use crate::core::config::{CrossCurrency, RatesConfig};
use crate::core::rates::{Baseline, Fetched, RateTable};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Percentage change of `current` against `baseline`, `0.0` when the
/// baseline is zero.
pub fn percent_change(current: f64, baseline: f64) -> f64 {
    if baseline == 0.0 {
        return 0.0;
    }
    let change = ((current - baseline) / baseline) * 100.0;
    if change.is_finite() { change } else { 0.0 }
}

/// Rate of the quote currency per `unit` of another currency, derived through
/// the shared base. Returns `0.0` if either side is missing.
pub fn cross_rate(quote_per_base: Option<f64>, other_per_base: Option<f64>, unit: f64) -> f64 {
    match (quote_per_base, other_per_base) {
        (Some(quote), Some(other)) if other != 0.0 => {
            let rate = (quote / other) * unit;
            if rate.is_finite() { rate } else { 0.0 }
        }
        _ => 0.0,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeMetric {
    pub vs_last_year: f64,
    pub vs_seven_day: f64,
    pub vs_thirty_day: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baselines {
    pub last_year: Baseline,
    pub seven_day: Baseline,
    pub thirty_day: Baseline,
}

impl Baselines {
    pub fn any_degraded(&self) -> bool {
        self.last_year.is_degraded() || self.seven_day.is_degraded() || self.thirty_day.is_degraded()
    }
}

/// A derived rate such as `EUR/KRW` or `JPY(100)/KRW`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRate {
    pub pair: String,
    pub currency: String,
    pub unit: f64,
    pub rate: f64,
}

/// A tracked `BASE/CURRENCY` pair and how it moved against each baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairChange {
    pub pair: String,
    pub currency: String,
    pub rate: f64,
    pub changes: ChangeMetric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub baselines: Baselines,
    pub derived_rates: Vec<DerivedRate>,
    pub changes: Vec<PairChange>,
}

/// Compares `current` against the three historical horizons.
///
/// A horizon whose table is unavailable is replaced by `current`, so every
/// change on that horizon evaluates to zero.
pub fn compare(
    config: &RatesConfig,
    current: &RateTable,
    last_year: Fetched<RateTable>,
    seven_day: Fetched<RateTable>,
    thirty_day: Fetched<RateTable>,
) -> Comparison {
    let baselines = Baselines {
        last_year: Baseline::resolve(last_year, current),
        seven_day: Baseline::resolve(seven_day, current),
        thirty_day: Baseline::resolve(thirty_day, current),
    };

    let derived_rates = config
        .cross
        .iter()
        .map(|cross| derive_rate(&config.quote_currency, cross, current))
        .collect();

    let changes = config
        .tracked
        .iter()
        .map(|currency| pair_change(&config.base_currency, currency, current, &baselines))
        .collect();

    Comparison {
        baselines,
        derived_rates,
        changes,
    }
}

fn derive_rate(quote_currency: &str, cross: &CrossCurrency, current: &RateTable) -> DerivedRate {
    let rate = cross_rate(
        current.get(quote_currency),
        current.get(&cross.currency),
        cross.unit,
    );
    let pair = if cross.unit == 1.0 {
        format!("{}/{quote_currency}", cross.currency)
    } else {
        format!("{}({})/{quote_currency}", cross.currency, cross.unit)
    };
    debug!(%pair, rate, "Derived cross rate");
    DerivedRate {
        pair,
        currency: cross.currency.clone(),
        unit: cross.unit,
        rate,
    }
}

fn pair_change(
    base_currency: &str,
    currency: &str,
    current: &RateTable,
    baselines: &Baselines,
) -> PairChange {
    let pair = format!("{base_currency}/{currency}");
    let Some(rate) = current.get(currency) else {
        debug!(%pair, "Currency missing from current rates, reporting zero change");
        return PairChange {
            pair,
            currency: currency.to_string(),
            rate: 0.0,
            changes: ChangeMetric::default(),
        };
    };

    let against = |baseline: &Baseline| percent_change(rate, baseline.rates.get(currency).unwrap_or(0.0));
    let changes = ChangeMetric {
        vs_last_year: against(&baselines.last_year),
        vs_seven_day: against(&baselines.seven_day),
        vs_thirty_day: against(&baselines.thirty_day),
    };
    debug!(%pair, rate, ?changes, "Computed pair changes");

    PairChange {
        pair,
        currency: currency.to_string(),
        rate,
        changes,
    }
}
