use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::{BreakdownKind, HitOutcome, SummaryValues};

/// Round summary statistic plotted on a line chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    FairwayHit,
    GreenHit,
    Putts,
    Penalties,
    #[serde(rename = "par_3")]
    Par3,
    #[serde(rename = "par_4")]
    Par4,
    #[serde(rename = "par_5")]
    Par5,
}

impl StatKind {
    pub fn value_of(&self, summary: &SummaryValues) -> Option<Decimal> {
        match self {
            Self::FairwayHit => summary.fairway_hit_pct,
            Self::GreenHit => summary.green_hit_pct,
            Self::Putts => summary.avg_putts,
            Self::Penalties => Some(Decimal::from(summary.penalties)),
            Self::Par3 => summary.avg_par3,
            Self::Par4 => summary.avg_par4,
            Self::Par5 => summary.avg_par5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LineChartFilter {
    pub stat: StatKind,
    /// Only rounds teed off after this date.
    pub from_date: Option<NaiveDate>,
    /// Only rounds teed off within this duration, e.g. `720h`, `1.5h`, `90m` or `2w`.
    /// Units are `ns`, `us`, `ms`, `s`, `m`, `h`, `d` and `w`.
    pub since: Option<String>,
}

impl LineChartFilter {
    pub fn validate(&self) -> Result<(), String> {
        if self.from_date.is_some() && self.since.is_some() {
            return Err("cannot use both from_date and since parameters".to_string());
        }

        if let Some(ref since) = self.since {
            parse_since(since)?;
        }

        Ok(())
    }

    /// Rounds at or before the returned instant are excluded.
    pub fn lower_bound(&self, now: NaiveDateTime) -> Result<Option<NaiveDateTime>, String> {
        self.validate()?;

        if let Some(date) = self.from_date {
            return Ok(Some(date.and_time(chrono::NaiveTime::MIN)));
        }

        match self.since {
            Some(ref since) => now
                .checked_sub_signed(parse_since(since)?)
                .map(Some)
                .ok_or_else(|| format!("duration '{}' is out of range", since)),
            None => Ok(None),
        }
    }
}

/// Nanoseconds per duration unit.
fn unit_nanos(unit: &str) -> Option<i64> {
    match unit {
        "ns" => Some(1),
        "us" | "\u{b5}s" | "\u{3bc}s" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(1_000_000_000),
        "m" => Some(60 * 1_000_000_000),
        "h" => Some(3_600 * 1_000_000_000),
        "d" => Some(86_400 * 1_000_000_000),
        "w" => Some(604_800 * 1_000_000_000),
        _ => None,
    }
}

/// Parses durations such as `720h`, `1.5h`, `500ms`, `2w` or `1d12h30m`.
///
/// Each amount may carry a fraction. A bare `0` is the empty duration.
pub fn parse_since(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("since must not be empty".to_string());
    }
    if input == "0" {
        return Ok(Duration::zero());
    }

    let out_of_range = || format!("duration '{}' is out of range", input);
    let mut total = Decimal::ZERO;
    let mut rest = input;

    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_end);
        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);

        if number.is_empty() {
            return Err(format!("invalid duration '{}'", input));
        }
        if unit.is_empty() {
            return Err(format!("missing duration unit in '{}'", input));
        }

        let amount = Decimal::from_str(number)
            .map_err(|_| format!("invalid duration '{}'", input))?;
        let nanos = unit_nanos(unit)
            .ok_or_else(|| format!("invalid duration unit '{}' in '{}'", unit, input))?;

        total = amount
            .checked_mul(Decimal::from(nanos))
            .and_then(|part| total.checked_add(part))
            .ok_or_else(out_of_range)?;
        rest = tail;
    }

    total
        .trunc()
        .to_i64()
        .map(Duration::nanoseconds)
        .ok_or_else(out_of_range)
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PieChartFilter {
    pub kind: BreakdownKind,
}

/// One point of a line chart. `value` is null when the statistic is
/// undefined for the round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChartPoint {
    pub label: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PieSlice {
    pub bucket: HitOutcome,
    pub count: i64,
}
