//! In-memory review store.
//!
//! Holds review records loaded from a JSON array file (or built in memory)
//! and answers derived queries by filtering and aggregating per domain.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{DataSourceError, Result};
use crate::query::{DerivedQuery, QueryDomain, QueryFilters, QueryOutcome, ReviewDataSource, Timeframe};

/// Ratings at or below this are flagged as negative / anomalous.
pub const LOW_RATING: u8 = 2;
/// Ratings at or above this count as positive.
pub const HIGH_RATING: u8 = 4;
/// Average rating below which a follow-up recommendation is made.
pub const ATTENTION_AVERAGE: f64 = 3.5;
/// Week-over-week change in average rating that counts as a trend.
pub const TREND_DELTA: f64 = 0.2;

/// Terms counted as review themes.
pub const THEME_TERMS: [&str; 10] = [
    "parking", "staff", "service", "wait", "food", "price", "clean", "noise", "friendly", "slow",
];

// ============================================================================
// Records
// ============================================================================

/// A single customer review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: String,
    pub platform: String,
    pub location: String,
    /// Star rating, 1 to 5
    pub rating: u8,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub loyalty_points: u32,
}

impl ReviewRecord {
    fn validate(&self) -> std::result::Result<(), DataSourceError> {
        if !(1..=5).contains(&self.rating) {
            return Err(DataSourceError::InvalidRecord(format!(
                "{}: rating {} outside 1-5",
                self.id, self.rating
            )));
        }
        if self.id.trim().is_empty() {
            return Err(DataSourceError::InvalidRecord("empty id".to_string()));
        }
        Ok(())
    }

    fn mentions(&self, term: &str) -> bool {
        self.text.to_lowercase().contains(term)
    }
}

// ============================================================================
// Store
// ============================================================================

/// Review records plus the instant that relative timeframes are measured from.
#[derive(Debug, Clone)]
pub struct ReviewStore {
    records: Vec<ReviewRecord>,
    reference_time: DateTime<Utc>,
}

impl ReviewStore {
    /// Build a store from records, validating each one.
    pub fn from_records(records: Vec<ReviewRecord>) -> Result<Self> {
        for record in &records {
            record.validate()?;
        }
        Ok(Self {
            records,
            reference_time: Utc::now(),
        })
    }

    /// Load a JSON array of review records.
    pub fn load(path: &Path) -> Result<Self> {
        let load_err = |reason: String| DataSourceError::Load {
            path: path.display().to_string(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        let records: Vec<ReviewRecord> =
            serde_json::from_str(&content).map_err(|e| load_err(e.to_string()))?;

        tracing::info!(path = %path.display(), records = records.len(), "loaded reviews");
        Self::from_records(records)
    }

    /// A small built-in data set spread over the last few weeks.
    pub fn demo() -> Self {
        let now = Utc::now();
        let rows: [(&str, &str, u8, &str, i64, u32); 14] = [
            ("Google", "Downtown", 5, "Friendly staff and great food", 2, 50),
            ("Yelp", "Downtown", 4, "Good service, parking was easy", 5, 20),
            ("Facebook", "Downtown", 3, "Food ok, long wait", 12, 0),
            ("Google", "Midtown", 5, "Clean and friendly", 3, 40),
            ("Synup", "Midtown", 4, "Fair price, quick service", 9, 10),
            ("Yelp", "Midtown", 2, "Slow service and noise", 20, 0),
            ("Google", "Uptown", 4, "Staff were helpful", 1, 30),
            ("Yelp", "Uptown", 5, "Great food, friendly staff", 6, 25),
            ("Facebook", "Uptown", 3, "Price is high", 15, 0),
            ("Google", "Westside", 2, "No parking anywhere", 2, 0),
            ("Yelp", "Westside", 1, "Parking is a nightmare and staff was rude", 4, 0),
            ("Synup", "Westside", 3, "Wait was long", 10, 5),
            ("Google", "Westside", 4, "Food was great", 18, 15),
            ("Facebook", "Westside", 5, "Friendly service", 24, 35),
        ];

        let records = rows
            .iter()
            .enumerate()
            .map(|(i, (platform, location, rating, text, days_ago, points))| ReviewRecord {
                id: format!("r{}", i + 1),
                platform: (*platform).to_string(),
                location: (*location).to_string(),
                rating: *rating,
                text: (*text).to_string(),
                created_at: now - Duration::days(*days_ago),
                loyalty_points: *points,
            })
            .collect();

        Self {
            records,
            reference_time: now,
        }
    }

    /// Measure relative timeframes from `reference_time` instead of now.
    pub fn with_reference_time(mut self, reference_time: DateTime<Utc>) -> Self {
        self.reference_time = reference_time;
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ReviewRecord] {
        &self.records
    }

    /// Records matching the filters.
    pub fn matching(&self, filters: &QueryFilters) -> Vec<&ReviewRecord> {
        let cutoff = self.cutoff(filters.timeframe);
        self.records
            .iter()
            .filter(|r| {
                filters
                    .location
                    .as_ref()
                    .map_or(true, |l| r.location.eq_ignore_ascii_case(l))
            })
            .filter(|r| {
                filters
                    .platform
                    .as_ref()
                    .map_or(true, |p| r.platform.eq_ignore_ascii_case(p))
            })
            .filter(|r| cutoff.map_or(true, |c| r.created_at >= c))
            .filter(|r| {
                filters
                    .keywords
                    .as_ref()
                    .map_or(true, |kws| kws.iter().any(|k| r.mentions(k)))
            })
            .filter(|r| {
                filters
                    .sentiment_range
                    .map_or(true, |(min, max)| (min..=max).contains(&f32::from(r.rating)))
            })
            .collect()
    }

    fn cutoff(&self, timeframe: Timeframe) -> Option<DateTime<Utc>> {
        match timeframe {
            Timeframe::AllTime => None,
            Timeframe::YearToDate => NaiveDate::from_ymd_opt(self.reference_time.year(), 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc()),
            other => other
                .days()
                .map(|days| self.reference_time - Duration::days(days)),
        }
    }

    fn weeks_ago(&self, record: &ReviewRecord) -> i64 {
        (self.reference_time - record.created_at).num_days().max(0) / 7
    }
}

#[async_trait]
impl ReviewDataSource for ReviewStore {
    async fn execute(&self, query: &DerivedQuery) -> Result<QueryOutcome> {
        let matches = self.matching(&query.filters);
        tracing::debug!(query = %query.description, matched = matches.len(), "store query");

        if matches.is_empty() {
            return Ok(QueryOutcome::new()
                .with_value("record_count", json!(0))
                .with_value("full_dataset", json!([]))
                .with_insight(format!("No reviews found for {}", query.description)));
        }

        let summary = Summary::of(self, &matches);
        let mut outcome = domain_outcome(query.domain, &summary, &matches);

        outcome = outcome
            .with_value("record_count", json!(matches.len()))
            .with_value("full_dataset", serde_json::to_value(&matches)?)
            .with_value("trend_direction", json!(summary.trend.as_str()))
            .with_value("recommendations", json!(summary.recommendations()))
            .with_value(
                "success_metrics",
                json!({
                    "current_average_rating": round2(summary.average),
                    "target_average_rating": round2((summary.average + 0.3).min(5.0)),
                    "review_volume": matches.len(),
                }),
            );
        if !outcome.data.contains_key("primary_value") {
            outcome = outcome.with_value("primary_value", json!(round2(summary.average)));
        }

        Ok(outcome)
    }

    fn name(&self) -> &str {
        "review_store"
    }
}

// ============================================================================
// Aggregation
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Flat => "flat",
        }
    }
}

/// Weekly bucket; `weeks_ago` 0 is the most recent week.
#[derive(Debug, Clone, Serialize)]
struct WeekBucket {
    weeks_ago: i64,
    count: usize,
    average_rating: f64,
}

struct Summary {
    average: f64,
    weeks: Vec<WeekBucket>,
    trend: Trend,
    /// Theme counts among low-rated reviews, most frequent first
    complaints: Vec<(&'static str, usize)>,
}

impl Summary {
    fn of(store: &ReviewStore, records: &[&ReviewRecord]) -> Self {
        let average = average_rating(records);

        let mut buckets: BTreeMap<i64, Vec<&ReviewRecord>> = BTreeMap::new();
        for record in records {
            buckets
                .entry(store.weeks_ago(record))
                .or_default()
                .push(*record);
        }
        // Oldest week first
        let weeks: Vec<WeekBucket> = buckets
            .iter()
            .rev()
            .map(|(weeks_ago, rs)| WeekBucket {
                weeks_ago: *weeks_ago,
                count: rs.len(),
                average_rating: round2(average_rating(rs)),
            })
            .collect();

        let trend = match (weeks.first(), weeks.last()) {
            (Some(oldest), Some(latest)) if weeks.len() > 1 => {
                let delta = latest.average_rating - oldest.average_rating;
                if delta > TREND_DELTA {
                    Trend::Up
                } else if delta < -TREND_DELTA {
                    Trend::Down
                } else {
                    Trend::Flat
                }
            }
            _ => Trend::Flat,
        };

        let low: Vec<&ReviewRecord> = records
            .iter()
            .copied()
            .filter(|r| r.rating <= LOW_RATING)
            .collect();
        let complaints = theme_counts(&low);

        Self {
            average,
            weeks,
            trend,
            complaints,
        }
    }

    fn recommendations(&self) -> Vec<String> {
        let mut recommendations = Vec::new();
        if self.average < ATTENTION_AVERAGE {
            recommendations.push(format!(
                "Follow up with reviewers rating {} stars or below",
                LOW_RATING
            ));
        }
        if let Some((theme, count)) = self.complaints.first() {
            recommendations.push(format!(
                "Address {} complaints ({} low-rated mentions)",
                theme, count
            ));
        }
        if self.trend == Trend::Down {
            recommendations.push("Investigate the recent rating decline".to_string());
        }
        recommendations
    }
}

fn domain_outcome(
    domain: QueryDomain,
    summary: &Summary,
    records: &[&ReviewRecord],
) -> QueryOutcome {
    let outcome = QueryOutcome::new();
    match domain {
        QueryDomain::Sentiment => {
            let positive = records.iter().filter(|r| r.rating >= HIGH_RATING).count();
            let negative = records.iter().filter(|r| r.rating <= LOW_RATING).count();
            let neutral = records.len() - positive - negative;
            outcome
                .with_value("primary_value", json!(round2(summary.average)))
                .with_value(
                    "sentiment_split",
                    json!({"positive": positive, "neutral": neutral, "negative": negative}),
                )
                .with_insight(format!(
                    "Average rating {:.2} across {} reviews",
                    summary.average,
                    records.len()
                ))
                .with_insight(format!(
                    "{}% positive, {}% negative",
                    percent(positive, records.len()),
                    percent(negative, records.len())
                ))
        }
        QueryDomain::Themes => {
            let themes = theme_counts(records);
            let mut outcome = outcome
                .with_value("primary_value", json!(themes.first().map(|(t, _)| *t)))
                .with_value("themes", json!(themes_map(&themes)));
            if themes.is_empty() {
                outcome = outcome.with_insight("No recurring themes found");
            }
            for (theme, count) in themes.iter().take(3) {
                outcome = outcome.with_insight(format!("{} mentioned in {} reviews", theme, count));
            }
            outcome
        }
        QueryDomain::Communities => {
            let groups = group_by(records, |r| r.location.clone());
            ranked_groups(outcome, "locations", &groups)
        }
        QueryDomain::Platforms | QueryDomain::Comparison => {
            let groups = group_by(records, |r| r.platform.clone());
            ranked_groups(outcome, "platforms", &groups)
        }
        QueryDomain::Loyalty => {
            let total: u64 = records.iter().map(|r| u64::from(r.loyalty_points)).sum();
            let earners = records.iter().filter(|r| r.loyalty_points > 0).count();
            outcome
                .with_value("primary_value", json!(total))
                .with_insight(format!("{} loyalty points awarded", total))
                .with_insight(format!("{} of {} reviewers earned points", earners, records.len()))
        }
        QueryDomain::TimeSeries => {
            let latest = summary.weeks.last().map(|w| w.average_rating);
            outcome
                .with_value("primary_value", json!(latest))
                .with_value("weekly", json!(summary.weeks))
                .with_insight(format!(
                    "Ratings are trending {} over {} weeks",
                    summary.trend.as_str(),
                    summary.weeks.len()
                ))
        }
        QueryDomain::Forecast => {
            let projected = project_next_week(&summary.weeks).map(round2);
            let mut outcome = outcome
                .with_value("primary_value", json!(projected))
                .with_value("weekly", json!(summary.weeks));
            outcome = match projected {
                Some(value) => outcome.with_insight(format!(
                    "Next week's average rating is projected at {:.2}",
                    value
                )),
                None => outcome.with_insight("Not enough weekly history to project"),
            };
            outcome
        }
        QueryDomain::Anomaly => {
            let flagged: Vec<&str> = records
                .iter()
                .filter(|r| r.rating <= LOW_RATING)
                .map(|r| r.id.as_str())
                .collect();
            let mut outcome = outcome
                .with_value("primary_value", json!(flagged.len()))
                .with_value("flagged_ids", json!(flagged))
                .with_insight(format!(
                    "{} of {} reviews rated {} stars or below",
                    flagged.len(),
                    records.len(),
                    LOW_RATING
                ));
            if let Some((theme, count)) = summary.complaints.first() {
                outcome = outcome.with_insight(format!(
                    "{} is the most common complaint ({} mentions)",
                    theme, count
                ));
            }
            outcome
        }
    }
}

fn ranked_groups(
    outcome: QueryOutcome,
    key: &str,
    groups: &BTreeMap<String, Vec<&ReviewRecord>>,
) -> QueryOutcome {
    let mut ranked: Vec<(&String, usize, f64)> = groups
        .iter()
        .map(|(name, rs)| (name, rs.len(), average_rating(rs)))
        .collect();
    ranked.sort_by(|a, b| b.2.total_cmp(&a.2).then_with(|| a.0.cmp(b.0)));

    let breakdown: serde_json::Map<String, Value> = ranked
        .iter()
        .map(|(name, count, avg)| {
            (
                (*name).clone(),
                json!({"count": count, "average_rating": round2(*avg)}),
            )
        })
        .collect();

    let mut outcome = outcome
        .with_value("primary_value", json!(ranked.first().map(|(n, _, _)| *n)))
        .with_value(key, Value::Object(breakdown));
    for (name, count, avg) in ranked.iter().take(3) {
        outcome = outcome.with_insight(format!(
            "{} averages {:.2} stars over {} reviews",
            name, avg, count
        ));
    }
    outcome
}

fn group_by<'a, F>(records: &[&'a ReviewRecord], key: F) -> BTreeMap<String, Vec<&'a ReviewRecord>>
where
    F: Fn(&ReviewRecord) -> String,
{
    let mut groups: BTreeMap<String, Vec<&'a ReviewRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(key(record)).or_default().push(*record);
    }
    groups
}

fn theme_counts(records: &[&ReviewRecord]) -> Vec<(&'static str, usize)> {
    let mut counts: Vec<(&'static str, usize)> = THEME_TERMS
        .iter()
        .map(|term| (*term, records.iter().filter(|r| r.mentions(term)).count()))
        .filter(|(_, count)| *count > 0)
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    counts
}

fn themes_map(themes: &[(&'static str, usize)]) -> serde_json::Map<String, Value> {
    themes
        .iter()
        .map(|(t, c)| ((*t).to_string(), json!(c)))
        .collect()
}

fn average_rating(records: &[&ReviewRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: u32 = records.iter().map(|r| u32::from(r.rating)).sum();
    f64::from(sum) / records.len() as f64
}

/// Least-squares line through the weekly averages, evaluated one week ahead.
fn project_next_week(weeks: &[WeekBucket]) -> Option<f64> {
    if weeks.len() < 2 {
        return None;
    }
    let points: Vec<(f64, f64)> = weeks
        .iter()
        .map(|w| (-(w.weeks_ago as f64), w.average_rating))
        .collect();
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;
    let var_x: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
    if var_x == 0.0 {
        return Some(mean_y);
    }
    let cov: f64 = points
        .iter()
        .map(|p| (p.0 - mean_x) * (p.1 - mean_y))
        .sum();
    let slope = cov / var_x;
    let projected = mean_y + slope * (1.0 - mean_x);
    Some(projected.clamp(1.0, 5.0))
}

fn percent(part: usize, total: usize) -> usize {
    if total == 0 {
        0
    } else {
        part * 100 / total
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// Tests
// ============================================================================
