//! Percentages and the attention threshold.

use crate::config::ATTENTION_THRESHOLD;
use crate::model::{DepartmentPerformance, DepartmentRating};

/// `part / total * 100`, defined as 0 when `total` is 0.
pub fn percentage(part: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(part) / f64::from(total) * 100.0
}

/// [`percentage`] rounded to the nearest whole number.
pub fn rounded_percentage(part: u32, total: u32) -> u32 {
    percentage(part, total).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    NeedsAttention,
    OnTarget,
}

/// Scores at or above [`ATTENTION_THRESHOLD`] are on target.
pub fn classify(score: f64) -> ScoreBand {
    if score >= ATTENTION_THRESHOLD {
        ScoreBand::OnTarget
    } else {
        ScoreBand::NeedsAttention
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBar {
    pub name: String,
    pub score: f64,
    pub band: ScoreBand,
}

impl ScoreBar {
    fn new(name: &str, score: f64) -> Self {
        Self { name: name.to_owned(), score, band: classify(score) }
    }
}

pub fn performance_bars(performance: &[DepartmentPerformance]) -> Vec<ScoreBar> {
    performance.iter().map(|p| ScoreBar::new(&p.name, p.super_overall)).collect()
}

pub fn rating_bars(ratings: &[DepartmentRating]) -> Vec<ScoreBar> {
    ratings.iter().map(|r| ScoreBar::new(&r.name, r.rating)).collect()
}

/// Names of the bars below the threshold.
pub fn needs_attention(bars: &[ScoreBar]) -> Vec<&str> {
    bars.iter()
        .filter(|bar| bar.band == ScoreBand::NeedsAttention)
        .map(|bar| bar.name.as_str())
        .collect()
}
