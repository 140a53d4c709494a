use std::collections::BTreeMap;

use crate::models::{
    BreakdownEntry, DashboardSummary, ExpenditureShare, FactorEntry, MetricType,
    RiskFactorReport, Status, UserProfile, UserRecord,
};

pub const EXPOSURE_TOP_N: usize = 10;

/// Rounds a percentage to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `part / whole * 100`, or `0.0` when `whole` is zero.
pub fn percent_of(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round_one_decimal(part as f64 / whole as f64 * 100.0)
    }
}

pub fn compute_dashboard_summary(records: &[UserRecord]) -> DashboardSummary {
    let mut summary = DashboardSummary::empty();
    let mut safe_count = 0usize;

    for record in records {
        summary.total_exposure += record.exposure;
        if record.is_high_risk() {
            summary.at_risk_count += 1;
        }
        if record.status != Status::Critical {
            safe_count += 1;
        }
        if record.status == Status::Warning {
            summary.recovery_count += 1;
        }
    }

    summary.success_rate = percent_of(safe_count, records.len());
    summary
}

pub fn compute_risk_factor_report(records: &[UserRecord]) -> RiskFactorReport {
    let mut groups: BTreeMap<&str, usize> = BTreeMap::new();
    let mut total_high_risk = 0usize;

    for record in records.iter().filter(|record| record.is_high_risk()) {
        total_high_risk += 1;
        *groups.entry(record.volatility.as_str()).or_insert(0) += 1;
    }

    let mut factors: Vec<FactorEntry> = groups
        .into_iter()
        .map(|(name, count)| FactorEntry {
            name: name.to_string(),
            count,
            percent: percent_of(count, total_high_risk),
        })
        .collect();

    // count descending, then name ascending
    factors.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

    RiskFactorReport {
        total_high_risk,
        factors,
    }
}

pub fn compute_metric_breakdown(metric: MetricType, records: &[UserRecord]) -> Vec<BreakdownEntry> {
    match metric {
        MetricType::Exposure => {
            let mut ranked: Vec<&UserRecord> = records.iter().collect();
            ranked.sort_by(|a, b| b.exposure.total_cmp(&a.exposure));
            ranked
                .into_iter()
                .take(EXPOSURE_TOP_N)
                .map(|record| BreakdownEntry::Exposure {
                    name: record.name.clone(),
                    value: record.exposure,
                    score: record.score,
                })
                .collect()
        }
        MetricType::Risk => {
            let (mut critical, mut at_risk, mut safe) = (0usize, 0usize, 0usize);
            for record in records {
                match RiskBucket::for_score(record.score) {
                    RiskBucket::Critical => critical += 1,
                    RiskBucket::AtRisk => at_risk += 1,
                    RiskBucket::Safe => safe += 1,
                }
            }
            vec![
                BreakdownEntry::Bucket {
                    name: RiskBucket::Critical.label(),
                    value: critical,
                },
                BreakdownEntry::Bucket {
                    name: RiskBucket::AtRisk.label(),
                    value: at_risk,
                },
                BreakdownEntry::Bucket {
                    name: RiskBucket::Safe.label(),
                    value: safe,
                },
            ]
        }
        MetricType::Success => {
            let safe = records
                .iter()
                .filter(|record| record.status == Status::Safe)
                .count();
            vec![
                BreakdownEntry::Bucket {
                    name: "Safe / Low Risk",
                    value: safe,
                },
                BreakdownEntry::Bucket {
                    name: "At Risk",
                    value: records.len() - safe,
                },
            ]
        }
        MetricType::Recovery => records
            .iter()
            .filter(|record| record.status == Status::Warning)
            .map(|record| BreakdownEntry::Recovery {
                name: record.name.clone(),
                value: record.score,
            })
            .collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskBucket {
    Critical,
    AtRisk,
    Safe,
}

impl RiskBucket {
    pub fn for_score(score: u8) -> Self {
        match score {
            76..=u8::MAX => RiskBucket::Critical,
            51..=75 => RiskBucket::AtRisk,
            _ => RiskBucket::Safe,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskBucket::Critical => "Critical (>75)",
            RiskBucket::AtRisk => "At Risk (50-75)",
            RiskBucket::Safe => "Safe (<50)",
        }
    }
}

/// Users ordered by score, highest first; equal scores keep input order.
pub fn rank_by_score(records: &[UserRecord]) -> Vec<&UserRecord> {
    let mut ranked: Vec<&UserRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// High-risk users only, highest score first.
pub fn high_risk_watchlist(records: &[UserRecord]) -> Vec<&UserRecord> {
    rank_by_score(records)
        .into_iter()
        .filter(|record| record.is_high_risk())
        .collect()
}

pub fn expenditure_shares(profile: &UserProfile) -> Vec<ExpenditureShare> {
    let base = if profile.total_spend == 0.0 {
        1.0
    } else {
        profile.total_spend
    };

    profile
        .expenditure_breakdown
        .iter()
        .map(|item| ExpenditureShare {
            name: item.name.clone(),
            value: item.value,
            percent: round_one_decimal(item.value / base * 100.0),
        })
        .collect()
}
