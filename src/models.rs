use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Label used when a record carries no volatility factor.
pub const UNKNOWN_FACTOR: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Safe,
    Warning,
    Critical,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Safe => "Safe",
            Status::Warning => "Warning",
            Status::Critical => "Critical",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "Safe" => Ok(Status::Safe),
            "Warning" => Ok(Status::Warning),
            "Critical" => Ok(Status::Critical),
            other => Err(other.to_string()),
        }
    }
}

/// A validated borrower row as served by `GET /api/users`.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub score: u8,
    pub exposure: f64,
    pub status: Status,
    pub volatility: String,
    pub occupation: Option<String>,
    pub income: Option<f64>,
}

impl UserRecord {
    pub fn is_high_risk(&self) -> bool {
        self.score > 50
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_exposure: f64,
    pub at_risk_count: usize,
    pub success_rate: f64,
    pub recovery_count: usize,
}

impl DashboardSummary {
    pub fn empty() -> Self {
        Self {
            total_exposure: 0.0,
            at_risk_count: 0,
            success_rate: 0.0,
            recovery_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorEntry {
    pub name: String,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFactorReport {
    pub total_high_risk: usize,
    pub factors: Vec<FactorEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MetricType {
    Exposure,
    Risk,
    Success,
    Recovery,
}

impl MetricType {
    pub fn title(&self) -> &'static str {
        match self {
            MetricType::Exposure => "Top Portfolio Exposures",
            MetricType::Risk => "Risk Profile Distribution",
            MetricType::Success => "Intervention Efficacy",
            MetricType::Recovery => "Active Recovery Queue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BreakdownEntry {
    Exposure { name: String, value: f64, score: u8 },
    Bucket { name: &'static str, value: usize },
    Recovery { name: String, value: u8 },
}

impl BreakdownEntry {
    pub fn name(&self) -> &str {
        match self {
            BreakdownEntry::Exposure { name, .. } | BreakdownEntry::Recovery { name, .. } => {
                name.as_str()
            }
            BreakdownEntry::Bucket { name, .. } => name,
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            BreakdownEntry::Exposure { value, .. } => *value,
            BreakdownEntry::Bucket { value, .. } => *value as f64,
            BreakdownEntry::Recovery { value, .. } => f64::from(*value),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LoanDetail {
    #[serde(rename = "type", default)]
    pub loan_type: String,
    #[serde(default)]
    pub principal: f64,
    #[serde(default)]
    pub outstanding: f64,
    #[serde(default)]
    pub emi: f64,
    #[serde(default)]
    pub interest_rate: f64,
    #[serde(default)]
    pub remaining_months: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ExpenditureItem {
    pub name: String,
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ShapContribution {
    pub feature: String,
    #[serde(default)]
    pub impact: f64,
    #[serde(default)]
    pub desc: String,
}

/// Detail payload of `GET /api/users/{id}`, passed through mostly as-is.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub income: Option<f64>,
    #[serde(default)]
    pub risk_score: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub volatility: Option<String>,
    #[serde(default)]
    pub total_spend: f64,
    #[serde(default)]
    pub total_emi: f64,
    #[serde(default)]
    pub disposable_income: f64,
    #[serde(default)]
    pub can_repay: bool,
    #[serde(default)]
    pub loans: Vec<LoanDetail>,
    #[serde(default)]
    pub expenditure_breakdown: Vec<ExpenditureItem>,
    #[serde(default)]
    pub shap_values: Vec<ShapContribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenditureShare {
    pub name: String,
    pub value: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DistressReason {
    Salary,
    Job,
    Medical,
    Other,
}

impl DistressReason {
    pub fn label(&self) -> &'static str {
        match self {
            DistressReason::Salary => "Salary Delay / Timing Mismatch",
            DistressReason::Job => "Job Loss / Income Stopped",
            DistressReason::Medical => "Medical Emergency",
            DistressReason::Other => "Other Financial Strain",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryRequest<'a> {
    pub user_id: &'a str,
    pub reason: DistressReason,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Intervention {
    pub action: String,
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryResponse {
    pub intervention: Intervention,
}
