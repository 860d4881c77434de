//! Retirement-planning user profile collected by the chat shell.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Label used for any field the user left blank.
pub const NOT_SPECIFIED: &str = "not specified";

/// Self-reported appetite for investment risk.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTolerance {
    /// Prefers stability over growth.
    Conservative,
    /// Balanced.
    Moderate,
    /// Accepts volatility for growth.
    Aggressive,
}

impl RiskTolerance {
    /// Human-readable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Moderate => "moderate",
            Self::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Annual income bracket, as offered by the profile form.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeBracket {
    /// Under $30,000.
    Under30k,
    /// $30,000 - $50,000.
    From30kTo50k,
    /// $50,000 - $75,000.
    From50kTo75k,
    /// $75,000 - $100,000.
    From75kTo100k,
    /// $100,000 - $150,000.
    From100kTo150k,
    /// Over $150,000.
    Over150k,
}

impl IncomeBracket {
    /// Every bracket, lowest first.
    pub const ALL: [Self; 6] = [
        Self::Under30k,
        Self::From30kTo50k,
        Self::From50kTo75k,
        Self::From75kTo100k,
        Self::From100kTo150k,
        Self::Over150k,
    ];

    /// Canonical form label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Under30k => "Under $30,000",
            Self::From30kTo50k => "$30,000 - $50,000",
            Self::From50kTo75k => "$50,000 - $75,000",
            Self::From75kTo100k => "$75,000 - $100,000",
            Self::From100kTo150k => "$100,000 - $150,000",
            Self::Over150k => "Over $150,000",
        }
    }

    /// Suggested monthly retirement contribution, roughly 10-15% of gross pay.
    #[must_use]
    pub const fn monthly_savings_range(self) -> &'static str {
        match self {
            Self::Under30k => "$125 - $375",
            Self::From30kTo50k => "$250 - $625",
            Self::From50kTo75k => "$415 - $940",
            Self::From75kTo100k => "$625 - $1,250",
            Self::From100kTo150k => "$835 - $1,875",
            Self::Over150k => "$1,250 or more",
        }
    }

    /// Bracket containing a yearly amount in dollars.
    #[must_use]
    pub const fn from_amount(amount: u64) -> Self {
        match amount {
            0..30_000 => Self::Under30k,
            30_000..50_000 => Self::From30kTo50k,
            50_000..75_000 => Self::From50kTo75k,
            75_000..100_000 => Self::From75kTo100k,
            100_000..150_000 => Self::From100kTo150k,
            _ => Self::Over150k,
        }
    }

    /// Parse a form label, or fall back to the first dollar amount in the text.
    ///
    /// Returns `None` when the text names no bracket and holds no amount.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let normalized = normalize_label(text);
        if let Some(bracket) = Self::ALL
            .into_iter()
            .find(|bracket| normalize_label(bracket.label()) == normalized)
        {
            return Some(bracket);
        }

        let amount = first_amount(&normalized)?;
        if (normalized.contains("under") || normalized.contains("less")) && amount <= 30_000 {
            return Some(Self::Under30k);
        }
        Some(Self::from_amount(amount))
    }
}

impl fmt::Display for IncomeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn normalize_label(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// First run of digits (commas allowed), with an optional `k` multiplier.
fn first_amount(text: &str) -> Option<u64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == ','))
        .unwrap_or(rest.len());
    let digits: String = rest[..end].chars().filter(char::is_ascii_digit).collect();
    let value: u64 = digits.parse().ok()?;
    if rest[end..].starts_with('k') {
        Some(value.saturating_mul(1_000))
    } else {
        Some(value)
    }
}

/// Profile fields; every one is optional and defaults to "not specified".
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    /// Current age in years.
    pub age: Option<u32>,
    /// Career stage (early career, mid-career, ...).
    pub career_stage: Option<String>,
    /// Annual income bracket label.
    pub annual_income: Option<String>,
    /// Current retirement savings bracket label.
    pub current_savings: Option<String>,
    /// Age the user hopes to retire at.
    pub target_retirement_age: Option<u32>,
    /// Risk tolerance.
    pub risk_tolerance: Option<RiskTolerance>,
    /// Stated goals.
    pub goals: BTreeSet<String>,
}

impl UserProfile {
    /// Whether every field is unset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Parsed income bracket, when the income label is recognisable.
    #[must_use]
    pub fn income_bracket(&self) -> Option<IncomeBracket> {
        self.annual_income.as_deref().and_then(IncomeBracket::parse)
    }

    /// Set fields as `(name, value)` pairs in a fixed order.
    #[must_use]
    pub fn specified_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();

        if let Some(age) = self.age {
            fields.push(("Age", age.to_string()));
        }
        if let Some(income) = non_blank(self.annual_income.as_deref()) {
            fields.push(("Income", income.to_string()));
        }
        if let Some(savings) = non_blank(self.current_savings.as_deref()) {
            fields.push(("Savings", savings.to_string()));
        }
        if let Some(target) = self.target_retirement_age {
            fields.push(("Target retirement age", target.to_string()));
        }
        if let Some(risk) = self.risk_tolerance {
            fields.push(("Risk tolerance", risk.to_string()));
        }
        if let Some(stage) = non_blank(self.career_stage.as_deref()) {
            fields.push(("Career stage", stage.to_string()));
        }
        if !self.goals.is_empty() {
            let goals: Vec<&str> = self.goals.iter().map(String::as_str).collect();
            fields.push(("Goals", goals.join(", ")));
        }

        fields
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
