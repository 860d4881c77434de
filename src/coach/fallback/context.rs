//! Values substituted into fallback templates.

use crate::coach::core::profile::{IncomeBracket, NOT_SPECIFIED, UserProfile};

/// Age used for arithmetic when the profile does not give one.
pub const DEFAULT_AGE: u32 = 30;
/// Retirement age used when the profile does not give one.
pub const DEFAULT_TARGET_AGE: u32 = 65;
/// Upper bound on the suggested stock allocation.
pub const MAX_STOCK_PERCENT: u32 = 90;

/// Suggested stock allocation: `min(90, 100 - age)`, never below zero.
#[must_use]
pub const fn stock_percent(age: u32) -> u32 {
    let remaining = 100_u32.saturating_sub(age);
    if remaining < MAX_STOCK_PERCENT {
        remaining
    } else {
        MAX_STOCK_PERCENT
    }
}

/// Profile values and derived figures for template rendering.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TemplateContext {
    /// Age used in the text.
    pub age: u32,
    /// Whether the age came from the profile.
    pub age_known: bool,
    /// Income label as given, or "not specified".
    pub income: String,
    /// Parsed income bracket.
    pub bracket: Option<IncomeBracket>,
    /// Suggested monthly retirement contribution.
    pub monthly_savings: &'static str,
    /// Suggested stock share of the portfolio.
    pub stock_percent: u32,
    /// Suggested bond share of the portfolio.
    pub bond_percent: u32,
    /// Target retirement age.
    pub target_age: u32,
    /// Years left until the target age.
    pub years_to_retirement: u32,
}

impl TemplateContext {
    /// Derive template values from an optional profile.
    #[must_use]
    pub fn from_profile(profile: Option<&UserProfile>) -> Self {
        let age = profile.and_then(|p| p.age);
        let resolved_age = age.unwrap_or(DEFAULT_AGE);
        let target_age = profile
            .and_then(|p| p.target_retirement_age)
            .unwrap_or(DEFAULT_TARGET_AGE);
        let income = profile
            .and_then(|p| p.annual_income.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(NOT_SPECIFIED)
            .to_string();
        let bracket = profile.and_then(UserProfile::income_bracket);
        let stock = stock_percent(resolved_age);

        Self {
            age: resolved_age,
            age_known: age.is_some(),
            income,
            bracket,
            monthly_savings: bracket
                .map_or("10-15% of your gross monthly pay", IncomeBracket::monthly_savings_range),
            stock_percent: stock,
            bond_percent: 100 - stock,
            target_age,
            years_to_retirement: target_age.saturating_sub(resolved_age),
        }
    }

    /// Age as shown in text, flagged when assumed.
    #[must_use]
    pub fn age_label(&self) -> String {
        if self.age_known {
            self.age.to_string()
        } else {
            format!("{} (assumed)", self.age)
        }
    }

    /// Income phrase for sentences like "with an income of ...".
    #[must_use]
    pub fn income_phrase(&self) -> String {
        if self.income == NOT_SPECIFIED {
            "your current income".to_string()
        } else {
            format!("an income of {}", self.income)
        }
    }
}
