//! Ordered topic table for keyword-matched fallback replies.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coach::fallback::context::TemplateContext;
use crate::coach::fallback::templates;

/// Topic a fallback reply addresses.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Long-term retirement roadmap.
    RetirementRoadmap,
    /// Monthly budgeting.
    Budget,
    /// Loans and other balances.
    Debt,
    /// Savings rate.
    Savings,
    /// Accounts and allocation.
    Investment,
    /// Emergency fund.
    EmergencyFund,
    /// Income and career growth.
    Career,
    /// Complete financial plan.
    FinancialPlan,
}

impl Topic {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RetirementRoadmap => "retirement_roadmap",
            Self::Budget => "budget",
            Self::Debt => "debt",
            Self::Savings => "savings",
            Self::Investment => "investment",
            Self::EmergencyFund => "emergency_fund",
            Self::Career => "career",
            Self::FinancialPlan => "financial_plan",
        }
    }

    /// Render this topic's template.
    #[must_use]
    pub fn render(self, ctx: &TemplateContext) -> String {
        TOPIC_RULES
            .iter()
            .find(|rule| rule.topic == self)
            .map_or_else(|| templates::general_guidance(ctx), |rule| (rule.render)(ctx))
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keywords mapped to a topic and its template.
pub struct TopicRule {
    /// Topic produced by a match.
    pub topic: Topic,
    /// Lower-case words or phrases; any one matches as a whole word.
    pub keywords: &'static [&'static str],
    /// Template renderer.
    pub render: fn(&TemplateContext) -> String,
}

/// Topic rules in precedence order; the first match wins.
pub const TOPIC_RULES: &[TopicRule] = &[
    TopicRule {
        topic: Topic::RetirementRoadmap,
        keywords: &[
            "retirement plan",
            "long term plan",
            "long-term plan",
            "retirement strategy",
            "retirement roadmap",
            "plan for retirement",
        ],
        render: templates::retirement_roadmap,
    },
    TopicRule {
        topic: Topic::Budget,
        keywords: &["budget", "rent", "expenses", "spending"],
        render: templates::budget,
    },
    TopicRule {
        topic: Topic::Debt,
        keywords: &["student loan", "debt", "pay off", "credit card"],
        render: templates::debt,
    },
    TopicRule {
        topic: Topic::Savings,
        keywords: &["save", "saving", "savings", "percent"],
        render: templates::savings_target,
    },
    TopicRule {
        topic: Topic::Investment,
        keywords: &[
            "roth",
            "hsa",
            "401k",
            "invest",
            "investing",
            "investment",
            "investments",
            "portfolio",
            "stocks",
            "index fund",
            "index funds",
        ],
        render: templates::investment_allocation,
    },
    TopicRule {
        topic: Topic::EmergencyFund,
        keywords: &["emergency", "fund"],
        render: templates::emergency_fund,
    },
    TopicRule {
        topic: Topic::Career,
        keywords: &["career", "job", "income", "raise"],
        render: templates::career,
    },
    TopicRule {
        topic: Topic::FinancialPlan,
        keywords: &["financial plan", "money plan", "financial goals"],
        render: templates::financial_plan,
    },
];

/// First topic whose keywords appear in the input as whole words, case-insensitively.
#[must_use]
pub fn match_topic(input: &str) -> Option<Topic> {
    let lowered = input.to_lowercase();
    TOPIC_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| contains_word(&lowered, kw)))
        .map(|rule| rule.topic)
}

/// `needle` occurs in `haystack` with no letter or digit directly on either side.
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_roadmap_over_budget() {
        assert_eq!(
            match_topic("help me budget for my long term retirement plan"),
            Some(Topic::RetirementRoadmap)
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(match_topic("Should I open a ROTH?"), Some(Topic::Investment));
        assert_eq!(match_topic("EMERGENCY money"), Some(Topic::EmergencyFund));
    }

    #[test]
    fn test_each_topic_reachable() {
        let cases = [
            ("what is a good retirement strategy", Topic::RetirementRoadmap),
            ("my expenses are high", Topic::Budget),
            ("how do I pay off my student loan", Topic::Debt),
            ("How much should I save?", Topic::Savings),
            ("is my portfolio ok", Topic::Investment),
            ("emergency cushion", Topic::EmergencyFund),
            ("should I change my job", Topic::Career),
            ("help with my money plan", Topic::FinancialPlan),
        ];
        for (input, expected) in cases {
            assert_eq!(match_topic(input), Some(expected), "input: {input}");
        }
    }

    #[test]
    fn test_debt_before_savings() {
        assert_eq!(
            match_topic("should I save or pay off debt first"),
            Some(Topic::Debt)
        );
    }

    #[test]
    fn test_keywords_match_whole_words_only() {
        let cases = [
            ("What should my current savings rate be?", Some(Topic::Savings)),
            ("Are index funds a good idea?", Some(Topic::Investment)),
            ("My parents want me to save more", Some(Topic::Savings)),
            ("Is a different percent better?", Some(Topic::Savings)),
            ("Can I afford the rent?", Some(Topic::Budget)),
            ("Start an emergency fund.", Some(Topic::EmergencyFund)),
        ];
        for (input, expected) in cases {
            assert_eq!(match_topic(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_contains_word_boundaries() {
        assert!(contains_word("pay the rent", "rent"));
        assert!(contains_word("401k?", "401k"));
        assert!(!contains_word("current", "rent"));
        assert!(!contains_word("funds", "fund"));
        assert!(contains_word("rent, then fund", "fund"));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(match_topic("hello there"), None);
        assert_eq!(match_topic(""), None);
    }

    #[test]
    fn test_every_topic_has_one_rule() {
        for rule in TOPIC_RULES {
            let count = TOPIC_RULES.iter().filter(|r| r.topic == rule.topic).count();
            assert_eq!(count, 1, "{}", rule.topic);
            assert!(!rule.keywords.is_empty());
        }
    }
}
