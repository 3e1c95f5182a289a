//! Spending categories shared by transactions and budgets.

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Closed set of category tags.
///
/// Stored and transported as kebab-case strings (`dining-out`,
/// `personal-care`, ...).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[default]
    Entertainment,
    Bills,
    Groceries,
    DiningOut,
    Transportation,
    PersonalCare,
    Education,
    Lifestyle,
    Shopping,
    General,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Self::Entertainment,
        Self::Bills,
        Self::Groceries,
        Self::DiningOut,
        Self::Transportation,
        Self::PersonalCare,
        Self::Education,
        Self::Lifestyle,
        Self::Shopping,
        Self::General,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entertainment => "entertainment",
            Self::Bills => "bills",
            Self::Groceries => "groceries",
            Self::DiningOut => "dining-out",
            Self::Transportation => "transportation",
            Self::PersonalCare => "personal-care",
            Self::Education => "education",
            Self::Lifestyle => "lifestyle",
            Self::Shopping => "shopping",
            Self::General => "general",
        }
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| EngineError::InvalidCategory(format!("unknown category: {value}")))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
