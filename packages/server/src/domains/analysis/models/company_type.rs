use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Classification that selects which analysis prompt a report gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyType {
    /// Companies selling AI-powered products and services
    #[default]
    AiApplication,
    /// Chips, memory, packaging, networking and servers behind AI compute
    AiSupplyChain,
}

impl CompanyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AiApplication => "ai_application",
            Self::AiSupplyChain => "ai_supply_chain",
        }
    }

    /// Human-readable label used in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AiApplication => "AI application company",
            Self::AiSupplyChain => "AI supply chain company",
        }
    }
}

impl fmt::Display for CompanyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompanyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ai_application" => Ok(Self::AiApplication),
            "ai_supply_chain" => Ok(Self::AiSupplyChain),
            other => Err(format!(
                "Unknown company type '{}': expected ai_application or ai_supply_chain",
                other
            )),
        }
    }
}
