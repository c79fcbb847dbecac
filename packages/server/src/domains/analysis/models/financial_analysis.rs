//! Structured analysis payload returned by the analysis model.
//!
//! The same schema is used for both company types; only the prompt differs.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FinancialAnalysis {
    /// Beat/miss, the key driver and the biggest risk in one sentence
    pub one_line_conclusion: String,
    pub results_summary: String,
    /// Reported figures against consensus, at least five rows
    pub results_table: Vec<ResultsTableRow>,
    pub results_explanation: String,
    pub drivers_summary: String,
    pub drivers: Drivers,
    pub investment_roi: InvestmentRoi,
    pub sustainability_risks: SustainabilityRisks,
    pub model_impact: ModelImpact,
    pub final_judgment: FinalJudgment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResultsTableRow {
    pub metric: String,
    pub actual: String,
    pub consensus: String,
    pub delta: String,
    pub assessment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Drivers {
    pub demand: DriverDetail,
    pub monetization: DriverDetail,
    pub efficiency: DriverDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DriverDetail {
    /// "A", "B" or "C"
    pub category: String,
    pub title: String,
    pub change: String,
    pub magnitude: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InvestmentRoi {
    pub capex_change: String,
    pub opex_change: String,
    pub investment_direction: String,
    pub roi_evidence: Vec<String>,
    pub management_commitment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SustainabilityRisks {
    pub sustainable_drivers: Vec<String>,
    pub main_risks: Vec<String>,
    pub checkpoints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModelImpact {
    pub revenue_adjustment: String,
    pub capex_adjustment: String,
    pub valuation_change: String,
    pub logic_chain: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FinalJudgment {
    pub confidence: String,
    pub concerns: String,
    /// "stronger", "weaker" or "unchanged"
    pub net_impact: String,
    pub recommendation: String,
}

#[cfg(test)]
pub(crate) fn sample_analysis(conclusion: &str) -> FinancialAnalysis {
    let driver = |category: &str, title: &str| DriverDetail {
        category: category.to_string(),
        title: title.to_string(),
        change: "DAP 3.54B, +8% YoY".to_string(),
        magnitude: "+8% YoY".to_string(),
        reason: "Ranking model improvements".to_string(),
    };

    FinancialAnalysis {
        one_line_conclusion: conclusion.to_string(),
        results_summary: "Revenue and guidance ahead of consensus".to_string(),
        results_table: vec![ResultsTableRow {
            metric: "Revenue".to_string(),
            actual: "$51.24B".to_string(),
            consensus: "~$49.41B".to_string(),
            delta: "+3.7%".to_string(),
            assessment: "Beat".to_string(),
        }],
        results_explanation: "Ad impressions +14%, price per ad +10%".to_string(),
        drivers_summary: "Growth driven by AI ranking".to_string(),
        drivers: Drivers {
            demand: driver("A", "Demand"),
            monetization: driver("B", "Monetization"),
            efficiency: driver("C", "Efficiency"),
        },
        investment_roi: InvestmentRoi {
            capex_change: "FY capex raised to $70-72B".to_string(),
            opex_change: "Headcount +8%".to_string(),
            investment_direction: "Compute".to_string(),
            roi_evidence: vec!["Conversion +5%".to_string()],
            management_commitment: "Capex growth notably larger in 2026".to_string(),
        },
        sustainability_risks: SustainabilityRisks {
            sustainable_drivers: vec!["Ad ranking".to_string()],
            main_risks: vec!["Depreciation".to_string()],
            checkpoints: vec!["Q4 guidance".to_string()],
        },
        model_impact: ModelImpact {
            revenue_adjustment: "+2% FY26".to_string(),
            capex_adjustment: "+10% FY26".to_string(),
            valuation_change: "Unchanged".to_string(),
            logic_chain: "Capex up -> FCF down -> multiple flat".to_string(),
        },
        final_judgment: FinalJudgment {
            confidence: "Core ads engine".to_string(),
            concerns: "Capex intensity".to_string(),
            net_impact: "unchanged".to_string(),
            recommendation: "Hold".to_string(),
        },
    }
}
