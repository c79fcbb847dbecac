//! Canned model output and report bodies shared by the integration tests.

#![allow(dead_code)]

use report_core::domains::analysis::models::{
    DriverDetail, Drivers, FinalJudgment, FinancialAnalysis, InvestmentRoi, ModelImpact,
    ReportMetadata, ResultsTableRow, SustainabilityRisks,
};
use report_core::kernel::test_dependencies::MockAI;

pub fn meta_metadata() -> ReportMetadata {
    ReportMetadata {
        company_name: "Meta Platforms, Inc.".to_string(),
        company_symbol: "META".to_string(),
        report_type: "10-Q".to_string(),
        fiscal_year: 2025,
        fiscal_quarter: Some(3),
        filing_date: "2025-10-29".to_string(),
        revenue: Some(49_410_000_000.0),
        eps: Some(6.69),
        operating_income: None,
    }
}

pub fn nvidia_metadata() -> ReportMetadata {
    ReportMetadata {
        company_name: "NVIDIA Corporation".to_string(),
        company_symbol: "NVDA".to_string(),
        report_type: "10-K".to_string(),
        fiscal_year: 2025,
        fiscal_quarter: None,
        filing_date: "2025-02-26".to_string(),
        revenue: None,
        eps: None,
        operating_income: None,
    }
}

pub fn analysis(conclusion: &str) -> FinancialAnalysis {
    let driver = |category: &str, title: &str| DriverDetail {
        category: category.to_string(),
        title: title.to_string(),
        change: "+12% YoY".to_string(),
        magnitude: "+12% YoY".to_string(),
        reason: "Model-driven ranking gains".to_string(),
    };

    FinancialAnalysis {
        one_line_conclusion: conclusion.to_string(),
        results_summary: "Revenue ahead of consensus, guidance raised".to_string(),
        results_table: vec![ResultsTableRow {
            metric: "Revenue".to_string(),
            actual: "$51.24B".to_string(),
            consensus: "~$49.41B".to_string(),
            delta: "+3.7%".to_string(),
            assessment: "Beat".to_string(),
        }],
        results_explanation: "Impressions and pricing both up".to_string(),
        drivers_summary: "AI ranking lifted engagement and pricing".to_string(),
        drivers: Drivers {
            demand: driver("A", "Demand"),
            monetization: driver("B", "Monetization"),
            efficiency: driver("C", "Efficiency"),
        },
        investment_roi: InvestmentRoi {
            capex_change: "FY capex raised".to_string(),
            opex_change: "Headcount flat".to_string(),
            investment_direction: "Compute".to_string(),
            roi_evidence: vec!["Conversion +5%".to_string()],
            management_commitment: "Capex grows again next year".to_string(),
        },
        sustainability_risks: SustainabilityRisks {
            sustainable_drivers: vec!["Ad ranking".to_string()],
            main_risks: vec!["Depreciation".to_string()],
            checkpoints: vec!["Q4 guidance".to_string()],
        },
        model_impact: ModelImpact {
            revenue_adjustment: "+2%".to_string(),
            capex_adjustment: "+10%".to_string(),
            valuation_change: "Unchanged".to_string(),
            logic_chain: "Capex up, FCF down, multiple flat".to_string(),
        },
        final_judgment: FinalJudgment {
            confidence: "Core ads engine".to_string(),
            concerns: "Capex intensity".to_string(),
            net_impact: "unchanged".to_string(),
            recommendation: "Hold".to_string(),
        },
    }
}

/// Body long enough to clear the default minimum text length.
pub fn report_text() -> String {
    "Meta Platforms reported third quarter revenue of $51.24 billion. ".repeat(8)
}

/// A mock that answers both the metadata and the analysis call.
pub fn succeeding_ai() -> MockAI {
    MockAI::new()
        .with_structured(&meta_metadata())
        .with_structured(&analysis("Revenue beat on AI-driven ad pricing"))
}
