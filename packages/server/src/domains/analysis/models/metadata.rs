use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Filing metadata derived from report text before analysis starts.
///
/// Consensus figures are optional; they're passed to the analysis prompt as
/// the market-expectation baseline when the filing states them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportMetadata {
    pub company_name: String,
    /// Ticker symbol, e.g. "META"
    pub company_symbol: String,
    /// "10-K", "10-Q", "20-F", "Earnings Release", ...
    pub report_type: String,
    pub fiscal_year: i32,
    /// 1-4; absent for full-year reports
    pub fiscal_quarter: Option<u8>,
    /// ISO date (YYYY-MM-DD) the report was filed or released
    pub filing_date: String,
    /// Consensus revenue in USD
    pub revenue: Option<f64>,
    /// Consensus diluted EPS in USD
    pub eps: Option<f64>,
    /// Consensus operating income in USD
    pub operating_income: Option<f64>,
}

impl ReportMetadata {
    /// "Q3 2025" for quarterly reports, "FY 2025" otherwise.
    pub fn period_label(&self) -> String {
        match self.fiscal_quarter {
            Some(q) => format!("Q{} {}", q, self.fiscal_year),
            None => format!("FY {}", self.fiscal_year),
        }
    }

    /// Consensus figures as a JSON object, omitting the ones not provided.
    pub fn consensus(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        if let Some(revenue) = self.revenue {
            map.insert("revenue".into(), revenue.into());
        }
        if let Some(eps) = self.eps {
            map.insert("eps".into(), eps.into());
        }
        if let Some(operating_income) = self.operating_income {
            map.insert("operatingIncome".into(), operating_income.into());
        }
        serde_json::Value::Object(map)
    }

    /// Clean up model output: trim strings, upper-case the ticker, drop an
    /// out-of-range quarter and non-finite consensus numbers.
    pub fn normalized(mut self) -> Self {
        self.company_name = self.company_name.trim().to_string();
        self.company_symbol = self.company_symbol.trim().to_uppercase();
        self.report_type = self.report_type.trim().to_string();
        self.filing_date = self.filing_date.trim().to_string();
        self.fiscal_quarter = self.fiscal_quarter.filter(|q| (1..=4).contains(q));
        self.revenue = self.revenue.filter(|v| v.is_finite());
        self.eps = self.eps.filter(|v| v.is_finite());
        self.operating_income = self.operating_income.filter(|v| v.is_finite());
        self
    }
}

#[cfg(test)]
pub(crate) fn sample_metadata() -> ReportMetadata {
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
