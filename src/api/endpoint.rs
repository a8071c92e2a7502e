//! Wire paths of the calculator endpoints

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CalcError;

/// One calculator reachable over `POST /calculate-*`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endpoint {
    Emi,
    LoanAmount,
    LoanTenure,
    InterestRate,
    CompoundInterest,
    FutureValue,
    Inflation,
    RuleOf72,
    Roi,
    ReverseCagr,
    Kvp,
    Fd,
    Rd,
    Ppf,
    Nsc,
    Scss,
    Pomis,
    Sip,
    StepUpSip,
    GoalSip,
    SipDelay,
    Lumpsum,
    LumpsumVsSip,
    Swp,
    ChildEducation,
    MarriagePlanning,
    Retirement,
    Nps,
    Epf,
    Ulip,
    UlipVsSip,
    ElssVsSip,
    FdVsSip,
    IncomeTax,
    Hra,
    Ctc,
    CapitalGains,
    Ltcg,
    Gst,
    Gratuity,
    Xirr,
    StockAverage,
    PpfVsSip,
    Ssy,
    Apy,
    Pmvvy,
    PmSym,
    Sgb,
    RbiBonds,
    PostOfficeRd,
    RdVsSip,
    RdVsFdVsSip,
    NpsVsSip,
    Tds,
    ExitLoad,
    SipExitLoad,
    SipWithInflation,
    SipWithInflationAndTax,
    GoalSipWithInflationAndTax,
    ExpenseRatio,
    SipWithExpenseRatio,
    Pension,
    StockReturn,
    EtfReturn,
    IndexFund,
    NetWorth,
    VacationSavings,
}

impl Endpoint {
    pub const ALL: [Endpoint; 67] = [
        Endpoint::Emi,
        Endpoint::LoanAmount,
        Endpoint::LoanTenure,
        Endpoint::InterestRate,
        Endpoint::CompoundInterest,
        Endpoint::FutureValue,
        Endpoint::Inflation,
        Endpoint::RuleOf72,
        Endpoint::Roi,
        Endpoint::ReverseCagr,
        Endpoint::Kvp,
        Endpoint::Fd,
        Endpoint::Rd,
        Endpoint::Ppf,
        Endpoint::Nsc,
        Endpoint::Scss,
        Endpoint::Pomis,
        Endpoint::Sip,
        Endpoint::StepUpSip,
        Endpoint::GoalSip,
        Endpoint::SipDelay,
        Endpoint::Lumpsum,
        Endpoint::LumpsumVsSip,
        Endpoint::Swp,
        Endpoint::ChildEducation,
        Endpoint::MarriagePlanning,
        Endpoint::Retirement,
        Endpoint::Nps,
        Endpoint::Epf,
        Endpoint::Ulip,
        Endpoint::UlipVsSip,
        Endpoint::ElssVsSip,
        Endpoint::FdVsSip,
        Endpoint::IncomeTax,
        Endpoint::Hra,
        Endpoint::Ctc,
        Endpoint::CapitalGains,
        Endpoint::Ltcg,
        Endpoint::Gst,
        Endpoint::Gratuity,
        Endpoint::Xirr,
        Endpoint::StockAverage,
        Endpoint::PpfVsSip,
        Endpoint::Ssy,
        Endpoint::Apy,
        Endpoint::Pmvvy,
        Endpoint::PmSym,
        Endpoint::Sgb,
        Endpoint::RbiBonds,
        Endpoint::PostOfficeRd,
        Endpoint::RdVsSip,
        Endpoint::RdVsFdVsSip,
        Endpoint::NpsVsSip,
        Endpoint::Tds,
        Endpoint::ExitLoad,
        Endpoint::SipExitLoad,
        Endpoint::SipWithInflation,
        Endpoint::SipWithInflationAndTax,
        Endpoint::GoalSipWithInflationAndTax,
        Endpoint::ExpenseRatio,
        Endpoint::SipWithExpenseRatio,
        Endpoint::Pension,
        Endpoint::StockReturn,
        Endpoint::EtfReturn,
        Endpoint::IndexFund,
        Endpoint::NetWorth,
        Endpoint::VacationSavings,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Emi => "/calculate-emi",
            Endpoint::LoanAmount => "/calculate-loan-amount",
            Endpoint::LoanTenure => "/calculate-loan-tenure",
            Endpoint::InterestRate => "/calculate-interest-rate",
            Endpoint::CompoundInterest => "/calculate-compound-interest",
            Endpoint::FutureValue => "/calculate-future-value",
            Endpoint::Inflation => "/calculate-inflation",
            Endpoint::RuleOf72 => "/calculate-rule-of-72",
            Endpoint::Roi => "/calculate-roi",
            Endpoint::ReverseCagr => "/calculate-reverse-cagr",
            Endpoint::Kvp => "/calculate-kvp",
            Endpoint::Fd => "/calculate-fd",
            Endpoint::Rd => "/calculate-rd",
            Endpoint::Ppf => "/calculate-ppf",
            Endpoint::Nsc => "/calculate-nsc",
            Endpoint::Scss => "/calculate-scss",
            Endpoint::Pomis => "/calculate-post-office-monthly-income-scheme",
            Endpoint::Sip => "/calculate-sip",
            Endpoint::StepUpSip => "/calculate-step-up-sip",
            Endpoint::GoalSip => "/calculate-goal-sip",
            Endpoint::SipDelay => "/calculate-sip-delay",
            Endpoint::Lumpsum => "/calculate-lump-sum-sip",
            Endpoint::LumpsumVsSip => "/calculate-lumpsum-vs-sip",
            Endpoint::Swp => "/calculate-swp",
            Endpoint::ChildEducation => "/calculate-child-education",
            Endpoint::MarriagePlanning => "/calculate-marriage-planning",
            Endpoint::Retirement => "/calculate-retirement",
            Endpoint::Nps => "/calculate-nps",
            Endpoint::Epf => "/calculate-epf",
            Endpoint::Ulip => "/calculate-ulip",
            Endpoint::UlipVsSip => "/calculate-ulip-vs-sip",
            Endpoint::ElssVsSip => "/calculate-elss-vs-sip",
            Endpoint::FdVsSip => "/calculate-fd-vs-sip",
            Endpoint::IncomeTax => "/calculate-income-tax-old-new-regime",
            Endpoint::Hra => "/calculate-hra",
            Endpoint::Ctc => "/calculate-ctc",
            Endpoint::CapitalGains => "/calculate-capital-gains",
            Endpoint::Ltcg => "/calculate-ltcg",
            Endpoint::Gst => "/calculate-gst",
            Endpoint::Gratuity => "/calculate-gratuity",
            Endpoint::Xirr => "/calculate-xirr-analysis",
            Endpoint::StockAverage => "/calculate-stock-average",
            Endpoint::PpfVsSip => "/calculate-ppf-vs-sip",
            Endpoint::Ssy => "/calculate-ssy",
            Endpoint::Apy => "/calculate-apy",
            Endpoint::Pmvvy => "/calculate-pmvvy",
            Endpoint::PmSym => "/calculate-pm-sym",
            Endpoint::Sgb => "/calculate-sgb",
            Endpoint::RbiBonds => "/calculate-rbi-floating-rate-bonds",
            Endpoint::PostOfficeRd => "/calculate-post-office-rd",
            Endpoint::RdVsSip => "/calculate-rd-vs-sip",
            Endpoint::RdVsFdVsSip => "/calculate-rd-vs-fd-vs-sip",
            Endpoint::NpsVsSip => "/calculate-nps-vs-sip",
            Endpoint::Tds => "/calculate-tds",
            Endpoint::ExitLoad => "/calculate-exit-load",
            Endpoint::SipExitLoad => "/calculate-sip-exit-load",
            Endpoint::SipWithInflation => "/calculate-sip-with-inflation",
            Endpoint::SipWithInflationAndTax => "/calculate-sip-with-inflation-and-tax",
            Endpoint::GoalSipWithInflationAndTax => "/calculate-goal-sip-with-inflation-and-tax",
            Endpoint::ExpenseRatio => "/calculate-expense-ratio",
            Endpoint::SipWithExpenseRatio => "/calculate-sip-with-expense-ratio",
            Endpoint::Pension => "/calculate-pension-requirements",
            Endpoint::StockReturn => "/calculate-stock-return",
            Endpoint::EtfReturn => "/calculate-etf-return",
            Endpoint::IndexFund => "/calculate-index-fund",
            Endpoint::NetWorth => "/calculate-net-worth",
            Endpoint::VacationSavings => "/calculate-vacation-savings",
        }
    }

    /// Resolve a request path; a trailing slash is ignored, the bare
    /// `/calculate` path is the EMI calculator and the mutual-fund expense
    /// ratio path is an alias
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.strip_suffix('/').unwrap_or(path);
        match trimmed {
            "/calculate" => return Some(Endpoint::Emi),
            "/calculate-mutual-fund-expense-ratio" => return Some(Endpoint::ExpenseRatio),
            _ => {}
        }
        Self::ALL.iter().copied().find(|e| e.path() == trimmed)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Accepts a wire path (`/calculate-sip`) or a bare name (`sip`, `step-up-sip`)
impl FromStr for Endpoint {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('/') {
            return Self::from_path(s).ok_or_else(|| CalcError::UnknownEndpoint(s.to_string()));
        }
        let name = s.strip_prefix("calculate-").unwrap_or(s);
        serde_json::from_value(serde_json::Value::String(name.to_string()))
            .ok()
            .or_else(|| Self::from_path(&format!("/calculate-{}", name)))
            .ok_or_else(|| CalcError::UnknownEndpoint(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_paths_are_unique_and_round_trip() {
        let paths: HashSet<_> = Endpoint::ALL.iter().map(|e| e.path()).collect();
        assert_eq!(paths.len(), Endpoint::ALL.len());
        for e in Endpoint::ALL {
            assert_eq!(Endpoint::from_path(e.path()), Some(e));
        }
    }

    #[test]
    fn test_from_path_variants() {
        assert_eq!(Endpoint::from_path("/calculate"), Some(Endpoint::Emi));
        assert_eq!(Endpoint::from_path("/calculate/"), Some(Endpoint::Emi));
        assert_eq!(Endpoint::from_path("/calculate-sip/"), Some(Endpoint::Sip));
        assert_eq!(
            Endpoint::from_path("/calculate-mutual-fund-expense-ratio"),
            Some(Endpoint::ExpenseRatio)
        );
        assert_eq!(Endpoint::from_path("/calculate-nothing"), None);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("step-up-sip".parse::<Endpoint>().unwrap(), Endpoint::StepUpSip);
        assert_eq!("calculate-income-tax".parse::<Endpoint>().unwrap(), Endpoint::IncomeTax);
        assert_eq!("pomis".parse::<Endpoint>().unwrap(), Endpoint::Pomis);
        assert_eq!("/calculate-xirr-analysis".parse::<Endpoint>().unwrap(), Endpoint::Xirr);
        assert_eq!("post-office-monthly-income-scheme".parse::<Endpoint>().unwrap(), Endpoint::Pomis);
        assert_eq!("pm-sym".parse::<Endpoint>().unwrap(), Endpoint::PmSym);
        assert_eq!("rd-vs-fd-vs-sip".parse::<Endpoint>().unwrap(), Endpoint::RdVsFdVsSip);
        assert_eq!("rbi-floating-rate-bonds".parse::<Endpoint>().unwrap(), Endpoint::RbiBonds);
        assert_eq!("pension-requirements".parse::<Endpoint>().unwrap(), Endpoint::Pension);
        assert!("mortgage".parse::<Endpoint>().is_err());
    }
}
