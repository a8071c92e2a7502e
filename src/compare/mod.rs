//! Side-by-side product comparisons

mod fd_sip;
mod nps_sip;
mod ppf_sip;
mod rd_sip;
mod tax_saving;
mod ulip;

pub use fd_sip::{
    calculate_fd_vs_sip, fd_ladder_value, FdLeg, FdSipVerdict, FdSipWinner, FdSipYear, FdVsSipRequest, FdVsSipResult,
    SipLeg,
};
pub use nps_sip::{
    calculate_nps_vs_sip, NpsSide, NpsSipWinner, NpsSipYear, NpsVsSipRequest, NpsVsSipResult, SipSide,
    NPS_MIN_ANNUITY_PERCENT,
};
pub use ppf_sip::{
    calculate_ppf_vs_sip, PpfBalance, PpfSipLeg, PpfSipWinner, PpfSipYear, PpfVsSipRequest, PpfVsSipResult,
    SipBalance,
};
pub use rd_sip::{
    calculate_rd_vs_fd_vs_sip, calculate_rd_vs_sip, FdFunding, Product, ProductOutcome, RdOutcome, RdSipVerdict,
    RdSipWinner, RdVsFdVsSipRequest, RdVsFdVsSipResult, RdVsSipRequest, RdVsSipResult, RiskLevel, SipOutcomeLeg,
};
pub use tax_saving::{calculate_elss_vs_sip, ElssVsSipRequest, ElssVsSipResult, ElssYear, ELSS_80C_CAP};
pub use ulip::{
    calculate_ulip, calculate_ulip_vs_sip, SipOutcome, TaxModel, UlipMode, UlipOutcome, UlipRequest, UlipResult,
    UlipSipComparison, UlipSipOption, UlipSipYear, UlipVsSipRequest, UlipVsSipResult,
};
