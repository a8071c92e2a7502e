//! Deposit products: bank FD/RD, post-office small-savings schemes and
//! government bonds

mod bank;
mod bonds;
mod savings;
mod schemes;

pub use bank::{calculate_fd, calculate_rd, fd_maturity, rd_maturity, DepositYear, FdRequest, FdResult, RdRequest, RdResult};
pub use bonds::{
    calculate_rbi_bonds, calculate_sgb, RbiBondPayout, RbiBondRequest, RbiBondResult, RbiBondYear, SgbRequest,
    SgbResult, SgbYear, RBI_BOND_MIN_INVESTMENT, SGB_MAX_GRAMS,
};
pub use savings::{
    calculate_post_office_rd, calculate_ssy, PostOfficeRdRequest, PostOfficeRdResult, PostOfficeRdYear, SsyMonth,
    SsyRequest, SsyResult, SsyYear, SSY_MATURITY_YEARS, SSY_MAX_ANNUAL_DEPOSIT, SSY_MAX_DEPOSIT_YEARS,
    SSY_MIN_ANNUAL_DEPOSIT,
};
pub use schemes::{
    calculate_nsc, calculate_pomis, calculate_ppf, calculate_scss, NscMonth, NscRequest, NscResult, NscYear,
    PomisRequest, PomisResult, PpfRequest, PpfResult, PpfYear, ScssRequest, ScssResult, NSC_TENURE_YEARS,
    POMIS_MAX_DEPOSIT, PPF_MAX_CONTRIBUTION, PPF_MIN_CONTRIBUTION, SCSS_MAX_DEPOSIT,
};
