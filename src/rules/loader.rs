//! CSV-based rule loader
//!
//! Loads tax rule tables from CSV files in data/tax_rules/. A table whose
//! file is absent keeps its built-in value.

use log::{debug, info};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{CalcError, CalcResult};
use crate::tax::{SlabSchedule, TaxSlab};

use super::TaxRules;

/// Default path to the rule tables
pub const DEFAULT_RULES_PATH: &str = "data/tax_rules";

/// Schedule names accepted in slabs.csv
pub const SCHEDULE_NAMES: [&str; 4] = ["old_0_60", "old_60_80", "old_80_plus", "new"];

fn parse_f64(field: &str, value: &str) -> CalcResult<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| CalcError::Rules(format!("{}: '{}' is not a number", field, value)))
}

/// Column `index` of a row, or a rules error naming the missing column
fn column<'r>(record: &'r csv::StringRecord, index: usize, name: &str) -> CalcResult<&'r str> {
    record.get(index).ok_or_else(|| {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        CalcError::Rules(format!("line {}: missing column '{}'", line, name))
    })
}

/// Load slab schedules from slabs.csv (`schedule,lower,upper,rate`)
///
/// `upper` is blank for the open top band; `rate` is a percentage.
pub fn load_slabs(path: &Path) -> CalcResult<HashMap<String, SlabSchedule>> {
    let file = File::open(path.join("slabs.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut rows: HashMap<String, Vec<TaxSlab>> = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let schedule = column(&record, 0, "schedule")?.trim().to_string();
        if !SCHEDULE_NAMES.contains(&schedule.as_str()) {
            return Err(CalcError::Rules(format!("unknown slab schedule '{}'", schedule)));
        }
        let lower = parse_f64("lower", column(&record, 1, "lower")?)?;
        let upper = match column(&record, 2, "upper")?.trim() {
            "" => None,
            s => Some(parse_f64("upper", s)?),
        };
        let rate = parse_f64("rate", column(&record, 3, "rate")?)? / 100.0;
        rows.entry(schedule).or_default().push(TaxSlab { lower, upper, rate });
    }

    let mut schedules = HashMap::new();
    for (name, mut slabs) in rows {
        slabs.sort_by(|a, b| a.lower.total_cmp(&b.lower));
        let schedule = SlabSchedule::new(slabs).map_err(|e| CalcError::Rules(format!("schedule '{}': {}", name, e)))?;
        schedules.insert(name, schedule);
    }

    Ok(schedules)
}

/// Load the cost inflation index from cost_inflation_index.csv (`year,index`)
pub fn load_cost_inflation_index(path: &Path) -> CalcResult<BTreeMap<i32, f64>> {
    let file = File::open(path.join("cost_inflation_index.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut table = BTreeMap::new();

    for result in reader.records() {
        let record = result?;
        let raw_year = column(&record, 0, "year")?;
        let year: i32 = raw_year
            .trim()
            .parse()
            .map_err(|_| CalcError::Rules(format!("year: '{}' is not an integer", raw_year)))?;
        let index = parse_f64("index", column(&record, 1, "index")?)?;
        table.insert(year, index);
    }

    Ok(table)
}

/// Load scalar parameters from parameters.csv (`key,value`)
pub fn load_parameters(path: &Path) -> CalcResult<Vec<(String, String)>> {
    let file = File::open(path.join("parameters.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut params = Vec::new();

    for result in reader.records() {
        let record = result?;
        let key = column(&record, 0, "key")?.trim().to_string();
        let value = column(&record, 1, "value")?.trim().to_string();
        params.push((key, value));
    }

    Ok(params)
}

/// Raw tables read from a rules directory
#[derive(Debug, Default)]
pub struct LoadedRules {
    pub slabs: Option<HashMap<String, SlabSchedule>>,
    pub cost_inflation_index: Option<BTreeMap<i32, f64>>,
    pub parameters: Option<Vec<(String, String)>>,
}

impl LoadedRules {
    /// Load all tables from the default path
    pub fn load_default() -> CalcResult<Self> {
        Self::load_from(Path::new(DEFAULT_RULES_PATH))
    }

    /// Load all tables present in `path`
    pub fn load_from(path: &Path) -> CalcResult<Self> {
        if !path.is_dir() {
            return Err(CalcError::Rules(format!("{} is not a directory", path.display())));
        }
        let present = |name: &str| path.join(name).is_file();

        let loaded = Self {
            slabs: if present("slabs.csv") { Some(load_slabs(path)?) } else { None },
            cost_inflation_index: if present("cost_inflation_index.csv") {
                Some(load_cost_inflation_index(path)?)
            } else {
                None
            },
            parameters: if present("parameters.csv") { Some(load_parameters(path)?) } else { None },
        };
        info!(
            "Loaded tax rules from {} (slabs: {}, cii: {}, parameters: {})",
            path.display(),
            loaded.slabs.is_some(),
            loaded.cost_inflation_index.is_some(),
            loaded.parameters.is_some()
        );
        Ok(loaded)
    }

    /// Overlay the loaded tables on the built-in rules
    pub fn into_rules(self) -> CalcResult<TaxRules> {
        let mut rules = TaxRules::default_rules();

        if let Some(mut slabs) = self.slabs {
            if let Some(s) = slabs.remove("old_0_60") {
                rules.old_below_60 = s;
            }
            if let Some(s) = slabs.remove("old_60_80") {
                rules.old_senior = s;
            }
            if let Some(s) = slabs.remove("old_80_plus") {
                rules.old_super_senior = s;
            }
            if let Some(s) = slabs.remove("new") {
                rules.new_regime = s;
            }
        }

        if let Some(cii) = self.cost_inflation_index {
            rules.cost_inflation_index = cii;
        }

        for (key, value) in self.parameters.unwrap_or_default() {
            apply_parameter(&mut rules, &key, &value)?;
        }

        rules.validate()?;
        Ok(rules)
    }
}

fn apply_parameter(rules: &mut TaxRules, key: &str, value: &str) -> CalcResult<()> {
    debug!("rule parameter {} = {}", key, value);

    if key == "financial_year" {
        rules.financial_year = value.to_string();
        return Ok(());
    }
    if key == "cg_regime_cutoff" {
        rules.capital_gains.regime_cutoff = NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|e| CalcError::Rules(format!("cg_regime_cutoff '{}': {}", value, e)))?;
        return Ok(());
    }

    let v = parse_f64(key, value)?;
    let d = &mut rules.deductions;
    let cg = &mut rules.capital_gains;
    let slot: &mut f64 = match key {
        "cess_rate" => &mut rules.cess_rate,
        "standard_deduction_old" => &mut rules.standard_deduction_old,
        "standard_deduction_new" => &mut rules.standard_deduction_new,
        "rebate_old_income_limit" => &mut rules.rebate_old.income_limit,
        "rebate_old_max" => &mut rules.rebate_old.max_rebate,
        "rebate_new_income_limit" => &mut rules.rebate_new.income_limit,
        "rebate_new_max" => &mut rules.rebate_new.max_rebate,
        "section_80c" => &mut d.section_80c,
        "section_80d" => &mut d.section_80d,
        "section_80d_senior" => &mut d.section_80d_senior,
        "section_80tta" => &mut d.section_80tta,
        "section_80ccd_1b" => &mut d.section_80ccd_1b,
        "section_80eea" => &mut d.section_80eea,
        "home_loan_self_occupied" => &mut d.home_loan_self_occupied,
        "home_loan_let_out" => &mut d.home_loan_let_out,
        "equity_ltcg_exemption_before" => &mut cg.equity_ltcg_exemption_before,
        "equity_ltcg_exemption_after" => &mut cg.equity_ltcg_exemption_after,
        "equity_ltcg_rate_before" => &mut cg.equity_ltcg_rate_before,
        "equity_ltcg_rate_after" => &mut cg.equity_ltcg_rate_after,
        "equity_stcg_rate_before" => &mut cg.equity_stcg_rate_before,
        "equity_stcg_rate_after" => &mut cg.equity_stcg_rate_after,
        "other_ltcg_rate" => &mut cg.other_ltcg_rate,
        "crypto_rate" => &mut cg.crypto_rate,
        "assumed_slab_rate" => &mut cg.assumed_slab_rate,
        "surcharge_threshold" => &mut cg.surcharge_threshold,
        "surcharge_rate" => &mut cg.surcharge_rate,
        "gratuity_exemption_cap" => &mut rules.gratuity_exemption_cap,
        other => return Err(CalcError::Rules(format!("unknown parameter '{}'", other))),
    };
    *slot = v;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::AgeGroup;
    use std::io::Write;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("fincalc-rules-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_default_rules() {
        let result = TaxRules::from_csv();
        assert!(result.is_ok(), "Failed to load rules: {:?}", result.err());

        // The shipped tables mirror the built-in values
        assert_eq!(result.unwrap(), TaxRules::default_rules());
    }

    #[test]
    fn test_missing_tables_keep_defaults() {
        let dir = scratch_dir("partial");
        let mut f = File::create(dir.join("parameters.csv")).unwrap();
        writeln!(f, "key,value\ncess_rate,0.05\nfinancial_year,2025-26").unwrap();
        drop(f);

        let rules = TaxRules::from_csv_path(&dir).unwrap();
        assert_eq!(rules.cess_rate, 0.05);
        assert_eq!(rules.financial_year, "2025-26");
        assert_eq!(rules.old_regime(AgeGroup::Below60), TaxRules::default_rules().old_regime(AgeGroup::Below60));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_parameter_rejected() {
        let dir = scratch_dir("unknown");
        let mut f = File::create(dir.join("parameters.csv")).unwrap();
        writeln!(f, "key,value\nsection_80z,1000").unwrap();
        drop(f);

        let err = TaxRules::from_csv_path(&dir).unwrap_err();
        assert!(err.to_string().contains("section_80z"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_slab_gap_rejected() {
        let dir = scratch_dir("gap");
        let mut f = File::create(dir.join("slabs.csv")).unwrap();
        writeln!(f, "schedule,lower,upper,rate\nnew,0,300000,0\nnew,400000,,5").unwrap();
        drop(f);

        assert!(TaxRules::from_csv_path(&dir).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_narrow_tables_rejected() {
        let dir = scratch_dir("narrow-slabs");
        let mut f = File::create(dir.join("slabs.csv")).unwrap();
        writeln!(f, "schedule,lower,upper
new,0,300000").unwrap();
        drop(f);
        let err = load_slabs(&dir).unwrap_err();
        assert!(matches!(err, CalcError::Rules(ref m) if m.contains("rate")), "{}", err);
        std::fs::remove_dir_all(&dir).ok();

        let dir = scratch_dir("narrow-cii");
        let mut f = File::create(dir.join("cost_inflation_index.csv")).unwrap();
        writeln!(f, "year
2001").unwrap();
        drop(f);
        assert!(matches!(load_cost_inflation_index(&dir), Err(CalcError::Rules(_))));
        std::fs::remove_dir_all(&dir).ok();

        let dir = scratch_dir("narrow-params");
        let mut f = File::create(dir.join("parameters.csv")).unwrap();
        writeln!(f, "key
cess_rate").unwrap();
        drop(f);
        assert!(matches!(TaxRules::from_csv_path(&dir), Err(CalcError::Rules(_))));
        std::fs::remove_dir_all(&dir).ok();
    }
}
