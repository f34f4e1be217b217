use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::anomaly;
use crate::fmt::baht;
use crate::models::{Finding, RuleCategory};
use crate::parser::ParsedTable;

// ---------------------------------------------------------------------------
// Penalties and thresholds (baht)
// ---------------------------------------------------------------------------

pub const MISSING_CODE_PENALTY: f64 = -500.0;
pub const INVALID_FORMAT_PENALTY: f64 = -200.0;
pub const DUPLICATE_CODE_PENALTY: f64 = -100.0;
pub const MISSING_DRUG_CODE_PENALTY: f64 = -300.0;
pub const UNKNOWN_IDENTITY_PENALTY: f64 = -1_000.0;
pub const HIGH_CHARGE_THRESHOLD: f64 = 100_000.0;

// ---------------------------------------------------------------------------
// Column lexica — the extracts are not schema-stable across hospitals, so
// each concept is looked up through a short candidate list, first match wins.
// ---------------------------------------------------------------------------

pub const DIAGNOSIS_CODE_COLUMNS: &[&str] = &["DIAGCODE", "DIAG", "PDX"];
pub const DRUG_CODE_COLUMNS: &[&str] = &["DIDSTD", "DRUGCODE"];
pub const AMOUNT_COLUMNS: &[&str] = &["AMOUNT", "PRICE", "TOTAL"];
pub const IDENTITY_COLUMNS: &[&str] = &["HN", "AN", "PID", "CID"];
pub const SERVICE_DATE_COLUMNS: &[&str] = &["DATE_SERV", "DATEOPD", "DATEADM", "DATE"];
pub const ADMIT_DATE_COLUMNS: &[&str] = &["DATEADM", "ADMDATE"];
pub const DISCHARGE_DATE_COLUMNS: &[&str] = &["DATEDSC", "DSCDATE"];

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Coerce a raw field to a number; malformed values count as zero rather
/// than erroring or dropping the row.
pub fn parse_amount(raw: &str) -> f64 {
    let s = raw.replace(',', "").replace('"', "");
    s.trim().parse().unwrap_or(0.0)
}

fn subject_id(table: &ParsedTable, row: &[String]) -> String {
    table
        .first_existing(IDENTITY_COLUMNS)
        .map(|i| row[i].clone())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}

fn service_date(table: &ParsedTable, row: &[String]) -> String {
    table
        .first_existing(SERVICE_DATE_COLUMNS)
        .map(|i| row[i].clone())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Diagnosis group
// ---------------------------------------------------------------------------

pub fn missing_diagnosis_code(file: &str, table: &ParsedTable) -> Vec<Finding> {
    let Some(code_col) = table.first_existing(DIAGNOSIS_CODE_COLUMNS) else {
        return Vec::new();
    };
    let col_name = table.columns[code_col].clone();
    table
        .rows
        .iter()
        .filter(|row| row[code_col].is_empty())
        .map(|row| Finding {
            category: RuleCategory::Quality,
            source_file: file.to_string(),
            subject_id: subject_id(table, row),
            service_date: service_date(table, row),
            description: format!("Diagnosis code missing (column {col_name})"),
            recommended_action: "Complete the diagnosis code before claim submission".to_string(),
            financial_impact: MISSING_CODE_PENALTY,
        })
        .collect()
}

pub fn invalid_diagnosis_format(file: &str, table: &ParsedTable) -> Vec<Finding> {
    let Some(code_col) = table.first_existing(DIAGNOSIS_CODE_COLUMNS) else {
        return Vec::new();
    };
    // One letter, digits, optional decimal suffix (A09, J18.9, Z01.411)
    let Ok(shape) = Regex::new(r"^[A-Z]\d+(\.\d{1,4})?$") else {
        return Vec::new();
    };
    table
        .rows
        .iter()
        .filter(|row| {
            let code = row[code_col].as_str();
            !code.is_empty() && !shape.is_match(code)
        })
        .map(|row| Finding {
            category: RuleCategory::Quality,
            source_file: file.to_string(),
            subject_id: subject_id(table, row),
            service_date: service_date(table, row),
            description: format!("Diagnosis code '{}' is not a valid code shape", row[code_col]),
            recommended_action: "Correct the code to one letter followed by digits".to_string(),
            financial_impact: INVALID_FORMAT_PENALTY,
        })
        .collect()
}

pub fn duplicate_diagnosis_codes(file: &str, table: &ParsedTable) -> Vec<Finding> {
    let Some(code_col) = table.first_existing(DIAGNOSIS_CODE_COLUMNS) else {
        return Vec::new();
    };
    let mut counts: HashMap<(String, String), usize> = HashMap::new();
    let mut first_seen: Vec<((String, String), String)> = Vec::new();
    for row in &table.rows {
        let code = row[code_col].clone();
        if code.is_empty() {
            continue;
        }
        let key = (subject_id(table, row), code);
        let n = counts.entry(key.clone()).or_insert(0);
        if *n == 0 {
            first_seen.push((key, service_date(table, row)));
        }
        *n += 1;
    }
    first_seen
        .into_iter()
        .filter_map(|(key, date)| {
            let n = counts[&key];
            if n < 2 {
                return None;
            }
            let (subject, code) = key;
            Some(Finding {
                category: RuleCategory::Quality,
                source_file: file.to_string(),
                subject_id: subject,
                service_date: date,
                description: format!("Diagnosis code '{code}' recorded {n} times for this patient"),
                recommended_action: "Remove the duplicate diagnosis rows".to_string(),
                financial_impact: DUPLICATE_CODE_PENALTY * (n - 1) as f64,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Drug group
// ---------------------------------------------------------------------------

pub fn missing_drug_code(file: &str, table: &ParsedTable) -> Vec<Finding> {
    let Some(code_col) = table.first_existing(DRUG_CODE_COLUMNS) else {
        return Vec::new();
    };
    let col_name = table.columns[code_col].clone();
    table
        .rows
        .iter()
        .filter(|row| row[code_col].is_empty())
        .map(|row| Finding {
            category: RuleCategory::Quality,
            source_file: file.to_string(),
            subject_id: subject_id(table, row),
            service_date: service_date(table, row),
            description: format!("Standard drug code missing (column {col_name})"),
            recommended_action: "Fill in the standard drug code for the dispensed item".to_string(),
            financial_impact: MISSING_DRUG_CODE_PENALTY,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Financial group
// ---------------------------------------------------------------------------

pub fn nonpositive_charges(file: &str, table: &ParsedTable) -> Vec<Finding> {
    let Some(amount_col) = table.first_existing(AMOUNT_COLUMNS) else {
        return Vec::new();
    };
    table
        .rows
        .iter()
        .filter(|row| parse_amount(&row[amount_col]) <= 0.0)
        .map(|row| Finding {
            category: RuleCategory::Finance,
            source_file: file.to_string(),
            subject_id: subject_id(table, row),
            service_date: service_date(table, row),
            description: format!(
                "Charge amount '{}' is zero or negative",
                row[amount_col]
            ),
            recommended_action: "Verify the charge entry manually".to_string(),
            financial_impact: 0.0,
        })
        .collect()
}

pub fn high_charges(file: &str, table: &ParsedTable) -> Vec<Finding> {
    let Some(amount_col) = table.first_existing(AMOUNT_COLUMNS) else {
        return Vec::new();
    };
    table
        .rows
        .iter()
        .filter(|row| parse_amount(&row[amount_col]) > HIGH_CHARGE_THRESHOLD)
        .map(|row| Finding {
            category: RuleCategory::Finance,
            source_file: file.to_string(),
            subject_id: subject_id(table, row),
            service_date: service_date(table, row),
            description: format!(
                "Charge {} exceeds {}",
                baht(parse_amount(&row[amount_col])),
                baht(HIGH_CHARGE_THRESHOLD)
            ),
            recommended_action: "Confirm supporting documents for the high charge".to_string(),
            financial_impact: 0.0,
        })
        .collect()
}

pub fn statistical_anomalies(file: &str, table: &ParsedTable, seed: u64) -> Vec<Finding> {
    let Some(amount_col) = table.first_existing(AMOUNT_COLUMNS) else {
        return Vec::new();
    };
    let amounts: Vec<f64> = table
        .rows
        .iter()
        .map(|row| parse_amount(&row[amount_col]))
        .collect();
    anomaly::detect(&amounts, seed)
        .into_iter()
        .map(|idx| {
            let row = &table.rows[idx];
            Finding {
                category: RuleCategory::MlAnomaly,
                source_file: file.to_string(),
                subject_id: subject_id(table, row),
                service_date: service_date(table, row),
                description: format!(
                    "Charge {} is statistically unusual for this file",
                    baht(amounts[idx])
                ),
                recommended_action: "Review manually; flagged by the anomaly detector, not asserted as an error"
                    .to_string(),
                financial_impact: 0.0,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Cross-cutting rules
// ---------------------------------------------------------------------------

/// Applies to any table carrying both an admit and a discharge date. The
/// extract date format (YYYYMMDD) sorts lexicographically, so a plain string
/// compare is the whole check; rows missing either date are passed over.
pub fn date_order_violations(file: &str, table: &ParsedTable) -> Vec<Finding> {
    let (Some(adm_col), Some(dsc_col)) = (
        table.first_existing(ADMIT_DATE_COLUMNS),
        table.first_existing(DISCHARGE_DATE_COLUMNS),
    ) else {
        return Vec::new();
    };
    table
        .rows
        .iter()
        .filter(|row| {
            let adm = row[adm_col].as_str();
            let dsc = row[dsc_col].as_str();
            !adm.is_empty() && !dsc.is_empty() && dsc < adm
        })
        .map(|row| Finding {
            category: RuleCategory::Logic,
            source_file: file.to_string(),
            subject_id: subject_id(table, row),
            service_date: row[adm_col].clone(),
            description: format!(
                "Discharge date {} precedes admit date {}",
                row[dsc_col], row[adm_col]
            ),
            recommended_action: "Correct the admission or discharge date".to_string(),
            financial_impact: 0.0,
        })
        .collect()
}

/// Cross-file referential check: every identity in a service table must
/// exist in the population set collected from the Identity-group files.
/// One finding per distinct unknown identity, penalty scaled by row count.
pub fn unknown_identities(
    file: &str,
    table: &ParsedTable,
    population: &HashSet<String>,
) -> Vec<Finding> {
    let Some(id_col) = table.first_existing(IDENTITY_COLUMNS) else {
        return Vec::new();
    };
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for row in &table.rows {
        let id = row[id_col].as_str();
        if id.is_empty() || population.contains(id) {
            continue;
        }
        let n = counts.entry(id.to_string()).or_insert(0);
        if *n == 0 {
            order.push(id.to_string());
        }
        *n += 1;
    }
    order
        .into_iter()
        .map(|id| {
            let n = counts[&id];
            Finding {
                category: RuleCategory::Integrity,
                source_file: file.to_string(),
                subject_id: id.clone(),
                service_date: String::new(),
                description: format!(
                    "Identity '{id}' not present in the population file ({n} row{})",
                    if n == 1 { "" } else { "s" }
                ),
                recommended_action: "Verify the patient registration record".to_string(),
                financial_impact: UNKNOWN_IDENTITY_PENALTY * n as f64,
            }
        })
        .collect()
}
