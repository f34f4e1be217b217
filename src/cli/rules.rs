use comfy_table::{Cell, Table};

use crate::anomaly;
use crate::classifier::ALL_GROUPS;
use crate::error::Result;
use crate::fmt::baht;
use crate::rules;

pub fn run() -> Result<()> {
    let mut groups = Table::new();
    groups.set_header(vec!["Group", "Filename tokens"]);
    for g in ALL_GROUPS {
        groups.add_row(vec![Cell::new(g.name()), Cell::new(g.lexicon().join(", "))]);
    }

    let mut catalogue = Table::new();
    catalogue.set_header(vec!["Rule", "Group", "Trigger", "Impact per hit"]);
    let high_charge_trigger = format!("amount > {}", baht(rules::HIGH_CHARGE_THRESHOLD));
    let rows: &[(&str, &str, &str, String)] = &[
        (
            "Missing diagnosis code",
            "Diagnosis",
            "code column is blank",
            baht(rules::MISSING_CODE_PENALTY),
        ),
        (
            "Invalid code format",
            "Diagnosis",
            "code is not letter + digits (+ optional .suffix)",
            baht(rules::INVALID_FORMAT_PENALTY),
        ),
        (
            "Duplicate code per patient",
            "Diagnosis",
            "same (patient, code) pair recorded twice",
            format!("{} per extra row", baht(rules::DUPLICATE_CODE_PENALTY)),
        ),
        (
            "Missing drug code",
            "Drug",
            "standard drug code column is blank",
            baht(rules::MISSING_DRUG_CODE_PENALTY),
        ),
        (
            "Zero/negative charge",
            "Financial",
            "amount <= 0",
            "informational".to_string(),
        ),
        (
            "High charge",
            "Financial",
            high_charge_trigger.as_str(),
            "informational".to_string(),
        ),
        (
            "Statistical anomaly",
            "Financial",
            "isolation-forest outlier over positive amounts",
            "informational".to_string(),
        ),
        (
            "Date-order violation",
            "Any",
            "discharge date before admit date",
            "informational".to_string(),
        ),
        (
            "Unknown identity",
            "Any + population file",
            "identity absent from population set",
            format!("{} per row", baht(rules::UNKNOWN_IDENTITY_PENALTY)),
        ),
    ];
    for (rule, group, trigger, impact) in rows {
        catalogue.add_row(vec![
            Cell::new(rule),
            Cell::new(group),
            Cell::new(trigger),
            Cell::new(impact),
        ]);
    }

    println!("Rule groups\n{groups}\n");
    println!("Rule catalogue\n{catalogue}\n");
    println!(
        "Anomaly detector: runs on {}+ positive amounts, flags ~{:.0}% of rows.",
        anomaly::MIN_SAMPLES,
        anomaly::CONTAMINATION * 100.0
    );
    Ok(())
}
