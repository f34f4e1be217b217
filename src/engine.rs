use std::collections::HashSet;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::aggregate;
use crate::classifier::{classify, RuleGroup};
use crate::decoder;
use crate::models::{AuditSummary, FileOutcome, Finding, RawFile, SkipReason};
use crate::parser::{self, ParsedTable};
use crate::rules;

pub const DEFAULT_SEED: u64 = 42;

/// Everything one audit run produces. Findings keep rule order within a file
/// and file order within the input; display sorting is a downstream concern.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub findings: Vec<Finding>,
    pub summary: AuditSummary,
    pub outcomes: Vec<FileOutcome>,
}

fn checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Run the full audit pipeline over the supplied files.
///
/// Phase 1 decodes and parses every file, accumulating the running totals
/// and the population identity set from Identity-group files. Phase 2 runs
/// the rule catalogue per file plus the cross-file identity check, which
/// needs the complete population set and therefore cannot run earlier.
/// Any per-file failure degrades to a recorded skip; nothing here aborts
/// the batch, and zero input files yield an empty but well-formed report.
pub fn run_audit(files: &[RawFile], seed: u64) -> AuditReport {
    let mut outcomes: Vec<FileOutcome> = Vec::with_capacity(files.len());
    let mut parsed: Vec<Option<(Vec<RuleGroup>, ParsedTable)>> = Vec::with_capacity(files.len());
    let mut seen_checksums: HashSet<String> = HashSet::new();
    let mut population: HashSet<String> = HashSet::new();
    let mut total_records = 0usize;
    let mut pre_audit_total = 0.0f64;

    for file in files {
        let mut skip = None;
        if !seen_checksums.insert(checksum(&file.bytes)) {
            skip = Some(SkipReason::DuplicateFile);
        }

        let table = if skip.is_some() {
            None
        } else {
            match decoder::decode(&file.bytes) {
                None => {
                    skip = Some(SkipReason::Undecodable);
                    None
                }
                Some(text) => match parser::parse(&text) {
                    Ok(table) => Some(table),
                    Err(reason) => {
                        skip = Some(reason);
                        None
                    }
                },
            }
        };

        let Some(table) = table else {
            outcomes.push(FileOutcome {
                file: file.name.clone(),
                rows: 0,
                short_rows: 0,
                findings: 0,
                skipped: skip,
            });
            parsed.push(None);
            continue;
        };

        let groups = classify(&file.name);
        total_records += table.rows.len();
        if groups.contains(&RuleGroup::Financial) {
            if let Some(col) = table.first_existing(rules::AMOUNT_COLUMNS) {
                pre_audit_total += table
                    .rows
                    .iter()
                    .map(|row| rules::parse_amount(&row[col]))
                    .sum::<f64>();
            }
        }
        if groups.contains(&RuleGroup::Identity) {
            if let Some(col) = table.first_existing(rules::IDENTITY_COLUMNS) {
                for row in &table.rows {
                    if !row[col].is_empty() {
                        population.insert(row[col].clone());
                    }
                }
            }
        }

        outcomes.push(FileOutcome {
            file: file.name.clone(),
            rows: table.rows.len(),
            short_rows: table.short_rows,
            findings: 0,
            skipped: None,
        });
        parsed.push(Some((groups, table)));
    }

    let mut findings: Vec<Finding> = Vec::new();
    for (i, entry) in parsed.iter().enumerate() {
        let Some((groups, table)) = entry else {
            continue;
        };
        let name = &files[i].name;
        let before = findings.len();

        if groups.contains(&RuleGroup::Diagnosis) {
            findings.extend(rules::missing_diagnosis_code(name, table));
            findings.extend(rules::invalid_diagnosis_format(name, table));
            findings.extend(rules::duplicate_diagnosis_codes(name, table));
        }
        if groups.contains(&RuleGroup::Drug) {
            findings.extend(rules::missing_drug_code(name, table));
        }
        if groups.contains(&RuleGroup::Financial) {
            findings.extend(rules::nonpositive_charges(name, table));
            findings.extend(rules::high_charges(name, table));
            findings.extend(rules::statistical_anomalies(name, table, seed));
        }
        findings.extend(rules::date_order_violations(name, table));
        // Identity-group files define the population; cross-checking them
        // against themselves would be vacuous.
        if !population.is_empty() && !groups.contains(&RuleGroup::Identity) {
            findings.extend(rules::unknown_identities(name, table, &population));
        }

        outcomes[i].findings = findings.len() - before;
    }

    let summary = aggregate::aggregate(&findings, pre_audit_total, total_records);
    AuditReport {
        findings,
        summary,
        outcomes,
    }
}
