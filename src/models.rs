use serde::Serialize;

/// One input file as handed over by the caller: a name (used for rule-group
/// classification) and an opaque byte buffer. Never mutated.
#[derive(Debug, Clone)]
pub struct RawFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RuleCategory {
    Quality,
    Finance,
    Integrity,
    MlAnomaly,
    Logic,
}

impl RuleCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Quality => "Quality",
            Self::Finance => "Finance",
            Self::Integrity => "Integrity",
            Self::MlAnomaly => "ML Anomaly",
            Self::Logic => "Logic",
        }
    }
}

/// One detected issue. `financial_impact` is signed: negative means revenue
/// at risk (overclaim), positive a recoverable underclaim, zero informational.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub category: RuleCategory,
    pub source_file: String,
    /// HN for outpatient rows, AN for inpatient, "Multiple" for
    /// aggregate-level findings.
    pub subject_id: String,
    /// Pass-through from the source row; not validated.
    pub service_date: String,
    pub description: String,
    pub recommended_action: String,
    pub financial_impact: f64,
}

impl Finding {
    pub fn is_informational(&self) -> bool {
        self.financial_impact == 0.0
    }
}

/// Why a file was excluded from rule evaluation. Data, not an error: one bad
/// file never aborts the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    Undecodable,
    Empty,
    ColumnMismatch,
    DuplicateFile,
}

impl SkipReason {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Undecodable => "binary or undecodable content",
            Self::Empty => "no data rows",
            Self::ColumnMismatch => "no row matches the header width",
            Self::DuplicateFile => "identical content already audited",
        }
    }
}

/// Per-file result of an audit run, audited or skipped.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub file: String,
    pub rows: usize,
    /// Data rows excluded for being narrower than the header.
    pub short_rows: usize,
    pub findings: usize,
    pub skipped: Option<SkipReason>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditSummary {
    pub total_records_scanned: usize,
    pub pre_audit_total: f64,
    pub total_impact: f64,
    pub risk: RiskTier,
}

impl AuditSummary {
    /// Always derived, never stored, so it cannot drift from its parts.
    pub fn post_audit_total(&self) -> f64 {
        self.pre_audit_total + self.total_impact
    }
}
