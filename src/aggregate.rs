use crate::models::{AuditSummary, Finding, RiskTier};

// Risk-tier thresholds. The original system fed synthetic features to a
// trained classifier here; an explicit threshold table keeps the tiers
// enumerable and testable.
pub const RISK_HIGH_FINDINGS: usize = 50;
pub const RISK_HIGH_IMPACT_RATIO: f64 = 0.10;
pub const RISK_MEDIUM_FINDINGS: usize = 10;
pub const RISK_MEDIUM_IMPACT_RATIO: f64 = 0.02;

/// Fold all findings into the run summary. Zero-impact findings contribute
/// nothing to the total but are never dropped from the table — they count
/// toward the risk tier and stay inspectable.
pub fn aggregate(
    findings: &[Finding],
    pre_audit_total: f64,
    total_records_scanned: usize,
) -> AuditSummary {
    let total_impact: f64 = findings.iter().map(|f| f.financial_impact).sum();
    let impact_ratio = if pre_audit_total > 0.0 {
        total_impact.abs() / pre_audit_total
    } else {
        0.0
    };
    AuditSummary {
        total_records_scanned,
        pre_audit_total,
        total_impact,
        risk: risk_tier(findings.len(), impact_ratio),
    }
}

fn risk_tier(finding_count: usize, impact_ratio: f64) -> RiskTier {
    if finding_count >= RISK_HIGH_FINDINGS || impact_ratio >= RISK_HIGH_IMPACT_RATIO {
        RiskTier::High
    } else if finding_count >= RISK_MEDIUM_FINDINGS || impact_ratio >= RISK_MEDIUM_IMPACT_RATIO {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RuleCategory;

    fn finding(impact: f64) -> Finding {
        Finding {
            category: RuleCategory::Quality,
            source_file: "IPDX.TXT".to_string(),
            subject_id: "001".to_string(),
            service_date: String::new(),
            description: "test".to_string(),
            recommended_action: "test".to_string(),
            financial_impact: impact,
        }
    }

    #[test]
    fn test_post_audit_total_is_derived() {
        let findings = vec![finding(-500.0), finding(-200.0), finding(0.0)];
        let summary = aggregate(&findings, 100_000.0, 42);
        assert_eq!(summary.total_impact, -700.0);
        assert_eq!(summary.post_audit_total(), 99_300.0);
        assert_eq!(summary.total_records_scanned, 42);
    }

    #[test]
    fn test_zero_impact_findings_count_toward_risk() {
        let findings: Vec<Finding> = (0..10).map(|_| finding(0.0)).collect();
        let summary = aggregate(&findings, 100_000.0, 10);
        assert_eq!(summary.total_impact, 0.0);
        assert_eq!(summary.risk, RiskTier::Medium);
    }

    #[test]
    fn test_empty_run_is_low_risk() {
        let summary = aggregate(&[], 0.0, 0);
        assert_eq!(summary.total_records_scanned, 0);
        assert_eq!(summary.pre_audit_total, 0.0);
        assert_eq!(summary.post_audit_total(), 0.0);
        assert_eq!(summary.risk, RiskTier::Low);
    }

    #[test]
    fn test_high_risk_by_impact_ratio() {
        let findings = vec![finding(-15_000.0)];
        let summary = aggregate(&findings, 100_000.0, 5);
        assert_eq!(summary.risk, RiskTier::High);
    }

    #[test]
    fn test_medium_risk_by_impact_ratio() {
        let findings = vec![finding(-3_000.0)];
        let summary = aggregate(&findings, 100_000.0, 5);
        assert_eq!(summary.risk, RiskTier::Medium);
    }

    #[test]
    fn test_low_risk_small_clean_run() {
        let findings = vec![finding(-500.0)];
        let summary = aggregate(&findings, 100_000.0, 5);
        assert_eq!(summary.risk, RiskTier::Low);
    }

    #[test]
    fn test_zero_pre_audit_total_does_not_divide() {
        let findings = vec![finding(-500.0)];
        let summary = aggregate(&findings, 0.0, 5);
        assert_eq!(summary.risk, RiskTier::Low);
        assert_eq!(summary.post_audit_total(), -500.0);
    }
}
