use serde::Serialize;

/// Closed set of rule groups. Classification is a case-insensitive substring
/// test of the filename against each group's lexicon — a heuristic carried
/// over from how the 52-file extracts are actually named in the field, made
/// explicit here so the catalogue can be tested exhaustively per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RuleGroup {
    Diagnosis,
    Financial,
    Drug,
    Identity,
}

pub const ALL_GROUPS: &[RuleGroup] = &[
    RuleGroup::Diagnosis,
    RuleGroup::Financial,
    RuleGroup::Drug,
    RuleGroup::Identity,
];

impl RuleGroup {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Diagnosis => "Diagnosis",
            Self::Financial => "Financial",
            Self::Drug => "Drug",
            Self::Identity => "Identity",
        }
    }

    pub fn lexicon(&self) -> &'static [&'static str] {
        match self {
            Self::Diagnosis => &["DIAG", "IPDX", "OPDX"],
            Self::Financial => &["CHARGE", "CHA"],
            Self::Drug => &["DRUG"],
            Self::Identity => &["PERSON", "PATIENT"],
        }
    }

    pub fn matches(&self, filename: &str) -> bool {
        let upper = filename.to_uppercase();
        self.lexicon().iter().any(|token| upper.contains(token))
    }
}

/// Groups whose rules apply to a file. Zero, one, or several may match; a
/// file matching nothing still contributes its row count to the summary.
pub fn classify(filename: &str) -> Vec<RuleGroup> {
    ALL_GROUPS
        .iter()
        .filter(|g| g.matches(filename))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnosis_tokens() {
        assert_eq!(classify("IPDX.TXT"), vec![RuleGroup::Diagnosis]);
        assert_eq!(classify("opdx.txt"), vec![RuleGroup::Diagnosis]);
        assert_eq!(classify("F45_DIAG_2568.txt"), vec![RuleGroup::Diagnosis]);
    }

    #[test]
    fn test_financial_tokens() {
        assert_eq!(classify("CHARGE.TXT"), vec![RuleGroup::Financial]);
        // CHA alone matches too — CHA.TXT is a real extract name
        assert_eq!(classify("cha.txt"), vec![RuleGroup::Financial]);
    }

    #[test]
    fn test_drug_and_identity_tokens() {
        assert_eq!(classify("DRUG.TXT"), vec![RuleGroup::Drug]);
        assert_eq!(classify("PERSON.TXT"), vec![RuleGroup::Identity]);
        assert_eq!(classify("patient_master.txt"), vec![RuleGroup::Identity]);
    }

    #[test]
    fn test_no_match() {
        assert!(classify("APPOINT.TXT").is_empty());
        assert!(classify("readme.md").is_empty());
    }

    #[test]
    fn test_multiple_groups_allowed() {
        // Nothing stops a filename from matching two lexicons.
        let groups = classify("DRUGCHARGE.TXT");
        assert!(groups.contains(&RuleGroup::Drug));
        assert!(groups.contains(&RuleGroup::Financial));
        assert_eq!(groups.len(), 2);
    }
}
