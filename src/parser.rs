use crate::models::SkipReason;

/// Decoded, column-bound representation of one extract file.
///
/// Header names are trimmed and upper-cased so column lookup is
/// case-insensitive. Duplicate header names are tolerated; the first
/// occurrence wins on lookup. Every kept row has exactly `columns.len()`
/// fields; blank values stay `""` (never a null sentinel).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Data rows excluded because they carried fewer fields than the header.
    pub short_rows: usize,
}

impl ParsedTable {
    /// Index of a column by (case-insensitive) name, first occurrence wins.
    pub fn col_index(&self, name: &str) -> Option<usize> {
        let wanted = name.to_uppercase();
        self.columns.iter().position(|c| *c == wanted)
    }

    /// First column out of `names` that exists in this table.
    pub fn first_existing(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|n| self.col_index(n))
    }
}

/// Split decoded text into a header and data rows.
///
/// Delimiter is inferred from the header line: pipe if present, else comma.
/// This is a heuristic — free text containing the delimiter will misparse,
/// which is accepted. Binding policy: rows wider than the header are
/// truncated on the right; rows narrower than the header are excluded and
/// counted in `short_rows`. A file with no usable data rows is rejected with
/// the reason the caller should surface.
pub fn parse(text: &str) -> Result<ParsedTable, SkipReason> {
    let mut lines = text.lines();
    let Some(header_line) = lines.next() else {
        return Err(SkipReason::Empty);
    };
    let delim = if header_line.contains('|') { '|' } else { ',' };
    let columns: Vec<String> = header_line
        .split(delim)
        .map(|c| c.trim().to_uppercase())
        .collect();

    let mut rows = Vec::new();
    let mut short_rows = 0usize;
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields: Vec<String> = line.split(delim).map(|f| f.trim().to_string()).collect();
        if fields.len() > columns.len() {
            fields.truncate(columns.len());
        }
        if fields.len() < columns.len() {
            short_rows += 1;
            continue;
        }
        rows.push(fields);
    }

    if rows.is_empty() {
        if short_rows > 0 {
            return Err(SkipReason::ColumnMismatch);
        }
        return Err(SkipReason::Empty);
    }
    Ok(ParsedTable {
        columns,
        rows,
        short_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipe_delimited() {
        let t = parse("HN|DIAG|AMOUNT\n001|A01|500\n002|B20|1200").unwrap();
        assert_eq!(t.columns, vec!["HN", "DIAG", "AMOUNT"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[1], vec!["002", "B20", "1200"]);
    }

    #[test]
    fn test_comma_fallback_when_header_has_no_pipe() {
        let t = parse("hn,diag\n001,A01").unwrap();
        assert_eq!(t.columns, vec!["HN", "DIAG"]);
        assert_eq!(t.rows[0], vec!["001", "A01"]);
    }

    #[test]
    fn test_header_normalized_upper_and_trimmed() {
        let t = parse(" hn | Diag \n001|A01").unwrap();
        assert_eq!(t.columns, vec!["HN", "DIAG"]);
        assert_eq!(t.col_index("diag"), Some(1));
    }

    #[test]
    fn test_wide_rows_truncated() {
        let t = parse("HN|DIAG\n001|A01|extra|junk").unwrap();
        assert_eq!(t.rows[0], vec!["001", "A01"]);
    }

    #[test]
    fn test_short_rows_excluded_but_counted() {
        let t = parse("HN|DIAG|AMOUNT\n001|A01|500\n002|B20").unwrap();
        assert_eq!(t.rows.len(), 1);
        assert_eq!(t.short_rows, 1);
    }

    #[test]
    fn test_all_rows_short_is_column_mismatch() {
        assert_eq!(
            parse("HN|DIAG|AMOUNT\n001|A01\n002|B20"),
            Err(SkipReason::ColumnMismatch)
        );
    }

    #[test]
    fn test_header_only_is_empty() {
        assert_eq!(parse("HN|DIAG"), Err(SkipReason::Empty));
        assert_eq!(parse("HN|DIAG\n\n  \n"), Err(SkipReason::Empty));
    }

    #[test]
    fn test_empty_text_is_empty() {
        assert_eq!(parse(""), Err(SkipReason::Empty));
    }

    #[test]
    fn test_blank_values_stay_empty_strings() {
        let t = parse("HN|DIAG\n002|").unwrap();
        assert_eq!(t.rows[0][1], "");
    }

    #[test]
    fn test_duplicate_headers_first_occurrence_wins() {
        let t = parse("HN|DIAG|DIAG\n001|A01|B20").unwrap();
        assert_eq!(t.col_index("DIAG"), Some(1));
    }

    #[test]
    fn test_first_existing() {
        let t = parse("HN|PDX\n001|A01").unwrap();
        assert_eq!(t.first_existing(&["DIAGCODE", "DIAG", "PDX"]), Some(1));
        assert_eq!(t.first_existing(&["DIDSTD", "DRUGCODE"]), None);
    }
}
