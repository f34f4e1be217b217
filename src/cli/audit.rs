use std::fs;
use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::engine::{self, AuditReport};
use crate::error::{ClaimcheckError, Result};
use crate::fmt::baht;
use crate::models::{RawFile, RiskTier};

pub fn run(
    dir: &str,
    csv_out: Option<&str>,
    json_out: Option<&str>,
    seed: u64,
    show_all: bool,
) -> Result<()> {
    let files = read_extract_dir(Path::new(dir))?;
    let report = engine::run_audit(&files, seed);
    println!("{}", format_report(&report, show_all));

    if let Some(path) = csv_out {
        export_csv(&report, Path::new(path))?;
        println!("Findings written to {path}");
    }
    if let Some(path) = json_out {
        export_json(&report, Path::new(path))?;
        println!("Report written to {path}");
    }
    Ok(())
}

/// Collect every regular file in the directory, sorted by name so repeat
/// runs see the same input order.
fn read_extract_dir(dir: &Path) -> Result<Vec<RawFile>> {
    if !dir.is_dir() {
        return Err(ClaimcheckError::NotADirectory(dir.display().to_string()));
    }
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        files.push(RawFile::new(name, fs::read(&path)?));
    }
    Ok(files)
}

// ---------------------------------------------------------------------------
// Pure formatting (report data → String)
// ---------------------------------------------------------------------------

fn format_report(report: &AuditReport, show_all: bool) -> String {
    let mut out = format!(
        "Audit run {}\n\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    for o in &report.outcomes {
        if let Some(reason) = o.skipped {
            out.push_str(&format!(
                "{} {}: {}\n",
                "Skipped".yellow(),
                o.file,
                reason.label()
            ));
        } else if o.short_rows > 0 {
            out.push_str(&format!(
                "{} {}: {} row(s) narrower than the header excluded\n",
                "Partial".yellow(),
                o.file,
                o.short_rows
            ));
        }
    }

    let shown: Vec<_> = report
        .findings
        .iter()
        .filter(|f| show_all || !f.is_informational())
        .collect();
    let hidden = report.findings.len() - shown.len();

    if shown.is_empty() {
        if report.findings.is_empty() {
            out.push_str(&format!("\n{}\n", "No findings — extract set is clean.".green()));
        } else {
            out.push_str(&format!(
                "\nNo findings with financial impact ({hidden} informational hidden, use --all to show).\n"
            ));
        }
    } else {
        let mut table = Table::new();
        table.set_header(vec![
            "Category", "File", "Subject", "Date", "Description", "Action", "Impact",
        ]);
        for f in &shown {
            table.add_row(vec![
                Cell::new(f.category.label()),
                Cell::new(&f.source_file),
                Cell::new(&f.subject_id),
                Cell::new(&f.service_date),
                Cell::new(&f.description),
                Cell::new(&f.recommended_action),
                Cell::new(baht(f.financial_impact)),
            ]);
        }
        out.push_str(&format!("\nFindings\n{table}\n"));
        if hidden > 0 {
            out.push_str(&format!(
                "({hidden} informational findings hidden, use --all to show)\n"
            ));
        }
    }

    let s = &report.summary;
    let impact = if s.total_impact < 0.0 {
        baht(s.total_impact).red().to_string()
    } else {
        baht(s.total_impact).to_string()
    };
    let risk = match s.risk {
        RiskTier::Low => s.risk.label().green(),
        RiskTier::Medium => s.risk.label().yellow(),
        RiskTier::High => s.risk.label().red().bold(),
    };
    out.push_str(&format!(
        "\nRecords scanned:  {}\nFindings:         {}\nPre-audit total:  {}\nTotal impact:     {}\nPost-audit total: {}\nRisk tier:        {}\n",
        s.total_records_scanned,
        report.findings.len(),
        baht(s.pre_audit_total),
        impact,
        baht(s.post_audit_total()),
        risk,
    ));
    out
}

// ---------------------------------------------------------------------------
// Exports — the full findings table, zero-impact rows included
// ---------------------------------------------------------------------------

fn export_csv(report: &AuditReport, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "category",
        "source_file",
        "subject_id",
        "service_date",
        "description",
        "recommended_action",
        "financial_impact",
    ])?;
    for f in &report.findings {
        let impact = format!("{:.2}", f.financial_impact);
        writer.write_record([
            f.category.label(),
            f.source_file.as_str(),
            f.subject_id.as_str(),
            f.service_date.as_str(),
            f.description.as_str(),
            f.recommended_action.as_str(),
            impact.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn export_json(report: &AuditReport, path: &Path) -> Result<()> {
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}
