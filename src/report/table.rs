//! The per-symbol results table.
//!
//! Pure formatting over a finished [`AuditReport`]; no computation
//! happens here.

use crate::audit::AuditReport;
use std::fmt::Write;

const RULE: &str = "+--------+------------+------------------------+-----------------+";
const PASS_CELL: &str = "PASS.";
const FAIL_CELL: &str = "*****FAIL!*****";

/// Renders one run's full report: header, per-symbol table, run-level
/// diagnostics and the verdict.
pub fn render(report: &AuditReport) -> String {
    let eval = &report.evaluation;
    let mut out = String::new();

    let _ = writeln!(out, "Testing: {}", report.set_name);
    let _ = writeln!(out);
    let _ = writeln!(out, "    TOTAL SAMPLES: {}", eval.total);
    let _ = writeln!(out, "    STANDARD DEVIATION THRESHOLD: {}", eval.threshold);
    let _ = writeln!(out, "    {RULE}");
    let _ = writeln!(
        out,
        "    | {:>6} | {:<10} | {:<22} | {:<15} |",
        "symbol", "total", "sd", "status"
    );
    let _ = writeln!(out, "    {RULE}");
    for stat in &eval.per_symbol {
        let status = if stat.pass { PASS_CELL } else { FAIL_CELL };
        let _ = writeln!(
            out,
            "    | {:>6} | {:<10} | {:<22} | {:<15} |",
            stat.symbol,
            stat.observed,
            format!("{:.6}", stat.z_score),
            status
        );
    }
    let _ = writeln!(out, "    {RULE}");

    if eval.flags.count_mismatch {
        let _ = writeln!(
            out,
            "    SAMPLE COUNT MISMATCH: observed {}, expected {}",
            eval.total, eval.expected_total
        );
    }
    for (symbol, count) in &eval.unknown {
        let _ = writeln!(
            out,
            "    UNKNOWN SYMBOL: {:?} seen {} time(s)",
            symbol, count
        );
    }
    if eval.flags.generator_failed {
        let _ = writeln!(
            out,
            "    GENERATOR EXIT: {}",
            match report.exit.status_code {
                Some(code) => format!("status {code}"),
                None => "killed by signal".to_string(),
            }
        );
        if let Some(matched) = report.diagnostic_matched {
            let _ = writeln!(
                out,
                "    DIAGNOSTIC HINT {}",
                if matched { "MATCHED" } else { "NOT MATCHED" }
            );
        }
        if !report.exit.diagnostics.is_empty() {
            let _ = writeln!(out, "    --- generator diagnostics ---");
            for line in report.exit.diagnostics.lines() {
                let _ = writeln!(out, "    {line}");
            }
        }
    }

    let _ = writeln!(
        out,
        "    VERDICT: {}",
        if eval.pass { "PASS" } else { "FAIL" }
    );
    out
}

/// One-line summary for a whole suite.
pub fn verdict_line(all_passed: bool) -> &'static str {
    if all_passed {
        "ALL TESTS PASS."
    } else {
        "FAILURES!"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{evaluate, DEFAULT_THRESHOLD};
    use crate::audit::AuditReport;
    use crate::driver::GeneratorExit;
    use crate::pipeline::FrequencyTable;
    use crate::symbolset::SymbolSet;
    use std::time::Duration;

    fn report_for(counts: &[u64], expected_total: u64, exit_code: i32) -> AuditReport {
        let set = SymbolSet::from_chars("ab", "--ab", "AB");
        let table = FrequencyTable::from_counts(&set, counts).unwrap();
        let evaluation = evaluate(
            &set,
            &table,
            expected_total,
            DEFAULT_THRESHOLD,
            exit_code != 0,
        )
        .unwrap();
        AuditReport {
            set_name: "ab".to_string(),
            evaluation,
            exit: GeneratorExit {
                status_code: Some(exit_code),
                diagnostics: String::new(),
            },
            diagnostic_matched: None,
            elapsed: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_passing_table() {
        let rendered = render(&report_for(&[60, 40], 100, 0));
        assert!(rendered.contains("TOTAL SAMPLES: 100"));
        assert!(rendered.contains("STANDARD DEVIATION THRESHOLD: 3.5"));
        assert!(rendered.contains("PASS."));
        assert!(!rendered.contains(FAIL_CELL));
        assert!(rendered.contains("VERDICT: PASS"));
    }

    #[test]
    fn test_failing_symbol_row() {
        let rendered = render(&report_for(&[90, 10], 100, 0));
        assert!(rendered.contains(FAIL_CELL));
        assert!(rendered.contains("VERDICT: FAIL"));
    }

    #[test]
    fn test_mismatch_line() {
        let rendered = render(&report_for(&[50, 49], 100, 0));
        assert!(rendered.contains("SAMPLE COUNT MISMATCH: observed 99, expected 100"));
        assert!(rendered.contains("VERDICT: FAIL"));
    }

    #[test]
    fn test_generator_exit_line() {
        let rendered = render(&report_for(&[50, 50], 100, 1));
        assert!(rendered.contains("GENERATOR EXIT: status 1"));
        assert!(rendered.contains("VERDICT: FAIL"));
    }

    #[test]
    fn test_verdict_lines() {
        assert_eq!(verdict_line(true), "ALL TESTS PASS.");
        assert_eq!(verdict_line(false), "FAILURES!");
    }
}
