//! Technical debt detection
//!
//! Flags oversized files, God Classes, symbol overload, and noisy symbol
//! populations, then folds the issues into a 0-100 quality score.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::schema::{ParseResult, Symbol, SymbolKind};
use crate::scorer::{SymbolScorer, LOW_SCORE_THRESHOLD};

/// Severity levels, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DebtSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl DebtSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    /// Quality score deduction for one issue of this severity
    pub fn deduction(&self) -> f64 {
        match self {
            Self::Critical => 30.0,
            Self::High => 15.0,
            Self::Medium => 5.0,
            Self::Low => 2.0,
        }
    }
}

/// One detected technical-debt issue
#[derive(Debug, Clone, Serialize)]
pub struct DebtIssue {
    pub severity: DebtSeverity,
    pub category: String,
    pub file_path: String,
    pub metric_value: f64,
    pub threshold: f64,
    pub description: String,
    pub suggestion: String,
}

/// Result of analyzing one file
#[derive(Debug, Clone, Serialize)]
pub struct DebtAnalysis {
    pub issues: Vec<DebtIssue>,
    pub quality_score: f64,
    pub file_path: String,
    pub file_lines: usize,
    pub total_symbols: usize,
}

/// Breakdown of symbol noise by category
#[derive(Debug, Clone, Serialize)]
pub struct SymbolOverloadAnalysis {
    pub total_symbols: usize,
    /// Symbols remaining after the noise filter
    pub filtered_symbols: usize,
    /// Dropped / total
    pub filter_ratio: f64,
    pub noise_breakdown: BTreeMap<String, usize>,
    pub quality_score: f64,
}

/// Detector for file-level technical debt
#[derive(Debug, Clone, Copy, Default)]
pub struct TechDebtDetector;

impl TechDebtDetector {
    pub const SUPER_LARGE_FILE: usize = 5000;
    pub const LARGE_FILE: usize = 2000;
    pub const GOD_CLASS_METHODS: usize = 50;
    pub const MASSIVE_SYMBOL_COUNT: usize = 100;
    pub const NOISE_RATIO: f64 = 0.5;

    pub fn new() -> Self {
        Self
    }

    /// File-size and God-Class analysis for one parsed file
    pub fn analyze_file(&self, result: &ParseResult) -> DebtAnalysis {
        let mut issues = self.detect_file_size_issues(result);
        issues.extend(self.detect_god_classes(result));
        let quality_score = quality_score(&issues);

        DebtAnalysis {
            issues,
            quality_score,
            file_path: result.path.clone(),
            file_lines: result.file_lines,
            total_symbols: result.symbols.len(),
        }
    }

    /// Full analysis: file size, God Classes, and symbol overload
    pub fn analyze(&self, result: &ParseResult, scorer: &SymbolScorer) -> (DebtAnalysis, SymbolOverloadAnalysis) {
        let mut issues = self.detect_file_size_issues(result);
        issues.extend(self.detect_god_classes(result));
        let (overload_issues, mut overload) = self.analyze_symbol_overload(result, scorer);
        issues.extend(overload_issues);

        let score = quality_score(&issues);
        overload.quality_score = score;

        (
            DebtAnalysis {
                issues,
                quality_score: score,
                file_path: result.path.clone(),
                file_lines: result.file_lines,
                total_symbols: result.symbols.len(),
            },
            overload,
        )
    }

    fn detect_file_size_issues(&self, result: &ParseResult) -> Vec<DebtIssue> {
        let lines = result.file_lines;
        let mut issues = Vec::new();

        if lines > Self::SUPER_LARGE_FILE {
            issues.push(DebtIssue {
                severity: DebtSeverity::Critical,
                category: "super_large_file".to_string(),
                file_path: result.path.clone(),
                metric_value: lines as f64,
                threshold: Self::SUPER_LARGE_FILE as f64,
                description: format!(
                    "File has {} lines (threshold: {})",
                    lines,
                    Self::SUPER_LARGE_FILE
                ),
                suggestion: "Split into 3-5 smaller files by responsibility".to_string(),
            });
        } else if lines > Self::LARGE_FILE {
            issues.push(DebtIssue {
                severity: DebtSeverity::High,
                category: "large_file".to_string(),
                file_path: result.path.clone(),
                metric_value: lines as f64,
                threshold: Self::LARGE_FILE as f64,
                description: format!("File has {} lines (threshold: {})", lines, Self::LARGE_FILE),
                suggestion: "Consider splitting into 2-3 smaller modules".to_string(),
            });
        }

        issues
    }

    /// A class with too many methods. Methods are attributed to their class
    /// by the prefix before the last `::` (PHP) or `.` separator.
    fn detect_god_classes(&self, result: &ParseResult) -> Vec<DebtIssue> {
        let mut class_methods: BTreeMap<String, usize> = BTreeMap::new();
        for symbol in &result.symbols {
            if symbol.kind != SymbolKind::Method {
                continue;
            }
            let class_name = if let Some((class, _)) = symbol.name.rsplit_once("::") {
                class.to_string()
            } else if let Some((class, _)) = symbol.name.rsplit_once('.') {
                if symbol.name.starts_with('_') {
                    continue;
                }
                class.to_string()
            } else {
                continue;
            };
            *class_methods.entry(class_name).or_insert(0) += 1;
        }

        class_methods
            .into_iter()
            .filter(|(_, count)| *count > Self::GOD_CLASS_METHODS)
            .map(|(class_name, count)| {
                let split_count = std::cmp::max(3, count / 20);
                DebtIssue {
                    severity: DebtSeverity::Critical,
                    category: "god_class".to_string(),
                    file_path: result.path.clone(),
                    metric_value: count as f64,
                    threshold: Self::GOD_CLASS_METHODS as f64,
                    description: format!(
                        "Class '{}' has {} methods (threshold: {})",
                        class_name,
                        count,
                        Self::GOD_CLASS_METHODS
                    ),
                    suggestion: format!("Extract {} smaller classes by responsibility", split_count),
                }
            })
            .collect()
    }

    /// Symbol overload: massive symbol counts and high noise ratios
    pub fn analyze_symbol_overload(
        &self,
        result: &ParseResult,
        scorer: &SymbolScorer,
    ) -> (Vec<DebtIssue>, SymbolOverloadAnalysis) {
        let total = result.symbols.len();
        let mut issues = Vec::new();
        let mut noise_breakdown: BTreeMap<String, usize> = BTreeMap::new();
        let mut dropped = 0usize;

        for symbol in &result.symbols {
            if let Some(category) = noise_category(symbol, scorer) {
                *noise_breakdown.entry(category.to_string()).or_insert(0) += 1;
                dropped += 1;
            }
        }

        let filter_ratio = if total > 0 {
            dropped as f64 / total as f64
        } else {
            0.0
        };

        if total > Self::MASSIVE_SYMBOL_COUNT {
            issues.push(DebtIssue {
                severity: DebtSeverity::Critical,
                category: "massive_symbol_count".to_string(),
                file_path: result.path.clone(),
                metric_value: total as f64,
                threshold: Self::MASSIVE_SYMBOL_COUNT as f64,
                description: format!(
                    "File has {} symbols (threshold: {})",
                    total,
                    Self::MASSIVE_SYMBOL_COUNT
                ),
                suggestion: "Split the file or reduce its public surface".to_string(),
            });
        }

        if filter_ratio > Self::NOISE_RATIO {
            issues.push(DebtIssue {
                severity: DebtSeverity::High,
                category: "low_quality_symbols".to_string(),
                file_path: result.path.clone(),
                metric_value: filter_ratio,
                threshold: Self::NOISE_RATIO,
                description: format!(
                    "{:.0}% of symbols are noise (getters, private/magic methods, low-score)",
                    filter_ratio * 100.0
                ),
                suggestion: "Consolidate accessors and remove dead private helpers".to_string(),
            });
        }

        let analysis = SymbolOverloadAnalysis {
            total_symbols: total,
            filtered_symbols: total - dropped,
            filter_ratio,
            noise_breakdown,
            quality_score: quality_score(&issues),
        };

        (issues, analysis)
    }
}

fn noise_category(symbol: &Symbol, scorer: &SymbolScorer) -> Option<&'static str> {
    let short = symbol.short_name();
    if short.starts_with("__") {
        return Some("magic_methods");
    }
    if short.starts_with('_') {
        return Some("private_methods");
    }
    if (short.starts_with("get") || short.starts_with("set")) && short.len() > 3 {
        return Some("getters_setters");
    }
    if scorer.score(symbol) < LOW_SCORE_THRESHOLD {
        return Some("low_score");
    }
    None
}

/// `max(0, 100 - 30*critical - 15*high - 5*medium - 2*low)`
pub fn quality_score(issues: &[DebtIssue]) -> f64 {
    let deductions: f64 = issues.iter().map(|issue| issue.severity.deduction()).sum();
    (100.0 - deductions).max(0.0)
}

// ============================================================================
// Aggregated reporting
// ============================================================================

/// Technical-debt report over a set of analyzed files
#[derive(Debug, Clone, Serialize)]
pub struct DebtReport {
    pub total_files: usize,
    pub total_issues: usize,
    pub critical_issues: usize,
    pub high_issues: usize,
    pub medium_issues: usize,
    pub low_issues: usize,
    pub average_quality_score: f64,
    pub file_reports: Vec<DebtAnalysis>,
}

impl DebtReport {
    pub fn from_analyses(analyses: Vec<DebtAnalysis>) -> Self {
        let total_files = analyses.len();
        let count = |severity: DebtSeverity| {
            analyses
                .iter()
                .flat_map(|a| &a.issues)
                .filter(|i| i.severity == severity)
                .count()
        };
        let total_issues = analyses.iter().map(|a| a.issues.len()).sum();
        let average_quality_score = if total_files > 0 {
            analyses.iter().map(|a| a.quality_score).sum::<f64>() / total_files as f64
        } else {
            100.0
        };

        Self {
            total_files,
            total_issues,
            critical_issues: count(DebtSeverity::Critical),
            high_issues: count(DebtSeverity::High),
            medium_issues: count(DebtSeverity::Medium),
            low_issues: count(DebtSeverity::Low),
            average_quality_score,
            file_reports: analyses,
        }
    }

    /// Markdown rendering for documentation output
    pub fn to_markdown(&self) -> String {
        let mut lines = vec![
            "# Technical Debt Report".to_string(),
            String::new(),
            format!("- **Files analyzed**: {}", self.total_files),
            format!("- **Total issues**: {}", self.total_issues),
            format!("- **Quality score**: {:.1}", self.average_quality_score),
            String::new(),
        ];

        if self.total_issues > 0 {
            lines.push("## Issues by Severity".to_string());
            lines.push(String::new());
            for (label, count) in [
                ("CRITICAL", self.critical_issues),
                ("HIGH", self.high_issues),
                ("MEDIUM", self.medium_issues),
                ("LOW", self.low_issues),
            ] {
                if count > 0 {
                    lines.push(format!("- {}: {}", label, count));
                }
            }
            lines.push(String::new());

            lines.push("## Files".to_string());
            lines.push(String::new());
            for report in &self.file_reports {
                if report.issues.is_empty() {
                    continue;
                }
                lines.push(format!("### {}", report.file_path));
                lines.push(String::new());
                for issue in &report.issues {
                    lines.push(format!(
                        "- **{}** [{}] {} - {}",
                        issue.severity.as_str(),
                        issue.category,
                        issue.description,
                        issue.suggestion
                    ));
                }
                lines.push(String::new());
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Symbol;
    use std::path::PathBuf;

    fn result_with(file_lines: usize, symbols: Vec<Symbol>) -> ParseResult {
        let mut result =
            ParseResult::with_error(&PathBuf::from("test.php"), "php", String::new(), file_lines);
        result.error = None;
        result.symbols = symbols;
        result
    }

    fn method(name: &str, docstring: &str) -> Symbol {
        Symbol {
            name: name.to_string(),
            kind: SymbolKind::Method,
            signature: format!("public function {}()", name),
            docstring: docstring.to_string(),
            line_start: 1,
            line_end: 4,
            annotations: Vec::new(),
        }
    }

    #[test]
    fn test_super_large_file_critical() {
        let detector = TechDebtDetector::new();
        let analysis = detector.analyze_file(&result_with(6000, Vec::new()));
        assert_eq!(analysis.issues.len(), 1);
        assert_eq!(analysis.issues[0].category, "super_large_file");
        assert_eq!(analysis.issues[0].severity, DebtSeverity::Critical);
        assert_eq!(analysis.quality_score, 70.0);
    }

    #[test]
    fn test_large_file_suppressed_by_super_large() {
        let detector = TechDebtDetector::new();
        let analysis = detector.analyze_file(&result_with(9000, Vec::new()));
        assert!(analysis.issues.iter().all(|i| i.category != "large_file"));
    }

    #[test]
    fn test_large_file_high() {
        let detector = TechDebtDetector::new();
        let analysis = detector.analyze_file(&result_with(2500, Vec::new()));
        assert_eq!(analysis.issues[0].category, "large_file");
        assert_eq!(analysis.issues[0].severity, DebtSeverity::High);
        assert_eq!(analysis.quality_score, 85.0);
    }

    #[test]
    fn test_god_class_scenario() {
        // one class with 57 methods in a 2000-line file
        let symbols: Vec<Symbol> = (0..57)
            .map(|i| method(&format!("Manager::action{}", i), ""))
            .collect();
        let detector = TechDebtDetector::new();
        let analysis = detector.analyze_file(&result_with(2000, symbols));

        let god = analysis
            .issues
            .iter()
            .find(|i| i.category == "god_class")
            .expect("god_class issue");
        assert_eq!(god.severity, DebtSeverity::Critical);
        assert_eq!(god.metric_value, 57.0);
        assert_eq!(god.threshold, 50.0);
        // lines == 2000 does not trigger large_file; score is 100 - 30
        assert_eq!(analysis.quality_score, 70.0);
        assert_eq!(god.suggestion, "Extract 3 smaller classes by responsibility");
    }

    #[test]
    fn test_god_class_split_suggestion_scales() {
        let symbols: Vec<Symbol> = (0..85)
            .map(|i| method(&format!("Hub::op{}", i), ""))
            .collect();
        let detector = TechDebtDetector::new();
        let analysis = detector.analyze_file(&result_with(100, symbols));
        let god = analysis.issues.iter().find(|i| i.category == "god_class").unwrap();
        assert!(god.suggestion.starts_with("Extract 4"));
    }

    #[test]
    fn test_fifty_methods_is_not_god_class() {
        let symbols: Vec<Symbol> = (0..50)
            .map(|i| method(&format!("Svc::m{}", i), ""))
            .collect();
        let detector = TechDebtDetector::new();
        let analysis = detector.analyze_file(&result_with(100, symbols));
        assert!(analysis.issues.is_empty());
        assert_eq!(analysis.quality_score, 100.0);
    }

    #[test]
    fn test_massive_symbol_count() {
        let symbols: Vec<Symbol> = (0..120)
            .map(|i| method(&format!("processPayload{}", i), "Business logic here."))
            .collect();
        let detector = TechDebtDetector::new();
        let (issues, analysis) =
            detector.analyze_symbol_overload(&result_with(500, symbols), &SymbolScorer::new());

        assert_eq!(analysis.total_symbols, 120);
        let massive = issues
            .iter()
            .find(|i| i.category == "massive_symbol_count")
            .expect("massive_symbol_count issue");
        assert_eq!(massive.severity, DebtSeverity::Critical);
        assert_eq!(massive.metric_value, 120.0);
        assert_eq!(massive.threshold, 100.0);
    }

    #[test]
    fn test_noise_breakdown_categories() {
        let mut symbols = Vec::new();
        for i in 0..3 {
            symbols.push(method(&format!("get{}", i), ""));
        }
        for i in 0..2 {
            symbols.push(method(&format!("set{}", i), ""));
        }
        for i in 0..3 {
            symbols.push(method(&format!("_helper{}", i), ""));
        }
        symbols.push(method("__construct", ""));
        symbols.push(method("__toString", ""));
        for i in 0..10 {
            symbols.push(method(&format!("processData{}", i), "Business logic"));
        }

        let detector = TechDebtDetector::new();
        let (_, analysis) =
            detector.analyze_symbol_overload(&result_with(500, symbols), &SymbolScorer::new());

        assert_eq!(analysis.total_symbols, 20);
        assert_eq!(analysis.noise_breakdown["getters_setters"], 5);
        assert_eq!(analysis.noise_breakdown["private_methods"], 3);
        assert_eq!(analysis.noise_breakdown["magic_methods"], 2);
        assert_eq!(analysis.filtered_symbols, 10);
        assert_eq!(analysis.filter_ratio, 0.5);
    }

    #[test]
    fn test_high_noise_flagged() {
        let mut symbols = Vec::new();
        for i in 0..8 {
            symbols.push(method(&format!("getField{}", i), ""));
        }
        symbols.push(method("run", "Does the actual work."));

        let detector = TechDebtDetector::new();
        let (issues, analysis) =
            detector.analyze_symbol_overload(&result_with(200, symbols), &SymbolScorer::new());
        assert!(analysis.filter_ratio > 0.5);
        let noise = issues
            .iter()
            .find(|i| i.category == "low_quality_symbols")
            .expect("noise issue");
        assert_eq!(noise.severity, DebtSeverity::High);
    }

    #[test]
    fn test_quality_score_formula() {
        let issue = |severity| DebtIssue {
            severity,
            category: "x".to_string(),
            file_path: "f".to_string(),
            metric_value: 0.0,
            threshold: 0.0,
            description: String::new(),
            suggestion: String::new(),
        };

        assert_eq!(quality_score(&[]), 100.0);
        assert_eq!(quality_score(&[issue(DebtSeverity::Critical)]), 70.0);
        assert_eq!(
            quality_score(&[
                issue(DebtSeverity::Critical),
                issue(DebtSeverity::High),
                issue(DebtSeverity::Medium),
                issue(DebtSeverity::Low),
            ]),
            48.0
        );
        let many: Vec<DebtIssue> = (0..5).map(|_| issue(DebtSeverity::Critical)).collect();
        assert_eq!(quality_score(&many), 0.0);
    }

    #[test]
    fn test_report_aggregation() {
        let detector = TechDebtDetector::new();
        let a = detector.analyze_file(&result_with(6000, Vec::new()));
        let b = detector.analyze_file(&result_with(100, Vec::new()));
        let report = DebtReport::from_analyses(vec![a, b]);

        assert_eq!(report.total_files, 2);
        assert_eq!(report.critical_issues, 1);
        assert_eq!(report.average_quality_score, 85.0);

        let markdown = report.to_markdown();
        assert!(markdown.contains("# Technical Debt Report"));
        assert!(markdown.contains("CRITICAL: 1"));
        assert!(markdown.contains("super_large_file"));
    }
}
