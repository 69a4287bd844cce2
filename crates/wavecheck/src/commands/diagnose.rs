//! `diagnose` and `score`: collect a snapshot, run the engine, render.

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::Tabled;

use wavecheck_core::analysis::AnalysisReport;
use wavecheck_core::analysis::score::{CategoryKind, Grade, HealthScore};
use wavecheck_core::{HistoryStore, PatternTable, run_diagnostics};

use crate::cli::{DiagnoseArgs, GlobalOpts, OutputFormat};
use crate::collect;
use crate::config;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    args: &DiagnoseArgs,
    global: &GlobalOpts,
    score_only: bool,
) -> Result<(), CliError> {
    let cfg = config::load_config()?;
    let settings = config::resolve_controller(global, &cfg)?;

    let client = collect::open_session(&settings).await?;
    let snapshot = collect::collect_snapshot(&client, args.within_hours, args.event_limit).await?;

    let patterns_file = args.patterns.clone().unwrap_or_else(config::patterns_path);
    let patterns = PatternTable::load(&patterns_file);

    let mut history = if args.no_history {
        HistoryStore::in_memory()
    } else {
        let path = args.history.clone().unwrap_or_else(config::history_path);
        HistoryStore::load(&path)
    };

    let report = run_diagnostics(&snapshot, &cfg.engine, &patterns, &mut history);
    if !args.no_history {
        history.save().map_err(CliError::from)?;
    }

    let colored = output::should_color(&global.color);
    let rendered = if score_only {
        render_score(&report, &global.output, colored)
    } else {
        render_report(&report, &global.output, colored)
    };
    output::print_output(&rendered, global.quiet);
    Ok(())
}

// ── Score rendering ──────────────────────────────────────────────────

#[derive(Serialize)]
struct ScoreView {
    status: &'static str,
    score: Option<f64>,
    grade: Option<Grade>,
    reason: Option<String>,
}

impl ScoreView {
    fn of(report: &AnalysisReport) -> Self {
        match &report.overall {
            HealthScore::Score { value, grade } => Self {
                status: "ok",
                score: Some(*value),
                grade: Some(*grade),
                reason: None,
            },
            HealthScore::Unavailable { reason } => Self {
                status: "unavailable",
                score: None,
                grade: None,
                reason: Some(reason.clone()),
            },
        }
    }
}

fn grade_colored(grade: Grade, text: &str, colored: bool) -> String {
    if !colored {
        return text.to_owned();
    }
    match grade {
        Grade::A => text.green().bold().to_string(),
        Grade::B => text.cyan().bold().to_string(),
        Grade::C | Grade::D => text.yellow().bold().to_string(),
        Grade::F => text.red().bold().to_string(),
    }
}

fn score_line(report: &AnalysisReport, colored: bool) -> String {
    match &report.overall {
        HealthScore::Score { value, grade } => {
            let headline = format!("Network health: {value:.1} ({grade})");
            grade_colored(*grade, &headline, colored)
        }
        HealthScore::Unavailable { reason } => {
            let headline = format!("Network health: unavailable ({reason})");
            if colored {
                headline.red().to_string()
            } else {
                headline
            }
        }
    }
}

fn render_score(report: &AnalysisReport, format: &OutputFormat, colored: bool) -> String {
    let view = ScoreView::of(report);
    output::render_single(
        format,
        &view,
        |_| score_line(report, colored),
        |v| {
            v.score
                .map_or_else(|| "unavailable".to_owned(), |s| format!("{s:.1}"))
        },
    )
}

// ── Full report rendering ────────────────────────────────────────────

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Weight")]
    weight: String,
    #[tabled(rename = "Issues")]
    issues: usize,
}

#[derive(Tabled)]
struct IssueRow {
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

#[derive(Tabled)]
struct RecommendationRow {
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "Clients")]
    clients: usize,
}

fn category_label(kind: CategoryKind) -> &'static str {
    match kind {
        CategoryKind::Rf => "RF",
        CategoryKind::Client => "Client experience",
        CategoryKind::Infrastructure => "Infrastructure",
        CategoryKind::Security => "Security",
    }
}

fn render_report(report: &AnalysisReport, format: &OutputFormat, colored: bool) -> String {
    match format {
        OutputFormat::Table => render_report_table(report, colored),
        OutputFormat::Plain => report
            .recommendations
            .iter()
            .map(|r| {
                format!(
                    "{}\t{}\t{}",
                    r.priority,
                    r.kind,
                    r.device_name
                        .clone()
                        .or_else(|| r.device.as_ref().map(ToString::to_string))
                        .unwrap_or_else(|| "site".into()),
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => output::render_single(other, report, |_| String::new(), |_| String::new()),
    }
}

#[allow(clippy::too_many_lines)]
fn render_report_table(report: &AnalysisReport, colored: bool) -> String {
    let mut sections = Vec::new();

    sections.push(score_line(report, colored));

    // Categories
    let category_rows: Vec<CategoryRow> = report
        .categories
        .iter()
        .map(|c| CategoryRow {
            category: category_label(c.kind).to_owned(),
            score: format!("{:.1}", c.score),
            weight: format!("{:.0}%", c.weight * 100.0),
            issues: c.issues.len(),
        })
        .collect();
    sections.push(output::render_table(&category_rows));

    // Issues, most severe first
    let mut issues: Vec<&wavecheck_core::Issue> = report
        .categories
        .iter()
        .flat_map(|c| c.issues.iter())
        .collect();
    issues.sort_by(|a, b| b.severity.cmp(&a.severity));
    if !issues.is_empty() {
        let rows: Vec<IssueRow> = issues
            .iter()
            .map(|i| IssueRow {
                severity: i.severity.to_string(),
                kind: i.kind.to_string(),
                detail: i.message.clone(),
            })
            .collect();
        sections.push(format!("Issues\n{}", output::render_table(&rows)));
    }

    // Recommendations
    if report.recommendations.is_empty() {
        sections.push("No new recommendations.".to_owned());
    } else {
        let rows: Vec<RecommendationRow> = report
            .recommendations
            .iter()
            .map(|r| RecommendationRow {
                priority: r.priority.to_string(),
                action: r.kind.to_string(),
                device: r
                    .device_name
                    .clone()
                    .or_else(|| r.device.as_ref().map(ToString::to_string))
                    .unwrap_or_else(|| "site".into()),
                band: r.band.map(|b| b.to_string()).unwrap_or_default(),
                change: match (&r.current, &r.proposed) {
                    (Some(current), Some(proposed)) => format!("{current} -> {proposed}"),
                    (None, Some(proposed)) => format!("set {proposed}"),
                    _ => "investigate".to_owned(),
                },
                clients: r.affected_clients,
            })
            .collect();
        sections.push(format!("Recommendations\n{}", output::render_table(&rows)));
    }

    // Mesh protections get surfaced even though they are not actions.
    for protection in &report.min_rssi.protections {
        let line = format!("mesh-protected: {}", protection.detail);
        sections.push(if colored {
            line.dimmed().to_string()
        } else {
            line
        });
    }

    if !report.suppressed.is_empty() {
        sections.push(format!(
            "{} recommendation(s) suppressed by history (see `wavecheck history list`)",
            report.suppressed.len()
        ));
    }
    for note in &report.notes {
        sections.push(format!("note: {note}"));
    }

    sections.join("\n\n")
}
