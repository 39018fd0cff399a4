//! Merge command - find PRs similar to the source PR and merge them all

use crate::cli::CliProgress;
use crate::cli::context::{CommandContext, Overrides};
use crate::cli::style::{CROSS, Stylize, check, hyperlink, spinner_style};
use anstream::println;
use dependamerge::error::{Error, Result};
use dependamerge::merge::{
    MergePlan, MergeReport, MergeState, PrOutcome, create_merge_plan, pr_status_details,
    run_merge_plan,
};
use dependamerge::platform::SourceControlHost;
use dependamerge::scan::{SimilarPr, find_similar_prs, load_source_pr};
use dependamerge::types::PullRequestInfo;
use dialoguer::Confirm;
use indicatif::ProgressBar;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Titles longer than this are cut in the candidate table
const TITLE_WIDTH: usize = 50;

/// Options for the merge command
#[derive(Debug, Clone, Default)]
pub struct MergeCommandOptions {
    /// Dry run - show similar PRs without approving or merging
    pub dry_run: bool,
    /// Preview plan and prompt for confirmation before executing
    pub confirm: bool,
    /// Values overriding the config file
    pub overrides: Overrides,
}

/// Run the merge command
///
/// Setup failures are returned as errors. Once merging starts, per-PR
/// failures only show up in the report.
#[allow(clippy::too_many_lines)]
pub async fn run_merge(pr_url: &str, options: MergeCommandOptions) -> Result<()> {
    // =========================================================================
    // Phase 1: GATHER - source PR and similar PRs
    // =========================================================================

    let ctx = CommandContext::new(pr_url, options.overrides).await?;
    println!(
        "{} {}",
        "Analyzing PR:".emphasis(),
        ctx.reference.to_string().accent()
    );
    println!("{}", format!("Authenticated via {}", ctx.auth_source).muted());

    let host: &dyn SourceControlHost = &ctx.host;
    let source = load_source_pr(host, &ctx.reference).await?;
    print_source_pr(&source);

    println!();
    println!(
        "{} {}",
        "Scanning organization:".emphasis(),
        ctx.reference.owner.accent()
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message("Fetching repositories...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let scan_progress = CliProgress::with_spinner(spinner.clone());
    let scanned = find_similar_prs(
        host,
        &source,
        &ctx.reference.owner,
        ctx.threshold,
        &scan_progress,
    )
    .await;

    let similar = match scanned {
        Ok(similar) => similar,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e);
        }
    };

    if similar.is_empty() {
        spinner.finish_with_message("No similar PRs found in the organization".warn());
    } else {
        spinner.finish_with_message(format!(
            "{} Found {} similar PR(s)",
            check(),
            similar.len().to_string().emphasis()
        ));
        println!();
        print_similar_table(&similar);
    }

    // =========================================================================
    // Phase 2: PLAN - Pure function, easily testable
    // =========================================================================

    let plan = create_merge_plan(&source, &similar);

    if options.confirm && !options.dry_run {
        println!();
        report_plan(&plan);
        if !Confirm::new()
            .with_prompt(format!("Approve and merge {} PR(s)?", plan.total()))
            .default(false)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
        {
            println!("{}", "Aborted".muted());
            return Ok(());
        }
    }

    // =========================================================================
    // Phase 3: EXECUTE - Effectful operations
    // =========================================================================

    println!();
    if !options.dry_run {
        println!(
            "{} {}",
            "Merging".emphasis(),
            format!("{} similar PR(s) + source PR...", plan.similar_count()).accent()
        );
    }

    let abort = Arc::new(AtomicBool::new(false));
    let watcher = {
        let abort = Arc::clone(&abort);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                abort.store(true, Ordering::SeqCst);
            }
        })
    };

    let progress = CliProgress::lines();
    let report = run_merge_plan(
        &plan,
        host,
        &ctx.options,
        options.dry_run,
        &progress,
        Some(&abort),
    )
    .await;
    watcher.abort();

    match report {
        Some(report) => print_merge_summary(&report),
        None => report_plan(&plan),
    }
    Ok(())
}

fn print_source_pr(pr: &PullRequestInfo) {
    let rows = [
        ("Repository", pr.repository_full_name.clone()),
        ("PR Number", pr.number.to_string()),
        ("Title", pr.title.clone()),
        ("Author", pr.author.clone()),
        ("State", pr.state.to_string()),
        ("Status", pr_status_details(pr).to_string()),
        ("Files Changed", pr.files_changed.len().to_string()),
        ("URL", hyperlink(&pr.html_url, &pr.html_url)),
    ];

    println!();
    println!("{}", "Source PR".emphasis());
    for (label, value) in rows {
        println!("  {:<14} {value}", label.muted());
    }
}

/// Cut a title to [`TITLE_WIDTH`] characters, marking the cut with "..."
fn truncate_title(title: &str) -> String {
    if title.chars().count() > TITLE_WIDTH {
        let cut: String = title.chars().take(TITLE_WIDTH).collect();
        format!("{cut}...")
    } else {
        title.to_string()
    }
}

fn print_similar_table(similar: &[SimilarPr]) {
    let rows: Vec<[String; 5]> = similar
        .iter()
        .map(|s| {
            [
                s.pr.repository_name().to_string(),
                s.pr.number.to_string(),
                truncate_title(&s.pr.title),
                format!("{:.2}", s.comparison.confidence_score),
                pr_status_details(&s.pr).to_string(),
            ]
        })
        .collect();

    let headers = ["Repository", "PR #", "Title", "Confidence", "Status"];
    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header_line: Vec<String> = headers
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{h:<w$}"))
        .collect();
    println!("{}", "Similar Pull Requests".emphasis());
    println!("  {}", header_line.join("  ").emphasis());

    for row in rows {
        let [repo, number, title, confidence, status] = row;
        println!(
            "  {}  {}  {}  {}  {}",
            format!("{repo:<w$}", w = widths[0]).accent(),
            format!("{number:<w$}", w = widths[1]),
            format!("{title:<w$}", w = widths[2]),
            format!("{confidence:<w$}", w = widths[3]).warn(),
            status
        );
    }
}

/// Report what would be merged
fn report_plan(plan: &MergePlan) {
    println!("{}:", "Merge plan".emphasis());
    for candidate in &plan.candidates {
        println!("  {candidate}");
    }
    println!(
        "{}",
        format!(
            "{} of {} PR(s) currently ready to merge",
            plan.ready_count(),
            plan.total()
        )
        .muted()
    );
}

/// "PR #n in owner/repo", tagged when it is the source PR
fn outcome_label(outcome: &PrOutcome) -> String {
    let label = format!("PR #{} in {}", outcome.number, outcome.repository.accent());
    if outcome.is_source {
        format!("{label} {}", "(source)".emphasis())
    } else {
        label
    }
}

/// Print merge summary
fn print_merge_summary(report: &MergeReport) {
    println!();
    let line = format!(
        "Successfully merged {}/{} PRs (including source PR)",
        report.merged_count(),
        report.total
    );
    if report.is_success() {
        println!("{} {}", check(), line.success().emphasis());
    } else {
        println!("{}", line.warn().emphasis());
    }

    for outcome in report.skipped() {
        if let MergeState::Skipped { reason } = &outcome.state {
            println!(
                "   {} {} ({})",
                "Skipped:".warn(),
                outcome_label(outcome),
                reason.muted()
            );
        }
    }

    for outcome in report.failed() {
        if let MergeState::Failed { reason } = &outcome.state {
            println!(
                "   {} {} {}",
                CROSS.error(),
                "Failed:".error(),
                outcome_label(outcome)
            );
            println!("          {}", reason.muted());
        }
    }

    if report.aborted {
        println!(
            "{}",
            format!(
                "Aborted: {} PR(s) not attempted",
                report.total - report.outcomes.len()
            )
            .warn()
        );
    }
}
