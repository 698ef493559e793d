//! Formatted terminal output for a finished analysis.
//!
//! We keep formatting code in one place so:
//! - the aggregation code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::analysis::GROWTH_WINDOW;
use crate::app::pipeline::AnalysisOutput;
use crate::catalog::KeywordCatalog;
use crate::data::ChunkFailure;
use crate::domain::{AnalysisConfig, GrowthResult, MeanRank, SeriesTable, ShareSlice, TimeUnit};

const BRAND_WIDTH: usize = 20;

/// Header block: query, coverage, and any skipped chunks.
pub fn format_run_summary(run: &AnalysisOutput, config: &AnalysisConfig) -> String {
    let mut out = String::new();

    out.push_str("=== trends - brand search trends (NAVER DataLab) ===\n");
    out.push_str(&format!("Categories: {}\n", config.categories.join(", ")));
    out.push_str(&format!(
        "Range: {} .. {} | unit: {}\n",
        run.range.start,
        run.range.end,
        run.range.unit.display_name()
    ));
    out.push_str(&format!(
        "Groups: {} in {} request(s) | brands with data: {} | points: {}\n",
        run.groups.len(),
        run.chunks,
        run.table.brands().len(),
        run.table.len()
    ));

    if !run.failures.is_empty() {
        out.push('\n');
        out.push_str(&format_failures(&run.failures));
    }
    out.push('\n');
    out
}

/// One line per skipped chunk.
pub fn format_failures(failures: &[ChunkFailure]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Skipped requests ({}):\n", failures.len()));
    for f in failures {
        out.push_str(&format!(
            "- chunk {} [{}]: {}\n",
            f.index + 1,
            f.groups.join(", "),
            f.error
        ));
    }
    out
}

pub fn format_mean_ranking(rows: &[MeanRank]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Top {} by mean search ratio:\n", rows.len()));
    out.push_str(&header(&["#", "brand", "mean_ratio"]));
    for (i, r) in rows.iter().enumerate() {
        push_row(&mut out, format!("{:>3} {} {:>12.2}", i + 1, fit_width(&r.brand, BRAND_WIDTH), r.mean_ratio));
    }
    out
}

pub fn format_share(rows: &[ShareSlice]) -> String {
    let mut out = String::new();
    out.push_str("Share of mean search ratio:\n");
    out.push_str(&header(&["#", "brand", "mean_ratio", "share"]));
    for (i, r) in rows.iter().enumerate() {
        push_row(
            &mut out,
            format!(
                "{:>3} {} {:>12.2} {:>12}",
                i + 1,
                fit_width(&r.brand, BRAND_WIDTH),
                r.mean_ratio,
                format!("{:.1}%", r.share * 100.0)
            ),
        );
    }
    out
}

pub fn format_growth(rows: &[GrowthResult], unit: TimeUnit) -> String {
    let window = unit.window_label(GROWTH_WINDOW);
    let mut out = String::new();
    if rows.is_empty() {
        out.push_str(&format!(
            "No brand rose meaningfully over the last {window} (changes were tiny or flat).\n"
        ));
        return out;
    }

    out.push_str(&format!("Top {} risers over the last {window}:\n", rows.len()));
    out.push_str(&header(&["#", "brand", "growth"]));
    for (i, r) in rows.iter().enumerate() {
        push_row(
            &mut out,
            format!(
                "{:>3} {} {:>12}",
                i + 1,
                fit_width(&r.brand, BRAND_WIDTH),
                format!("{:+.2}%", r.growth_percent)
            ),
        );
    }
    out
}

/// Every fetched point, grouped by brand and sorted by period.
pub fn format_series_table(table: &SeriesTable) -> String {
    let mut out = String::new();
    out.push_str(&format!("Raw search ratios ({} points):\n", table.len()));
    push_row(&mut out, format!("{} {:<10} {:>12}", "brand", "period", "ratio"));
    for (brand, series) in table.grouped() {
        for (period, ratio) in series {
            push_row(
                &mut out,
                format!("{} {:<10} {:>12.5}", fit_width(brand, BRAND_WIDTH), period, ratio),
            );
        }
    }
    out
}

pub fn format_categories(catalog: &KeywordCatalog) -> String {
    let mut out = String::new();
    for cat in catalog.list_categories() {
        out.push_str(&format!("{cat}:\n"));
        for g in catalog.groups_for(cat).unwrap_or_default() {
            out.push_str(&format!("  {} {}\n", fit_width(&g.name, BRAND_WIDTH), g.keywords.join(", ")));
        }
    }
    out
}

fn header(cols: &[&str]) -> String {
    let mut out = String::new();
    let mut rule = String::new();
    for (i, c) in cols.iter().enumerate() {
        let (head, dash) = match i {
            0 => (format!("{c:>3}"), "-".repeat(3)),
            1 => (format!(" {c:<BRAND_WIDTH$}"), format!(" {}", "-".repeat(BRAND_WIDTH))),
            _ => (format!(" {c:>12}"), format!(" {}", "-".repeat(12))),
        };
        out.push_str(&head);
        rule.push_str(&dash);
    }
    format!("{}\n{}\n", out.trim_end(), rule)
}

fn push_row(out: &mut String, row: String) {
    out.push_str(row.trim_end());
    out.push('\n');
}

/// Cut `s` to `width` terminal columns (marking the cut with `.`) and pad it
/// with spaces to exactly that width. Hangul and other wide glyphs count double.
pub(crate) fn fit_width(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = s.width();
    if used <= width {
        out.push_str(s);
    } else {
        used = 0;
        for ch in s.chars() {
            let w = ch.width().unwrap_or(0);
            if used + w + 1 > width {
                break;
            }
            out.push(ch);
            used += w;
        }
        out.push('.');
        used += 1;
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}
