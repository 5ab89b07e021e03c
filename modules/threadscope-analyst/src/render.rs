// Terminal and JSON output for a finished analysis.

use serde::Serialize;

use crate::pipeline::AnalysisReport;
use crate::presenter::PresentedTable;

const MAX_CELL_CHARS: usize = 32;
const BAR_WIDTH: usize = 40;

/// Metrics block, table, per-group bar chart, then summary fields.
pub fn render_text(report: &AnalysisReport) -> String {
    let table = &report.table;
    let mut out = format!("\n=== {} ({:?}) ===\n", report.input, report.mode);

    if table.is_empty() {
        out.push_str("\nno data extracted\n");
        push_summary(&mut out, table);
        return out;
    }

    out.push_str(&metrics(table));
    out.push('\n');
    out.push_str(&table_text(table));
    if let Some(chart) = bar_chart(table, report.group_label()) {
        out.push('\n');
        out.push_str(&chart);
    }
    push_summary(&mut out, table);
    out
}

fn metrics(table: &PresentedTable) -> String {
    let mut out = format!("\nData Points:  {}\n", table.rows.len());
    match &table.stats {
        Some(stats) => {
            out.push_str(&format!("Valid Prices: {}\n", stats.valid_rows));
            out.push_str(&format!("Median Price: ${}\n", stats.median as i64));
            out.push_str(&format!(
                "Range:        ${} - ${}\n",
                stats.min as i64, stats.max as i64
            ));
            out.push_str(&format!("Mean Price:   ${:.0}\n", stats.mean));
        }
        None if table.column_index("price_monthly").is_some() => {
            out.push_str("No numeric prices extracted.\n");
        }
        None => {}
    }
    out
}

/// Left-aligned columns; long cells are cut with an ellipsis.
pub fn table_text(table: &PresentedTable) -> String {
    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|v| clip(&v.to_string())).collect())
        .collect();

    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| pad(c, *w))
        .collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in &cells {
        let line: Vec<String> = row.iter().zip(&widths).map(|(c, w)| pad(c, *w)).collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

/// Horizontal bars per group, scaled to the largest value.
pub fn bar_chart(table: &PresentedTable, label: Option<&str>) -> Option<String> {
    if table.groups.is_empty() {
        return None;
    }
    let value = |g: &crate::presenter::GroupStat| g.mean.unwrap_or(g.count as f64);
    let top = table.groups.iter().map(value).fold(0.0_f64, f64::max);
    if top <= 0.0 {
        return None;
    }
    let name_width = table
        .groups
        .iter()
        .map(|g| clip(&g.group).chars().count())
        .max()
        .unwrap_or(0);

    let mut out = format!("By {}:\n", label.unwrap_or("group"));
    for g in &table.groups {
        let len = ((value(g) / top) * BAR_WIDTH as f64).round().max(1.0) as usize;
        let figure = match g.mean {
            Some(mean) => format!("${mean:.0} (n={})", g.count),
            None => g.count.to_string(),
        };
        out.push_str(&format!(
            "  {} {} {}\n",
            pad(&clip(&g.group), name_width),
            "█".repeat(len),
            figure
        ));
    }
    Some(out)
}

fn push_summary(out: &mut String, table: &PresentedTable) {
    for (key, text) in &table.summary_fields {
        out.push_str(&format!("\n{key}:\n  {text}\n"));
    }
}

fn clip(s: &str) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= MAX_CELL_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(MAX_CELL_CHARS - 1).collect();
    format!("{cut}…")
}

fn pad(s: &str, width: usize) -> String {
    let n = s.chars().count();
    format!("{s}{}", " ".repeat(width.saturating_sub(n)))
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    run_id: String,
    input: &'a str,
    mode: crate::schema::AnalysisMode,
    table: &'a PresentedTable,
    documents: &'a [threadscope_common::FetchedDocument],
    run: &'a crate::stats::RunStats,
}

pub fn render_json(report: &AnalysisReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonOutput {
        run_id: report.run_id.to_string(),
        input: &report.input,
        mode: report.mode,
        table: &report.table,
        documents: &report.documents,
        run: &report.stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_response;
    use crate::presenter::present;
    use crate::schema::ExtractionSchema;

    fn table(json: &str) -> PresentedTable {
        let schema = ExtractionSchema::pricing();
        present(&parse_response(json, &schema).unwrap(), &schema)
    }

    #[test]
    fn metrics_show_median_as_whole_dollars() {
        let t = table(r#"{"dataset": [{"price_monthly": 99.6}, {"price_monthly": 140}]}"#);
        let m = metrics(&t);
        assert!(m.contains("Data Points:  2"));
        assert!(m.contains("Valid Prices: 2"));
        assert!(m.contains("Median Price: $119"));
    }

    #[test]
    fn table_aligns_and_clips() {
        let long = "x".repeat(100);
        let t = table(&format!(
            r#"{{"dataset": [{{"brand": "Geico", "quote_snippet": "{long}", "price_monthly": 120}}]}}"#
        ));
        let text = table_text(&t);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("product_name"));
        assert!(lines[2].contains('…'));
        assert!(!lines[2].contains(&long));
    }

    #[test]
    fn bars_scale_to_largest_group() {
        let t = table(
            r#"{"dataset": [{"brand": "A", "price_monthly": 200}, {"brand": "B", "price_monthly": 100}]}"#,
        );
        let chart = bar_chart(&t, Some("brand")).unwrap();
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines[0], "By brand:");
        assert_eq!(lines[1].matches('█').count(), BAR_WIDTH);
        assert_eq!(lines[2].matches('█').count(), BAR_WIDTH / 2);
        assert!(lines[1].contains("$200 (n=1)"));
    }
}
