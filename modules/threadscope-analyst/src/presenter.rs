// ExtractionResult → PresentedTable. Pure: the same input always yields
// the same table.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::parser::{ExtractionResult, FieldValue};
use crate::schema::ExtractionSchema;

/// Statistics over rows whose numeric value is strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceStats {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStat {
    pub group: String,
    pub count: usize,
    /// Mean of the numeric field; `None` when the schema has none.
    pub mean: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<FieldValue>>,
    /// `None` without a numeric field or when no row has a positive value.
    pub stats: Option<PriceStats>,
    pub groups: Vec<GroupStat>,
    pub summary_fields: BTreeMap<String, String>,
}

impl PresentedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

pub fn present(result: &ExtractionResult, schema: &ExtractionSchema) -> PresentedTable {
    let columns: Vec<String> = schema.fields.iter().map(|f| f.name.clone()).collect();
    let rows: Vec<Vec<FieldValue>> = result
        .entries
        .iter()
        .map(|entry| {
            schema
                .fields
                .iter()
                .map(|f| {
                    entry
                        .get(&f.name)
                        .cloned()
                        .unwrap_or_else(|| FieldValue::sentinel(&f.field_type))
                })
                .collect()
        })
        .collect();

    let numeric_idx = schema
        .numeric_field
        .as_deref()
        .and_then(|name| columns.iter().position(|c| c == name));
    let group_idx = schema
        .group_field
        .as_deref()
        .and_then(|name| columns.iter().position(|c| c == name));

    let stats = numeric_idx.and_then(|idx| {
        let values: Vec<f64> = rows.iter().filter_map(|r| positive(&r[idx])).collect();
        price_stats(&values, rows.len())
    });
    let groups = group_idx
        .map(|g| group_stats(&rows, g, numeric_idx))
        .unwrap_or_default();

    PresentedTable {
        columns,
        rows,
        stats,
        groups,
        summary_fields: result.summary_fields.clone(),
    }
}

fn positive(value: &FieldValue) -> Option<f64> {
    value.as_number().filter(|n| *n > 0.0)
}

fn price_stats(values: &[f64], total_rows: usize) -> Option<PriceStats> {
    let median = median(values)?;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Some(PriceStats {
        total_rows,
        valid_rows: values.len(),
        median,
        min,
        max,
        mean,
    })
}

/// Median; the mean of the two middle values for an even count.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

/// With a numeric column: count and mean over positive rows, highest mean
/// first. Without one: row counts, largest first. Ties break by name.
fn group_stats(rows: &[Vec<FieldValue>], group_idx: usize, numeric_idx: Option<usize>) -> Vec<GroupStat> {
    let mut buckets: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for row in rows {
        let key = row[group_idx].to_string();
        match numeric_idx {
            Some(n) => {
                if let Some(v) = positive(&row[n]) {
                    buckets.entry(key).or_default().push(v);
                }
            }
            None => buckets.entry(key).or_default().push(0.0),
        }
    }

    let mut groups: Vec<GroupStat> = buckets
        .into_iter()
        .map(|(group, values)| GroupStat {
            count: values.len(),
            mean: numeric_idx.map(|_| values.iter().sum::<f64>() / values.len() as f64),
            group,
        })
        .collect();

    groups.sort_by(|a, b| match (a.mean, b.mean) {
        (Some(x), Some(y)) => y.total_cmp(&x).then_with(|| a.group.cmp(&b.group)),
        _ => b.count.cmp(&a.count).then_with(|| a.group.cmp(&b.group)),
    });
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_response;

    fn result(json: &str) -> ExtractionResult {
        parse_response(json, &ExtractionSchema::pricing()).unwrap()
    }

    #[test]
    fn stats_skip_zero_prices() {
        let r = result(r#"{"dataset": [{"price_monthly": 0}, {"price_monthly": 100}, {"price_monthly": 200}]}"#);
        let table = present(&r, &ExtractionSchema::pricing());
        let stats = table.stats.unwrap();
        assert_eq!(stats.median, 150.0);
        assert_eq!(stats.valid_rows, 2);
        assert_eq!(stats.total_rows, 3);
        assert_eq!(stats.min, 100.0);
        assert_eq!(stats.max, 200.0);
        assert_eq!(stats.mean, 150.0);
    }

    #[test]
    fn presenting_twice_is_identical() {
        let r = result(
            r#"{"dataset": [{"brand": "A", "price_monthly": 90}, {"brand": "B", "price_monthly": "$140"}],
                "market_summary": "s"}"#,
        );
        let schema = ExtractionSchema::pricing();
        assert_eq!(present(&r, &schema), present(&r, &schema));
    }

    #[test]
    fn no_positive_values_means_no_stats() {
        let r = result(r#"{"dataset": [{"price_monthly": 0}, {"brand": "A"}]}"#);
        let table = present(&r, &ExtractionSchema::pricing());
        assert!(table.stats.is_none());
        assert_eq!(table.rows.len(), 2);
        assert!(table.groups.is_empty());
    }

    #[test]
    fn rows_follow_schema_order() {
        let r = result(r#"{"dataset": [{"sentiment": "neutral", "brand": "Geico"}]}"#);
        let table = present(&r, &ExtractionSchema::pricing());
        assert_eq!(table.columns[0], "product_name");
        let brand = table.column_index("brand").unwrap();
        assert_eq!(table.rows[0][brand], FieldValue::Text("Geico".into()));
        assert_eq!(table.rows[0][0], FieldValue::Text("Unknown".into()));
    }

    #[test]
    fn groups_sorted_by_mean_descending() {
        let r = result(
            r#"{"dataset": [
                {"brand": "Geico", "price_monthly": 100},
                {"brand": "Geico", "price_monthly": 140},
                {"brand": "Progressive", "price_monthly": 200},
                {"brand": "Allstate", "price_monthly": 0}
            ]}"#,
        );
        let table = present(&r, &ExtractionSchema::pricing());
        let names: Vec<&str> = table.groups.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(names, vec!["Progressive", "Geico"]);
        assert_eq!(table.groups[1].count, 2);
        assert_eq!(table.groups[1].mean, Some(120.0));
    }

    #[test]
    fn summary_mode_groups_by_count() {
        let schema = ExtractionSchema::summary();
        let r = parse_response(
            r#"{"opinions": [{"stance": "negative"}, {"stance": "Negative"}, {"stance": "positive"}]}"#,
            &schema,
        )
        .unwrap();
        let table = present(&r, &schema);
        assert!(table.stats.is_none());
        assert_eq!(table.groups[0].group, "Negative");
        assert_eq!(table.groups[0].count, 2);
        assert_eq!(table.groups[0].mean, None);
    }

    #[test]
    fn median_odd_and_empty() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[]), None);
    }
}
