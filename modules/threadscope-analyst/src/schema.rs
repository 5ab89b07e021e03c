// Extraction schemas: one value describes the JSON shape the model is asked
// for. The prompter renders it and the parser validates against it.

use serde::Serialize;

/// Sentinel for missing text and unmatched enum values.
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Dataset of individual price reports.
    Pricing,
    /// Opinion digest: themes, sentiment and takeaways.
    Summary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "variants", rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Enum(Vec<String>),
    TextList,
}

impl FieldType {
    /// Type as written in the prompt.
    pub fn describe(&self) -> String {
        match self {
            FieldType::Text => "string".to_string(),
            FieldType::Number => "number".to_string(),
            FieldType::Enum(variants) => format!("one of {}", variants.join(" | ")),
            FieldType::TextList => "array of strings".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaField {
    pub name: String,
    pub field_type: FieldType,
    pub description: String,
}

impl SchemaField {
    fn new(name: &str, field_type: FieldType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            description: description.to_string(),
        }
    }
}

/// A free-text key that sits next to the entry list (e.g. `market_summary`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryKey {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionSchema {
    pub mode: AnalysisMode,
    /// Persona line opening the prompt.
    pub role: String,
    pub goal: String,
    /// Top-level key holding the entry array.
    pub list_key: String,
    pub fields: Vec<SchemaField>,
    pub summary_keys: Vec<SummaryKey>,
    /// Field whose positive values feed the statistics.
    pub numeric_field: Option<String>,
    /// Field rows are grouped by for the per-group breakdown.
    pub group_field: Option<String>,
}

impl ExtractionSchema {
    pub fn for_mode(mode: AnalysisMode) -> Self {
        match mode {
            AnalysisMode::Pricing => Self::pricing(),
            AnalysisMode::Summary => Self::summary(),
        }
    }

    pub fn pricing() -> Self {
        Self {
            mode: AnalysisMode::Pricing,
            role: "You are a pricing data analyst.".to_string(),
            goal: "Extract every specific price someone reports paying or being quoted \
                   from these forum threads."
                .to_string(),
            list_key: "dataset".to_string(),
            fields: vec![
                SchemaField::new("product_name", FieldType::Text, "product, plan or item being priced"),
                SchemaField::new("brand", FieldType::Text, "company or provider charging the price"),
                SchemaField::new("price_monthly", FieldType::Number, "price per month in dollars"),
                SchemaField::new("location", FieldType::Text, "city or state of the person reporting"),
                SchemaField::new("quote_snippet", FieldType::Text, "exact quote containing the price"),
                SchemaField::new("source_url", FieldType::Text, "SOURCE_ID of the thread"),
                SchemaField::new(
                    "sentiment",
                    FieldType::Enum(vec![
                        "Positive".to_string(),
                        "Negative".to_string(),
                        "Neutral".to_string(),
                    ]),
                    "how the poster feels about the price",
                ),
            ],
            summary_keys: vec![
                SummaryKey {
                    name: "market_summary".to_string(),
                    description: "two or three sentences on the overall price picture".to_string(),
                },
                SummaryKey {
                    name: "recommendation".to_string(),
                    description: "one practical tip for a buyer".to_string(),
                },
            ],
            numeric_field: Some("price_monthly".to_string()),
            group_field: Some("brand".to_string()),
        }
    }

    pub fn summary() -> Self {
        Self {
            mode: AnalysisMode::Summary,
            role: "You are a community research analyst.".to_string(),
            goal: "Summarize the distinct opinions expressed in these forum threads.".to_string(),
            list_key: "opinions".to_string(),
            fields: vec![
                SchemaField::new("theme", FieldType::Text, "short label for the opinion"),
                SchemaField::new(
                    "stance",
                    FieldType::Enum(vec![
                        "Positive".to_string(),
                        "Negative".to_string(),
                        "Mixed".to_string(),
                    ]),
                    "overall attitude of the opinion",
                ),
                SchemaField::new("key_points", FieldType::TextList, "supporting points, one per item"),
                SchemaField::new("quote_snippet", FieldType::Text, "representative exact quote"),
                SchemaField::new("source_url", FieldType::Text, "SOURCE_ID of the thread"),
            ],
            summary_keys: vec![
                SummaryKey {
                    name: "overall_summary".to_string(),
                    description: "a short paragraph on the consensus, if any".to_string(),
                },
                SummaryKey {
                    name: "recommendation".to_string(),
                    description: "one practical takeaway".to_string(),
                },
            ],
            numeric_field: None,
            group_field: Some("stance".to_string()),
        }
    }

    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}
