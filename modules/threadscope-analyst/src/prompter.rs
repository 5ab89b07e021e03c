// Prompt rendering. Every key and type in the prompt comes from the
// schema value, so prompt and parser cannot drift apart.

use serde_json::{json, Map, Value};

use crate::schema::{ExtractionSchema, FieldType, UNKNOWN};

/// Build the single extraction prompt for `corpus_text`.
pub fn build_prompt(schema: &ExtractionSchema, corpus_text: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(&schema.role);
    prompt.push_str("\n\nGOAL: ");
    prompt.push_str(&schema.goal);

    prompt.push_str("\n\nRULES:\n");
    prompt.push_str("1. Extract everything: one entry per distinct mention, do not merge or filter.\n");
    prompt.push_str(&format!(
        "2. Missing data: if a text attribute is not stated write \"{UNKNOWN}\", \
         if a number is not stated write 0, if a list has no items write [].\n"
    ));
    prompt.push_str(&format!(
        "3. Keys: every entry in \"{}\" must have exactly these keys:\n",
        schema.list_key
    ));
    for field in &schema.fields {
        prompt.push_str(&format!(
            "   - \"{}\" ({}): {}\n",
            field.name,
            field.field_type.describe(),
            field.description
        ));
    }
    prompt.push_str(
        "4. Sources: set \"source_url\" to the SOURCE_ID of the block the entry came from.\n",
    );
    for key in &schema.summary_keys {
        prompt.push_str(&format!(
            "   Top-level \"{}\" (string): {}\n",
            key.name, key.description
        ));
    }

    prompt.push_str("\nSHAPE:\n");
    prompt.push_str(&shape_example(schema));

    prompt.push_str("\n\nDATA:\n");
    prompt.push_str(corpus_text);
    prompt.push_str("\n\nRETURN JSON ONLY");
    prompt
}

/// Pretty-printed JSON skeleton with one placeholder entry.
fn shape_example(schema: &ExtractionSchema) -> String {
    let mut entry = Map::new();
    for field in &schema.fields {
        let placeholder = match &field.field_type {
            FieldType::Text => Value::String(field.description.clone()),
            FieldType::Number => json!(0),
            FieldType::Enum(variants) => Value::String(variants.join("/")),
            FieldType::TextList => json!([field.description.clone()]),
        };
        entry.insert(field.name.clone(), placeholder);
    }

    let mut root = Map::new();
    root.insert(schema.list_key.clone(), Value::Array(vec![Value::Object(entry)]));
    for key in &schema.summary_keys {
        root.insert(key.name.clone(), Value::String(key.description.clone()));
    }
    serde_json::to_string_pretty(&Value::Object(root)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_schema_and_corpus() {
        let schema = ExtractionSchema::pricing();
        let prompt = build_prompt(&schema, "SOURCE_ID: https://reddit.com/r/a/comments/1/x\nTEXT:\n$120/mo");

        for name in schema.field_names() {
            assert!(prompt.contains(&format!("\"{name}\"")), "missing {name}");
        }
        assert!(prompt.contains("\"market_summary\""));
        assert!(prompt.contains("\"price_monthly\" (number)"));
        assert!(prompt.contains("one of Positive | Negative | Neutral"));
        assert!(prompt.contains("SOURCE_ID: https://reddit.com/r/a/comments/1/x"));
        assert!(prompt.ends_with("RETURN JSON ONLY"));
    }

    #[test]
    fn shape_example_is_valid_json() {
        let shape = shape_example(&ExtractionSchema::summary());
        let value: Value = serde_json::from_str(&shape).unwrap();
        assert!(value["opinions"][0]["key_points"].is_array());
        assert!(value["overall_summary"].is_string());
    }
}
