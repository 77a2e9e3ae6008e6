//! Instructional framing shared by the generative providers.

const TAXONOMY: &str = "\
You are a rigorous annotator for harmful information taxonomy. Read one sentence and the claim's metadata that includes date, place, and the speaker's name. Decide which label is appropriate and provide concise reasoning with credible citations.

Labeling (mutually exclusive):
- true: The sentence is factually correct as stated.
- uncertain: The sentence is too vague, satirical, or lacks enough context to determine its truth value, i.e., true or false.
- false: The sentence is factually incorrect.

Use web search when the claim might depend on current facts, specific statistics, or named entities. Prefer primary or authoritative sources. Include citations with URLs in reasoning.";

/// System instructions for providers that return the verdict through a structured tool.
pub fn system_prompt() -> String {
    format!("{TAXONOMY}\n\nReturn only the fields \"label\" and \"reasoning\".")
}

/// System instructions for providers whose only result channel is reply text.
pub fn json_system_prompt() -> String {
    format!(
        "{TAXONOMY}\n\nReturn only the fields \"label\" and \"reasoning\", formatted as a raw JSON object: {{\"label\": \"...\", \"reasoning\": \"...\"}}. Do not wrap it in markdown or add any other text."
    )
}

/// Placeholder rendered for absent metadata.
pub const MISSING_FIELD: &str = "n/a";

fn metadata_line(name: &str, value: Option<&str>) -> String {
    let value = value.map(str::trim).filter(|v| !v.is_empty());
    format!("{name}: {}", value.unwrap_or(MISSING_FIELD))
}

/// Render the user turn. Absent or blank metadata becomes `n/a` so the prompt
/// keeps the same shape whatever the caller supplied.
pub fn build_user_prompt(sentence: &str, speaker: Option<&str>, context: Option<&str>) -> String {
    let metadata = [
        metadata_line("speaker", speaker),
        metadata_line("context", context),
    ]
    .join("\n");

    format!(
        "Classify the sentence per the system instructions.\n\nsentence: \"{sentence}\"\n\nmetadata:\n{metadata}\n\nReply with JSON: {{\"label\": \"...\", \"reasoning\": \"...\"}}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_metadata_renders_placeholder() {
        let prompt = build_user_prompt("The moon is made of cheese.", None, Some("   "));
        assert!(prompt.contains("speaker: n/a\n"));
        assert!(prompt.contains("context: n/a\n"));
        assert!(prompt.contains("sentence: \"The moon is made of cheese.\""));
    }

    #[test]
    fn metadata_is_trimmed() {
        let prompt = build_user_prompt("x", Some("  Jane Doe "), Some("TV interview, 2024"));
        assert!(prompt.contains("speaker: Jane Doe\n"));
        assert!(prompt.contains("context: TV interview, 2024\n"));
    }

    #[test]
    fn taxonomy_lists_all_three_labels() {
        let p = system_prompt();
        assert!(p.starts_with("You are a rigorous annotator for harmful information taxonomy."));
        assert!(p.contains("date, place, and the speaker's name"));
        for label in ["- true:", "- uncertain:", "- false:"] {
            assert!(p.contains(label));
        }
        assert!(p.ends_with("Return only the fields \"label\" and \"reasoning\"."));
    }

    #[test]
    fn json_prompt_asks_for_raw_object() {
        let p = json_system_prompt();
        assert!(p.contains("{\"label\": \"...\", \"reasoning\": \"...\"}"));
        assert!(!system_prompt().contains("raw JSON object"));
    }
}
