//! The provider has shipped its generated text under several different JSON
//! shapes over time. Each shape gets one extractor; they are tried in priority
//! order and the first non-blank candidate wins.

use serde_json::Value;

type Extractor = fn(&Value) -> Option<&str>;

const EXTRACTORS: [Extractor; 3] = [
    candidate_content_parts_text,
    candidate_output,
    output_content_text,
];

/// Pull the generated text out of a provider response, or `None` when no
/// known shape yields usable text.
pub fn feedback_text(payload: &Value) -> Option<String> {
    EXTRACTORS.iter().find_map(|extractor| {
        extractor(payload)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_owned)
    })
}

// candidates[0].content.parts[0].text
fn candidate_content_parts_text(payload: &Value) -> Option<&str> {
    payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}

// candidates[0].output
fn candidate_output(payload: &Value) -> Option<&str> {
    payload.get("candidates")?.get(0)?.get("output")?.as_str()
}

// output[0].content[0].text
fn output_content_text(payload: &Value) -> Option<&str> {
    payload
        .get("output")?
        .get(0)?
        .get("content")?
        .get(0)?
        .get("text")?
        .as_str()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::feedback_text;

    #[test]
    fn extracts_candidate_content_parts_text() {
        let payload = json!({
            "candidates": [{ "content": { "parts": [{ "text": "X" }] } }]
        });

        assert_eq!(feedback_text(&payload).as_deref(), Some("X"));
    }

    #[test]
    fn extracts_candidate_output() {
        let payload = json!({ "candidates": [{ "output": "direct output" }] });

        assert_eq!(feedback_text(&payload).as_deref(), Some("direct output"));
    }

    #[test]
    fn extracts_output_content_text() {
        let payload = json!({
            "output": [{ "content": [{ "text": "nested output" }] }]
        });

        assert_eq!(feedback_text(&payload).as_deref(), Some("nested output"));
    }

    #[test]
    fn earlier_shapes_take_priority() {
        let payload = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "primary" }] },
                "output": "secondary"
            }],
            "output": [{ "content": [{ "text": "tertiary" }] }]
        });

        assert_eq!(feedback_text(&payload).as_deref(), Some("primary"));
    }

    #[test]
    fn blank_candidates_fall_through() {
        let payload = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "   " }] },
                "output": "fallback shape"
            }]
        });

        assert_eq!(feedback_text(&payload).as_deref(), Some("fallback shape"));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let payload = json!({
            "candidates": [{ "content": { "parts": [{ "text": "  tidy  " }] } }]
        });

        assert_eq!(feedback_text(&payload).as_deref(), Some("tidy"));
    }

    #[test]
    fn unknown_shapes_yield_none() {
        assert_eq!(feedback_text(&json!({})), None);
        assert_eq!(feedback_text(&json!({ "candidates": [] })), None);
        assert_eq!(
            feedback_text(&json!({ "result": { "text": "elsewhere" } })),
            None
        );
        assert_eq!(
            feedback_text(&json!({ "candidates": [{ "content": { "parts": [] } }] })),
            None
        );
    }
}
