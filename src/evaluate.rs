use eyre::{Result, bail};
use log::debug;

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Low temperature keeps scoring reproducible across runs
pub const TEMPERATURE: f64 = 0.3;

/// Build the relevance-evaluation prompt, embedding all three inputs verbatim
pub fn build_prompt(title: &str, description: &str, transcript: &str) -> String {
    format!(
        "\
You are an AI model that evaluates video relevance.

Input:
Title: {title}
Description: {description}
Transcript: {transcript}

Tasks:
1. Evaluate how relevant the transcript is to the title.
2. Detect and list:
   - Off-topic segments
   - Promotional segments
   - Filler segments
3. Generate:
   - Relevance Score (0–100%)
   - Short explanation for score
   - Segment analysis in bullet points

Return output in JSON with fields:
relevance_score, explanation, detected_segments.
"
    )
}

/// Check evaluation inputs before anything goes over the wire
pub fn validate(title: &str, transcript: &str) -> Result<()> {
    if transcript.trim().is_empty() {
        bail!("transcript is required (fetch captions or pass --transcript-file)");
    }
    if title.trim().is_empty() {
        bail!("title is required (pass --title)");
    }
    Ok(())
}

/// Score how well a transcript matches its title and description using an LLM.
/// Returns the raw text of the model's reply, expected to be JSON-shaped with
/// relevance_score, explanation, and detected_segments fields.
pub async fn evaluate(
    client: &reqwest::Client,
    title: &str,
    description: &str,
    transcript: &str,
    model: &str,
) -> Result<String> {
    validate(title, transcript)?;

    let prompt = build_prompt(title, description, transcript);

    if is_anthropic_model(model) {
        evaluate_anthropic(client, &prompt, model).await
    } else {
        evaluate_openai(client, &prompt, model).await
    }
}

fn is_anthropic_model(model: &str) -> bool {
    model.starts_with("claude")
}

fn build_openai_body(prompt: &str, model: &str) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "messages": [
            {
                "role": "user",
                "content": prompt
            }
        ],
        "temperature": TEMPERATURE
    })
}

fn build_anthropic_body(prompt: &str, model: &str) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "max_tokens": 4096,
        "messages": [
            {
                "role": "user",
                "content": prompt
            }
        ],
        "temperature": TEMPERATURE
    })
}

async fn evaluate_openai(client: &reqwest::Client, prompt: &str, model: &str) -> Result<String> {
    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| eyre::eyre!("OPENAI_API_KEY environment variable not set (required for evaluation)"))?;

    debug!("Evaluating via OpenAI API with model {model}");

    let resp = client
        .post("https://api.openai.com/v1/chat/completions")
        .bearer_auth(&api_key)
        .header("Content-Type", "application/json")
        .json(&build_openai_body(prompt, model))
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        bail!("OpenAI API returned {status}: {body}");
    }

    let json: serde_json::Value = resp.json().await?;
    extract_openai_text(&json)
}

async fn evaluate_anthropic(client: &reqwest::Client, prompt: &str, model: &str) -> Result<String> {
    let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
        eyre::eyre!("ANTHROPIC_API_KEY environment variable not set (required for Claude evaluation)")
    })?;

    debug!("Evaluating via Anthropic API with model {model}");

    let resp = client
        .post("https://api.anthropic.com/v1/messages")
        .header("x-api-key", &api_key)
        .header("anthropic-version", "2023-06-01")
        .header("Content-Type", "application/json")
        .json(&build_anthropic_body(prompt, model))
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        bail!("Anthropic API returned {status}: {body}");
    }

    let json: serde_json::Value = resp.json().await?;
    extract_anthropic_text(&json)
}

fn extract_openai_text(json: &serde_json::Value) -> Result<String> {
    if let Some(text) = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
    {
        return Ok(text.to_string());
    }
    bail!("unexpected OpenAI API response format");
}

fn extract_anthropic_text(json: &serde_json::Value) -> Result<String> {
    if let Some(content) = json.get("content").and_then(|c| c.as_array()) {
        let text: String = content
            .iter()
            .filter_map(|block| {
                if block.get("type")?.as_str()? == "text" {
                    block.get("text")?.as_str().map(|s| s.to_string())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");
        if !text.is_empty() {
            return Ok(text);
        }
    }
    bail!("unexpected Anthropic API response format");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_embeds_inputs_verbatim() {
        let prompt = build_prompt("Intro to Testing", "", "This video covers testing.");
        assert!(prompt.contains("Title: Intro to Testing"));
        assert!(prompt.contains("Description: \n"));
        assert!(prompt.contains("Transcript: This video covers testing."));
        assert!(prompt.contains("relevance_score, explanation, detected_segments"));
    }

    #[test]
    fn test_validate_missing_transcript() {
        let err = validate("Intro to Testing", "").unwrap_err();
        assert!(err.to_string().contains("transcript is required"));
    }

    #[test]
    fn test_validate_missing_title() {
        let err = validate("", "This video covers testing.").unwrap_err();
        assert!(err.to_string().contains("title is required"));
    }

    #[test]
    fn test_validate_whitespace_only() {
        assert!(validate("  ", "some words").is_err());
        assert!(validate("A Title", "\n\t ").is_err());
    }

    #[test]
    fn test_validate_ok() {
        assert!(validate("Intro to Testing", "This video covers testing.").is_ok());
    }

    #[tokio::test]
    async fn test_evaluate_blocked_before_any_request() {
        // No API key in scope and no network: validation must fail first
        let client = reqwest::Client::new();
        assert!(evaluate(&client, "", "", "words", DEFAULT_MODEL).await.is_err());
        assert!(evaluate(&client, "Title", "", "", DEFAULT_MODEL).await.is_err());
    }

    #[test]
    fn test_openai_body_fixed_parameters() {
        let prompt = build_prompt("Intro to Testing", "", "This video covers testing.");
        let body = build_openai_body(&prompt, DEFAULT_MODEL);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["temperature"], 0.3);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        let content = body["messages"][0]["content"].as_str().unwrap();
        assert!(content.contains("Intro to Testing"));
        assert!(content.contains("This video covers testing."));
    }

    #[test]
    fn test_anthropic_body_fixed_parameters() {
        let body = build_anthropic_body("prompt text", "claude-sonnet-4-6");
        assert_eq!(body["model"], "claude-sonnet-4-6");
        assert_eq!(body["temperature"], 0.3);
        assert_eq!(body["max_tokens"], 4096);
        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[test]
    fn test_is_anthropic_model() {
        assert!(is_anthropic_model("claude-sonnet-4-6"));
        assert!(is_anthropic_model("claude-3-opus-20240229"));
        assert!(!is_anthropic_model("gpt-4o"));
        assert!(!is_anthropic_model("gpt-4o-mini"));
    }

    #[test]
    fn test_extract_openai_text() {
        let json = serde_json::json!({
            "choices": [
                {
                    "message": {
                        "role": "assistant",
                        "content": "{\"relevance_score\": 92}"
                    }
                }
            ]
        });
        assert_eq!(extract_openai_text(&json).unwrap(), "{\"relevance_score\": 92}");
    }

    #[test]
    fn test_extract_openai_text_empty() {
        let json = serde_json::json!({"choices": []});
        assert!(extract_openai_text(&json).is_err());
    }

    #[test]
    fn test_extract_anthropic_text() {
        let json = serde_json::json!({
            "content": [
                {
                    "type": "text",
                    "text": "Here is the evaluation."
                }
            ]
        });
        assert_eq!(extract_anthropic_text(&json).unwrap(), "Here is the evaluation.");
    }

    #[test]
    fn test_extract_anthropic_text_empty() {
        let json = serde_json::json!({"content": []});
        assert!(extract_anthropic_text(&json).is_err());
    }
}
