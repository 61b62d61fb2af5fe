//! Utilities for extracting structured data from model responses.
//!
//! Models asked for JSON often wrap it in markdown fences or surround it with
//! prose. These helpers find the JSON and decode it.

use bedtime_error::{BedtimeResult, JsonError, JsonErrorKind};
use serde::Deserialize;

/// Extract a JSON object from a response that may contain markdown or extra text.
///
/// Strategies, in order:
/// 1. A ```` ```json ```` fence, then a bare ```` ``` ```` fence
/// 2. The first balanced `{ ... }`, inside the fence and then anywhere
///
/// Fenced text that is not JSON falls through to the brace search; if that
/// finds nothing the fenced text is returned for the decoder to reject.
///
/// # Errors
///
/// Returns an error if no JSON object is found.
///
/// # Examples
///
/// ```
/// use bedtime_pipeline::extract_json;
///
/// let response = "Here is your story:\n```json\n{\"full_narrative\": \"Hi\"}\n```\n";
/// let json = extract_json(response).unwrap();
/// assert_eq!(json, "{\"full_narrative\": \"Hi\"}");
/// ```
pub fn extract_json(response: &str) -> BedtimeResult<String> {
    let fenced = extract_from_code_block(response);

    if let Some(block) = &fenced {
        if serde_json::from_str::<serde_json::Value>(block).is_ok() {
            return Ok(block.clone());
        }
        if let Some(json) = extract_balanced(block, '{', '}') {
            return Ok(json);
        }
    }

    if let Some(json) = extract_balanced(response, '{', '}') {
        return Ok(json);
    }

    if let Some(block) = fenced {
        return Ok(block);
    }

    tracing::error!(
        response_length = response.len(),
        "No JSON found in model response"
    );

    Err(JsonError::new(JsonErrorKind::NoPayload(response.len())).into())
}

/// Content of the first markdown code block.
///
/// Prefers a block tagged `json`; otherwise the first block of any language.
/// An unterminated block runs to the end of the response.
fn extract_from_code_block(response: &str) -> Option<String> {
    if let Some(start) = response.find("```json") {
        let content_start = start + "```json".len();
        return Some(fenced_content(response, content_start));
    }

    let start = response.find("```")?;
    let content_start = start + 3;
    Some(fenced_content(
        response,
        content_start + language_tag_len(&response[content_start..]),
    ))
}

/// Length of a language tag (and its line break) opening a fence.
///
/// Only a run of identifier characters ending the line counts, so a payload
/// that starts on the fence line is kept.
fn language_tag_len(after_fence: &str) -> usize {
    let tag_end = after_fence
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '.')))
        .unwrap_or(after_fence.len());
    let rest = &after_fence[tag_end..];
    if rest.starts_with("\r\n") {
        tag_end + 2
    } else if rest.starts_with('\n') {
        tag_end + 1
    } else if rest.is_empty() {
        tag_end
    } else {
        0
    }
}

fn fenced_content(response: &str, from: usize) -> String {
    match response[from..].find("```") {
        Some(end) => response[from..from + end].trim().to_string(),
        None => response[from..].trim().to_string(),
    }
}

/// Extract content between balanced delimiters, ignoring delimiters in strings.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(response[start..start + i + 1].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse JSON into `T`, logging a preview of the input on failure.
///
/// # Errors
///
/// Returns an error if the string is not valid JSON for `T`.
pub fn parse_json<T>(json_str: &str) -> BedtimeResult<T>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(json_str).map_err(|e| {
        let preview = json_str.chars().take(100).collect::<String>();

        tracing::error!(
            error = %e,
            json_preview = %preview,
            "JSON parsing failed"
        );

        JsonError::new(JsonErrorKind::Malformed {
            reason: e.to_string(),
            preview,
        })
        .into()
    })
}

/// The story the writer model is asked to return.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoryDraft {
    /// Scene texts in order
    pub story_scenes: Vec<String>,
    /// All scenes as one narrative
    pub full_narrative: String,
}

impl StoryDraft {
    /// Extracts and validates a draft from a raw model response.
    ///
    /// # Errors
    ///
    /// Fails when no JSON is found, a field is missing, there are no scenes,
    /// or a scene or the narrative is blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use bedtime_pipeline::StoryDraft;
    ///
    /// let raw = "```\n{\"story_scenes\": [\"A\", \"B\"], \"full_narrative\": \"A B\"}\n```";
    /// let draft = StoryDraft::from_response(raw).unwrap();
    /// assert_eq!(draft.story_scenes, vec!["A", "B"]);
    ///
    /// assert!(StoryDraft::from_response("Once upon a time").is_err());
    /// ```
    pub fn from_response(response: &str) -> BedtimeResult<Self> {
        let json = extract_json(response)?;
        let draft: StoryDraft = parse_json(&json)?;

        if draft.story_scenes.is_empty() {
            return Err(JsonError::new(JsonErrorKind::EmptyField("story_scenes".to_string())).into());
        }
        if let Some(index) = draft.story_scenes.iter().position(|s| s.trim().is_empty()) {
            return Err(
                JsonError::new(JsonErrorKind::EmptyField(format!("story scene {}", index))).into(),
            );
        }
        if draft.full_narrative.trim().is_empty() {
            return Err(JsonError::new(JsonErrorKind::EmptyField("full_narrative".to_string())).into());
        }
        Ok(draft)
    }
}
