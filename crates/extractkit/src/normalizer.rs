//! Extraction result normalizer
//!
//! Takes the raw [`ExtractionOutcome`] produced by the crawler plus the
//! original request and coerces it into a [`NormalizedResult`] through an
//! ordered decision sequence:
//!
//! 1. Crawl reported failure (or no outcome at all) -> failure with the
//!    reported error text
//! 2. Absent payload -> CSS schema: soft success with a note; LLM: soft
//!    failure, eligible for recovery
//! 3. String payload -> strip Markdown fencing, parse as JSON; CSS parse
//!    failures are terminal, LLM parse failures are eligible for recovery
//! 4. Parsed payload must be an object or a list; inspect for an embedded
//!    error marker before accepting it as data
//! 5. Recovery (LLM only): one best-effort completion call with the original
//!    prompt plus the raw HTML, then final failure joining all diagnostics
//!
//! Every terminal outcome is enumerable from this table; there is no hidden
//! state and no retry anywhere.

use serde_json::Value;
use tracing::{debug, warn};

use crate::fence::strip_code_fence;
use crate::llm::Completion;
use crate::types::{ExtractRequest, ExtractionOutcome, ExtractionStrategy, NormalizedResult};

const UNKNOWN_FAILURE: &str = "unknown failure during extraction";
const UNKNOWN_EMBEDDED_ERROR: &str = "unknown extraction error";
const EMPTY_SELECTORS_NOTE: &str = "selectors matched no content";
const UNEXPECTED_TYPE: &str = "unexpected data type: expected a JSON object or list";

/// Result of the synchronous decision sequence
///
/// `Recover` is only ever produced for the LLM strategy; the accumulated
/// diagnostics become the final error text if recovery also fails.
#[derive(Debug)]
pub enum Normalization {
    /// Terminal outcome, no recovery applicable
    Done(NormalizedResult),
    /// Soft failure eligible for the one-shot recovery completion
    Recover {
        /// Diagnostics gathered so far, joined into the final error on failure
        diagnostics: Vec<String>,
    },
}

/// Run the decision sequence over a raw extraction outcome
///
/// Pure and synchronous; the recovery call itself lives in
/// [`normalize_with_recovery`].
pub fn normalize(outcome: Option<&ExtractionOutcome>, request: &ExtractRequest) -> Normalization {
    // Step 1: upstream crawl failure
    let Some(outcome) = outcome else {
        return Normalization::Done(NormalizedResult::failed(UNKNOWN_FAILURE));
    };
    if !outcome.success {
        let error = outcome
            .error
            .clone()
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| UNKNOWN_FAILURE.to_string());
        return Normalization::Done(NormalizedResult::failed(error));
    }

    // Step 2: absent payload
    let payload = match &outcome.payload {
        Some(value) if !value.is_null() => value,
        _ => {
            return match request.strategy {
                ExtractionStrategy::CssSchema => {
                    debug!(url = %request.url, "CSS schema matched nothing");
                    Normalization::Done(NormalizedResult::empty(EMPTY_SELECTORS_NOTE))
                }
                ExtractionStrategy::Llm => Normalization::Recover {
                    diagnostics: vec!["extraction returned no content".to_string()],
                },
            };
        }
    };

    // Step 3: string payload needs fence stripping and a JSON parse
    let parsed;
    let payload = if let Value::String(text) = payload {
        match serde_json::from_str::<Value>(strip_code_fence(text)) {
            Ok(value) => {
                parsed = value;
                &parsed
            }
            Err(e) => {
                return match request.strategy {
                    ExtractionStrategy::CssSchema => Normalization::Done(
                        NormalizedResult::failed(format!(
                            "failed to parse CSS extraction result as JSON: {e}"
                        )),
                    ),
                    ExtractionStrategy::Llm => Normalization::Recover {
                        diagnostics: vec![format!(
                            "failed to parse LLM extraction result as JSON: {e}"
                        )],
                    },
                };
            }
        }
    } else {
        payload
    };

    // Step 4: shape and embedded-error inspection
    Normalization::Done(inspect_structured(payload))
}

/// Validate a parsed payload's shape and check for an embedded error marker
///
/// The LLM sometimes reports its own failure inside mechanically valid
/// JSON: a list whose first element is `{"error": true, ...}` or a single
/// such object. The marker's `content` field becomes the failure reason.
fn inspect_structured(payload: &Value) -> NormalizedResult {
    let marker = match payload {
        Value::Array(items) => items.first().and_then(embedded_error),
        Value::Object(_) => embedded_error(payload),
        _ => return NormalizedResult::failed(UNEXPECTED_TYPE),
    };

    match marker {
        Some(message) => NormalizedResult::failed(message),
        None => NormalizedResult::ok(payload.clone()),
    }
}

/// Extract the message from an `{"error": true}` marker object, if present
fn embedded_error(value: &Value) -> Option<String> {
    let obj = value.as_object()?;
    if obj.get("error").and_then(Value::as_bool) != Some(true) {
        return None;
    }
    Some(
        obj.get("content")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_EMBEDDED_ERROR)
            .to_string(),
    )
}

/// Run the decision sequence and, when it asks for recovery, issue the
/// one-shot completion call before declaring final failure
///
/// Recovery is best effort: any error from the completion boundary is
/// folded into the diagnostics rather than propagated. `max_html_bytes`
/// caps how much raw HTML is appended to the recovery prompt.
pub async fn normalize_with_recovery<L: Completion + ?Sized>(
    outcome: Option<&ExtractionOutcome>,
    request: &ExtractRequest,
    completion: &L,
    max_html_bytes: usize,
) -> NormalizedResult {
    let mut diagnostics = match normalize(outcome, request) {
        Normalization::Done(result) => return result,
        Normalization::Recover { diagnostics } => diagnostics,
    };

    let raw_html = outcome.and_then(|o| o.raw_html.as_deref());
    match (raw_html, request.prompt.as_deref()) {
        (Some(html), Some(prompt)) => {
            debug!(url = %request.url, "attempting recovery completion");
            match completion.complete(&recovery_prompt(prompt, html, max_html_bytes)).await {
                Ok(Some(text)) => match serde_json::from_str::<Value>(strip_code_fence(&text)) {
                    Ok(value) if value.is_object() || value.is_array() => {
                        debug!(url = %request.url, "recovery completion salvaged a result");
                        return inspect_structured(&value);
                    }
                    Ok(_) => {
                        diagnostics
                            .push("recovery completion produced unexpected data type".to_string());
                    }
                    Err(e) => {
                        diagnostics
                            .push(format!("failed to parse recovery completion as JSON: {e}"));
                    }
                },
                Ok(None) => {
                    diagnostics.push("recovery completion returned no text".to_string());
                }
                Err(e) => {
                    warn!(url = %request.url, error = %e, "recovery completion failed");
                    diagnostics.push(format!("recovery completion failed: {e}"));
                }
            }
        }
        _ => diagnostics.push("no raw HTML available for recovery".to_string()),
    }

    NormalizedResult::failed(diagnostics.join("; "))
}

/// Build the recovery prompt from the original prompt and the raw HTML
///
/// HTML is truncated at a char boundary to stay within the byte budget.
fn recovery_prompt(prompt: &str, html: &str, max_html_bytes: usize) -> String {
    let mut end = html.len().min(max_html_bytes);
    while end < html.len() && !html.is_char_boundary(end) {
        end -= 1;
    }
    format!(
        "{prompt}\n\nAnswer with JSON only, based on the following page HTML:\n\n{}",
        &html[..end]
    )
}
