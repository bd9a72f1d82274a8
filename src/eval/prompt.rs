//! Prompt assembly and model reply interpretation.

use serde_json::{Number, Value};

use crate::error::{Error, Result};

/// Placeholder for the document content in the question template.
pub const CONTENT_KEY: &str = "<CONTENTSECTION>";
/// Placeholder for the questions in the question template.
pub const QUESTION_KEY: &str = "<QUESTIONSECTION>";
/// Placeholder for the reference answers in the evaluation template.
pub const REFERENCE_KEY: &str = "<REFERENCEANSWERSECTION>";
/// Placeholder for the model answers in the evaluation template.
pub const MODEL_ANSWER_KEY: &str = "<MODELANSWERSECTION>";

/// Fill the question template. Content is substituted before questions.
pub fn prepare_question_prompt(template: &str, content: &str, questions: &str) -> String {
    template
        .replace(CONTENT_KEY, content)
        .replace(QUESTION_KEY, questions)
}

/// An evaluation prompt with the list renderings it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalPrompt {
    /// Filled evaluation template
    pub prompt: String,
    /// Reference answers as a list literal
    pub reference: String,
    /// Model answers as a list literal
    pub model: String,
}

/// Fill the evaluation template with reference and model answers.
pub fn prepare_eval_prompt(template: &str, reference: &[Value], model: &[Value]) -> EvalPrompt {
    let reference = list_literal(reference);
    let model = list_literal(model);
    let prompt = template
        .replace(REFERENCE_KEY, &reference)
        .replace(MODEL_ANSWER_KEY, &model);
    EvalPrompt {
        prompt,
        reference,
        model,
    }
}

/// Remove a surrounding Markdown code fence, language tag included.
pub fn strip_code_fence(reply: &str) -> &str {
    let mut body = reply.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest,
        };
        if let Some(rest) = body.trim_end().strip_suffix("```") {
            body = rest;
        }
    }
    body.trim()
}

/// Read the answering model's reply: a JSON array of objects with `short_answer`.
pub fn parse_model_answers(reply: &str) -> Result<Vec<Value>> {
    let items: Vec<Value> = serde_json::from_str(strip_code_fence(reply))
        .map_err(|e| Error::ModelReply(format!("answers are not a JSON array: {}", e)))?;

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(mut map) => map.remove("short_answer").ok_or_else(|| {
                Error::ModelReply(format!("answer {} has no short_answer", i + 1))
            }),
            _ => Err(Error::ModelReply(format!("answer {} is not an object", i + 1))),
        })
        .collect()
}

/// Read the evaluating model's reply: a JSON array of numbers.
pub fn parse_scores(reply: &str) -> Result<Vec<Number>> {
    serde_json::from_str(strip_code_fence(reply))
        .map_err(|e| Error::ModelReply(format!("scores are not a JSON number array: {}", e)))
}

/// Build the per-document score report.
pub fn format_scores_report(
    questions: &[String],
    reference: &str,
    model: &str,
    scores: &[Number],
) -> String {
    let mut report = String::from("Questions: \n");
    for (i, question) in questions.iter().enumerate() {
        report.push_str(&format!("{}. {}\n", i + 1, question));
    }
    report.push_str("\n\nReference Answers: \n");
    report.push_str(reference);
    report.push_str("\n\nModel Answers: \n");
    report.push_str(model);
    report.push_str("\n\nScores: \n");
    let scores: Vec<String> = scores.iter().map(Number::to_string).collect();
    report.push_str(&format!("[{}]", scores.join(", ")));
    report
}

/// Render values as a Python-style list literal, e.g. `['a', 1]`.
pub fn list_literal(values: &[Value]) -> String {
    let items: Vec<String> = values.iter().map(literal).collect();
    format!("[{}]", items.join(", "))
}

fn literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) => list_literal(items),
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", quote(k), literal(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

// Single quotes unless the string holds a single quote and no double quote.
fn quote(s: &str) -> String {
    let delimiter = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(delimiter);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}
