//! Question sets with reference answers.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{Error, Result};

const ANSWER_KEY: &str = "short_answer";

/// Questions for one document, split from their reference answers.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionSet {
    /// Question objects with an empty `short_answer` as the last key
    pub questions: Vec<Map<String, Value>>,
    /// Reference answers, in question order
    pub answers: Vec<Value>,
}

impl QuestionSet {
    /// Load a question file: a JSON array of objects with `question` and `short_answer`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path.as_ref())?;
        Self::from_slice(&data)
    }

    /// Read a question set from JSON bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let items: Vec<Map<String, Value>> = serde_json::from_slice(data)?;
        let mut questions = Vec::with_capacity(items.len());
        let mut answers = Vec::with_capacity(items.len());

        for (i, item) in items.into_iter().enumerate() {
            if !item.contains_key("question") {
                return Err(Error::QuestionSet(format!("entry {} has no question", i + 1)));
            }
            let mut question = Map::new();
            let mut answer = None;
            for (key, value) in item {
                if key == ANSWER_KEY {
                    answer = Some(value);
                } else {
                    question.insert(key, value);
                }
            }
            let answer = answer.ok_or_else(|| {
                Error::QuestionSet(format!("entry {} has no {}", i + 1, ANSWER_KEY))
            })?;
            question.insert(ANSWER_KEY.to_string(), Value::String(String::new()));

            questions.push(question);
            answers.push(answer);
        }

        Ok(Self { questions, answers })
    }

    /// Find and load the question set for a document stem.
    pub fn for_document(question_dir: &Path, stem: &str) -> Result<Self> {
        Self::load(find_question_file(question_dir, stem)?)
    }

    /// Number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Check if there are no questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Question texts, in order.
    pub fn question_texts(&self) -> Vec<String> {
        self.questions
            .iter()
            .map(|q| match q.get("question") {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            })
            .collect()
    }

    /// Questions as pretty JSON, the form inserted into the question prompt.
    pub fn questions_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.questions)?)
    }
}

/// Locate the question file whose name starts with `stem`.
///
/// A file whose stem equals `stem` wins; otherwise exactly one prefix match
/// is required.
pub fn find_question_file(question_dir: &Path, stem: &str) -> Result<PathBuf> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(question_dir)? {
        let path = entry?.path();
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        if path.is_file() && name.starts_with(stem) {
            candidates.push(path);
        }
    }
    candidates.sort();

    if let Some(exact) = candidates
        .iter()
        .find(|p| p.file_stem().is_some_and(|s| s.to_string_lossy() == stem))
    {
        return Ok(exact.clone());
    }

    match candidates.len() {
        1 => Ok(candidates.remove(0)),
        0 => Err(Error::QuestionSet(format!(
            "no question file for {} in {}",
            stem,
            question_dir.display()
        ))),
        n => Err(Error::QuestionSet(format!(
            "{} question files match {} in {}",
            n,
            stem,
            question_dir.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const QUESTIONS: &str = r#"[
        {"short_answer": "42", "question": "What is the total?", "type": "table"},
        {"question": "Who signed?", "short_answer": 7}
    ]"#;

    #[test]
    fn test_answer_moves_to_end() {
        let set = QuestionSet::from_slice(QUESTIONS.as_bytes()).unwrap();

        assert_eq!(set.len(), 2);
        let keys: Vec<_> = set.questions[0].keys().cloned().collect();
        assert_eq!(keys, vec!["question", "type", "short_answer"]);
        assert_eq!(set.questions[0]["short_answer"], "");
        assert_eq!(set.answers, vec![Value::from("42"), Value::from(7)]);
        assert_eq!(set.question_texts()[1], "Who signed?");
    }

    #[test]
    fn test_questions_json() {
        let set = QuestionSet::from_slice(QUESTIONS.as_bytes()).unwrap();

        let questions = set.questions_json().unwrap();
        assert!(questions.starts_with("[\n  {\n    \"question\": \"What is the total?\""));
        assert!(!questions.contains("42"));
    }

    #[test]
    fn test_missing_answer_is_rejected() {
        let result = QuestionSet::from_slice(br#"[{"question": "q"}]"#);
        assert!(matches!(result, Err(Error::QuestionSet(_))));
    }

    #[test]
    fn test_find_question_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("report.json"), "[]").unwrap();
        fs::write(dir.path().join("report_2.json"), "[]").unwrap();
        fs::write(dir.path().join("invoice_qa.json"), "[]").unwrap();

        let exact = find_question_file(dir.path(), "report").unwrap();
        assert!(exact.ends_with("report.json"));

        let prefix = find_question_file(dir.path(), "invoice").unwrap();
        assert!(prefix.ends_with("invoice_qa.json"));

        assert!(find_question_file(dir.path(), "memo").is_err());
        assert!(find_question_file(dir.path(), "rep").is_err());
    }
}
