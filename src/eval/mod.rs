//! Question-answering evaluation of extracted content.
//!
//! For every extracted `<stem>.txt`, an answering model is asked the
//! document's questions with the content in its prompt, and an evaluating
//! model scores those answers against the references.

mod prompt;
mod question;

pub use prompt::{
    format_scores_report, list_literal, parse_model_answers, parse_scores,
    prepare_eval_prompt, prepare_question_prompt, strip_code_fence, EvalPrompt, CONTENT_KEY,
    MODEL_ANSWER_KEY, QUESTION_KEY, REFERENCE_KEY,
};
pub use question::{find_question_file, QuestionSet};

use std::fs;
use std::path::{Path, PathBuf};

use crate::batch::TIME_FILE;
use crate::error::Result;

/// System prompt for the answering model.
pub const ANSWER_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant that answers questions given the content within the document.";

/// System prompt for the evaluating model.
pub const EVALUATE_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant that evaluates list of model answers given the reference answer.";

/// Name of the run summary written to the save directory.
pub const FINAL_SCORE_FILE: &str = "final_score.txt";

/// A chat completion backend.
pub trait ChatModel {
    /// Send one system and one user message to `model` and return the reply text.
    fn chat(&self, model: &str, system: &str, user: &str) -> Result<String>;
}

impl<T: ChatModel + ?Sized> ChatModel for &T {
    fn chat(&self, model: &str, system: &str, user: &str) -> Result<String> {
        (**self).chat(model, system, user)
    }
}

/// Options for an evaluation run.
#[derive(Debug, Clone)]
pub struct EvalOptions {
    /// Directory holding one question file per document
    pub question_dir: PathBuf,
    /// Template with `<CONTENTSECTION>` and `<QUESTIONSECTION>`
    pub question_template: PathBuf,
    /// Template with `<REFERENCEANSWERSECTION>` and `<MODELANSWERSECTION>`
    pub evaluate_template: PathBuf,
    /// Model answering the questions
    pub answering_model: String,
    /// Model scoring the answers
    pub evaluate_model: String,
    /// Directory receiving per-document results and the final score
    pub save_dir: PathBuf,
}

impl EvalOptions {
    /// Create new evaluation options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the question directory.
    pub fn with_question_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.question_dir = dir.into();
        self
    }

    /// Set both template paths.
    pub fn with_templates(
        mut self,
        question: impl Into<PathBuf>,
        evaluate: impl Into<PathBuf>,
    ) -> Self {
        self.question_template = question.into();
        self.evaluate_template = evaluate.into();
        self
    }

    /// Set the answering and evaluating models.
    pub fn with_models(mut self, answering: impl Into<String>, evaluate: impl Into<String>) -> Self {
        self.answering_model = answering.into();
        self.evaluate_model = evaluate.into();
        self
    }

    /// Set the save directory.
    pub fn with_save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = dir.into();
        self
    }
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            question_dir: PathBuf::from("dataset/questions"),
            question_template: PathBuf::from("dataset/templates/question_template.txt"),
            evaluate_template: PathBuf::from("dataset/templates/evaluate_template.txt"),
            answering_model: "gpt-4o".to_string(),
            evaluate_model: "gpt-4o".to_string(),
            save_dir: PathBuf::from("results"),
        }
    }
}

/// Scores of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentScores {
    /// Content file stem
    pub stem: String,
    /// One score per question
    pub scores: Vec<f64>,
}

/// Running totals over all scored questions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreSummary {
    scores: Vec<f64>,
}

impl ScoreSummary {
    /// Create an empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add scores.
    pub fn extend(&mut self, scores: impl IntoIterator<Item = f64>) {
        self.scores.extend(scores);
    }

    /// Number of scored questions.
    pub fn count(&self) -> usize {
        self.scores.len()
    }

    /// Mean score, `None` when nothing was scored.
    pub fn mean(&self) -> Option<f64> {
        if self.scores.is_empty() {
            None
        } else {
            Some(self.scores.iter().sum::<f64>() / self.scores.len() as f64)
        }
    }

    /// Contents of `final_score.txt`, `None` when nothing was scored.
    pub fn report(&self) -> Option<String> {
        self.mean().map(|mean| {
            format!(
                "Mean score: {:.4}\nTotal number of questions: {}",
                mean,
                self.count()
            )
        })
    }
}

/// Outcome of an evaluation run.
#[derive(Debug, Clone, Default)]
pub struct EvalReport {
    /// Documents that were scored
    pub documents: Vec<DocumentScores>,
    /// Content files that failed, with the error message
    pub failed: Vec<(PathBuf, String)>,
    /// Totals over all scored questions
    pub summary: ScoreSummary,
}

/// Runs the question-answering evaluation.
pub struct Evaluator<M> {
    model: M,
    options: EvalOptions,
}

impl<M: ChatModel> Evaluator<M> {
    /// Create an evaluator.
    pub fn new(model: M, options: EvalOptions) -> Self {
        Self { model, options }
    }

    /// Evaluate every content file in `content_dir`.
    ///
    /// `final_score.txt` is only written when at least one question was scored.
    pub fn run(&self, content_dir: &Path) -> Result<EvalReport> {
        let question_template = fs::read_to_string(&self.options.question_template)?;
        let evaluate_template = fs::read_to_string(&self.options.evaluate_template)?;
        let inputs = collect_content_files(content_dir)?;
        fs::create_dir_all(&self.options.save_dir)?;

        let mut report = EvalReport::default();
        for (i, path) in inputs.iter().enumerate() {
            log::info!("({}/{}) Processing file: {}", i + 1, inputs.len(), path.display());
            match self.evaluate_document(path, &question_template, &evaluate_template) {
                Ok(scores) => {
                    report.summary.extend(scores.scores.iter().copied());
                    report.documents.push(scores);
                }
                Err(e) => {
                    log::error!("Failed to evaluate {}: {}", path.display(), e);
                    report.failed.push((path.clone(), e.to_string()));
                }
            }
        }

        match report.summary.report() {
            Some(text) => {
                fs::write(self.options.save_dir.join(FINAL_SCORE_FILE), &text)?;
                log::info!("{}", text.replace('\n', ", "));
            }
            None => log::warn!("No questions were scored"),
        }
        Ok(report)
    }

    /// Answer and score the questions of one content file.
    pub fn evaluate_document(
        &self,
        path: &Path,
        question_template: &str,
        evaluate_template: &str,
    ) -> Result<DocumentScores> {
        let stem = path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned();
        let content = fs::read_to_string(path)?;
        let questions = QuestionSet::for_document(&self.options.question_dir, &stem)?;

        let question_prompt =
            prepare_question_prompt(question_template, &content, &questions.questions_json()?);
        let reply = self.model.chat(
            &self.options.answering_model,
            ANSWER_SYSTEM_PROMPT,
            &question_prompt,
        )?;
        let answers = parse_model_answers(&reply)?;

        let save_dir = self.options.save_dir.join(&stem);
        fs::create_dir_all(&save_dir)?;
        fs::write(save_dir.join("prompt.txt"), &question_prompt)?;

        let eval = prepare_eval_prompt(evaluate_template, &questions.answers, &answers);
        let reply = self.model.chat(
            &self.options.evaluate_model,
            EVALUATE_SYSTEM_PROMPT,
            &eval.prompt,
        )?;
        let scores = parse_scores(&reply)?;
        if scores.len() != questions.len() {
            log::warn!(
                "{}: {} scores for {} questions",
                stem,
                scores.len(),
                questions.len()
            );
        }

        let text = format_scores_report(
            &questions.question_texts(),
            &eval.reference,
            &eval.model,
            &scores,
        );
        fs::write(save_dir.join("scores.txt"), text)?;

        Ok(DocumentScores {
            stem,
            scores: scores.iter().filter_map(|n| n.as_f64()).collect(),
        })
    }
}

/// List extracted `*.txt` files, skipping the batch timing file.
pub fn collect_content_files(content_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for entry in fs::read_dir(content_dir)? {
        let path = entry?.path();
        let is_txt = path.extension().is_some_and(|ext| ext == "txt");
        let is_timing = path.file_name().is_some_and(|name| name == TIME_FILE);
        if path.is_file() && is_txt && !is_timing {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}
