use anyhow::Context;
use schema::{Difficulty, PaperMode, Question, SectionType};
use serde::Deserialize;
use tracing::instrument;

use crate::config::EnvVars;

/// Row shape of the question table. Supabase stores snake_case
/// columns; [`QuestionRecord::normalize`] maps them onto the camelCase
/// wire shape the generator consumes.
#[derive(Clone, Debug, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub chapter: String,
    #[serde(rename = "type")]
    pub _type: SectionType,
    #[serde(default)]
    pub marks: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub content: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub exam_year: Option<String>,
}

impl QuestionRecord {
    pub fn normalize(self) -> Question {
        Question {
            id: self.id,
            chapter: self.chapter,
            _type: self._type,
            marks: self.marks,
            difficulty: self.difficulty,
            content: self.content,
            options: self.options,
            image_url: self.image_url,
            solution: self.solution,
            exam_year: self.exam_year,
        }
    }
}

/// Read-only access to the question bank over the Supabase REST API.
pub struct QuestionStore {
    client: reqwest::Client,
    rest_url: String,
    key: String,
}

impl QuestionStore {
    pub fn new(env_vars: &EnvVars) -> Self {
        Self {
            client: reqwest::Client::new(),
            rest_url: format!(
                "{}/rest/v1/{}",
                env_vars.supabase_url.trim_end_matches('/'),
                env_vars.question_table
            ),
            key: env_vars.supabase_key.clone(),
        }
    }

    async fn select(&self, filter: Option<(&str, String)>) -> anyhow::Result<Vec<Question>> {
        let mut request = self
            .client
            .get(&self.rest_url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .query(&[("select", "*")]);
        if let Some((column, predicate)) = filter {
            request = request.query(&[(column, predicate.as_str())]);
        }

        let response = request
            .send()
            .await
            .context("unable to query question table")?
            .error_for_status()
            .context("question table query rejected")?;
        let records: Vec<QuestionRecord> = response
            .json()
            .await
            .context("unable to deserialize question rows")?;

        Ok(records.into_iter().map(QuestionRecord::normalize).collect())
    }

    /// All questions whose chapter is in `chapters`.
    #[instrument(skip_all, fields(chapters = chapters.len()))]
    pub async fn fetch_questions_by_chapters(
        &self,
        chapters: &[String],
    ) -> anyhow::Result<Vec<Question>> {
        self.select(Some(("chapter", format!("in.({})", chapters.join(",")))))
            .await
    }

    /// All questions whose exam-year tag equals `year`.
    #[instrument(skip_all, fields(year = year))]
    pub async fn fetch_questions_by_year(&self, year: &str) -> anyhow::Result<Vec<Question>> {
        self.select(Some(("exam_year", format!("eq.{year}")))).await
    }

    /// Mode-dispatched pool fetch mirroring the frontend's query:
    /// past-year filters by year, generator mode filters by chapter
    /// set when one is given.
    pub async fn fetch_questions(
        &self,
        mode: PaperMode,
        chapters: &[String],
        year: Option<&str>,
    ) -> anyhow::Result<Vec<Question>> {
        match (mode, year) {
            (PaperMode::PastYear, Some(year)) => self.fetch_questions_by_year(year).await,
            _ if !chapters.is_empty() => self.fetch_questions_by_chapters(chapters).await,
            _ => self.select(None).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Snake_case table rows must land on the camelCase wire fields.
    #[test]
    fn record_normalization_maps_snake_case_columns() {
        let row = serde_json::json!({
            "id": "q-42",
            "chapter": "Vectors",
            "type": "SA_2",
            "marks": 2,
            "difficulty": "Hard",
            "content": "Find the angle between the vectors.",
            "options": null,
            "image_url": "https://example.com/fig.png",
            "solution": "Use the dot product.",
            "exam_year": "2023"
        });

        let record: QuestionRecord = serde_json::from_value(row).unwrap();
        let question = record.normalize();
        assert_eq!(question._type, SectionType::Sa2);
        assert_eq!(question.image_url.as_deref(), Some("https://example.com/fig.png"));
        assert_eq!(question.exam_year.as_deref(), Some("2023"));

        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(value["imageUrl"], "https://example.com/fig.png");
        assert_eq!(value["examYear"], "2023");
    }

    /// Older rows miss the optional columns entirely.
    #[test]
    fn record_tolerates_missing_optional_columns() {
        let row = serde_json::json!({
            "id": "q-1",
            "chapter": "Logic",
            "type": "MCQ",
            "content": "Which statement is a tautology?"
        });

        let record: QuestionRecord = serde_json::from_value(row).unwrap();
        let question = record.normalize();
        assert_eq!(question.marks, 0);
        assert_eq!(question.difficulty, Difficulty::Medium);
        assert!(question.exam_year.is_none());
    }
}
