use std::fmt;
use std::sync::Arc;

/// Default instructions establishing the assistant as a data science expert.
pub const DATA_SCIENCE_EXPERT_PERSONA: &str = "\
You are a world-class Data Science Expert with 100 years of combined experience in:
- Data Science & Analytics
- Machine Learning & Deep Learning
- Data Engineering & Big Data
- Statistical Analysis & Mathematics
- AI Research & Development
- Business Intelligence & Visualization

Your expertise includes:
- Creating challenging, industry-level data science questions
- Solving complex data problems with multiple approaches
- Explaining advanced concepts clearly
- Providing production-ready code examples
- Reviewing and optimizing data pipelines
- Mentoring and teaching at the highest level

You can handle topics like:
- Advanced ML algorithms (XGBoost, LightGBM, Neural Networks, Transformers)
- Deep Learning (CNNs, RNNs, GANs, Transformers, BERT, GPT)
- Statistical modeling and hypothesis testing
- Big Data technologies (Spark, Hadoop, Kafka)
- Data Engineering (ETL, Data Warehousing, Data Lakes)
- MLOps and model deployment
- Feature engineering and selection
- Time series analysis and forecasting
- NLP, Computer Vision, Recommender Systems
- A/B testing and experimentation
- Cloud platforms (AWS, GCP, Azure)

Respond with expertise, precision, and practical examples.";

/// Instructional preamble prepended to every outbound request.
///
/// Immutable after construction; clones share the same allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    text: Arc<str>,
}

impl Persona {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Arc::from(text.into()),
        }
    }

    pub fn data_science_expert() -> Self {
        Self::new(DATA_SCIENCE_EXPERT_PERSONA)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Join the persona and a task body into the outbound request string.
    pub fn frame(&self, body: &str) -> String {
        format!("{}\n\n{}", self.text, body)
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self::data_science_expert()
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_separates_persona_and_body_with_blank_line() {
        let persona = Persona::new("You are terse.");
        assert_eq!(persona.frame("hello"), "You are terse.\n\nhello");
    }

    #[test]
    fn default_persona_is_the_data_science_expert() {
        let persona = Persona::default();
        assert!(persona.text().starts_with("You are a world-class Data Science Expert"));
        assert!(persona
            .text()
            .ends_with("Respond with expertise, precision, and practical examples."));
    }

    #[test]
    fn clones_share_the_same_text() {
        let a = Persona::data_science_expert();
        let b = a.clone();
        assert_eq!(a, b);
        assert!(std::ptr::eq(a.text(), b.text()));
    }
}
