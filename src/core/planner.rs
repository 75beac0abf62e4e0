use crate::{
    core::{GenerationRequest, StructuredGenerator},
    error::{GenerationError, Result},
    prompts::{compose_prompts, PlanOptions},
    services::{openai_client::OpenAIClient, transport::CompletionTransport},
    types::itinerary::Itinerary,
};
use chrono::NaiveDate;
use tracing::info;

/// Turns travel notes into itineraries.
#[derive(Debug, Clone)]
pub struct ItineraryPlanner<C> {
    generator: StructuredGenerator<C>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl ItineraryPlanner<OpenAIClient> {
    /// Production planner configured from the environment.
    ///
    /// See [`OpenAIClient::from_env`] and [`ItineraryPlanner::with_env_settings`].
    pub fn from_env() -> Result<Self> {
        Self::new(OpenAIClient::from_env()?).with_env_settings()
    }
}

/// Parse an attempt bound such as the value of `TRIPGEN_MAX_ATTEMPTS`.
pub(crate) fn parse_max_attempts(raw: &str) -> Result<usize> {
    raw.trim().parse::<usize>().map_err(|_| {
        GenerationError::Config(format!(
            "max attempts must be a non-negative integer, got `{raw}`"
        ))
    })
}

impl<C: CompletionTransport> ItineraryPlanner<C> {
    pub fn new(transport: C) -> Self {
        Self::from_generator(StructuredGenerator::new(transport))
    }

    pub fn from_generator(generator: StructuredGenerator<C>) -> Self {
        Self {
            generator,
            model: None,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.generator = self.generator.with_max_attempts(max_attempts);
        self
    }

    /// Overrides the transport's default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Applies `TRIPGEN_MAX_ATTEMPTS` when set. A malformed value is a
    /// [`GenerationError::Config`].
    pub fn with_env_settings(self) -> Result<Self> {
        match std::env::var("TRIPGEN_MAX_ATTEMPTS") {
            Ok(raw) => Ok(self.with_max_attempts(parse_max_attempts(&raw)?)),
            Err(_) => Ok(self),
        }
    }

    pub fn generator(&self) -> &StructuredGenerator<C> {
        &self.generator
    }

    /// Build the single request used for a plan.
    pub fn build_request(
        &self,
        note: &str,
        options: &PlanOptions,
        preference_tags: &[String],
        today: NaiveDate,
    ) -> Result<GenerationRequest> {
        if note.trim().is_empty() {
            return Err(GenerationError::BadRequest(
                "note text must not be empty".to_string(),
            ));
        }

        let prompts = compose_prompts(note, options, preference_tags, today);
        let mut request = GenerationRequest::for_schema::<Itinerary>(prompts.system, prompts.user)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);
        if let Some(model) = &self.model {
            request = request.with_model(model.as_str());
        }
        Ok(request)
    }

    /// Generate a plan using the local date as the reference for year inference.
    pub async fn generate_plan(
        &self,
        note: &str,
        options: Option<PlanOptions>,
        preference_tags: Option<&[String]>,
    ) -> Result<Itinerary> {
        let today = chrono::Local::now().date_naive();
        self.generate_plan_on(note, options, preference_tags, today)
            .await
    }

    pub async fn generate_plan_on(
        &self,
        note: &str,
        options: Option<PlanOptions>,
        preference_tags: Option<&[String]>,
        today: NaiveDate,
    ) -> Result<Itinerary> {
        let options = options.unwrap_or_default();
        let preference_tags = preference_tags.unwrap_or(&[]);
        let request = self.build_request(note, &options, preference_tags, today)?;

        info!(
            target: "tripgen::planner",
            note_chars = note.chars().count(),
            tags = preference_tags.len(),
            %today,
            "generating itinerary"
        );

        let itinerary: Itinerary = self.generator.generate(&request).await?;

        info!(
            target: "tripgen::planner",
            days = itinerary.days.len(),
            "itinerary generated"
        );

        Ok(itinerary)
    }
}
