//! Fallback Dispatch
//!
//! Every document goes to the primary provider first. When the primary
//! rejects the request as too large, the same request is sent exactly once
//! to the secondary provider. Any other failure aborts.

use tracing::{info, instrument, warn};

use super::{LlmProvider, SharedProvider, TextRequest, create_provider};
use crate::ai::stream::{ProgressSink, collect_text};
use crate::config::LlmConfig;
use crate::types::Result;

/// Completed generation
#[derive(Debug, Clone)]
pub struct Generation {
    pub text: String,
    /// Provider that produced `text`
    pub provider: String,
    pub model: String,
    /// True when the secondary provider answered
    pub fell_back: bool,
}

pub struct FallbackChain {
    primary: SharedProvider,
    secondary: Option<SharedProvider>,
}

impl FallbackChain {
    pub fn new(primary: SharedProvider, secondary: Option<SharedProvider>) -> Self {
        Self { primary, secondary }
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let primary = create_provider(&config.primary)?;
        let secondary = if config.fallback_enabled {
            Some(create_provider(&config.fallback)?)
        } else {
            None
        };
        Ok(Self::new(primary, secondary))
    }

    pub fn primary(&self) -> &SharedProvider {
        &self.primary
    }

    pub fn secondary(&self) -> Option<&SharedProvider> {
        self.secondary.as_ref()
    }

    #[instrument(skip_all, fields(primary = %self.primary.name()))]
    pub async fn generate(
        &self,
        request: &TextRequest,
        sink: &mut dyn ProgressSink,
    ) -> Result<Generation> {
        let err = match attempt(self.primary.as_ref(), request, sink).await {
            Ok(text) => return Ok(self.finish(&self.primary, text, false)),
            Err(e) => e,
        };

        let Some(secondary) = self.secondary.as_ref().filter(|_| err.is_size_limit()) else {
            return Err(err);
        };

        warn!(
            "{} rejected the request as too large, retrying once with {} ({})",
            self.primary.name(),
            secondary.name(),
            secondary.model()
        );

        let text = attempt(secondary.as_ref(), request, sink).await?;
        Ok(self.finish(secondary, text, true))
    }

    fn finish(&self, provider: &SharedProvider, text: String, fell_back: bool) -> Generation {
        info!(
            "{} ({}) produced {} bytes",
            provider.name(),
            provider.model(),
            text.len()
        );
        Generation {
            text,
            provider: provider.name().to_string(),
            model: provider.model().to_string(),
            fell_back,
        }
    }
}

async fn attempt(
    provider: &(dyn LlmProvider + Send + Sync),
    request: &TextRequest,
    sink: &mut dyn ProgressSink,
) -> Result<String> {
    let stream = provider.stream(request).await?;
    collect_text(stream, sink).await
}
