use crate::error::{ModelError, ModelResult};
use crate::source::IndependentSource;
use serde::{Deserialize, Serialize};

/// How the transport engine is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    FixedSource,
    /// Geometry-only mode that skips boundary-condition checks; used to
    /// query the engine without running particles.
    Plot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub run_mode: RunMode,
    pub particles: usize,
    pub batches: usize,
    pub inactive: usize,
    pub photon_transport: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lost_particles: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<u8>,
    pub source: IndependentSource,
}

impl Settings {
    /// Fixed-source settings for a real simulation.
    ///
    /// A `max_lost_particles` of 0 leaves the engine default in place.
    pub fn fixed_source(
        batches: usize,
        particles: usize,
        photon_transport: bool,
        max_lost_particles: usize,
        source: IndependentSource,
    ) -> ModelResult<Self> {
        let settings = Settings {
            run_mode: RunMode::FixedSource,
            particles,
            batches,
            inactive: 0,
            photon_transport,
            max_lost_particles: (max_lost_particles > 0).then_some(max_lost_particles),
            verbosity: None,
            source,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Degenerate single-particle settings used only to initialise the engine.
    pub fn probe() -> Self {
        Settings {
            run_mode: RunMode::Plot,
            particles: 1,
            batches: 1,
            inactive: 0,
            photon_transport: false,
            max_lost_particles: None,
            verbosity: Some(1),
            source: IndependentSource::new(),
        }
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.run_mode == RunMode::FixedSource && self.batches < 2 {
            return Err(ModelError::Validation(format!(
                "at least 2 batches are required, got {}",
                self.batches
            )));
        }
        if self.particles == 0 {
            return Err(ModelError::Validation(
                "particles per batch must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
