//! Bounding-box queries against the external geometry engine.
//!
//! The engine is a process-global, non-reentrant library: it is initialised
//! from a model, asked for its global bounding box, then finalised. Every
//! engine session is serialised through [`ENGINE_LOCK`] and torn down by
//! [`EngineSession`]'s `Drop`, whether the query succeeds or not. Each probe
//! runs inside its own scratch directory, which is deleted afterwards.

use crate::bounding_box::{BoundingBox, BoundingBoxSource};
use crate::config::Config;
use crate::error::{ModelError, ModelResult};
use crate::materials::MaterialSet;
use crate::settings::Settings;
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

static ENGINE_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// The disposable model an engine is initialised with for a bounding-box query.
#[derive(Debug, Clone)]
pub struct ProbeModel<'a> {
    /// Faceted geometry file (DAGMC `.h5m`)
    pub geometry: &'a Path,
    /// Material tags the geometry refers to
    pub material_tags: Vec<String>,
    /// Plot-mode, single-particle settings
    pub settings: Settings,
    /// Directory the engine may write its temporary artifacts into
    pub scratch_dir: &'a Path,
}

/// Programmatic entry point of the transport engine, reduced to what a
/// bounding-box query needs.
///
/// `finalize` is always called after `init`, including when `init` itself
/// failed, so implementations must tolerate finalising a partially
/// initialised engine.
pub trait GeometryEngine {
    fn init(&mut self, probe: &ProbeModel<'_>) -> ModelResult<()>;
    fn global_bounding_box(&mut self) -> ModelResult<BoundingBox>;
    fn finalize(&mut self) -> ModelResult<()>;
}

/// Engine stand-in for builds without a transport engine; every query fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableEngine;

impl GeometryEngine for UnavailableEngine {
    fn init(&mut self, _probe: &ProbeModel<'_>) -> ModelResult<()> {
        Err(ModelError::Engine(
            "no geometry engine available; supply mesh corners or a bounding box".to_string(),
        ))
    }

    fn global_bounding_box(&mut self) -> ModelResult<BoundingBox> {
        Err(ModelError::Engine("engine not initialised".to_string()))
    }

    fn finalize(&mut self) -> ModelResult<()> {
        Ok(())
    }
}

/// An initialised engine; finalised on drop.
pub struct EngineSession<'e, E: GeometryEngine + ?Sized> {
    engine: &'e mut E,
    _lock: MutexGuard<'static, ()>,
}

impl<'e, E: GeometryEngine + ?Sized> EngineSession<'e, E> {
    pub fn open(engine: &'e mut E, probe: &ProbeModel<'_>) -> ModelResult<Self> {
        let lock = ENGINE_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut session = EngineSession {
            engine,
            _lock: lock,
        };
        session.engine.init(probe)?;
        Ok(session)
    }

    pub fn global_bounding_box(&mut self) -> ModelResult<BoundingBox> {
        self.engine.global_bounding_box()
    }
}

impl<E: GeometryEngine + ?Sized> Drop for EngineSession<'_, E> {
    fn drop(&mut self) {
        if let Err(e) = self.engine.finalize() {
            log::warn!("Geometry engine finalize failed: {e}");
        }
    }
}

/// Lazily computes, and caches, the bounding box of a geometry file.
///
/// The cache holds one entry keyed by geometry path; asking for another path
/// recomputes, and [`BoundingBoxResolver::invalidate`] drops the entry.
pub struct BoundingBoxResolver<E: GeometryEngine> {
    engine: E,
    cached: Option<(PathBuf, BoundingBox)>,
    round_trips: usize,
}

impl<E: GeometryEngine> BoundingBoxResolver<E> {
    pub fn new(engine: E) -> Self {
        BoundingBoxResolver {
            engine,
            cached: None,
            round_trips: 0,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Number of engine sessions opened so far.
    pub fn round_trips(&self) -> usize {
        self.round_trips
    }

    pub fn cached(&self) -> Option<BoundingBox> {
        self.cached.as_ref().map(|(_, bbox)| *bbox)
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Bounding box of `geometry`, querying the engine on first use.
    ///
    /// # Errors
    /// * `ModelError::NotFound` if `geometry` is not a file
    /// * `ModelError::Engine` if the engine fails to initialise or answer
    pub fn resolve(&mut self, geometry: &Path, materials: &MaterialSet) -> ModelResult<BoundingBox> {
        if let Some((path, bbox)) = &self.cached {
            if path == geometry {
                log::debug!("Using cached bounding box for {}", geometry.display());
                return Ok(*bbox);
            }
        }
        if !geometry.is_file() {
            return Err(ModelError::NotFound(format!(
                "geometry file {} not found",
                geometry.display()
            )));
        }

        let scratch = new_scratch_dir()?;
        let probe = ProbeModel {
            geometry,
            material_tags: materials.tags().map(String::from).collect(),
            settings: Settings::probe(),
            scratch_dir: scratch.path(),
        };

        log::info!("Querying geometry engine for bounding box of {}", geometry.display());
        self.round_trips += 1;
        let reported = {
            let mut session = EngineSession::open(&mut self.engine, &probe)?;
            session.global_bounding_box()?
        };
        if let Err(e) = scratch.close() {
            log::warn!("Failed to remove probe scratch directory: {e}");
        }

        let bbox = BoundingBox::new(reported.lower_left, reported.upper_right).map_err(|e| {
            ModelError::Engine(format!("engine reported an invalid bounding box: {e}"))
        })?;
        log::info!(
            "Bounding box of {}: {:?} to {:?}",
            geometry.display(),
            bbox.lower_left,
            bbox.upper_right
        );
        self.cached = Some((geometry.to_path_buf(), bbox));
        Ok(bbox)
    }
}

fn new_scratch_dir() -> ModelResult<tempfile::TempDir> {
    let parent = Config::global().scratch_dir.clone();
    let mut builder = tempfile::Builder::new();
    builder.prefix("bbox-probe-");
    let dir = match parent {
        Some(parent) => builder.tempdir_in(parent)?,
        None => builder.tempdir()?,
    };
    Ok(dir)
}

/// Bounding-box source for one assembly: a pre-supplied box if given,
/// otherwise the resolver's (cached) answer for the request's geometry.
pub struct GeometryBounds<'r, E: GeometryEngine> {
    pub preset: Option<BoundingBox>,
    pub resolver: &'r mut BoundingBoxResolver<E>,
    pub geometry: &'r Path,
    pub materials: &'r MaterialSet,
}

impl<E: GeometryEngine> BoundingBoxSource for GeometryBounds<'_, E> {
    fn bounding_box(&mut self) -> ModelResult<BoundingBox> {
        if let Some(bbox) = self.preset {
            return Ok(bbox);
        }
        let bbox = self.resolver.resolve(self.geometry, self.materials)?;
        self.preset = Some(bbox);
        Ok(bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[derive(Default)]
    struct CountingEngine {
        inits: usize,
        finalizes: usize,
        fail_query: bool,
        saw_plot_mode: bool,
        scratch_seen: Option<PathBuf>,
    }

    impl GeometryEngine for CountingEngine {
        fn init(&mut self, probe: &ProbeModel<'_>) -> ModelResult<()> {
            self.inits += 1;
            self.saw_plot_mode = probe.settings.run_mode == crate::settings::RunMode::Plot;
            let mut artifact = std::fs::File::create(probe.scratch_dir.join("geometry.xml"))?;
            writeln!(artifact, "<geometry/>")?;
            self.scratch_seen = Some(probe.scratch_dir.to_path_buf());
            Ok(())
        }

        fn global_bounding_box(&mut self) -> ModelResult<BoundingBox> {
            if self.fail_query {
                return Err(ModelError::Engine("query failed".to_string()));
            }
            BoundingBox::new([-5.0, -5.0, -5.0], [5.0, 5.0, 5.0])
        }

        fn finalize(&mut self) -> ModelResult<()> {
            self.finalizes += 1;
            Ok(())
        }
    }

    fn geometry_file() -> tempfile::NamedTempFile {
        tempfile::Builder::new().suffix(".h5m").tempfile().unwrap()
    }

    #[test]
    fn test_resolve_is_memoized() {
        let file = geometry_file();
        let materials = MaterialSet::new();
        let mut resolver = BoundingBoxResolver::new(CountingEngine::default());

        let first = resolver.resolve(file.path(), &materials).unwrap();
        let second = resolver.resolve(file.path(), &materials).unwrap();
        assert_eq!(first, second);
        assert_eq!(resolver.round_trips(), 1);
        assert_eq!(resolver.engine().inits, 1);
        assert_eq!(resolver.engine().finalizes, 1);
        assert!(resolver.engine().saw_plot_mode);
    }

    #[test]
    fn test_scratch_artifacts_removed() {
        let file = geometry_file();
        let mut resolver = BoundingBoxResolver::new(CountingEngine::default());
        resolver.resolve(file.path(), &MaterialSet::new()).unwrap();
        let scratch = resolver.engine().scratch_seen.clone().unwrap();
        assert!(!scratch.exists());
    }

    #[test]
    fn test_invalidate_forces_new_query() {
        let file = geometry_file();
        let materials = MaterialSet::new();
        let mut resolver = BoundingBoxResolver::new(CountingEngine::default());
        resolver.resolve(file.path(), &materials).unwrap();
        resolver.invalidate();
        assert!(resolver.cached().is_none());
        resolver.resolve(file.path(), &materials).unwrap();
        assert_eq!(resolver.round_trips(), 2);
    }

    #[test]
    fn test_missing_geometry_is_not_found() {
        let mut resolver = BoundingBoxResolver::new(CountingEngine::default());
        let err = resolver
            .resolve(Path::new("no/such/dagmc.h5m"), &MaterialSet::new())
            .unwrap_err();
        assert!(matches!(err, ModelError::NotFound(_)));
        assert_eq!(resolver.engine().inits, 0);
    }

    #[test]
    fn test_failed_query_still_finalizes() {
        let file = geometry_file();
        let engine = CountingEngine {
            fail_query: true,
            ..Default::default()
        };
        let mut resolver = BoundingBoxResolver::new(engine);
        let err = resolver.resolve(file.path(), &MaterialSet::new()).unwrap_err();
        assert!(matches!(err, ModelError::Engine(_)));
        assert_eq!(resolver.engine().finalizes, 1);
        assert!(resolver.cached().is_none());
    }

    #[test]
    fn test_unavailable_engine_reports_engine_error() {
        let file = geometry_file();
        let mut resolver = BoundingBoxResolver::new(UnavailableEngine);
        let err = resolver.resolve(file.path(), &MaterialSet::new()).unwrap_err();
        assert!(matches!(err, ModelError::Engine(_)));
    }

    #[test]
    fn test_preset_bounds_skip_engine() {
        let mut resolver = BoundingBoxResolver::new(CountingEngine::default());
        let materials = MaterialSet::new();
        let preset = BoundingBox::new([0.0, 0.0, 0.0], [1.0, 2.0, 3.0]).unwrap();
        let mut bounds = GeometryBounds {
            preset: Some(preset),
            resolver: &mut resolver,
            geometry: Path::new("missing.h5m"),
            materials: &materials,
        };
        assert_eq!(bounds.bounding_box().unwrap(), preset);
        assert_eq!(resolver.round_trips(), 0);
    }
}
