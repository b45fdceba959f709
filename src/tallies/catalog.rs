//! Semantic tally keywords and their compilation into tallies.
//!
//! | keyword                   | score    | extra filters                         |
//! |---------------------------|----------|---------------------------------------|
//! | `TBR`                     | `(n,Xt)` | none                                  |
//! | `{particle}_fast_flux`    | `flux`   | particle, energy `[1 MeV, 1000 MeV]`  |
//! | `{particle}_spectra`      | `flux`   | particle, `CCFE-709` group energies   |
//! | `{particle}_effective_dose` | `flux` | particle, ISO dose energy function    |
//! | anything else             | keyword  | none                                  |
//!
//! `{particle}` is `neutron` or `photon`. Keys are case-sensitive.

use crate::error::{ModelError, ModelResult};
use crate::materials::MaterialSet;
use crate::particle::Particle;
use crate::physics_data::{DoseGeometry, PhysicsData, SPECTRA_GROUP_STRUCTURE};
use crate::tallies::{
    CellFilter, EnergyFilter, EnergyFunctionFilter, Filter, MaterialFilter, ParticleFilter,
    Target, Tally,
};

/// Wildcard tritium production score.
pub const TBR_SCORE: &str = "(n,Xt)";

/// Lower and upper edge of the fast flux band, in eV.
pub const FAST_FLUX_BAND: [f64; 2] = [1e6, 1000e6];

/// Every keyword with a dedicated catalog entry.
pub const CATALOG_KEYWORDS: &[&str] = &[
    "TBR",
    "neutron_fast_flux",
    "photon_fast_flux",
    "neutron_spectra",
    "photon_spectra",
    "neutron_effective_dose",
    "photon_effective_dose",
];

/// A tally keyword resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TallyKind {
    Tbr,
    FastFlux(Particle),
    Spectra(Particle),
    EffectiveDose(Particle),
    /// Reaction name, MT number or engine score passed through verbatim
    Score(String),
}

impl TallyKind {
    /// # Errors
    /// * `ModelError::Validation` for an empty keyword
    pub fn parse(keyword: &str) -> ModelResult<Self> {
        let kind = match keyword {
            "" => {
                return Err(ModelError::Validation(
                    "tally type cannot be empty".to_string(),
                ))
            }
            "TBR" => TallyKind::Tbr,
            "neutron_fast_flux" => TallyKind::FastFlux(Particle::Neutron),
            "photon_fast_flux" => TallyKind::FastFlux(Particle::Photon),
            "neutron_spectra" => TallyKind::Spectra(Particle::Neutron),
            "photon_spectra" => TallyKind::Spectra(Particle::Photon),
            "neutron_effective_dose" => TallyKind::EffectiveDose(Particle::Neutron),
            "photon_effective_dose" => TallyKind::EffectiveDose(Particle::Photon),
            other => TallyKind::Score(other.to_string()),
        };
        Ok(kind)
    }

    pub fn score(&self) -> &str {
        match self {
            TallyKind::Tbr => TBR_SCORE,
            TallyKind::FastFlux(_) | TallyKind::Spectra(_) | TallyKind::EffectiveDose(_) => "flux",
            TallyKind::Score(score) => score.as_str(),
        }
    }

    /// Filters that follow the target filter, in engine order.
    pub fn extra_filters(&self, data: &PhysicsData) -> ModelResult<Vec<Filter>> {
        let filters: Vec<Filter> = match self {
            TallyKind::Tbr | TallyKind::Score(_) => Vec::new(),
            TallyKind::FastFlux(particle) => vec![
                ParticleFilter::new(*particle).into(),
                EnergyFilter::new(FAST_FLUX_BAND.to_vec())?.into(),
            ],
            TallyKind::Spectra(particle) => {
                let edges = data.group_structure(SPECTRA_GROUP_STRUCTURE)?;
                vec![
                    ParticleFilter::new(*particle).into(),
                    EnergyFilter::new(edges.to_vec())?.into(),
                ]
            }
            TallyKind::EffectiveDose(particle) => {
                let table = data.dose_coefficients(*particle, DoseGeometry::ISO)?;
                vec![
                    ParticleFilter::new(*particle).into(),
                    EnergyFunctionFilter::from_dose_table(table)?.into(),
                ]
            }
        };
        Ok(filters)
    }
}

/// Compiles tally keywords against one material set and physics data table.
#[derive(Debug, Clone, Copy)]
pub struct TallyCompiler<'a> {
    materials: &'a MaterialSet,
    data: &'a PhysicsData,
}

impl<'a> TallyCompiler<'a> {
    pub fn new(materials: &'a MaterialSet, data: &'a PhysicsData) -> Self {
        Self { materials, data }
    }

    pub fn materials(&self) -> &'a MaterialSet {
        self.materials
    }

    /// Compile one keyword for one target.
    ///
    /// The tally is named `{target}_{tally_type}`, or `tally_type` for the
    /// whole geometry. Its filters are the target filter (if any) followed
    /// by the catalog filters of `tally_type`.
    ///
    /// # Errors
    /// * `ModelError::NotFound` if a material target is not in the set, or
    ///   the physics data lacks a table the keyword needs
    /// * `ModelError::Validation` for an empty keyword
    pub fn compile(&self, tally_type: &str, target: &Target) -> ModelResult<Tally> {
        let kind = TallyKind::parse(tally_type)?;
        let name = match target.name_prefix() {
            Some(prefix) => format!("{}_{}", prefix, tally_type),
            None => tally_type.to_string(),
        };
        let leading = self.target_filter(target)?;
        self.build(name, &kind, leading)
    }

    /// Compile `kind` under a caller-chosen name with an explicit leading
    /// filter, as used for mesh tallies.
    pub fn build(&self, name: String, kind: &TallyKind, leading: Option<Filter>) -> ModelResult<Tally> {
        let mut filters: Vec<Filter> = leading.into_iter().collect();
        filters.extend(kind.extra_filters(self.data)?);
        log::debug!("Compiled tally '{}' ({} filters)", name, filters.len());
        Ok(Tally::new(name, kind.score().to_string(), filters))
    }

    fn target_filter(&self, target: &Target) -> ModelResult<Option<Filter>> {
        match target {
            Target::Geometry => Ok(None),
            Target::Material(tag) => {
                let material = self.materials.get_material(tag)?;
                Ok(Some(MaterialFilter::new(material)?.into()))
            }
            Target::Cell(id) => Ok(Some(CellFilter::new(*id).into())),
        }
    }
}
