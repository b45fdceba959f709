use crate::error::ModelResult;
use crate::tallies::{Tally, TallyCompiler, Target};

impl<'a> TallyCompiler<'a> {
    /// One tally per `(tally_type, target)` pair, types outer and targets inner.
    pub fn expand<S: AsRef<str>>(&self, tally_types: &[S], targets: &[Target]) -> ModelResult<Vec<Tally>> {
        let mut tallies = Vec::with_capacity(tally_types.len() * targets.len());
        for tally_type in tally_types {
            for target in targets {
                tallies.push(self.compile(tally_type.as_ref(), target)?);
            }
        }
        Ok(tallies)
    }

    /// One whole-geometry tally per type.
    pub fn expand_whole_geometry<S: AsRef<str>>(&self, tally_types: &[S]) -> ModelResult<Vec<Tally>> {
        self.expand(tally_types, &[Target::Geometry])
    }

    /// One tally per type for every material except the source-only one,
    /// named `{material_tag}_{tally_type}`.
    pub fn expand_every_material<S: AsRef<str>>(&self, tally_types: &[S]) -> ModelResult<Vec<Tally>> {
        let targets: Vec<Target> = self
            .materials()
            .expandable_tags()
            .map(Target::from)
            .collect();
        self.expand(tally_types, &targets)
    }
}
