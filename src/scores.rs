use crate::data::is_reaction;
use crate::error::{ModelError, ModelResult};
use crate::tallies::catalog::CATALOG_KEYWORDS;
use std::fmt;

const CELL_KEYWORDS: &[&str] = &[
    "TBR",
    "heating",
    "flux",
    "spectra",
    "absorption",
    "effective_dose",
];
const MESH_2D_KEYWORDS: &[&str] = &["heating", "flux", "absorption"];
const MESH_3D_KEYWORDS: &[&str] = &["heating", "flux", "absorption", "effective_dose"];
const TET_MESH_KEYWORDS: &[&str] = &["heating", "flux", "absorption"];
const GENERIC_SCORES: &[&str] = &["heating", "flux", "absorption"];

/// Where a tally keyword was requested, each with its own allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TallyCategory {
    Cell,
    Mesh2D,
    Mesh3D,
    TetMesh,
    Targeted,
}

impl TallyCategory {
    fn keywords(&self) -> &'static [&'static str] {
        match self {
            TallyCategory::Cell => CELL_KEYWORDS,
            TallyCategory::Mesh2D => MESH_2D_KEYWORDS,
            TallyCategory::Mesh3D => MESH_3D_KEYWORDS,
            TallyCategory::TetMesh => TET_MESH_KEYWORDS,
            TallyCategory::Targeted => CATALOG_KEYWORDS,
        }
    }

    /// Whether `keyword` may be requested in this category. Reaction names
    /// and MT numbers are accepted everywhere.
    pub fn accepts(&self, keyword: &str) -> bool {
        self.keywords().contains(&keyword)
            || (*self == TallyCategory::Targeted && GENERIC_SCORES.contains(&keyword))
            || is_reaction(keyword)
    }

    /// # Errors
    /// * `ModelError::Validation` naming the first keyword that is not accepted
    pub fn validate<S: AsRef<str>>(&self, keywords: &[S]) -> ModelResult<()> {
        for keyword in keywords {
            let keyword = keyword.as_ref();
            if !self.accepts(keyword) {
                return Err(ModelError::Validation(format!(
                    "'{}' is not a recognised {} tally; expected one of {:?} or a reaction name / MT number",
                    keyword,
                    self,
                    self.keywords()
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for TallyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TallyCategory::Cell => "cell",
            TallyCategory::Mesh2D => "2D mesh",
            TallyCategory::Mesh3D => "3D mesh",
            TallyCategory::TetMesh => "tet mesh",
            TallyCategory::Targeted => "targeted",
        };
        f.write_str(label)
    }
}
