use crate::error::{ModelError, ModelResult};
use crate::tallies::Filter;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A compiled measurement: a score accumulated under an ordered filter chain.
///
/// Tallies are built complete by [`crate::tallies::TallyCompiler`] and never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    name: String,
    score: String,
    filters: Vec<Filter>,
}

impl Tally {
    pub(crate) fn new(name: String, score: String, filters: Vec<Filter>) -> Self {
        Self {
            name,
            score,
            filters,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reaction name, MT number or quantity that is scored
    pub fn score(&self) -> &str {
        &self.score
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Filter type names in order, e.g. `["MaterialFilter", "ParticleFilter"]`
    pub fn filter_types(&self) -> Vec<&'static str> {
        self.filters.iter().map(Filter::type_name).collect()
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tally: {}", self.name)?;
        writeln!(f, "  Score: {}", self.score)?;
        write!(f, "  Filters: [{}]", self.filter_types().join(", "))
    }
}

/// Ordered tally sequence of one model; tally names are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Tally>", into = "Vec<Tally>")]
pub struct Tallies {
    tallies: Vec<Tally>,
}

impl Tallies {
    pub fn new() -> Self {
        Tallies {
            tallies: Vec::new(),
        }
    }

    /// Append a tally
    ///
    /// # Errors
    /// * `ModelError::Validation` if a tally with the same name is already present
    pub fn push(&mut self, tally: Tally) -> ModelResult<()> {
        if self.contains(tally.name()) {
            return Err(ModelError::Validation(format!(
                "duplicate tally name '{}'",
                tally.name()
            )));
        }
        self.tallies.push(tally);
        Ok(())
    }

    pub fn extend<I: IntoIterator<Item = Tally>>(&mut self, tallies: I) -> ModelResult<()> {
        for tally in tallies {
            self.push(tally)?;
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tallies.iter().any(|t| t.name() == name)
    }

    pub fn get(&self, name: &str) -> Option<&Tally> {
        self.tallies.iter().find(|t| t.name() == name)
    }

    pub fn len(&self) -> usize {
        self.tallies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tally> {
        self.tallies.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tallies.iter().map(Tally::name).collect()
    }
}

impl TryFrom<Vec<Tally>> for Tallies {
    type Error = ModelError;

    fn try_from(tallies: Vec<Tally>) -> ModelResult<Self> {
        let mut checked = Tallies::new();
        checked.extend(tallies)?;
        Ok(checked)
    }
}

impl From<Tallies> for Vec<Tally> {
    fn from(tallies: Tallies) -> Self {
        tallies.tallies
    }
}

impl<'a> IntoIterator for &'a Tallies {
    type Item = &'a Tally;
    type IntoIter = std::slice::Iter<'a, Tally>;

    fn into_iter(self) -> Self::IntoIter {
        self.tallies.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tallies::CellFilter;

    fn tally(name: &str) -> Tally {
        Tally::new(
            name.to_string(),
            "flux".to_string(),
            vec![Filter::Cell(CellFilter::new(1))],
        )
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut tallies = Tallies::new();
        tallies.push(tally("flux")).unwrap();
        let err = tallies.push(tally("flux")).unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
        assert_eq!(tallies.len(), 1);
    }

    #[test]
    fn test_deserialize_rejects_duplicate_names() {
        let json = serde_json::json!([
            { "name": "TBR", "score": "(n,Xt)", "filters": [] },
            { "name": "TBR", "score": "(n,Xt)", "filters": [] }
        ]);
        assert!(serde_json::from_value::<Tallies>(json).is_err());
    }

    #[test]
    fn test_serializes_as_list() {
        let mut tallies = Tallies::new();
        tallies.push(tally("2_flux")).unwrap();
        let json = serde_json::to_value(&tallies).unwrap();
        assert_eq!(json[0]["name"], "2_flux");
        assert_eq!(json[0]["filters"][0]["type"], "cell");
        let back: Tallies = serde_json::from_value(json).unwrap();
        assert_eq!(back, tallies);
    }

    #[test]
    fn test_insertion_order_kept() {
        let mut tallies = Tallies::new();
        tallies
            .extend(vec![tally("b"), tally("a"), tally("c")])
            .unwrap();
        assert_eq!(tallies.names(), vec!["b", "a", "c"]);
        assert!(tallies.get("a").is_some());
    }

    #[test]
    fn test_display() {
        let shown = format!("{}", tally("1_flux"));
        assert!(shown.contains("Tally: 1_flux"));
        assert!(shown.contains("[CellFilter]"));
    }
}
