/// Breed and group labels aligned by row with the similarity index.
///
/// Loaded once and shared read-only across requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreedCatalog {
    breed_labels: Vec<String>,
    group_labels: Vec<String>,
}

impl BreedCatalog {
    /// `group_labels` is either empty or as long as `breed_labels`
    pub fn new(breed_labels: Vec<String>, group_labels: Vec<String>) -> Result<Self, String> {
        if !group_labels.is_empty() && group_labels.len() != breed_labels.len() {
            return Err(format!(
                "{} breed labels but {} group labels",
                breed_labels.len(),
                group_labels.len()
            ));
        }
        Ok(Self {
            breed_labels,
            group_labels,
        })
    }

    pub fn len(&self) -> usize {
        self.breed_labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breed_labels.is_empty()
    }

    pub fn breed(&self, row: usize) -> Option<&str> {
        self.breed_labels.get(row).map(String::as_str)
    }

    /// Group of a row, `None` when the catalog carries no group labels
    pub fn group(&self, row: usize) -> Option<&str> {
        self.group_labels.get(row).map(String::as_str)
    }

    pub fn has_groups(&self) -> bool {
        !self.group_labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_lookup() {
        let catalog =
            BreedCatalog::new(labels(&["Beagle", "Pug"]), labels(&["Hound", "Toy"])).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.breed(1), Some("Pug"));
        assert_eq!(catalog.group(0), Some("Hound"));
        assert_eq!(catalog.breed(2), None);
    }

    #[test]
    fn test_groups_are_optional() {
        let catalog = BreedCatalog::new(labels(&["Beagle"]), vec![]).unwrap();
        assert!(!catalog.has_groups());
        assert_eq!(catalog.group(0), None);
    }

    #[test]
    fn test_misaligned_groups_rejected() {
        assert!(BreedCatalog::new(labels(&["Beagle", "Pug"]), labels(&["Hound"])).is_err());
    }
}
