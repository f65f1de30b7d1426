//! Closed-vocabulary label encoding for categorical columns

use crate::{Error, Result};
use ahash::AHashMap;
use std::collections::BTreeMap;

/// Vocabulary of a single categorical column.
///
/// The code of a category is its position in the vocabulary.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
    codes: AHashMap<String, usize>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Self {
        let codes = classes
            .iter()
            .enumerate()
            .map(|(code, class)| (class.clone(), code))
            .collect();
        Self { classes, codes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn transform(&self, value: &str) -> Option<usize> {
        self.codes.get(value).copied()
    }

    pub fn inverse_transform(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }
}

/// Label encoders for every categorical column, fixed at load time.
#[derive(Debug, Clone, Default)]
pub struct CategoricalEncoder {
    encoders: BTreeMap<String, LabelEncoder>,
}

impl CategoricalEncoder {
    pub fn new(vocabularies: impl IntoIterator<Item = (String, Vec<String>)>) -> Self {
        let encoders = vocabularies
            .into_iter()
            .map(|(column, classes)| (column, LabelEncoder::new(classes)))
            .collect();
        Self { encoders }
    }

    /// Encode `value` for `column`.
    ///
    /// Values outside the vocabulary are rejected with the full list of
    /// allowed values for that column.
    pub fn encode(&self, column: &str, value: &str) -> Result<usize> {
        let encoder = self
            .encoders
            .get(column)
            .ok_or_else(|| Error::UnknownColumn(column.to_string()))?;

        encoder.transform(value).ok_or_else(|| Error::InvalidCategory {
            column: column.to_string(),
            value: value.to_string(),
            allowed: encoder.classes().to_vec(),
        })
    }

    pub fn decode(&self, column: &str, code: usize) -> Result<&str> {
        let encoder = self
            .encoders
            .get(column)
            .ok_or_else(|| Error::UnknownColumn(column.to_string()))?;

        encoder.inverse_transform(code).ok_or_else(|| Error::UnknownCode {
            column: column.to_string(),
            code,
        })
    }

    pub fn get(&self, column: &str) -> Option<&LabelEncoder> {
        self.encoders.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.encoders.contains_key(column)
    }

    /// Allowed values per column, keyed by column name
    pub fn vocabularies(&self) -> BTreeMap<String, Vec<String>> {
        self.encoders
            .iter()
            .map(|(column, encoder)| (column.clone(), encoder.classes().to_vec()))
            .collect()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.encoders.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_encoder() -> CategoricalEncoder {
        CategoricalEncoder::new([
            (
                "Size".to_string(),
                vec![
                    "Giant".to_string(),
                    "Large".to_string(),
                    "Medium".to_string(),
                    "Small".to_string(),
                ],
            ),
            (
                "Good with Children".to_string(),
                vec!["No".to_string(), "With Training".to_string(), "Yes".to_string()],
            ),
        ])
    }

    #[test]
    fn test_encode_uses_vocabulary_position() {
        let encoder = create_test_encoder();
        assert_eq!(encoder.encode("Size", "Giant").unwrap(), 0);
        assert_eq!(encoder.encode("Size", "Medium").unwrap(), 2);
        assert_eq!(encoder.encode("Good with Children", "Yes").unwrap(), 2);
    }

    #[test]
    fn test_decode_is_inverse() {
        let encoder = create_test_encoder();
        let code = encoder.encode("Size", "Large").unwrap();
        assert_eq!(encoder.decode("Size", code).unwrap(), "Large");
    }

    #[test]
    fn test_unknown_category_lists_allowed_values() {
        let encoder = create_test_encoder();
        match encoder.encode("Size", "Huge") {
            Err(Error::InvalidCategory { column, value, allowed }) => {
                assert_eq!(column, "Size");
                assert_eq!(value, "Huge");
                assert_eq!(allowed, vec!["Giant", "Large", "Medium", "Small"]);
            }
            other => panic!("expected invalid category, got {other:?}"),
        }
    }

    #[test]
    fn test_encoding_is_case_sensitive() {
        let encoder = create_test_encoder();
        assert!(encoder.encode("Size", "medium").is_err());
    }

    #[test]
    fn test_unknown_column_and_code() {
        let encoder = create_test_encoder();
        assert!(matches!(encoder.encode("Coat", "Long"), Err(Error::UnknownColumn(_))));
        assert!(matches!(encoder.decode("Size", 9), Err(Error::UnknownCode { code: 9, .. })));
    }

    #[test]
    fn test_vocabularies() {
        let encoder = create_test_encoder();
        let vocab = encoder.vocabularies();
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab["Good with Children"].len(), 3);
    }
}
