// Breed metadata served alongside recommendations
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

const IMAGE_MAP: &[(&str, &str)] = &[
    ("Beagle", "/dog_breeds_img/beagle.jpg"),
    ("Border Collie", "/dog_breeds_img/border collie.jpg"),
    ("Bull Terrier", "/dog_breeds_img/bull terrier.jpg"),
    ("Chihuahua", "/dog_breeds_img/chihuahua.jpg"),
    ("Chow Chow", "/dog_breeds_img/chow chow.jpg"),
    ("Cocker Spaniel", "/dog_breeds_img/cocker spaniel.jpg"),
    ("Golden Retriever", "/dog_breeds_img/golden.jpg"),
    ("Siberian Husky", "/dog_breeds_img/husky.jpg"),
    ("Labrador Retriever", "/dog_breeds_img/labrador.jpg"),
    ("Lhasa Apso", "/dog_breeds_img/lhasa apso.jpeg"),
    ("Maltese", "/dog_breeds_img/maltese.jpg"),
    ("German Shepherd", "/dog_breeds_img/german Shepherd.jpg"),
    ("Miniature Pinscher", "/dog_breeds_img/pinscher.jpg"),
    ("Poodle (Standard)", "/dog_breeds_img/poodle.jpg"),
    ("Pug", "/dog_breeds_img/pug.jpg"),
    ("Rottweiler", "/dog_breeds_img/rotweiller.jpg"),
    ("Samoyed", "/dog_breeds_img/samoyed.jpg"),
    ("Saint Bernard", "/dog_breeds_img/saint bernard.jpg"),
    ("Standard Schnauzer", "/dog_breeds_img/schnauzer.jpg"),
    ("Shih Tzu", "/dog_breeds_img/shih tzu.jpeg"),
    ("Dachshund", "/dog_breeds_img/dachshund.jpg"),
    ("West Highland White Terrier", "/dog_breeds_img/west highland white terrier.jpg"),
    ("Yorkshire Terrier", "/dog_breeds_img/yorkshire.jpg"),
    ("English Bulldog", "/dog_breeds_img/english bulldog.jpg"),
    ("French Bulldog", "/dog_breeds_img/french bulldog.jpg"),
];

/// Image paths for a breed name; empty when the breed has no picture
pub fn images_for(name: &str) -> Vec<String> {
    IMAGE_MAP
        .iter()
        .find(|(breed, _)| *breed == name)
        .map(|(_, path)| vec![path.to_string()])
        .unwrap_or_default()
}

/// One row of the breed reference table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BreedRecord {
    pub name: Value,
    pub size: Value,
    pub breed_group: Value,
    pub shedding: Value,
    pub exercise_needs: Value,
    pub good_with_children: Option<bool>,
    pub intelligence: Value,
    pub training_difficulty: Value,
    pub health_risk: Value,
    pub friendliness: Value,
    pub life_expectancy: Value,
    pub average_weight: Value,
    pub description: Value,
    pub temperament: Vec<String>,
    pub care: Vec<String>,
    pub history: Value,
    pub images: Vec<String>,
}

/// Read every breed from a CSV file with a header row
pub fn read_breed_csv(path: &Path) -> Result<Vec<BreedRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);

    let name_col = position("Name");
    let type_col = position("Type");
    let size_col = position("Size");
    let shedding_col = position("Shedding Level");
    let exercise_col = position("Exercise Requirements (hrs/day)");
    let children_col = position("Good with Children");
    let intelligence_col = position("Intelligence Rating (1-10)");
    let training_col = position("Training Difficulty (1-10)");
    let health_col = position("Health Issues Risk");
    let friendly_col = position("Friendly Rating (1-10)");
    let life_span_col = position("Life Span");
    let weight_col = position("Average Weight (kg)");
    let feature_col = position("Unique Feature");
    let origin_col = position("Origin");

    let mut records = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Malformed CSV row {}", line + 2))?;
        let cell = |col: Option<usize>| col.and_then(|idx| record.get(idx)).map(str::trim);

        let name = cell(name_col).unwrap_or_default();
        records.push(BreedRecord {
            name: cell_value(cell(name_col)),
            size: cell_value(cell(size_col)),
            breed_group: cell_value(cell(type_col)),
            shedding: cell_value(cell(shedding_col)),
            exercise_needs: cell_value(cell(exercise_col)),
            good_with_children: yes_no(cell(children_col)),
            intelligence: cell_value(cell(intelligence_col)),
            training_difficulty: cell_value(cell(training_col)),
            health_risk: cell_value(cell(health_col)),
            friendliness: cell_value(cell(friendly_col)),
            life_expectancy: cell_value(cell(life_span_col)),
            average_weight: cell_value(cell(weight_col)),
            description: cell_value(cell(feature_col)),
            temperament: Vec::new(),
            care: Vec::new(),
            history: cell_value(cell(origin_col)),
            images: images_for(name),
        });
    }

    Ok(records)
}

/// Like [`read_breed_csv`], but a missing or broken file yields no breeds
pub fn load_breed_metadata(path: Option<&Path>) -> Vec<BreedRecord> {
    let Some(path) = path else {
        warn!("No breed metadata CSV configured");
        return Vec::new();
    };

    match read_breed_csv(path) {
        Ok(records) => {
            info!(breeds = records.len(), "Loaded breed metadata from {:?}", path);
            records
        }
        Err(e) => {
            warn!("Failed to load breed metadata: {:#}", e);
            Vec::new()
        }
    }
}

/// Numbers stay numbers, empty cells become null
fn cell_value(cell: Option<&str>) -> Value {
    match cell {
        None | Some("") => Value::Null,
        Some(text) => {
            if let Ok(int) = text.parse::<i64>() {
                Value::from(int)
            } else if let Some(float) = text.parse::<f64>().ok().filter(|f| f.is_finite()) {
                Value::from(float)
            } else {
                Value::from(text)
            }
        }
    }
}

fn yes_no(cell: Option<&str>) -> Option<bool> {
    match cell.map(str::to_lowercase).as_deref() {
        Some("yes") => Some(true),
        Some("no") => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Name,Type,Size,Shedding Level,Exercise Requirements (hrs/day),Good with Children,Intelligence Rating (1-10),Training Difficulty (1-10),Health Issues Risk,Friendly Rating (1-10),Life Span,Average Weight (kg),Unique Feature,Origin";

    fn write_csv(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file
    }

    #[test]
    fn test_read_records() {
        let file = write_csv(&[
            "Beagle,Hound,Small,Moderate,1.5,Yes,6,5,Low,9,12,10,Great nose,England",
            "Akita,Working,Large,High,2,With Training,7,7,Moderate,6,11,38.5,Loyal,Japan",
        ]);

        let records = read_breed_csv(file.path()).unwrap();
        assert_eq!(records.len(), 2);

        let beagle = &records[0];
        assert_eq!(beagle.name, "Beagle");
        assert_eq!(beagle.breed_group, "Hound");
        assert_eq!(beagle.exercise_needs, 1.5);
        assert_eq!(beagle.intelligence, 6);
        assert_eq!(beagle.good_with_children, Some(true));
        assert_eq!(beagle.history, "England");
        assert_eq!(beagle.images, vec!["/dog_breeds_img/beagle.jpg".to_string()]);

        let akita = &records[1];
        assert_eq!(akita.good_with_children, None);
        assert_eq!(akita.average_weight, 38.5);
        assert!(akita.images.is_empty());
        assert!(akita.temperament.is_empty());
    }

    #[test]
    fn test_good_with_children_mapping() {
        assert_eq!(yes_no(Some("YES")), Some(true));
        assert_eq!(yes_no(Some("no")), Some(false));
        assert_eq!(yes_no(Some("Sometimes")), None);
        assert_eq!(yes_no(None), None);
    }

    #[test]
    fn test_cell_values() {
        assert_eq!(cell_value(None), Value::Null);
        assert_eq!(cell_value(Some("")), Value::Null);
        assert_eq!(cell_value(Some("12")), Value::from(12));
        assert_eq!(cell_value(Some("10-12")), Value::from("10-12"));
    }

    #[test]
    fn test_missing_file_degrades_to_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(load_breed_metadata(Some(&dir.path().join("missing.csv"))).is_empty());
        assert!(load_breed_metadata(None).is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let file =
            write_csv(&["Pug,Toy,Small,Moderate,0.5,Yes,5,4,Moderate,9,13,7,Wrinkles,China"]);
        let records = load_breed_metadata(Some(file.path()));
        let json = serde_json::to_value(&records[0]).unwrap();

        assert_eq!(json["name"], "Pug");
        assert_eq!(json["good_with_children"], true);
        assert_eq!(json["images"][0], "/dog_breeds_img/pug.jpg");
        assert_eq!(json["care"], serde_json::json!([]));
    }
}
