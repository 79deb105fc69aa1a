//! FAQ corpus loading.
//!
//! The corpus comes from a CSV file with `id`, `question` and `answer`
//! columns (plus an optional `source`), or from the embedded default set
//! when no file exists.

use crate::types::{Corpus, FaqId, FaqRecord};
use aurora_core::{AppError, AppResult};
use std::io::Read;
use std::path::Path;

const REQUIRED_COLUMNS: [&str; 3] = ["id", "question", "answer"];

/// Load the corpus from `path`, or the embedded default set if it does not exist.
pub fn load_corpus(path: &Path) -> AppResult<Corpus> {
    if !path.exists() {
        tracing::info!(
            "No FAQ file at {:?}, using the embedded default corpus",
            path
        );
        return Ok(default_corpus());
    }

    tracing::debug!("Loading FAQ corpus from {:?}", path);

    let file = std::fs::File::open(path)?;
    let corpus = from_reader(file).map_err(|e| match e {
        AppError::Corpus(msg) => AppError::Corpus(format!("{}: {}", path.display(), msg)),
        other => other,
    })?;

    tracing::info!("Loaded {} FAQ records from {:?}", corpus.len(), path);
    Ok(corpus)
}

/// Parse a corpus from CSV data.
pub fn from_reader<R: Read>(reader: R) -> AppResult<Corpus> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|&name| column(name).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Corpus(format!(
            "FAQ file is missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let (Some(id_col), Some(question_col), Some(answer_col)) =
        (column("id"), column("question"), column("answer"))
    else {
        return Err(AppError::Corpus("FAQ file header is malformed".to_string()));
    };
    let source_col = column("source");

    let mut records = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let record = result?;
        let cell = |index: usize| record.get(index).unwrap_or_default();

        let raw_id = cell(id_col).trim();
        let id = parse_id(raw_id).ok_or_else(|| {
            AppError::Corpus(format!(
                "Row {}: id '{}' is not an integer",
                row + 1,
                raw_id
            ))
        })?;

        let source = source_col
            .map(cell)
            .map(str::trim)
            .filter(|s| !s.is_empty());

        records.push(FaqRecord::new(id, cell(question_col), cell(answer_col), source));
    }

    Corpus::new(records)
}

/// Integer ids, tolerating a `.0` suffix left by spreadsheet exports.
fn parse_id(raw: &str) -> Option<FaqId> {
    raw.parse::<FaqId>()
        .ok()
        .or_else(|| raw.strip_suffix(".0").and_then(|s| s.parse().ok()))
}

/// The embedded five-record Aurora Skies corpus.
pub fn default_corpus() -> Corpus {
    Corpus::from_unique(vec![
        FaqRecord::new(
            1,
            "Can I get a refund if I cancel within 24 hours?",
            "Yes. If you cancel within 24 hours of purchase and booked at least 7 days before departure, you'll receive a full refund. After 24 hours, fare rules apply.",
            Some("24-hour refund"),
        ),
        FaqRecord::new(
            2,
            "What if the airline changes my schedule?",
            "For significant schedule changes (e.g., over 3 hours), you can be rebooked at no extra charge or request a refund for the unused portion.",
            Some("Schedule change policy"),
        ),
        FaqRecord::new(
            3,
            "Are non-refundable fares changeable?",
            "Non-refundable tickets can be changed for a fee plus any fare difference, unless restricted by the fare rules.",
            Some("Fare rules"),
        ),
        FaqRecord::new(
            4,
            "How do I rebook after a cancellation?",
            "Use Manage Trip, the mobile app, or the airport desk. You'll be rebooked on the next available flight with similar routing at no extra cost.",
            Some("IROPs rebooking"),
        ),
        FaqRecord::new(
            5,
            "Are taxes refundable on unused tickets?",
            "Government-imposed taxes and fees are usually refundable on unused tickets; carrier-imposed charges may not be.",
            Some("Taxes & fees"),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_default() {
        let temp_dir = TempDir::new().unwrap();
        let corpus = load_corpus(&temp_dir.path().join("airline_faq.csv")).unwrap();

        assert_eq!(corpus, default_corpus());
        assert_eq!(corpus.ids().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(corpus.find(5).unwrap().source.as_deref(), Some("Taxes & fees"));
    }

    #[test]
    fn test_load_csv_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("faq.csv");
        fs::write(
            &path,
            "id,question,answer,source,owner\n\
             10,\"Can I bring a pet?\",\"Small pets travel in the cabin, fees apply.\",Pets,ops\n\
             7,What about strollers?,Strollers are checked free.,,ops\n",
        )
        .unwrap();

        let corpus = load_corpus(&path).unwrap();
        assert_eq!(corpus.ids().collect::<Vec<_>>(), vec![10, 7]);

        let pets = corpus.get(0).unwrap();
        assert_eq!(pets.answer, "Small pets travel in the cabin, fees apply.");
        assert_eq!(pets.source.as_deref(), Some("Pets"));
        assert_eq!(corpus.get(1).unwrap().source, None);
    }

    #[test]
    fn test_missing_required_column_fails() {
        let data = "id,question\n1,Hello?\n";
        let err = from_reader(data.as_bytes()).unwrap_err();

        assert!(matches!(err, AppError::Corpus(_)));
        assert!(err.to_string().contains("answer"));
    }

    #[test]
    fn test_existing_file_missing_columns_fails_fast() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("faq.csv");
        fs::write(&path, "question,answer\nQ?,A.\n").unwrap();

        assert!(load_corpus(&path).is_err());
    }

    #[test]
    fn test_empty_cells_become_empty_strings() {
        let data = "id,question,answer\n1,,Answer only\n2,Question only,\n";
        let corpus = from_reader(data.as_bytes()).unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(0).unwrap().question, "");
        assert_eq!(corpus.get(1).unwrap().answer, "");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let data = "id,question,answer\n1,Only a question\n";
        let corpus = from_reader(data.as_bytes()).unwrap();
        assert_eq!(corpus.get(0).unwrap().answer, "");
    }

    #[test]
    fn test_non_integer_id_fails() {
        let data = "id,question,answer\nabc,Q,A\n";
        let err = from_reader(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("not an integer"));
    }

    #[test]
    fn test_float_formatted_id_accepted() {
        let data = "id,question,answer\n3.0,Q,A\n";
        let corpus = from_reader(data.as_bytes()).unwrap();
        assert_eq!(corpus.get(0).unwrap().id, 3);
    }

    #[test]
    fn test_duplicate_ids_fail() {
        let data = "id,question,answer\n1,Q,A\n1,Q2,A2\n";
        assert!(from_reader(data.as_bytes()).is_err());
    }
}
