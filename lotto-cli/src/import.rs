use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use lotto_db::models::{ABSENT, HistoricalDraw, PICK_COUNT, POOL_SIZE};

/// Index de la première colonne de numéros (après l'identifiant et la date).
const FIRST_NUMBER_FIELD: usize = 2;
const BONUS_FIELD: usize = FIRST_NUMBER_FIELD + PICK_COUNT;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("ligne {line} : champ manquant à l'index {index}")]
    MissingField { line: u64, index: usize },
    #[error("ligne {line} : impossible de parser '{value}' (index {index})")]
    InvalidNumber { line: u64, index: usize, value: String },
    #[error("ligne {line} : lecture impossible ({message})")]
    Malformed { line: u64, message: String },
}

#[derive(Debug, Default)]
pub struct ParseReport {
    pub draws: Vec<HistoricalDraw>,
    pub total_records: u32,
    pub errors: Vec<ParseError>,
}

fn in_pool(n: i64) -> Option<u8> {
    u8::try_from(n).ok().filter(|n| (1..=POOL_SIZE).contains(n))
}

fn parse_record(record: &csv::StringRecord, line: u64) -> Result<HistoricalDraw, ParseError> {
    let get = |index: usize| -> Result<&str, ParseError> {
        record
            .get(index)
            .map(str::trim)
            .ok_or(ParseError::MissingField { line, index })
    };

    // Entier hors de [1, 45] : case absente plutôt que ligne rejetée.
    let get_number = |index: usize| -> Result<u8, ParseError> {
        let value = get(index)?;
        let n = value.parse::<i64>().map_err(|_| ParseError::InvalidNumber {
            line,
            index,
            value: value.to_string(),
        })?;
        Ok(in_pool(n).unwrap_or(ABSENT))
    };

    let draw_id = get(0)?.to_string();
    let date = get(1)?.to_string();

    let mut numbers = [0u8; PICK_COUNT];
    for (i, slot) in numbers.iter_mut().enumerate() {
        *slot = get_number(FIRST_NUMBER_FIELD + i)?;
    }

    // Colonne bonus facultative : absente si vide, illisible ou hors limites.
    let bonus = record
        .get(BONUS_FIELD)
        .and_then(|s| s.trim().parse::<i64>().ok())
        .and_then(in_pool);

    Ok(HistoricalDraw {
        draw_id,
        date,
        numbers,
        bonus,
    })
}

/// Lit un historique CSV (ligne d'en-tête ignorée). Les lignes illisibles
/// sont écartées et consignées dans `errors`, jamais propagées.
pub fn parse_report(text: &str) -> ParseReport {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut report = ParseReport::default();

    for record_result in reader.records() {
        report.total_records += 1;
        // En-tête = ligne 1
        let fallback_line = u64::from(report.total_records) + 1;
        match record_result {
            Ok(record) => {
                let line = record.position().map_or(fallback_line, |p| p.line());
                match parse_record(&record, line) {
                    Ok(draw) => report.draws.push(draw),
                    Err(e) => report.errors.push(e),
                }
            }
            Err(e) => {
                let line = e.position().map_or(fallback_line, |p| p.line());
                report.errors.push(ParseError::Malformed {
                    line,
                    message: e.to_string(),
                });
            }
        }
    }

    report
}

/// Variante de `parse_report` qui journalise les lignes écartées.
pub fn parse(text: &str) -> Vec<HistoricalDraw> {
    let report = parse_report(text);
    for e in &report.errors {
        log::warn!("Ligne ignorée : {}", e);
    }
    report.draws
}

pub fn load_history(path: &Path) -> Result<ParseReport> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    let report = parse_report(&text);
    for e in &report.errors {
        log::warn!("{:?} : {}", path, e);
    }
    log::info!(
        "{} tirages lus depuis {:?} ({} lignes, {} erreurs)",
        report.draws.len(),
        path,
        report.total_records,
        report.errors.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,date,n1,n2,n3,n4,n5,n6,bonus\n";

    #[test]
    fn test_parse_rows() {
        let text = format!(
            "{HEADER}1101,2024-01-06,6,12,14,21,27,45,30\n1100,2023-12-30,7,9,12,13,35,41\n"
        );
        let draws = parse(&text);
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].draw_id, "1101");
        assert_eq!(draws[0].date, "2024-01-06");
        assert_eq!(draws[0].numbers, [6, 12, 14, 21, 27, 45]);
        assert_eq!(draws[0].bonus, Some(30));
        assert_eq!(draws[1].bonus, None);
    }

    #[test]
    fn test_malformed_row_dropped() {
        let text = format!("{HEADER}1101,2024-01-06,6,12,abc,21,27,45,30\n");
        assert!(parse(&text).is_empty());

        let report = parse_report(&text);
        assert_eq!(report.total_records, 1);
        assert_eq!(
            report.errors,
            vec![ParseError::InvalidNumber {
                line: 2,
                index: 4,
                value: "abc".to_string()
            }]
        );
    }

    #[test]
    fn test_short_row_dropped() {
        let text = format!("{HEADER}1101,2024-01-06,6,12\n1100,2023-12-30,7,9,12,13,35,41,2\n");
        let report = parse_report(&text);
        assert_eq!(report.draws.len(), 1);
        assert_eq!(report.draws[0].draw_id, "1100");
        assert!(matches!(
            report.errors[0],
            ParseError::MissingField { index: 4, .. }
        ));
    }

    #[test]
    fn test_bad_bonus_is_absent() {
        let text = format!("{HEADER}1,2024-01-06,1,2,3,4,5,6,x\n");
        let draws = parse(&text);
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].bonus, None);
    }

    #[test]
    fn test_out_of_range_recorded_as_absent() {
        let text = format!(
            "{HEADER}1,2023-01-01,1,2,3,4,5,256\n\
             2,2023-01-08,1,2,3,4,5,-1\n\
             3,2023-01-15,0,2,3,4,5,99,46\n"
        );
        let report = parse_report(&text);
        assert!(report.errors.is_empty(), "{:?}", report.errors);
        let ids: Vec<&str> = report.draws.iter().map(|d| d.draw_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(report.draws[0].numbers, [1, 2, 3, 4, 5, ABSENT]);
        assert_eq!(report.draws[1].numbers, [1, 2, 3, 4, 5, ABSENT]);
        assert_eq!(report.draws[2].numbers, [ABSENT, 2, 3, 4, 5, ABSENT]);
        assert_eq!(report.draws[2].bonus, None);
        assert_eq!(report.draws[0].present_numbers().count(), 5);
    }

    #[test]
    fn test_out_of_range_row_still_counted() {
        use crate::analysis::aggregate;
        use lotto_db::models::YearFilter;

        let text = format!("{HEADER}1,2023-01-01,1,2,3,4,5,256\n");
        let table = aggregate(&parse(&text), &YearFilter::All);
        assert_eq!(table.total(), 5);
        for n in 1..=5 {
            assert_eq!(table.count(n), 1);
        }
    }

    #[test]
    fn test_non_integer_cell_drops_row() {
        let text = format!("{HEADER}1,2023-01-01,1,2,3,4,5,6.5\n");
        let report = parse_report(&text);
        assert!(report.draws.is_empty());
        assert!(matches!(report.errors[0], ParseError::InvalidNumber { index: 7, .. }));
    }

    #[test]
    fn test_header_only_and_empty() {
        assert!(parse(HEADER).is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_demo_history() {
        let text = include_str!("../../demos/lotto_history.csv");
        let report = parse_report(text);
        assert!(report.errors.is_empty(), "{:?}", report.errors);
        assert_eq!(report.draws.len() as u32, report.total_records);
        assert!(report.draws.iter().all(|d| d.bonus.is_some()));
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("lotto645-fichier-absent.csv");
        assert!(load_history(&path).is_err());
    }
}
