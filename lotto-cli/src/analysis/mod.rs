pub mod sampler;

use std::collections::BTreeSet;

use lotto_db::models::{FrequencyTable, HistoricalDraw, YearFilter};

/// Compte les apparitions de chaque numéro sur les tirages retenus par `filter`.
/// Les numéros hors de [1, 45] sont ignorés.
pub fn aggregate(draws: &[HistoricalDraw], filter: &YearFilter) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    for draw in draws.iter().filter(|d| filter.matches(&d.date)) {
        for n in draw.present_numbers() {
            table.increment(n);
        }
    }
    table
}

pub fn count_matching(draws: &[HistoricalDraw], filter: &YearFilter) -> usize {
    draws.iter().filter(|d| filter.matches(&d.date)).count()
}

/// Années présentes dans l'historique, de la plus récente à la plus ancienne.
pub fn available_years(draws: &[HistoricalDraw]) -> Vec<String> {
    let years: BTreeSet<&str> = draws
        .iter()
        .filter_map(|d| d.year())
        .filter(|y| y.bytes().all(|b| b.is_ascii_digit()))
        .collect();
    years.into_iter().rev().map(str::to_string).collect()
}

/// Les `last` tirages les plus récents retenus par `filter` (date décroissante,
/// puis identifiant numérique décroissant).
pub fn latest_draws(draws: &[HistoricalDraw], filter: &YearFilter, last: usize) -> Vec<HistoricalDraw> {
    let mut selected: Vec<&HistoricalDraw> = draws.iter().filter(|d| filter.matches(&d.date)).collect();
    selected.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| draw_number(b).cmp(&draw_number(a)))
            .then_with(|| b.draw_id.cmp(&a.draw_id))
    });
    selected.into_iter().take(last).cloned().collect()
}

fn draw_number(draw: &HistoricalDraw) -> Option<u64> {
    draw.draw_id.trim().parse().ok()
}

/// Numéros triés par fréquence décroissante, puis par numéro.
pub fn ranked(table: &FrequencyTable) -> Vec<(u8, u32)> {
    let mut rows: Vec<(u8, u32)> = table.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(date: &str, numbers: [u8; 6]) -> HistoricalDraw {
        HistoricalDraw {
            draw_id: "1".to_string(),
            date: date.to_string(),
            numbers,
            bonus: None,
        }
    }

    fn sample() -> Vec<HistoricalDraw> {
        vec![
            draw("2023-01-01", [1, 2, 3, 4, 5, 6]),
            draw("2022-01-01", [7, 8, 9, 10, 11, 12]),
        ]
    }

    #[test]
    fn test_aggregate_all_sums() {
        let draws = vec![
            draw("2023-01-01", [1, 2, 3, 4, 5, 6]),
            draw("2023-01-08", [1, 10, 20, 30, 40, 45]),
            draw("2022-06-04", [5, 6, 7, 8, 9, 10]),
        ];
        let table = aggregate(&draws, &YearFilter::All);
        assert_eq!(table.len(), 45);
        assert_eq!(table.total(), 6 * draws.len() as u32);
        assert_eq!(table.count(1), 2);
        assert_eq!(table.count(10), 2);
        assert_eq!(table.count(44), 0);
    }

    #[test]
    fn test_aggregate_year_filter() {
        let table = aggregate(&sample(), &YearFilter::Year("2023".to_string()));
        for n in 1..=6 {
            assert_eq!(table.count(n), 1, "numéro {}", n);
        }
        for n in 7..=12 {
            assert_eq!(table.count(n), 0, "numéro {}", n);
        }
        assert_eq!(table.total(), 6);
    }

    #[test]
    fn test_aggregate_unknown_year_is_empty() {
        let table = aggregate(&sample(), &YearFilter::Year("1999".to_string()));
        assert!(table.is_empty());
        assert_eq!(table.len(), 45);
    }

    #[test]
    fn test_aggregate_ignores_out_of_range() {
        let draws = vec![draw("2023-01-01", [0, 2, 3, 4, 5, 46])];
        let table = aggregate(&draws, &YearFilter::All);
        assert_eq!(table.total(), 4);
    }

    #[test]
    fn test_aggregate_idempotent() {
        let draws = sample();
        let filter = YearFilter::Year("2022".to_string());
        assert_eq!(aggregate(&draws, &filter), aggregate(&draws, &filter));
    }

    #[test]
    fn test_available_years() {
        let mut draws = sample();
        draws.push(draw("2023-05-05", [1, 2, 3, 4, 5, 6]));
        draws.push(draw("bad", [1, 2, 3, 4, 5, 6]));
        assert_eq!(available_years(&draws), vec!["2023", "2022"]);
        assert_eq!(count_matching(&draws, &YearFilter::Year("2023".to_string())), 2);
    }

    #[test]
    fn test_latest_draws_ignores_file_order() {
        let mut draws = vec![
            draw("2022-01-01", [7, 8, 9, 10, 11, 12]),
            draw("2023-06-03", [1, 2, 3, 4, 5, 6]),
            draw("2023-01-07", [1, 2, 3, 4, 5, 6]),
        ];
        draws[0].draw_id = "998".to_string();
        draws[1].draw_id = "1071".to_string();
        draws[2].draw_id = "1050".to_string();

        let ids = |v: Vec<HistoricalDraw>| v.into_iter().map(|d| d.draw_id).collect::<Vec<_>>();
        assert_eq!(ids(latest_draws(&draws, &YearFilter::All, 2)), vec!["1071", "1050"]);
        assert_eq!(
            ids(latest_draws(&draws, &YearFilter::Year("2022".to_string()), 10)),
            vec!["998"]
        );
        assert!(latest_draws(&draws, &YearFilter::All, 0).is_empty());
    }

    #[test]
    fn test_latest_draws_same_date_by_number() {
        let mut draws = vec![
            draw("2023-01-07", [1, 2, 3, 4, 5, 6]),
            draw("2023-01-07", [1, 2, 3, 4, 5, 6]),
        ];
        draws[0].draw_id = "99".to_string();
        draws[1].draw_id = "100".to_string();
        let latest = latest_draws(&draws, &YearFilter::All, 1);
        assert_eq!(latest[0].draw_id, "100");
    }

    #[test]
    fn test_ranked_order() {
        let draws = vec![
            draw("2023-01-01", [1, 2, 3, 4, 5, 6]),
            draw("2023-01-08", [6, 7, 8, 9, 10, 11]),
        ];
        let rows = ranked(&aggregate(&draws, &YearFilter::All));
        assert_eq!(rows[0], (6, 2));
        assert_eq!(rows[1], (1, 1));
        assert_eq!(rows.last(), Some(&(45, 0)));
    }
}
