use std::io::{self, Write};
use std::time::Duration;

use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use textplots::Plot;

use crate::analysis::ranked;
use crate::i18n::{Language, tr};
use crate::import::ParseReport;
use lotto_db::models::{
    BallColor, DrawResult, FrequencyTable, HistoricalDraw, POOL_SIZE, Theme, YearFilter, color_for,
    format_numbers,
};

/// Délai entre deux boules lors de l'affichage progressif.
pub const REVEAL_STEP: Duration = Duration::from_millis(100);

const CHART_COLUMNS: usize = 9;

fn terminal_color(color: BallColor) -> Color {
    match color {
        BallColor::Yellow => Color::Rgb { r: 0xfb, g: 0xc4, b: 0x00 },
        BallColor::Blue => Color::Rgb { r: 0x69, g: 0xc8, b: 0xf2 },
        BallColor::Red => Color::Rgb { r: 0xff, g: 0x72, b: 0x72 },
        BallColor::Gray => Color::Rgb { r: 0xaa, g: 0xaa, b: 0xaa },
        BallColor::Green => Color::Rgb { r: 0xb0, g: 0xd8, b: 0x40 },
    }
}

/// Thème sombre : couleur du texte ; thème clair : couleur de fond.
fn ball_cell(content: String, number: u8, theme: Theme) -> Cell {
    let color = terminal_color(color_for(number));
    match theme {
        Theme::Dark => Cell::new(content).fg(color),
        Theme::Light => Cell::new(content).bg(color).fg(Color::Black),
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn display_title(lang: Language, theme: Theme) {
    println!("\n{} {}\n", theme.icon(), tr(lang, "app.title"));
}

/// Affiche les boules une à une puis le tableau coloré de la grille.
pub fn display_draw_result(draw: &DrawResult, lang: Language, theme: Theme, step: Duration) {
    println!("── {} ──", tr(lang, "generate.title"));

    if !step.is_zero() {
        let mut stdout = io::stdout();
        for (i, n) in draw.numbers().iter().enumerate() {
            if i > 0 {
                std::thread::sleep(step);
            }
            print!("({:2}) ", n);
            let _ = stdout.flush();
        }
        println!();
    }

    let mut table = new_table();
    table.set_header(vec![tr(lang, "table.number"), tr(lang, "table.color")]);
    for &n in draw.numbers() {
        table.add_row(vec![
            ball_cell(format!("{:2}", n), n, theme),
            Cell::new(color_for(n).to_string()),
        ]);
    }
    println!("{table}");
}

pub fn display_draw_results(draws: &[DrawResult], lang: Language, theme: Theme) {
    println!("── {} ──", tr(lang, "generate.title"));

    let mut table = new_table();
    table.set_header(vec!["#", tr(lang, "table.numbers")]);

    for (i, draw) in draws.iter().enumerate() {
        let mut row = vec![Cell::new(i + 1)];
        row.extend(
            draw.numbers()
                .iter()
                .map(|&n| ball_cell(format!("{:2}", n), n, theme)),
        );
        table.add_row(row);
    }
    println!("{table}");
}

/// Diagramme en barres des 45 numéros puis grille des fréquences.
pub fn display_frequency(
    table: &FrequencyTable,
    filter: &YearFilter,
    draw_count: usize,
    lang: Language,
    theme: Theme,
) {
    let scope = match filter {
        YearFilter::All => tr(lang, "stats.all_years").to_string(),
        YearFilter::Year(year) => year.clone(),
    };
    println!(
        "\n{} {} ({}, {} {})\n",
        theme.icon(),
        tr(lang, "stats.title"),
        scope,
        draw_count,
        tr(lang, "stats.draws")
    );

    if table.is_empty() {
        println!("  {}", tr(lang, "stats.empty"));
    }

    let points: Vec<(f32, f32)> = table.iter().map(|(n, c)| (n as f32, c as f32)).collect();
    let y_max = table.max_count().max(1) as f32;
    let shape = textplots::Shape::Bars(&points);
    let mut chart =
        textplots::Chart::new_with_y_range(180, 40, 0.5, POOL_SIZE as f32 + 0.5, 0.0, y_max);
    println!("{}", chart.lineplot(&shape));

    let mut grid = new_table();
    let rows: Vec<(u8, u32)> = table.iter().collect();
    for chunk in rows.chunks(CHART_COLUMNS) {
        grid.add_row(
            chunk
                .iter()
                .map(|&(n, c)| ball_cell(format!("{:2} : {}", n, c), n, theme))
                .collect::<Vec<_>>(),
        );
    }
    println!("{grid}");

    if !table.is_empty() {
        let top: Vec<String> = ranked(table)
            .iter()
            .take(6)
            .map(|(n, c)| format!("{} ({})", n, c))
            .collect();
        println!("  Top : {}", top.join(", "));
    }
}

pub fn display_history(draws: &[HistoricalDraw], lang: Language, theme: Theme) {
    println!("── {} ──", tr(lang, "history.title"));
    if draws.is_empty() {
        println!("{}", tr(lang, "stats.empty"));
        return;
    }

    let mut table = new_table();
    table.set_header(vec![
        tr(lang, "table.draw"),
        tr(lang, "table.date"),
        tr(lang, "table.numbers"),
        tr(lang, "table.bonus"),
    ]);

    for draw in draws {
        let mut sorted: Vec<u8> = draw.present_numbers().collect();
        sorted.sort();
        let bonus = match draw.bonus {
            Some(b) => ball_cell(format!("{:2}", b), b, theme),
            None => Cell::new("—"),
        };
        table.add_row(vec![
            Cell::new(&draw.draw_id),
            Cell::new(&draw.date),
            Cell::new(format_numbers(&sorted)),
            bonus,
        ]);
    }
    println!("{table}");
}

pub fn display_years(years: &[String], lang: Language) {
    println!("── {} ──", tr(lang, "years.title"));
    if years.is_empty() {
        println!("{}", tr(lang, "stats.empty"));
    } else {
        println!("  all, {}", years.join(", "));
    }
}

pub fn display_parse_summary(report: &ParseReport, lang: Language) {
    println!("{} :", tr(lang, "load.summary"));
    println!("  {:<16}: {}", tr(lang, "load.records"), report.total_records);
    println!("  {:<16}: {}", tr(lang, "load.kept"), report.draws.len());
    if !report.errors.is_empty() {
        println!("  {:<16}: {}", tr(lang, "load.errors"), report.errors.len());
    }
}

pub fn display_languages(current: Language) {
    println!("{} : {} ({})", tr(current, "lang.current"), current.native_name(), current);
    println!("{} :", tr(current, "lang.available"));
    for lang in Language::ALL {
        let marker = if lang == current { "*" } else { " " };
        println!("  {} {}  {}", marker, lang.code(), lang.native_name());
    }
}

pub fn display_theme(theme: Theme, lang: Language) {
    println!("{} {} : {}", theme.icon(), tr(lang, "theme.current"), theme);
}
