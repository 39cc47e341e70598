use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use thiserror::Error;

/// Plus grand numéro jouable.
pub const POOL_SIZE: u8 = 45;
/// Nombre de numéros par grille.
pub const PICK_COUNT: usize = 6;
/// Case d'un tirage historique dont la valeur est hors de [1, 45] ; jamais comptée.
pub const ABSENT: u8 = 0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("thème inconnu : '{0}' (attendu : light|dark)")]
    UnknownTheme(String),
    #[error("filtre d'année invalide : '{0}' (attendu : AAAA ou all)")]
    InvalidYear(String),
}

/// Grille générée : 6 numéros distincts dans [1, 45], triés par ordre croissant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawResult {
    numbers: [u8; PICK_COUNT],
}

impl DrawResult {
    /// Trie puis valide les numéros fournis.
    pub fn new(mut numbers: [u8; PICK_COUNT]) -> Result<Self> {
        numbers.sort_unstable();
        validate_numbers(&numbers)?;
        Ok(Self { numbers })
    }

    /// Tire des valeurs depuis `next` jusqu'à réunir 6 numéros distincts.
    /// Les valeurs hors de [1, 45] sont ignorées.
    pub fn collect_from(mut next: impl FnMut() -> u8) -> Self {
        let mut picked = BTreeSet::new();
        while picked.len() < PICK_COUNT {
            let n = next();
            if (1..=POOL_SIZE).contains(&n) {
                picked.insert(n);
            }
        }
        let mut numbers = [0u8; PICK_COUNT];
        for (slot, n) in numbers.iter_mut().zip(picked) {
            *slot = n;
        }
        Self { numbers }
    }

    pub fn numbers(&self) -> &[u8; PICK_COUNT] {
        &self.numbers
    }
}

impl fmt::Display for DrawResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_numbers(&self.numbers))
    }
}

/// Tirage historique lu depuis une ligne du CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalDraw {
    pub draw_id: String,
    pub date: String,
    pub numbers: [u8; PICK_COUNT],
    pub bonus: Option<u8>,
}

impl HistoricalDraw {
    /// Les 4 premiers caractères de la date, s'il y en a au moins 4.
    pub fn year(&self) -> Option<&str> {
        self.date.get(..4)
    }

    /// Numéros valides du tirage, sans les cases absentes.
    pub fn present_numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.numbers.iter().copied().filter(|&n| n != ABSENT)
    }
}

/// Nombre d'apparitions de chaque numéro 1..=45.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u32; POOL_SIZE as usize],
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self {
            counts: [0; POOL_SIZE as usize],
        }
    }

    /// Retourne `false` sans rien compter si `number` est hors de [1, 45].
    pub fn increment(&mut self, number: u8) -> bool {
        match number.checked_sub(1).map(usize::from) {
            Some(idx) if idx < self.counts.len() => {
                self.counts[idx] += 1;
                true
            }
            _ => false,
        }
    }

    pub fn count(&self, number: u8) -> u32 {
        number
            .checked_sub(1)
            .and_then(|idx| self.counts.get(usize::from(idx)))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Paires `(numéro, fréquence)` dans l'ordre 1..=45.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        (1..=POOL_SIZE).zip(self.counts.iter().copied())
    }
}

/// Filtre sur l'année : préfixe exact de 4 caractères sur la date, ou tout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum YearFilter {
    #[default]
    All,
    Year(String),
}

impl YearFilter {
    pub fn matches(&self, date: &str) -> bool {
        match self {
            YearFilter::All => true,
            YearFilter::Year(year) => date.starts_with(year.as_str()),
        }
    }
}

impl FromStr for YearFilter {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(YearFilter::All);
        }
        if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(YearFilter::Year(s.to_string()))
        } else {
            Err(ValueError::InvalidYear(s.to_string()))
        }
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::All => write!(f, "all"),
            YearFilter::Year(year) => write!(f, "{year}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallColor {
    Yellow,
    Blue,
    Red,
    Gray,
    Green,
}

impl BallColor {
    pub fn hex(&self) -> &'static str {
        match self {
            BallColor::Yellow => "#fbc400",
            BallColor::Blue => "#69c8f2",
            BallColor::Red => "#ff7272",
            BallColor::Gray => "#aaa",
            BallColor::Green => "#b0d840",
        }
    }
}

impl fmt::Display for BallColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BallColor::Yellow => "yellow",
            BallColor::Blue => "blue",
            BallColor::Red => "red",
            BallColor::Gray => "gray",
            BallColor::Green => "green",
        };
        f.write_str(name)
    }
}

/// Couleur d'une boule par tranche de dix.
pub fn color_for(number: u8) -> BallColor {
    match number {
        0..=10 => BallColor::Yellow,
        11..=20 => BallColor::Blue,
        21..=30 => BallColor::Red,
        31..=40 => BallColor::Gray,
        _ => BallColor::Green,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Light => "☀️",
            Theme::Dark => "🌙",
        }
    }
}

impl FromStr for Theme {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ValueError::UnknownTheme(other.to_string())),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn validate_numbers(numbers: &[u8; PICK_COUNT]) -> Result<()> {
    for &n in numbers {
        if n < 1 || n > POOL_SIZE {
            bail!("Numéro {} hors limites (1-{})", n, POOL_SIZE);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    Ok(())
}
