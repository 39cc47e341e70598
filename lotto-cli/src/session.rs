use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;

use anyhow::Result;
use poll_promise::Promise;
use lotto_db::db::{load_language, load_theme, save_language, save_theme};
use lotto_db::models::{DrawResult, FrequencyTable, HistoricalDraw, Theme, YearFilter};
use lotto_db::rusqlite::Connection;

use crate::analysis::sampler::{generate, generate_many};
use crate::analysis::{aggregate, available_years, count_matching};
use crate::i18n::{Language, resolve_language, system_locale};
use crate::import::{ParseReport, load_history};
use crate::speech::{SilentSpeaker, Speaker, speech_text};

/// Numérote les requêtes ; seule la dernière émise est acceptée.
#[derive(Debug, Clone, Default)]
pub struct LatestRequest {
    latest: Arc<AtomicU64>,
}

impl LatestRequest {
    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_latest(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }
}

/// Lecture de l'historique CSV sur un thread de travail. Une nouvelle requête
/// remplace la promesse en cours.
#[derive(Default)]
pub struct HistoryLoader {
    guard: LatestRequest,
    current: Option<(u64, Promise<ParseReport>)>,
}

impl HistoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Un fichier absent ou illisible donne un historique vide.
    pub fn request(&mut self, path: &Path) -> u64 {
        let ticket = self.guard.begin();
        let path = path.to_path_buf();
        let promise = Promise::spawn_thread("history-loader", move || {
            load_history(&path).unwrap_or_else(|e| {
                log::warn!("{:#}", e);
                ParseReport::default()
            })
        });
        if let Some((stale, _)) = self.current.replace((ticket, promise)) {
            log::debug!("Chargement périmé abandonné (requête {})", stale);
        }
        ticket
    }

    pub fn is_pending(&self) -> bool {
        self.current.is_some()
    }

    fn accept(&self, ticket: u64, report: ParseReport) -> Option<ParseReport> {
        if self.guard.is_latest(ticket) {
            Some(report)
        } else {
            log::debug!("Chargement périmé ignoré (requête {})", ticket);
            None
        }
    }

    /// Résultat de la dernière requête s'il est déjà arrivé.
    pub fn try_latest(&mut self) -> Option<ParseReport> {
        let (ticket, promise) = self.current.take()?;
        match promise.try_take() {
            Ok(report) => self.accept(ticket, report),
            Err(promise) => {
                self.current = Some((ticket, promise));
                None
            }
        }
    }

    /// Attend la dernière requête ; `None` si aucune n'est en cours.
    pub fn wait_latest(&mut self) -> Option<ParseReport> {
        let (ticket, promise) = self.current.take()?;
        self.accept(ticket, promise.block_and_take())
    }
}

pub struct SessionConfig {
    pub csv_path: PathBuf,
    /// Langue forcée pour cette exécution, non enregistrée.
    pub language_override: Option<String>,
}

/// État de la session, possédé par le contrôleur principal.
pub struct Session {
    conn: Connection,
    language: Language,
    theme: Theme,
    csv_path: PathBuf,
    history: ParseReport,
    history_loaded: bool,
    year_filter: YearFilter,
    speaker: Box<dyn Speaker>,
    speech_enabled: bool,
    loader: HistoryLoader,
}

impl Session {
    pub fn open(conn: Connection, config: SessionConfig) -> Result<Self> {
        let theme = load_theme(&conn)?;
        let stored = load_language(&conn)?;
        let system = system_locale();

        let language = match config.language_override.as_deref() {
            Some(code) => Language::from_code(code).unwrap_or_else(|| {
                log::warn!("Langue '{}' non prise en charge", code);
                resolve_language(stored.as_deref(), system.as_deref())
            }),
            None => resolve_language(stored.as_deref(), system.as_deref()),
        };
        log::debug!("Session : langue={} thème={}", language, theme);

        Ok(Self {
            conn,
            language,
            theme,
            csv_path: config.csv_path,
            history: ParseReport::default(),
            history_loaded: false,
            year_filter: YearFilter::All,
            speaker: Box::new(SilentSpeaker),
            speech_enabled: false,
            loader: HistoryLoader::new(),
        })
    }

    pub fn with_speaker(mut self, speaker: Box<dyn Speaker>) -> Self {
        self.speaker = speaker;
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn year_filter(&self) -> &YearFilter {
        &self.year_filter
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        save_theme(&self.conn, theme)?;
        self.theme = theme;
        Ok(())
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let theme = self.theme.toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }

    /// Retourne la langue retenue et `false` si le code demandé n'est pas pris en charge.
    pub fn set_language(&mut self, code: &str) -> Result<(Language, bool)> {
        let (language, supported) = match Language::from_code(code) {
            Some(lang) => (lang, true),
            None => {
                log::warn!("Langue '{}' non prise en charge, repli sur {}", code, Language::default());
                (Language::default(), false)
            }
        };
        save_language(&self.conn, language.code())?;
        self.language = language;
        Ok((language, supported))
    }

    pub fn speech_enabled(&self) -> bool {
        self.speech_enabled
    }

    pub fn speech_available(&self) -> bool {
        self.speaker.is_available()
    }

    pub fn set_speech(&mut self, enabled: bool) {
        self.speech_enabled = enabled;
    }

    pub fn toggle_speech(&mut self) -> bool {
        self.speech_enabled = !self.speech_enabled;
        self.speech_enabled
    }

    pub fn generate(&self, count: usize, seed: Option<u64>) -> Vec<DrawResult> {
        match (count, seed) {
            (1, None) => vec![generate()],
            _ => generate_many(count, seed),
        }
    }

    /// Lecture vocale si activée et disponible.
    pub fn announce(&self, draw: &DrawResult) -> Option<JoinHandle<()>> {
        if !self.speech_enabled || !self.speaker.is_available() {
            return None;
        }
        self.speaker
            .speak(&speech_text(draw, self.language), self.language)
    }

    /// Lance un chargement en arrière-plan ; remplace toute requête en cours.
    pub fn request_history(&mut self) -> u64 {
        self.loader.request(&self.csv_path)
    }

    pub fn history_pending(&self) -> bool {
        self.loader.is_pending()
    }

    /// Intègre un chargement terminé sans bloquer.
    pub fn poll_history(&mut self) -> bool {
        match self.loader.try_latest() {
            Some(report) => {
                self.install(report);
                true
            }
            None => false,
        }
    }

    pub fn reload_history(&mut self) -> &ParseReport {
        self.request_history();
        self.wait_pending();
        &self.history
    }

    /// Charge l'historique au premier besoin (ou attend le chargement en cours).
    pub fn ensure_history(&mut self) -> &ParseReport {
        if self.loader.is_pending() {
            self.wait_pending();
        } else if !self.history_loaded {
            self.request_history();
            self.wait_pending();
        }
        &self.history
    }

    fn wait_pending(&mut self) {
        if let Some(report) = self.loader.wait_latest() {
            self.install(report);
        }
    }

    fn install(&mut self, report: ParseReport) {
        self.history = report;
        self.history_loaded = true;
    }

    pub fn draws(&self) -> &[HistoricalDraw] {
        &self.history.draws
    }

    pub fn set_year_filter(&mut self, filter: YearFilter) {
        self.year_filter = filter;
    }

    pub fn frequency(&self) -> FrequencyTable {
        aggregate(self.draws(), &self.year_filter)
    }

    pub fn filtered_count(&self) -> usize {
        count_matching(self.draws(), &self.year_filter)
    }

    pub fn years(&self) -> Vec<String> {
        available_years(self.draws())
    }
}
