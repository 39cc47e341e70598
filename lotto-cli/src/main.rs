mod interactive;

use std::path::PathBuf;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use lotto_cli::display::{
    REVEAL_STEP, display_draw_result, display_draw_results, display_frequency, display_history,
    display_languages, display_theme, display_title, display_years,
};
use lotto_cli::analysis::latest_draws;
use lotto_cli::i18n::tr;
use lotto_cli::session::{Session, SessionConfig};
use lotto_cli::speech::detect_speaker;
use lotto_db::db::{db_path, migrate, open_db};
use lotto_db::models::{Theme, YearFilter};

#[derive(Parser)]
#[command(name = "lotto", about = "Générateur de numéros Lotto 6/45 et fréquences des tirages")]
struct Cli {
    /// Base SQLite des préférences (défaut : data/lotto645.db)
    #[arg(long, env = "LOTTO_DB", global = true)]
    db: Option<PathBuf>,

    /// Historique des tirages au format CSV
    #[arg(long, env = "LOTTO_CSV", default_value = "lotto_history.csv", global = true)]
    csv: PathBuf,

    /// Langue pour cette exécution (en, ko, ja), non enregistrée
    #[arg(long, global = true)]
    lang: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Générer des grilles de 6 numéros
    Generate {
        /// Nombre de grilles
        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=100))]
        count: u32,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Lire la grille à voix haute
        #[arg(long)]
        speak: bool,

        /// Afficher la grille sans animation
        #[arg(long)]
        no_anim: bool,
    },

    /// Fréquence des numéros dans l'historique
    Stats {
        /// Année (AAAA) ou all
        #[arg(short, long, default_value = "all")]
        year: YearFilter,
    },

    /// Lister les années présentes dans l'historique
    Years,

    /// Afficher les derniers tirages
    History {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: usize,

        /// Année (AAAA) ou all
        #[arg(short, long, default_value = "all")]
        year: YearFilter,
    },

    /// Changer de thème (sans argument : bascule)
    Theme {
        theme: Option<Theme>,
    },

    /// Choisir la langue (sans argument : afficher)
    Lang {
        code: Option<String>,
    },

    /// Mode interactif
    Interactive,

    /// Afficher le chemin de la base de données
    DbPath,
}

fn init_logging() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,lotto=info,lotto_cli=info,lotto_db=info"),
    )
    .format_timestamp(None)
    .init();
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let path = cli.db.unwrap_or_else(db_path);

    if let Command::DbPath = cli.command {
        println!("{}", path.display());
        return Ok(());
    }

    let conn = open_db(&path)?;
    migrate(&conn)?;

    let mut session = Session::open(
        conn,
        SessionConfig {
            csv_path: cli.csv,
            language_override: cli.lang,
        },
    )?;

    match cli.command {
        Command::Generate {
            count,
            seed,
            speak,
            no_anim,
        } => {
            if speak {
                session = session.with_speaker(detect_speaker());
                session.set_speech(true);
            }
            let step = if no_anim { Duration::ZERO } else { REVEAL_STEP };
            display_title(session.language(), session.theme());
            if let Some(handle) = cmd_generate(&session, count as usize, seed, step) {
                let _ = handle.join();
            }
            Ok(())
        }
        Command::Stats { year } => cmd_stats(&mut session, Some(year)),
        Command::Years => cmd_years(&mut session),
        Command::History { last, year } => cmd_history(&mut session, last, Some(year)),
        Command::Theme { theme } => cmd_theme(&mut session, theme),
        Command::Lang { code } => cmd_lang(&mut session, code),
        Command::Interactive => {
            session = session.with_speaker(detect_speaker());
            interactive::run_interactive(&mut session)
        }
        Command::DbPath => Ok(()),
    }
}

/// Génère puis affiche ; une grille unique est lue à voix haute si activé.
fn cmd_generate(
    session: &Session,
    count: usize,
    seed: Option<u64>,
    step: Duration,
) -> Option<JoinHandle<()>> {
    let (lang, theme) = (session.language(), session.theme());
    let draws = session.generate(count, seed);
    match draws.as_slice() {
        [draw] => {
            display_draw_result(draw, lang, theme, step);
            session.announce(draw)
        }
        _ => {
            display_draw_results(&draws, lang, theme);
            None
        }
    }
}

fn cmd_stats(session: &mut Session, year: Option<YearFilter>) -> Result<()> {
    session.ensure_history();
    if let Some(filter) = year {
        session.set_year_filter(filter);
    }
    let table = session.frequency();
    display_frequency(
        &table,
        session.year_filter(),
        session.filtered_count(),
        session.language(),
        session.theme(),
    );
    Ok(())
}

fn cmd_years(session: &mut Session) -> Result<()> {
    session.ensure_history();
    display_years(&session.years(), session.language());
    Ok(())
}

fn cmd_history(session: &mut Session, last: usize, year: Option<YearFilter>) -> Result<()> {
    session.ensure_history();
    let filter = year.unwrap_or_else(|| session.year_filter().clone());
    let draws = latest_draws(session.draws(), &filter, last);
    display_history(&draws, session.language(), session.theme());
    Ok(())
}

fn cmd_theme(session: &mut Session, theme: Option<Theme>) -> Result<()> {
    match theme {
        Some(theme) => session.set_theme(theme)?,
        None => {
            session.toggle_theme()?;
        }
    }
    display_theme(session.theme(), session.language());
    Ok(())
}

fn cmd_lang(session: &mut Session, code: Option<String>) -> Result<()> {
    match code {
        Some(code) => {
            let (lang, supported) = session.set_language(&code)?;
            if !supported {
                println!("{} {}", tr(lang, "lang.unsupported"), lang.native_name());
            }
            display_languages(lang);
        }
        None => display_languages(session.language()),
    }
    Ok(())
}
