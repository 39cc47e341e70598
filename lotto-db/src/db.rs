use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

use crate::models::Theme;

pub const THEME_KEY: &str = "theme";
pub const LANGUAGE_KEY: &str = "language";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS preferences (
    key    TEXT PRIMARY KEY,
    value  TEXT NOT NULL
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("lotto645.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

pub fn get_preference(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM preferences WHERE key = ?1",
            [key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .with_context(|| format!("Échec de la lecture de la préférence '{}'", key))?;
    Ok(value)
}

pub fn set_preference(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO preferences (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        rusqlite::params![key, value],
    )
    .with_context(|| format!("Échec de l'écriture de la préférence '{}'", key))?;
    Ok(())
}

/// Thème enregistré ; une valeur absente ou illisible donne le thème clair.
pub fn load_theme(conn: &Connection) -> Result<Theme> {
    let theme = match get_preference(conn, THEME_KEY)? {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            log::warn!("Préférence de thème ignorée : {}", e);
            Theme::default()
        }),
        None => Theme::default(),
    };
    Ok(theme)
}

pub fn save_theme(conn: &Connection, theme: Theme) -> Result<()> {
    set_preference(conn, THEME_KEY, theme.as_str())
}

pub fn load_language(conn: &Connection) -> Result<Option<String>> {
    Ok(get_preference(conn, LANGUAGE_KEY)?.filter(|code| !code.trim().is_empty()))
}

pub fn save_language(conn: &Connection, code: &str) -> Result<()> {
    set_preference(conn, LANGUAGE_KEY, code)
}
