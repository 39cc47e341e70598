use std::io::{self, Write};

use anyhow::{Context, Result};
use lotto_db::models::YearFilter;

use lotto_cli::display::{self, REVEAL_STEP};
use lotto_cli::i18n::{Language, tr};
use lotto_cli::session::Session;

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Generate,
    Stats,
    Year,
    Years,
    History,
    Theme,
    Language,
    Speech,
    Reload,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    match input.trim().to_lowercase().as_str() {
        "1" | "generate" | "gen" | "g" | "생성" => Some(InteractiveCommand::Generate),
        "2" | "stats" | "chart" | "통계" => Some(InteractiveCommand::Stats),
        "3" | "year" | "연도" => Some(InteractiveCommand::Year),
        "4" | "years" => Some(InteractiveCommand::Years),
        "5" | "history" | "hist" | "기록" => Some(InteractiveCommand::History),
        "6" | "theme" | "테마" => Some(InteractiveCommand::Theme),
        "7" | "lang" | "language" | "언어" => Some(InteractiveCommand::Language),
        "8" | "speech" | "voice" | "음성" => Some(InteractiveCommand::Speech),
        "9" | "reload" => Some(InteractiveCommand::Reload),
        "0" | "quit" | "q" | "exit" | "종료" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

fn display_menu(lang: Language) {
    let entries = [
        ("1", "generate", "menu.generate"),
        ("2", "stats", "menu.stats"),
        ("3", "year", "menu.year"),
        ("4", "years", "menu.years"),
        ("5", "history", "menu.history"),
        ("6", "theme", "menu.theme"),
        ("7", "lang", "menu.lang"),
        ("8", "speech", "menu.speech"),
        ("9", "reload", "menu.reload"),
        ("0", "quit", "menu.quit"),
    ];
    println!();
    println!("── {} ──", tr(lang, "menu.title"));
    for (key, name, label) in entries {
        println!("  {}. {:<9}{}", key, name, tr(lang, label));
    }
    println!();
}

/// `None` en fin d'entrée (Ctrl+D).
fn prompt(msg: &str) -> Result<Option<String>> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

fn cmd_year_interactive(session: &mut Session) -> Result<()> {
    let lang = session.language();
    let msg = format!("{} [{}] : ", tr(lang, "prompt.year"), session.year_filter());
    let Some(input) = prompt(&msg)? else {
        return Ok(());
    };
    if input.is_empty() {
        return Ok(());
    }
    match input.parse::<YearFilter>() {
        Ok(filter) => super::cmd_stats(session, Some(filter)),
        Err(e) => {
            log::debug!("{}", e);
            println!("{}", tr(lang, "msg.invalid_year"));
            Ok(())
        }
    }
}

fn cmd_language_interactive(session: &mut Session) -> Result<()> {
    display::display_languages(session.language());
    let msg = format!("{} : ", tr(session.language(), "prompt.lang"));
    match prompt(&msg)? {
        Some(code) if !code.is_empty() => super::cmd_lang(session, Some(code)),
        _ => Ok(()),
    }
}

fn cmd_speech_interactive(session: &mut Session) {
    let lang = session.language();
    if !session.speech_available() {
        println!("{}", tr(lang, "speech.unavailable"));
        return;
    }
    if session.toggle_speech() {
        println!("{}", tr(lang, "speech.on"));
    } else {
        println!("{}", tr(lang, "speech.off"));
    }
}

fn run_command(session: &mut Session, command: InteractiveCommand) -> Result<()> {
    match command {
        InteractiveCommand::Generate => {
            // La lecture vocale continue pendant la saisie suivante.
            let _ = super::cmd_generate(session, 1, None, REVEAL_STEP);
            Ok(())
        }
        InteractiveCommand::Stats => super::cmd_stats(session, None),
        InteractiveCommand::Year => cmd_year_interactive(session),
        InteractiveCommand::Years => super::cmd_years(session),
        InteractiveCommand::History => super::cmd_history(session, 10, None),
        InteractiveCommand::Theme => super::cmd_theme(session, None),
        InteractiveCommand::Language => cmd_language_interactive(session),
        InteractiveCommand::Speech => {
            cmd_speech_interactive(session);
            Ok(())
        }
        InteractiveCommand::Reload => {
            let lang = session.language();
            display::display_parse_summary(session.reload_history(), lang);
            Ok(())
        }
        InteractiveCommand::Quit => Ok(()),
    }
}

pub fn run_interactive(session: &mut Session) -> Result<()> {
    display::display_title(session.language(), session.theme());
    session.request_history();

    loop {
        if session.poll_history() {
            log::info!("Historique chargé ({} tirages)", session.draws().len());
        }

        let lang = session.language();
        display_menu(lang);
        let Some(input) = prompt(&format!("{} > ", tr(lang, "prompt.choice")))? else {
            break;
        };

        if input.is_empty() {
            continue;
        }

        match parse_command(&input) {
            Some(InteractiveCommand::Quit) => {
                println!("{}", tr(lang, "msg.bye"));
                break;
            }
            Some(command) => {
                if let Err(e) = run_command(session, command) {
                    println!("Erreur: {e:#}");
                }
            }
            None => {
                println!("{} '{}'", tr(lang, "msg.unknown_command"), input);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_by_number() {
        assert_eq!(parse_command("1"), Some(InteractiveCommand::Generate));
        assert_eq!(parse_command("2"), Some(InteractiveCommand::Stats));
        assert_eq!(parse_command("3"), Some(InteractiveCommand::Year));
        assert_eq!(parse_command("4"), Some(InteractiveCommand::Years));
        assert_eq!(parse_command("5"), Some(InteractiveCommand::History));
        assert_eq!(parse_command("6"), Some(InteractiveCommand::Theme));
        assert_eq!(parse_command("7"), Some(InteractiveCommand::Language));
        assert_eq!(parse_command("8"), Some(InteractiveCommand::Speech));
        assert_eq!(parse_command("9"), Some(InteractiveCommand::Reload));
        assert_eq!(parse_command("0"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_by_name() {
        assert_eq!(parse_command("generate"), Some(InteractiveCommand::Generate));
        assert_eq!(parse_command("chart"), Some(InteractiveCommand::Stats));
        assert_eq!(parse_command("hist"), Some(InteractiveCommand::History));
        assert_eq!(parse_command("voice"), Some(InteractiveCommand::Speech));
        assert_eq!(parse_command("exit"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_korean_aliases() {
        assert_eq!(parse_command("생성"), Some(InteractiveCommand::Generate));
        assert_eq!(parse_command("테마"), Some(InteractiveCommand::Theme));
        assert_eq!(parse_command("종료"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_case_insensitive() {
        assert_eq!(parse_command("QUIT"), Some(InteractiveCommand::Quit));
        assert_eq!(parse_command(" Stats "), Some(InteractiveCommand::Stats));
    }

    #[test]
    fn test_parse_command_unknown() {
        assert_eq!(parse_command("foo"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("10"), None);
    }
}
