use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::JoinHandle;

use lotto_db::models::DrawResult;

use crate::i18n::{Language, tr};

/// Lecture vocale d'une grille. L'absence de moteur est un no-op silencieux.
pub trait Speaker {
    fn is_available(&self) -> bool;

    /// Lance la synthèse en arrière-plan ; `None` si rien n'a été lancé.
    fn speak(&self, text: &str, lang: Language) -> Option<JoinHandle<()>>;
}

pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn is_available(&self) -> bool {
        false
    }

    fn speak(&self, _text: &str, _lang: Language) -> Option<JoinHandle<()>> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Engine {
    Espeak,
    Say,
}

const CANDIDATES: [(&str, Engine); 3] = [
    ("espeak-ng", Engine::Espeak),
    ("espeak", Engine::Espeak),
    ("say", Engine::Say),
];

/// Moteur TTS externe trouvé dans le `PATH`.
pub struct CommandSpeaker {
    program: PathBuf,
    engine: Engine,
}

impl CommandSpeaker {
    pub fn detect() -> Option<Self> {
        let path_var = std::env::var_os("PATH")?;
        let dirs: Vec<PathBuf> = std::env::split_paths(&path_var).collect();
        CANDIDATES.iter().find_map(|&(name, engine)| {
            dirs.iter()
                .map(|dir| dir.join(name))
                .find(|candidate| is_executable(candidate))
                .map(|program| CommandSpeaker { program, engine })
        })
    }
}

/// Voix correspondant à la langue, si le moteur en propose une.
fn voice_for(program: &Path, engine: Engine, lang: Language) -> Option<String> {
    match engine {
        Engine::Espeak => {
            let output = Command::new(program)
                .arg(format!("--voices={}", lang.code()))
                .stderr(Stdio::null())
                .output()
                .ok()?;
            let listing = String::from_utf8_lossy(&output.stdout);
            espeak_has_voice(&listing).then(|| lang.code().to_string())
        }
        Engine::Say => {
            let output = Command::new(program)
                .args(["-v", "?"])
                .stderr(Stdio::null())
                .output()
                .ok()?;
            say_voice_for(&String::from_utf8_lossy(&output.stdout), lang)
        }
    }
}

fn speech_command(program: &Path, voice: Option<&str>, text: &str) -> Command {
    let mut command = Command::new(program);
    if let Some(voice) = voice {
        command.args(["-v", voice]);
    }
    command
        .arg(text)
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    command
}

impl Speaker for CommandSpeaker {
    fn is_available(&self) -> bool {
        true
    }

    /// La recherche de voix et la synthèse tournent toutes deux sur le thread lancé.
    fn speak(&self, text: &str, lang: Language) -> Option<JoinHandle<()>> {
        let program = self.program.clone();
        let engine = self.engine;
        let text = text.to_string();
        Some(std::thread::spawn(move || {
            let voice = voice_for(&program, engine, lang);
            if voice.is_none() {
                log::info!("Pas de voix '{}' pour {:?}, voix par défaut", lang, program);
            }
            match speech_command(&program, voice.as_deref(), &text).status() {
                Ok(status) if !status.success() => {
                    log::warn!("{:?} a échoué : {}", program, status);
                }
                Ok(_) => {}
                Err(e) => log::warn!("Impossible de lancer {:?} : {}", program, e),
            }
        }))
    }
}

/// Moteur du système si disponible, sinon lecture silencieuse.
pub fn detect_speaker() -> Box<dyn Speaker> {
    match CommandSpeaker::detect() {
        Some(speaker) => {
            log::info!("Synthèse vocale : {:?}", speaker.program);
            Box::new(speaker)
        }
        None => {
            log::info!("Aucun moteur de synthèse vocale trouvé");
            Box::new(SilentSpeaker)
        }
    }
}

pub fn speech_text(draw: &DrawResult, lang: Language) -> String {
    let numbers = draw
        .numbers()
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} {}", tr(lang, "speech.intro"), numbers)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

/// `espeak --voices=xx` affiche une ligne d'en-tête puis une ligne par voix.
fn espeak_has_voice(listing: &str) -> bool {
    listing.lines().skip(1).any(|l| !l.trim().is_empty())
}

/// Lignes de `say -v ?` : `Yuna    ko_KR    # 안녕하세요…`.
fn say_voice_for(listing: &str, lang: Language) -> Option<String> {
    listing.lines().find_map(|line| {
        let (head, _) = line.split_once('#').unwrap_or((line, ""));
        let mut fields = head.split_whitespace().collect::<Vec<_>>();
        let locale = fields.pop()?;
        let matches = Language::from_code(locale) == Some(lang);
        (matches && !fields.is_empty()).then(|| fields.join(" "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_text() {
        let draw = DrawResult::new([3, 1, 45, 22, 9, 17]).unwrap();
        assert_eq!(
            speech_text(&draw, Language::En),
            "Your lucky numbers are 1, 3, 9, 17, 22, 45"
        );
        assert!(speech_text(&draw, Language::Ko).starts_with("행운의 번호는"));
    }

    #[test]
    fn test_silent_speaker_is_noop() {
        let speaker = SilentSpeaker;
        assert!(!speaker.is_available());
        assert!(speaker.speak("1, 2, 3", Language::En).is_none());
    }

    #[test]
    fn test_speech_command_args() {
        let with_voice = speech_command(Path::new("espeak"), Some("ko"), "1, 2");
        let args: Vec<_> = with_voice.get_args().collect();
        assert_eq!(args, vec!["-v", "ko", "1, 2"]);

        let default_voice = speech_command(Path::new("espeak"), None, "1, 2");
        assert_eq!(default_voice.get_args().collect::<Vec<_>>(), vec!["1, 2"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_speak_returns_before_voice_lookup() {
        use std::os::unix::fs::PermissionsExt;
        use std::time::{Duration, Instant};

        let program = std::env::temp_dir().join(format!("lotto645-slow-tts-{}", std::process::id()));
        std::fs::write(&program, "#!/bin/sh\nsleep 1\n").unwrap();
        std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755)).unwrap();

        let speaker = CommandSpeaker {
            program: program.clone(),
            engine: Engine::Espeak,
        };
        let started = Instant::now();
        let handle = speaker.speak("1, 2, 3", Language::Ko).unwrap();
        assert!(started.elapsed() < Duration::from_millis(500));

        handle.join().unwrap();
        let _ = std::fs::remove_file(program);
    }

    #[test]
    fn test_espeak_listing() {
        let header = "Pty Language       Age/Gender VoiceName          File                 Other Languages\n";
        assert!(!espeak_has_voice(header));
        let listing = format!("{header} 5  ko              --/M      Korean             sit/ko\n");
        assert!(espeak_has_voice(&listing));
    }

    #[test]
    fn test_say_listing() {
        let listing = "Alex                en_US    # Most people recognize me by my voice.\n\
                       Kyoko               ja_JP    # こんにちは、私の名前はKyokoです。\n\
                       Yuna                ko_KR    # 안녕하세요. 제 이름은 유나입니다.\n";
        assert_eq!(say_voice_for(listing, Language::Ko).as_deref(), Some("Yuna"));
        assert_eq!(say_voice_for(listing, Language::Ja).as_deref(), Some("Kyoko"));
        assert_eq!(say_voice_for("", Language::En), None);
    }
}
