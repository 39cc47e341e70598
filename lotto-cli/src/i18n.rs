//! Tables de traduction statiques (en / ko / ja) avec repli sur l'anglais.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Ko,
    Ja,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Ko, Language::Ja];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ko => "ko",
            Language::Ja => "ja",
        }
    }

    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ko => "한국어",
            Language::Ja => "日本語",
        }
    }

    /// Accepte `ko`, `ko-KR`, `ko_KR.UTF-8`… ; seule la sous-étiquette principale compte.
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code
            .trim()
            .split(['-', '_', '.', '@'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        Language::ALL.into_iter().find(|l| l.code() == primary)
    }

    fn table(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Language::En => EN,
            Language::Ko => KO,
            Language::Ja => JA,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Langue préférée enregistrée, sinon langue du système, sinon anglais.
pub fn resolve_language(stored: Option<&str>, system: Option<&str>) -> Language {
    stored
        .and_then(Language::from_code)
        .or_else(|| system.and_then(Language::from_code))
        .unwrap_or_default()
}

/// Locale du système d'après les variables POSIX usuelles.
pub fn system_locale() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .into_iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
}

/// Traduction de `key` ; repli sur l'anglais puis sur la clé elle-même.
pub fn tr(lang: Language, key: &'static str) -> &'static str {
    lookup(lang.table(), key)
        .or_else(|| lookup(EN, key))
        .unwrap_or(key)
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

const EN: &[(&str, &str)] = &[
    ("app.title", "Lotto 6/45 Number Generator"),
    ("generate.title", "Your lucky numbers"),
    ("speech.intro", "Your lucky numbers are"),
    ("stats.title", "Winning number frequency"),
    ("stats.draws", "draws"),
    ("stats.all_years", "All years"),
    ("stats.empty", "No draw history available."),
    ("history.title", "Past draws"),
    ("years.title", "Available years"),
    ("table.number", "Number"),
    ("table.count", "Count"),
    ("table.color", "Color"),
    ("table.draw", "Draw"),
    ("table.date", "Date"),
    ("table.numbers", "Numbers"),
    ("table.bonus", "Bonus"),
    ("load.summary", "History loaded"),
    ("load.records", "Rows read"),
    ("load.kept", "Draws kept"),
    ("load.errors", "Rows skipped"),
    ("theme.current", "Theme"),
    ("lang.current", "Language"),
    ("lang.available", "Available languages"),
    ("lang.unsupported", "Unsupported language, falling back to"),
    ("speech.on", "Voice read-back enabled"),
    ("speech.off", "Voice read-back disabled"),
    ("speech.unavailable", "No speech engine found"),
    ("menu.title", "Interactive mode"),
    ("menu.generate", "Generate numbers"),
    ("menu.stats", "Frequency chart"),
    ("menu.year", "Change year filter"),
    ("menu.years", "List years"),
    ("menu.history", "Past draws"),
    ("menu.theme", "Toggle theme"),
    ("menu.lang", "Change language"),
    ("menu.speech", "Toggle voice read-back"),
    ("menu.reload", "Reload history"),
    ("menu.quit", "Quit"),
    ("prompt.choice", "Choice"),
    ("prompt.year", "Year (YYYY or all)"),
    ("prompt.lang", "Language code"),
    ("msg.unknown_command", "Unknown command."),
    ("msg.invalid_year", "Invalid year filter."),
    ("msg.bye", "Good luck!"),
];

const KO: &[(&str, &str)] = &[
    ("app.title", "로또 6/45 번호 생성기"),
    ("generate.title", "행운의 번호"),
    ("speech.intro", "행운의 번호는"),
    ("stats.title", "당첨 번호 빈도"),
    ("stats.draws", "회차"),
    ("stats.all_years", "전체 연도"),
    ("stats.empty", "당첨 기록이 없습니다."),
    ("history.title", "지난 당첨 번호"),
    ("years.title", "조회 가능한 연도"),
    ("table.number", "번호"),
    ("table.count", "횟수"),
    ("table.color", "색상"),
    ("table.draw", "회차"),
    ("table.date", "날짜"),
    ("table.numbers", "번호"),
    ("table.bonus", "보너스"),
    ("load.summary", "당첨 기록 불러오기 완료"),
    ("load.records", "읽은 줄"),
    ("load.kept", "유효한 회차"),
    ("load.errors", "건너뛴 줄"),
    ("theme.current", "테마"),
    ("lang.current", "언어"),
    ("lang.available", "지원 언어"),
    ("lang.unsupported", "지원하지 않는 언어입니다. 대체 언어"),
    ("speech.on", "음성 안내 켜짐"),
    ("speech.off", "음성 안내 꺼짐"),
    ("speech.unavailable", "음성 엔진을 찾을 수 없습니다"),
    ("menu.title", "대화형 모드"),
    ("menu.generate", "번호 생성"),
    ("menu.stats", "빈도 차트"),
    ("menu.year", "연도 필터 변경"),
    ("menu.years", "연도 목록"),
    ("menu.history", "지난 당첨 번호"),
    ("menu.theme", "테마 전환"),
    ("menu.lang", "언어 변경"),
    ("menu.speech", "음성 안내 전환"),
    ("menu.reload", "기록 다시 불러오기"),
    ("menu.quit", "종료"),
    ("prompt.choice", "선택"),
    ("prompt.year", "연도 (YYYY 또는 all)"),
    ("prompt.lang", "언어 코드"),
    ("msg.unknown_command", "알 수 없는 명령입니다."),
    ("msg.invalid_year", "잘못된 연도 필터입니다."),
    ("msg.bye", "행운을 빕니다!"),
];

const JA: &[(&str, &str)] = &[
    ("app.title", "ロト6/45 番号ジェネレーター"),
    ("generate.title", "あなたのラッキーナンバー"),
    ("speech.intro", "ラッキーナンバーは"),
    ("stats.title", "当選番号の出現頻度"),
    ("stats.draws", "回"),
    ("stats.all_years", "全期間"),
    ("stats.empty", "当選履歴がありません。"),
    ("history.title", "過去の当選番号"),
    ("years.title", "選択できる年"),
    ("table.number", "番号"),
    ("table.count", "回数"),
    ("table.color", "色"),
    ("table.draw", "回"),
    ("table.date", "日付"),
    ("table.numbers", "番号"),
    ("table.bonus", "ボーナス"),
    ("load.summary", "履歴を読み込みました"),
    ("load.records", "読み込んだ行"),
    ("load.kept", "有効な回"),
    ("load.errors", "スキップした行"),
    ("theme.current", "テーマ"),
    ("lang.current", "言語"),
    ("lang.available", "対応言語"),
    ("lang.unsupported", "未対応の言語です。代わりに"),
    ("speech.on", "音声読み上げ オン"),
    ("speech.off", "音声読み上げ オフ"),
    ("speech.unavailable", "音声エンジンが見つかりません"),
    ("menu.title", "対話モード"),
    ("menu.generate", "番号を生成"),
    ("menu.stats", "頻度グラフ"),
    ("menu.year", "年フィルターを変更"),
    ("menu.years", "年の一覧"),
    ("menu.history", "過去の当選番号"),
    ("menu.theme", "テーマ切り替え"),
    ("menu.lang", "言語を変更"),
    ("menu.speech", "音声読み上げ切り替え"),
    ("menu.reload", "履歴を再読み込み"),
    ("menu.quit", "終了"),
    ("prompt.choice", "選択"),
    ("prompt.year", "年 (YYYY または all)"),
    ("prompt.lang", "言語コード"),
    ("msg.unknown_command", "不明なコマンドです。"),
    ("msg.invalid_year", "年フィルターが不正です。"),
    ("msg.bye", "幸運を祈ります!"),
];
