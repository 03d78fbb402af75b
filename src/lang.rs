//! Menu label tables.
//!
//! The tray menu is relabeled in place from these strings whenever the
//! language changes; the authoritative language value lives in the config
//! and the menu is only a derived view of it.

use hushkey_core::Language;

/// Menu labels for one language.
pub struct Labels {
    pub mode_mute: &'static str,
    pub mode_unmute: &'static str,
    pub language_menu: &'static str,
    pub english: &'static str,
    pub korean: &'static str,
    pub copy_config: &'static str,
    pub reload_config: &'static str,
    pub quit: &'static str,
    pub no_device: &'static str,
}

pub fn labels(language: Language) -> &'static Labels {
    match language {
        Language::English => &ENGLISH,
        Language::Korean => &KOREAN,
    }
}

static ENGLISH: Labels = Labels {
    mode_mute: "Mute while pressed",
    mode_unmute: "Unmute while pressed",
    language_menu: "Language",
    english: "English",
    korean: "Korean",
    copy_config: "Copy config path",
    reload_config: "Reload config",
    quit: "Quit",
    no_device: "No microphone",
};

static KOREAN: Labels = Labels {
    mode_mute: "눌렀을때 음소거",
    mode_unmute: "눌렀을때 음소거 해제",
    language_menu: "언어설정",
    english: "English",
    korean: "한국어",
    copy_config: "설정 파일 경로 복사",
    reload_config: "설정 다시 불러오기",
    quit: "종료",
    no_device: "마이크 없음",
};
