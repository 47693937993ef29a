//! User-facing strings for the supported locales.

use serde::{Deserialize, Serialize};

use crate::options::RestorationOption;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Locale {
    #[default]
    #[serde(alias = "lt")]
    Lithuanian,
    #[serde(alias = "en")]
    English,
}

/// Fixed table of UI copy for one locale.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    pub app_title: &'static str,
    pub app_subtitle: &'static str,
    pub start_over: &'static str,
    pub dropzone_title: &'static str,
    pub dropzone_hint: &'static str,
    pub settings_heading: &'static str,
    pub fix_damage: &'static str,
    pub enhance_details: &'static str,
    pub colorize: &'static str,
    pub restore_button: &'static str,
    pub restoring: &'static str,
    pub restoring_hint: &'static str,
    pub restored: &'static str,
    pub original_label: &'static str,
    pub restored_label: &'static str,
    pub download: &'static str,
    pub change_settings: &'static str,
    pub restore_failed: &'static str,
    pub download_failed: &'static str,
    pub share_title: &'static str,
}

const LITHUANIAN: Messages = Messages {
    app_title: "RetroAtgaiva",
    app_subtitle: "Nuotraukų Restauravimas",
    start_over: "← Pradėti iš naujo",
    dropzone_title: "Įkelkite seną nuotrauką",
    dropzone_hint: "Vilkite failą čia arba spustelėkite (JPEG, PNG, WebP)",
    settings_heading: "Restauravimo Nustatymai",
    fix_damage: "Taisyti pažeidimus",
    enhance_details: "Paryškinti detales",
    colorize: "Nuspalvinti",
    restore_button: "Restauruoti Nuotrauką",
    restoring: "Restauruojama...",
    restoring_hint: "Tai gali užtrukti kelias sekundes",
    restored: "✓ Restauruota Sėkmingai",
    original_label: "Originalas",
    restored_label: "Atkurta",
    download: "Atsisiųsti Rezultatą",
    change_settings: "Keisti Nustatymus",
    restore_failed: "Nepavyko atkurti nuotraukos. Bandykite dar kartą.",
    download_failed: "Nepavyko atsisiųsti nuotraukos. Bandykite dar kartą.",
    share_title: "Restauruota nuotrauka",
};

const ENGLISH: Messages = Messages {
    app_title: "RetroAtgaiva",
    app_subtitle: "Photo Restoration",
    start_over: "← Start over",
    dropzone_title: "Upload an old photo",
    dropzone_hint: "Drop a file here or click to browse (JPEG, PNG, WebP)",
    settings_heading: "Restoration Settings",
    fix_damage: "Repair damage",
    enhance_details: "Enhance details",
    colorize: "Colorize",
    restore_button: "Restore Photo",
    restoring: "Restoring...",
    restoring_hint: "This can take a few seconds",
    restored: "✓ Restored Successfully",
    original_label: "Original",
    restored_label: "Restored",
    download: "Download Result",
    change_settings: "Change Settings",
    restore_failed: "Could not restore the photo. Please try again.",
    download_failed: "Could not download the photo. Please try again.",
    share_title: "Restored photo",
};

impl Locale {
    pub fn messages(self) -> &'static Messages {
        match self {
            Locale::Lithuanian => &LITHUANIAN,
            Locale::English => &ENGLISH,
        }
    }
}

impl Messages {
    pub fn option_label(&self, option: RestorationOption) -> &'static str {
        match option {
            RestorationOption::FixDamage => self.fix_damage,
            RestorationOption::EnhanceDetails => self.enhance_details,
            RestorationOption::Colorize => self.colorize,
        }
    }
}
