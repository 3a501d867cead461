//! Light/dark palettes with an optional high-contrast variant.

use eframe::egui::{self, Color32};
use shared::domain::{Preferences, Theme};

const BLUE_500: Color32 = Color32::from_rgb(59, 130, 246);
const BLUE_600: Color32 = Color32::from_rgb(37, 99, 235);
const GRAY_50: Color32 = Color32::from_rgb(249, 250, 251);
const GRAY_100: Color32 = Color32::from_rgb(243, 244, 246);
const GRAY_200: Color32 = Color32::from_rgb(229, 231, 235);
const GRAY_400: Color32 = Color32::from_rgb(156, 163, 175);
const GRAY_700: Color32 = Color32::from_rgb(55, 65, 81);
const GRAY_800: Color32 = Color32::from_rgb(31, 41, 55);
const GRAY_900: Color32 = Color32::from_rgb(17, 24, 39);
const YELLOW_400: Color32 = Color32::from_rgb(250, 204, 21);
const YELLOW_500: Color32 = Color32::from_rgb(234, 179, 8);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatPalette {
    pub app_background: Color32,
    pub header_background: Color32,
    pub header_text: Color32,
    pub muted_text: Color32,
    pub user_bubble: Color32,
    pub user_text: Color32,
    pub bot_bubble: Color32,
    pub bot_text: Color32,
    pub bubble_shadow: bool,
    pub input_background: Color32,
    pub input_text: Color32,
    pub divider: Color32,
    pub send_fill: Color32,
    pub send_text: Color32,
    pub contrast_toggle_stroke: Color32,
}

impl ChatPalette {
    pub fn for_preferences(prefs: Preferences) -> Self {
        let dark = prefs.theme == Theme::Dark;
        let hc = prefs.high_contrast;

        let (bot_bubble, bot_text) = match (dark, hc) {
            (true, true) => (GRAY_700, Color32::WHITE),
            (true, false) => (GRAY_800, GRAY_100),
            (false, true) => (GRAY_100, GRAY_900),
            (false, false) => (GRAY_200, GRAY_900),
        };

        Self {
            app_background: if dark { GRAY_900 } else { GRAY_50 },
            header_background: if dark { GRAY_800 } else { Color32::WHITE },
            header_text: if dark { GRAY_100 } else { GRAY_700 },
            muted_text: GRAY_400,
            user_bubble: if dark && hc { BLUE_500 } else { BLUE_600 },
            user_text: Color32::WHITE,
            bot_bubble,
            bot_text,
            bubble_shadow: hc,
            input_background: if dark { GRAY_800 } else { Color32::WHITE },
            input_text: if dark { Color32::WHITE } else { GRAY_900 },
            divider: if dark { GRAY_700 } else { GRAY_200 },
            send_fill: if hc { YELLOW_500 } else { BLUE_600 },
            send_text: if hc { Color32::BLACK } else { Color32::WHITE },
            contrast_toggle_stroke: if hc {
                YELLOW_400
            } else {
                Color32::TRANSPARENT
            },
        }
    }
}

pub fn visuals_for_preferences(prefs: Preferences) -> egui::Visuals {
    let palette = ChatPalette::for_preferences(prefs);
    let mut visuals = match prefs.theme {
        Theme::Dark => egui::Visuals::dark(),
        Theme::Light => egui::Visuals::light(),
    };
    visuals.panel_fill = palette.app_background;
    visuals.window_fill = palette.app_background;
    visuals.extreme_bg_color = palette.input_background;
    visuals.selection.bg_fill = BLUE_500;
    visuals.hyperlink_color = if prefs.theme == Theme::Dark {
        BLUE_500
    } else {
        BLUE_600
    };
    if prefs.high_contrast {
        visuals.override_text_color = Some(if prefs.theme == Theme::Dark {
            Color32::WHITE
        } else {
            Color32::BLACK
        });
        visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.5, palette.header_text);
    }
    visuals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_contrast_switches_send_button_to_yellow() {
        let normal = ChatPalette::for_preferences(Preferences::default());
        let contrast = ChatPalette::for_preferences(Preferences {
            theme: Theme::Light,
            high_contrast: true,
        });
        assert_eq!(normal.send_fill, BLUE_600);
        assert_eq!(contrast.send_fill, YELLOW_500);
        assert_eq!(contrast.send_text, Color32::BLACK);
        assert!(contrast.bubble_shadow);
    }

    #[test]
    fn dark_theme_uses_dark_visuals() {
        let visuals = visuals_for_preferences(Preferences {
            theme: Theme::Dark,
            high_contrast: false,
        });
        assert!(visuals.dark_mode);
        assert_eq!(visuals.panel_fill, GRAY_900);
        assert!(!visuals_for_preferences(Preferences::default()).dark_mode);
    }
}
