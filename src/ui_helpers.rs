use eframe::egui::{self, Color32, RichText, Ui};

use crate::models::{Genre, Movie};

pub const ACCENT: Color32 = Color32::from_rgb(250, 204, 21);
pub const BACKGROUND: Color32 = Color32::from_rgb(20, 20, 20);
pub const BRAND: Color32 = Color32::from_rgb(229, 9, 20);

/// Runtime badge text, e.g. 117 -> "1h 57m".
pub fn format_runtime(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Up to the first three genre names joined for the hero strip.
pub fn genre_line(genres: &[Genre]) -> String {
    genres
        .iter()
        .take(3)
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(" • ")
}

/// Year badge text with the reference fallback for undated entries.
pub fn year_badge(movie: &Movie) -> String {
    movie.year().unwrap_or("2024").to_string()
}

pub fn render_loading_spinner(ui: &mut Ui, text: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.4);
        ui.spinner();
        ui.add_space(12.0);
        ui.label(
            RichText::new(text)
                .color(Color32::GRAY)
                .small()
                .strong(),
        );
    });
}

/// Outlined badge in the hero metadata strip.
pub fn render_badge(ui: &mut Ui, text: &str, color: Color32) {
    let frame = egui::Frame::none()
        .stroke(egui::Stroke::new(1.0, color))
        .rounding(3.0)
        .inner_margin(egui::Margin::symmetric(6.0, 2.0));
    frame.show(ui, |ui| {
        ui.label(RichText::new(text).color(color).small());
    });
}

/// Truncate overview text so long synopses don't blow up the hero layout.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_formats_hours_and_minutes() {
        assert_eq!(format_runtime(117), "1h 57m");
        assert_eq!(format_runtime(45), "0h 45m");
        assert_eq!(format_runtime(120), "2h 0m");
    }

    #[test]
    fn genre_line_truncates_to_three() {
        let genres: Vec<Genre> = ["Action", "Drama", "Crime", "Thriller"]
            .iter()
            .enumerate()
            .map(|(i, n)| Genre {
                id: i as u64,
                name: n.to_string(),
            })
            .collect();
        assert_eq!(genre_line(&genres), "Action • Drama • Crime");
        assert_eq!(genre_line(&[]), "");
    }

    #[test]
    fn year_badge_falls_back_when_undated() {
        let dated = Movie {
            release_date: Some("1999-03-31".to_string()),
            ..Default::default()
        };
        assert_eq!(year_badge(&dated), "1999");
        assert_eq!(year_badge(&Movie::default()), "2024");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_text("short", 10), "short");
        let long = "a".repeat(20);
        let cut = truncate_text(&long, 10);
        assert!(cut.ends_with("..."));
        assert!(cut.chars().count() <= 10);
    }
}
