//! Text measurement and truncation for legend labels and axis gutters.

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Truncate to fit `max_px` and add a single ellipsis if needed.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        let candidate = format!("{out}{ch}…");
        if estimate_text_width_px(&candidate, font_px) > max_px {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_labels_are_untouched() {
        assert_eq!(truncate_to_width("Projected Vaccinations", 14, 400), "Projected Vaccinations");
    }

    #[test]
    fn long_labels_end_in_ellipsis_and_fit() {
        let s = truncate_to_width("Total US Population (330 million)", 14, 120);
        assert!(s.ends_with('…'));
        assert!(estimate_text_width_px(&s, 14) <= 120);
    }
}
