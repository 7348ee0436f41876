pub fn clamp_name(value: &str, width: usize) -> String {
    let value_len = value.chars().count();
    if value_len <= width {
        return format!("{value:<width$}", width = width);
    }
    let trimmed = value
        .chars()
        .take(width.saturating_sub(2))
        .collect::<String>();
    format!("{trimmed}..")
}

/// First index of a scrolled window of `height` entries that keeps `cursor`
/// visible.
pub fn window_start(cursor: usize, len: usize, height: usize) -> usize {
    let height = height.max(1);
    if len <= height || cursor < height / 2 {
        return 0;
    }
    (cursor - height / 2).min(len - height)
}
