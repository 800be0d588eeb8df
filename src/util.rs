/// `100 * keys_pressed / (keys_pressed + mistakes)`, rounded to two places.
///
/// Every accepted key counts toward `keys_pressed`, wrong ones included, and a wrong
/// key is counted again in `mistakes`. Nothing pressed yet reads as a perfect score.
pub fn accuracy_percent(keys_pressed: u32, mistakes: u32) -> f64 {
    let total = u64::from(keys_pressed) + u64::from(mistakes);
    match total {
        0 => 100.0,
        total => round_to_hundredths(keys_pressed as f64 / total as f64 * 100.0),
    }
}

pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `MM:SS`, both fields zero padded to two digits. Minutes grow past two digits if needed.
pub fn format_mm_ss(seconds: u32) -> String {
    let minutes = seconds / 60;
    let seconds = seconds % 60;

    format!("{:02}:{:02}", minutes, seconds)
}
