const LABEL_CHARS: usize = 10;

/// Display label for an address: its first ten characters.
pub fn short_label(id: &str) -> &str {
    match id.char_indices().nth(LABEL_CHARS) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

pub fn explorer_link(template: &str, address: &str) -> String {
    template.replace("{address}", address)
}

/// Prints a threshold the way selector syntax expects: integral values without a fraction.
pub fn format_threshold(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_label_truncates_long_ids() {
        assert_eq!(short_label("0xabcdef0123456789"), "0xabcdef01");
        assert_eq!(short_label("short"), "short");
        assert_eq!(short_label("0123456789"), "0123456789");
    }

    #[test]
    fn explorer_link_substitutes_address() {
        assert_eq!(
            explorer_link(crate::config::DEFAULT_EXPLORER_URL, "0xab"),
            "https://blockscout.com/xdai/mainnet/address/0xab/transactions"
        );
    }

    #[test]
    fn thresholds_print_without_trailing_fraction() {
        assert_eq!(format_threshold(2.0), "2");
        assert_eq!(format_threshold(0.0), "0");
        assert_eq!(format_threshold(2.5), "2.5");
        assert_eq!(format_threshold(1e20), "100000000000000000000");
    }
}
