/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG`; defaults to `info`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

/// Format a number with Indian digit grouping (12,34,567.89), at most two
/// decimals. Used when printing volume and turnover figures.
pub fn format_indian(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }

    let rounded = format!("{:.2}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let grouped = if int_part.len() <= 3 {
        int_part.to_string()
    } else {
        let (head, last3) = int_part.split_at(int_part.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (h, pair) = rest.split_at(rest.len() - 2);
            groups.push(pair);
            rest = h;
        }
        if !rest.is_empty() {
            groups.push(rest);
        }
        groups.reverse();
        format!("{},{}", groups.join(","), last3)
    };

    let sign = if value < 0.0 && rounded.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };

    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}
