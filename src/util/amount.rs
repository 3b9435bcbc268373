/// Formats `raw` base units as a decimal amount with two fractional digits,
/// rounding half up. `format_amount(1_235_000, 6) == "1.24"`
pub fn format_amount(raw: u128, decimals: u32) -> String {
    let hundredths = if decimals <= 2 {
        raw.saturating_mul(10u128.pow(2 - decimals))
    } else {
        match 10u128.checked_pow(decimals - 2) {
            Some(divisor) => {
                let rem = raw % divisor;
                raw / divisor + u128::from(rem >= divisor - rem)
            }
            None => 0,
        }
    };

    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}
