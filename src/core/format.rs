/// Formats an integer with `,` thousands separators (`12345` -> `12,345`).
#[must_use]
pub fn format_grouped_thousands(value: u64) -> String {
    let digits = value.to_string();
    let lead = digits.len() % 3;
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (index + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
