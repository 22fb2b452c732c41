/// Formats a phone as `(11) 98765-4321`. Values with more than 11 digits are left as typed.
pub fn format_phone(value: &str) -> String {
    let v: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    match v.len() {
        0..=2 => v,
        3..=7 => format!("({}) {}", &v[..2], &v[2..]),
        8..=11 => format!("({}) {}-{}", &v[..2], &v[2..7], &v[7..]),
        _ => value.to_string(),
    }
}

/// Formats a CPF as `123.456.789-09`, ignoring digits past the eleventh.
pub fn format_cpf(value: &str) -> String {
    let v: String = value
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(11)
        .collect();
    match v.len() {
        0..=3 => v,
        4..=6 => format!("{}.{}", &v[..3], &v[3..]),
        7..=9 => format!("{}.{}.{}", &v[..3], &v[3..6], &v[6..]),
        _ => format!("{}.{}.{}-{}", &v[..3], &v[3..6], &v[6..9], &v[9..]),
    }
}
