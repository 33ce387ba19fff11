/// Groups digits by thousands the way the ko-KR locale does: `1234567` becomes `1,234,567`.
pub fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

pub fn format_gold(amount: u64) -> String {
    format!("{}G", group_thousands(amount))
}
