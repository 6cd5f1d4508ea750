pub fn format_number(num: i64) -> String {
    let grouped = group_digits(num.unsigned_abs());
    if num < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn format_count(num: u64) -> String {
    group_digits(num)
}

fn group_digits(num: u64) -> String {
    let num_str = num.to_string();
    let chars: Vec<char> = num_str.chars().collect();
    let mut result = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(*c);
    }

    result
}
