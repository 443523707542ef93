//! Currency formatting and amount-in-words.
//!
//! All conversions go through integer satang (hundredths) so that the
//! printed digits and the printed words always agree.

use crate::model::Locale;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Magnitude in satang. Saturates at `u64::MAX` satang, far beyond any
/// amount an `f64` still carries to the satang.
fn to_satang(value: f64) -> u64 {
    (value.abs() * 100.0).round() as u64
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `1234567.891` → `"1,234,567.89"`.
pub fn format_amount(value: f64) -> String {
    let satang = to_satang(value);
    let sign = if value < 0.0 && satang > 0 { "-" } else { "" };
    format!("{sign}{}.{:02}", group_thousands(satang / 100), satang % 100)
}

/// Quantities print without trailing zeros: `2`, `1.5`, `-0.25`.
pub fn format_quantity(value: f64) -> String {
    let rounded = round2(value);
    let sign = if rounded < 0.0 { "-" } else { "" };
    if rounded.fract() == 0.0 {
        format!("{sign}{}", group_thousands(rounded.abs() as u64))
    } else {
        let s = format!("{:.2}", rounded.abs());
        let s = s.trim_end_matches('0');
        let (int, frac) = s.split_once('.').unwrap_or((s, ""));
        let int = int.parse::<u64>().map(group_thousands).unwrap_or_default();
        format!("{sign}{int}.{frac}")
    }
}

pub fn amount_in_words(amount: f64, locale: Locale) -> String {
    match locale {
        Locale::Thai => thai_baht_text(amount),
        Locale::English => english_baht_text(amount),
    }
}

const THAI_DIGITS: [&str; 10] = [
    "ศูนย์", "หนึ่ง", "สอง", "สาม", "สี่", "ห้า", "หก", "เจ็ด", "แปด", "เก้า",
];
const THAI_PLACES: [&str; 6] = ["", "สิบ", "ร้อย", "พัน", "หมื่น", "แสน"];

/// One group below a million. `has_higher` is set when a million group
/// precedes it, which turns a trailing one into "เอ็ด".
fn thai_group(n: u64, has_higher: bool) -> String {
    let mut out = String::new();
    for pos in (0..6).rev() {
        let d = (n / 10u64.pow(pos as u32) % 10) as usize;
        if d == 0 {
            continue;
        }
        match (pos, d) {
            (1, 1) => out.push_str("สิบ"),
            (1, 2) => out.push_str("ยี่สิบ"),
            (0, 1) if has_higher || n >= 10 => out.push_str("เอ็ด"),
            _ => {
                out.push_str(THAI_DIGITS[d]);
                out.push_str(THAI_PLACES[pos]);
            }
        }
    }
    out
}

fn thai_number(n: u64) -> String {
    if n == 0 {
        return THAI_DIGITS[0].to_string();
    }
    let millions = n / 1_000_000;
    let rest = n % 1_000_000;
    let mut out = String::new();
    if millions > 0 {
        out.push_str(&thai_number(millions));
        out.push_str("ล้าน");
    }
    if rest > 0 {
        out.push_str(&thai_group(rest, millions > 0));
    }
    out
}

fn thai_baht_text(amount: f64) -> String {
    let satang_total = to_satang(amount);
    let (baht, satang) = (satang_total / 100, satang_total % 100);
    let mut out = String::new();
    if amount < 0.0 && satang_total > 0 {
        out.push_str("ลบ");
    }
    if baht > 0 || satang == 0 {
        out.push_str(&thai_number(baht));
        out.push_str("บาท");
    }
    if satang == 0 {
        out.push_str("ถ้วน");
    } else {
        out.push_str(&thai_number(satang));
        out.push_str("สตางค์");
    }
    out
}

const ONES: [&str; 20] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten",
    "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen",
    "Nineteen",
];
const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];
// Seven groups cover every u64.
const SCALES: [&str; 7] = [
    "",
    "Thousand",
    "Million",
    "Billion",
    "Trillion",
    "Quadrillion",
    "Quintillion",
];

fn english_below_thousand(n: u64, words: &mut Vec<String>) {
    let hundreds = n / 100;
    let rest = n % 100;
    if hundreds > 0 {
        words.push(format!("{} Hundred", ONES[hundreds as usize]));
    }
    match rest {
        0 => {}
        1..=19 => words.push(ONES[rest as usize].to_string()),
        _ => {
            let (t, o) = ((rest / 10) as usize, (rest % 10) as usize);
            if o == 0 {
                words.push(TENS[t].to_string());
            } else {
                words.push(format!("{}-{}", TENS[t], ONES[o]));
            }
        }
    }
}

fn english_number(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }
    let mut groups = Vec::new();
    let mut rest = n;
    while rest > 0 {
        groups.push(rest % 1000);
        rest /= 1000;
    }
    let mut words = Vec::new();
    for (scale, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            continue;
        }
        english_below_thousand(group, &mut words);
        if let Some(name) = SCALES.get(scale).filter(|s| !s.is_empty()) {
            words.push(name.to_string());
        }
    }
    words.join(" ")
}

fn english_baht_text(amount: f64) -> String {
    let satang_total = to_satang(amount);
    let (baht, satang) = (satang_total / 100, satang_total % 100);
    let sign = if amount < 0.0 && satang_total > 0 {
        "Minus "
    } else {
        ""
    };
    if satang == 0 {
        format!("{sign}{} Baht Only", english_number(baht))
    } else if baht == 0 {
        format!("{sign}{} Satang", english_number(satang))
    } else {
        format!(
            "{sign}{} Baht and {} Satang",
            english_number(baht),
            english_number(satang)
        )
    }
}
