//! Member avatar defaults (letter badge and color)

/// Palette used when a member has no explicit color
pub const PALETTE: [&str; 10] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#14B8A6", "#F97316",
    "#6366F1", "#06B6D4",
];

/// Up to two upper-case letters for a name.
///
/// Two or more words: first letter of the first and of the last word.
/// One word: its first two characters. Empty: `?`.
pub fn letter_for(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let raw: String = match words.as_slice() {
        [] => return "?".to_string(),
        [single] => single.chars().take(2).collect(),
        [first, .., last] => first.chars().take(1).chain(last.chars().take(1)).collect(),
    };
    raw.to_uppercase().chars().take(2).collect()
}

/// Deterministic palette pick from the name's UTF-16 code units
pub fn color_for(name: &str) -> &'static str {
    let hash = name.encode_utf16().fold(0i32, |hash, unit| {
        i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    });
    PALETTE[(hash.unsigned_abs() % PALETTE.len() as u32) as usize]
}

/// Fill in missing letter/color from the name
pub fn resolve(name: &str, color: Option<String>, letter: Option<String>) -> (String, String) {
    let color = color
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| color_for(name).to_string());
    let letter = letter
        .map(|l| l.trim().to_uppercase().chars().take(2).collect::<String>())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| letter_for(name));
    (color, letter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_for() {
        assert_eq!(letter_for("Nguyen Van An"), "NA");
        assert_eq!(letter_for("binh"), "BI");
        assert_eq!(letter_for("  tu  "), "TU");
        assert_eq!(letter_for("Q"), "Q");
        assert_eq!(letter_for("   "), "?");
        assert_eq!(letter_for("đức anh"), "ĐA");
    }

    #[test]
    fn test_color_is_deterministic_and_in_palette() {
        let a = color_for("Lan");
        assert_eq!(a, color_for("Lan"));
        assert!(PALETTE.contains(&a));
        assert!(PALETTE.contains(&color_for("")));
    }

    #[test]
    fn test_color_known_value() {
        // "A" = 65 -> 65 % 10 = 5
        assert_eq!(color_for("A"), PALETTE[5]);
        // "AB": 65*31 + 66 = 2081 -> 1
        assert_eq!(color_for("AB"), PALETTE[1]);
    }

    #[test]
    fn test_resolve_prefers_explicit_values() {
        let (color, letter) = resolve("Minh Chau", Some("#000000".into()), Some("mc".into()));
        assert_eq!(color, "#000000");
        assert_eq!(letter, "MC");

        let (color, letter) = resolve("Minh Chau", Some(" ".into()), None);
        assert_eq!(color, color_for("Minh Chau"));
        assert_eq!(letter, "MC");
    }
}
