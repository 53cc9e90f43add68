//! Heuristic scoring utilities: password strength and suspicious-text
//! scanning. Pure functions; the HTTP handlers are thin wrappers.

use serde::{Deserialize, Serialize};

/// Password strength report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordReport {
    /// 0 for an empty password, otherwise 1..=10
    pub score: u32,
    pub suggestions: Vec<String>,
}

/// Score a password by character-class coverage and length.
pub fn password_strength(password: &str) -> PasswordReport {
    if password.is_empty() {
        return PasswordReport {
            score: 0,
            suggestions: vec!["Empty password".to_string()],
        };
    }

    let long_enough = password.chars().count() >= 12;
    let has_upper = password.chars().any(char::is_uppercase);
    let has_lower = password.chars().any(char::is_lowercase);
    let has_digit = password.chars().any(char::is_numeric);
    let has_symbol = password.chars().any(|c| !c.is_alphanumeric());

    let mut score = 0u32;
    if long_enough {
        score += 4;
    }
    if has_upper {
        score += 2;
    }
    if has_lower {
        score += 1;
    }
    if has_digit {
        score += 2;
    }
    if has_symbol {
        score += 1;
    }

    let mut suggestions = Vec::new();
    if !long_enough {
        suggestions.push("Use at least 12 characters.".to_string());
    }
    if !has_digit {
        suggestions.push("Add digits.".to_string());
    }
    if !has_upper {
        suggestions.push("Add uppercase letters.".to_string());
    }
    if !has_symbol {
        suggestions.push("Add symbols.".to_string());
    }

    PasswordReport {
        score: score.clamp(1, 10),
        suggestions,
    }
}

/// Suspicious-text scan report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// 0..=100
    pub score: u32,
    pub issues: Vec<String>,
}

/// Scan text for phishing-style markers.
pub fn scan_text(text: &str) -> ScanReport {
    let mut score = 0u32;
    let mut issues = Vec::new();

    if text.contains("http://") || text.contains("https://") {
        issues.push("URL(s) detected".to_string());
        score += 30;
    }

    let lowered = text.to_lowercase();
    if lowered.contains("urgent") || lowered.contains("immediately") {
        issues.push("Urgent language".to_string());
        score += 20;
    }

    ScanReport {
        score: score.min(100),
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_password() {
        let report = password_strength("");
        assert_eq!(report.score, 0);
        assert_eq!(report.suggestions, vec!["Empty password".to_string()]);
    }

    #[test]
    fn test_strong_password_scores_max() {
        let report = password_strength("Str0ng!Password#");
        assert_eq!(report.score, 10);
        assert!(report.suggestions.is_empty());
    }

    #[test]
    fn test_weak_password_floors_at_one() {
        let report = password_strength("aaa");
        assert_eq!(report.score, 1);
        assert!(report
            .suggestions
            .contains(&"Use at least 12 characters.".to_string()));
        assert!(report.suggestions.contains(&"Add digits.".to_string()));
        assert!(report
            .suggestions
            .contains(&"Add uppercase letters.".to_string()));
        assert!(report.suggestions.contains(&"Add symbols.".to_string()));
    }

    #[test]
    fn test_digit_only_password() {
        let report = password_strength("123456");
        assert_eq!(report.score, 2);
        assert!(!report.suggestions.contains(&"Add digits.".to_string()));
    }

    #[test]
    fn test_scan_clean_text() {
        let report = scan_text("hello, see you tomorrow");
        assert_eq!(report.score, 0);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_scan_url() {
        let report = scan_text("click https://example.com now");
        assert_eq!(report.score, 30);
        assert_eq!(report.issues, vec!["URL(s) detected".to_string()]);
    }

    #[test]
    fn test_scan_urgent_language_case_insensitive() {
        let report = scan_text("Respond IMMEDIATELY please");
        assert_eq!(report.score, 20);
        assert_eq!(report.issues, vec!["Urgent language".to_string()]);
    }

    #[test]
    fn test_scan_combined_markers() {
        let report = scan_text("URGENT: verify at http://phish.example");
        assert_eq!(report.score, 50);
        assert_eq!(report.issues.len(), 2);
    }
}
