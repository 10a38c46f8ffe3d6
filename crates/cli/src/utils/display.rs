//! Display utilities for the aidscan CLI

use std::fmt::Display;

use aidscan_apdu_core::{CardInfo, CategoryScan, ScanReport, SelectResult, spaced_hex};
use aidscan_transport_pcsc::PcscReader;
use colored::Colorize;

const RULE_WIDTH: usize = 50;

/// A formatted section title
pub struct SectionTitle(pub &'static str);

impl Display for SectionTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\n{}", self.0.bold().underline())
    }
}

/// Format a section header
pub const fn section_title(title: &'static str) -> SectionTitle {
    SectionTitle(title)
}

/// Format a success message
pub fn success(message: &str) -> String {
    format!("✅ {}", message.green().bold())
}

/// Format a warning message
pub fn warning(message: &str) -> String {
    format!("⚠️  {}", message.yellow().bold())
}

/// Format an error message
pub fn error(message: &str) -> String {
    format!("❌ {}", message.red().bold())
}

/// Format an info message
pub fn info(message: &str) -> String {
    format!("ℹ️  {}", message.blue())
}

/// A title between two horizontal rules
pub fn banner(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{rule}\n {}\n{rule}", title.bold())
}

/// Format a key-value section for important outputs
pub fn key_value_box(title: &str, items: Vec<(&str, String)>) -> String {
    let mut result = format!("{}", title.bold().underline());

    for (key, value) in items {
        result.push_str(&format!("\n  {}: {}", key.bold(), value));
    }

    result
}

/// UID, ATR, ATS and the phone guess
pub fn card_info(info: &CardInfo) -> String {
    let mut items = vec![("UID", info.uid_hex()), ("ATR", info.atr_hex())];
    if let Some(ats) = info.ats_hex() {
        items.push(("ATS", ats));
    }
    let kind = if info.is_phone {
        "PHONE (HCE detected)".green().to_string()
    } else {
        "CARD or UNKNOWN".to_string()
    };
    items.push(("Type", kind));

    key_value_box("Device", items)
}

/// Hits and unexpected misses of one category
pub fn category_scan(scan: &CategoryScan) -> String {
    let mut out = format!("\n  [{}]", scan.category.bold());

    for found in &scan.found {
        out.push_str(&format!("\n    {}  {}", "OK".green().bold(), found.name));
        out.push_str(&format!("\n         AID: {}", found.aid));
        if !found.data.is_empty() {
            out.push_str(&format!("\n         Data: {}", spaced_hex(&found.data)));
        }
    }
    for miss in &scan.misses {
        out.push_str(&format!("\n    {}  {} ({})", "--".yellow(), miss.name, miss.reason()));
    }
    if scan.interrupted {
        out.push_str(&format!("\n    {}", warning("Device left the field, category incomplete")));
    }

    out
}

/// Final result block: every hit, then the AID list for database entry
pub fn summary(report: &ScanReport) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let total = report.total_found();

    if total == 0 {
        return format!(
            "\n{rule}\n {}\n{rule}\n{}",
            "RESULT: No known AIDs found".yellow().bold(),
            troubleshooting_hints()
        );
    }

    let mut out = format!(
        "\n{rule}\n {}\n{rule}",
        format!("RESULT: {total} AID(s) found!").green().bold()
    );
    for found in report.found() {
        out.push_str(&format!("\n  Name: {}", found.name));
        out.push_str(&format!("\n  AID:  {}", found.aid));
        if !found.data.is_empty() {
            out.push_str(&format!("\n  Data: {}", spaced_hex(&found.data)));
        }
        out.push('\n');
    }

    out.push_str(&format!("\n  {}", "--- AIDs for database entry (tag_aid) ---".bold()));
    for aid in report.unique_aids() {
        out.push_str(&format!("\n  '{aid}'"));
    }
    if report.interrupted() {
        out.push_str(&format!("\n\n{}", warning("Scan was cut short; tap again for a full scan")));
    }

    out
}

/// Why a phone may answer nothing, and what to try
pub fn troubleshooting_hints() -> String {
    [
        "",
        "  Possible reasons:",
        "  1. NFC app is not running on the phone",
        "  2. Phone screen is locked (HCE requires unlocked screen)",
        "  3. App uses a proprietary AID not in our database",
        "  4. Try --aid option with a specific AID to test",
        "",
        "  Tips:",
        "  - Android: Settings > Connected devices > NFC > enable",
        "  - Open the NFC app before tapping",
        "  - Keep the phone on the reader until scan completes",
    ]
    .join("\n")
}

/// What to check when no reader shows up
pub fn driver_checklist() -> String {
    [
        "Checklist:".bold().to_string(),
        "  1. Is the ACR122U connected via USB?".to_string(),
        "  2. macOS: brew install pcsc-lite".to_string(),
        "  3. Linux: sudo apt-get install pcscd pcsc-tools libpcsclite-dev".to_string(),
        "     and make sure the pcscd service is running".to_string(),
        "  4. Windows: Install ACR122U driver from ACS website".to_string(),
    ]
    .join("\n")
}

/// One numbered entry of the reader list, with the ATR when something is on it
pub fn reader_line(index: usize, reader: &PcscReader) -> String {
    let mut line = format!("{index}. {}", reader.name());
    match reader.atr() {
        Some(atr) if reader.has_card() => {
            line.push_str(&format!(" ({})\n   ATR: {}", "card present".green(), spaced_hex(atr)));
        }
        _ => line.push_str(" (no card)"),
    }
    line
}

/// One line for a single probed AID in card mode
pub fn select_line(name: &str, spaced_aid: &str, result: &SelectResult) -> String {
    if result.success {
        let mut line = success(&format!("{name} ({spaced_aid}): present"));
        if !result.response_data.is_empty() {
            line.push_str(&format!("\n     Response: {}", spaced_hex(&result.response_data)));
        }
        line
    } else {
        error(&format!("{name} ({spaced_aid}): absent ({})", result.status_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aidscan_apdu_core::{Aid, Bytes, Found, StatusWord};

    fn plain() {
        colored::control::set_override(false);
    }

    fn found(name: &str, aid: &str, data: &'static [u8]) -> Found {
        Found {
            name: name.to_string(),
            aid: aid.parse::<Aid>().unwrap(),
            data: Bytes::from_static(data),
        }
    }

    #[test]
    fn test_summary_lists_unique_aids() {
        plain();
        let report = ScanReport {
            categories: vec![CategoryScan {
                category: "Payment Apps",
                found: vec![
                    found("Visa Credit/Debit", "A0000000031010", &[0x6F, 0x00]),
                    found("Google Pay", "A0000000031010", &[]),
                ],
                misses: Vec::new(),
                probed: 14,
                interrupted: false,
            }],
        };

        let text = summary(&report);
        assert!(text.contains("RESULT: 2 AID(s) found!"));
        assert!(text.contains("Data: 6F 00"));
        assert_eq!(text.matches("'A0000000031010'").count(), 1);
    }

    #[test]
    fn test_empty_summary_has_hints() {
        plain();
        let text = summary(&ScanReport::default());
        assert!(text.contains("No known AIDs found"));
        assert!(text.contains("Phone screen is locked"));
    }

    #[test]
    fn test_select_line() {
        plain();
        let hit = SelectResult::selected(Bytes::from_static(&[0x01, 0x02]), StatusWord::new(0x90, 0x00));
        let line = select_line("NDEF", "D2 76 00 00 85 01 01", &hit);
        assert!(line.contains("NDEF (D2 76 00 00 85 01 01): present"));
        assert!(line.contains("Response: 01 02"));

        let miss = SelectResult::rejected(StatusWord::new(0x6A, 0x82));
        assert!(select_line("T-Money", "D4 10", &miss).contains("absent (6A82)"));
    }

    #[test]
    fn test_reader_line() {
        plain();
        let reader = PcscReader::new(
            "ACS ACR122U PICC Interface".to_string(),
            true,
            Some(vec![0x3B, 0x8A, 0x80, 0x01]),
        );
        assert_eq!(
            reader_line(1, &reader),
            "1. ACS ACR122U PICC Interface (card present)\n   ATR: 3B 8A 80 01"
        );

        let empty = PcscReader::new("ACS ACR122U".to_string(), false, None);
        assert_eq!(reader_line(2, &empty), "2. ACS ACR122U (no card)");
    }
}
