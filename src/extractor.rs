//! Pulls the mnemonic phrase out of the wallet tool's captured output.

/// Sentence fragment the wallet tool prints right before the mnemonic.
pub const DEFAULT_MNEMONIC_MARKER: &str = "The mnemonic to the new hotkey is: ";

/// Scans `output` line by line for `marker` and returns everything after it
/// on the first matching line. Trailing whitespace (including the CR of a
/// CRLF line ending) is stripped; the phrase itself is not validated.
pub fn extract_mnemonic<'a>(output: &'a str, marker: &str) -> Option<&'a str> {
    for line in output.lines() {
        if let Some(idx) = line.find(marker) {
            return Some(line[idx + marker.len()..].trim_end());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_text_after_marker() {
        let output = "Some banner\nThe mnemonic to the new hotkey is: alpha bravo charlie\nDone";
        assert_eq!(
            extract_mnemonic(output, DEFAULT_MNEMONIC_MARKER),
            Some("alpha bravo charlie")
        );
    }

    #[test]
    fn takes_only_the_rest_of_the_matching_line() {
        let output = "The mnemonic to the new hotkey is: one two three\nfour five six";
        assert_eq!(
            extract_mnemonic(output, DEFAULT_MNEMONIC_MARKER),
            Some("one two three")
        );
    }

    #[test]
    fn marker_can_sit_mid_line() {
        let output = "[info] The mnemonic to the new hotkey is: seed words here";
        assert_eq!(
            extract_mnemonic(output, DEFAULT_MNEMONIC_MARKER),
            Some("seed words here")
        );
    }

    #[test]
    fn strips_carriage_return_from_crlf_output() {
        let output = "The mnemonic to the new hotkey is: alpha bravo\r\n";
        assert_eq!(
            extract_mnemonic(output, DEFAULT_MNEMONIC_MARKER),
            Some("alpha bravo")
        );
    }

    #[test]
    fn missing_marker_yields_none() {
        let output = "Error: wallet not found\nnothing useful here";
        assert_eq!(extract_mnemonic(output, DEFAULT_MNEMONIC_MARKER), None);
    }

    #[test]
    fn first_matching_line_wins() {
        let output = "The mnemonic to the new hotkey is: first phrase\n\
                      The mnemonic to the new hotkey is: second phrase";
        assert_eq!(
            extract_mnemonic(output, DEFAULT_MNEMONIC_MARKER),
            Some("first phrase")
        );
    }

    #[test]
    fn honors_a_custom_marker() {
        let output = "Seed phrase >> lorem ipsum dolor";
        assert_eq!(
            extract_mnemonic(output, "Seed phrase >> "),
            Some("lorem ipsum dolor")
        );
        assert_eq!(extract_mnemonic(output, DEFAULT_MNEMONIC_MARKER), None);
    }
}
