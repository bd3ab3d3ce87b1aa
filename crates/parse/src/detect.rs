use std::fmt;

/// A recognized statement layout.
///
/// `BankOfAmerica` and `WellsFargo` are recognized from their markers but
/// have no dedicated parser yet; they are handed to the generic fallback,
/// which keeps the detected bank name on the records it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTag {
    CapitalOne,
    Chase,
    BankOfAmerica,
    WellsFargo,
    Unknown,
}

impl FormatTag {
    pub fn bank_name(self) -> &'static str {
        match self {
            FormatTag::CapitalOne => "Capital One",
            FormatTag::Chase => "Chase",
            FormatTag::BankOfAmerica => "Bank of America",
            FormatTag::WellsFargo => "Wells Fargo",
            FormatTag::Unknown => "Unknown",
        }
    }

    pub fn has_dedicated_parser(self) -> bool {
        matches!(self, FormatTag::CapitalOne | FormatTag::Chase)
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bank_name())
    }
}

/// Marker phrases per format, in priority order. First format with a hit
/// wins.
const MARKERS: &[(FormatTag, &[&str])] = &[
    (FormatTag::CapitalOne, &["capitalone", "capital one", "360 checking"]),
    (FormatTag::Chase, &["chase", "jpmorgan"]),
    (FormatTag::BankOfAmerica, &["bank of america", "bofa"]),
    (FormatTag::WellsFargo, &["wells fargo"]),
];

/// Classify statement text by case-insensitive marker search. Pure and
/// total: no match is a normal outcome, not a failure.
pub fn detect(text: &str) -> FormatTag {
    let lower = text.to_lowercase();
    MARKERS
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|p| lower.contains(p)))
        .map(|(tag, _)| *tag)
        .unwrap_or(FormatTag::Unknown)
}
