use chrono::NaiveDate;

use tabula_core::Transaction;

use crate::detect::FormatTag;

pub mod capital_one;
pub mod chase;
pub mod generic;

/// Run the parser matching a detected format over raw statement text.
///
/// `today` anchors year inference for formats that omit the year on
/// transaction lines. Formats without a dedicated parser fall through to
/// the generic extractor, carrying whatever bank name detection recovered.
/// Parsers never fail: malformed input yields fewer (possibly zero)
/// transactions, not an error.
pub fn parse_statement(
    tag: FormatTag,
    text: &str,
    source_file: &str,
    today: NaiveDate,
) -> Vec<Transaction> {
    match tag {
        FormatTag::CapitalOne => capital_one::parse(text, source_file, today),
        FormatTag::Chase => chase::parse(text, source_file, today),
        FormatTag::BankOfAmerica | FormatTag::WellsFargo | FormatTag::Unknown => {
            generic::parse(text, source_file, today, tag.bank_name())
        }
    }
}
