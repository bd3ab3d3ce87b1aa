use chrono::{Datelike, NaiveDate};

use tabula_core::{Money, Transaction};

use crate::lines::normalize_lines;
use crate::re;

const BANK_NAME: &str = "Chase";

// "12/05 Description $1,200.00": no year, no sign, no balance. The
// enclosing section decides the sign.
re!(re_txn, r"^(\d{1,2})/(\d{1,2})\s+(.+?)\s+\$?([\d,]+\.\d{2})$");

re!(re_period, r"(?i)(\w+\s+\d{1,2},?\s*\d{4})\s*through\s*(\w+\s+\d{1,2},?\s*\d{4})");
re!(re_account, r"(?i)Account\s*(?:Number)?:?\s*(\d{12,15})");
// A standalone plausible year anywhere in the document; the word boundary
// keeps account-number fragments from qualifying.
re!(re_year, r"\b(19\d{2}|20\d{2})\b");

/// Section context while walking a sectioned statement.
///
/// The transaction line syntax carries no sign; whether an amount is a
/// deposit or a withdrawal is decided entirely by which section the line
/// appears under, so this state is the parser's key disambiguator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Neutral,
    Deposits,
    Withdrawals,
}

impl Section {
    /// Advance the machine over one line. Marker lines switch or reset the
    /// section; every other line leaves it unchanged.
    pub fn transition(self, line: &str) -> Section {
        let upper = line.to_uppercase();
        if upper.contains("DEPOSITS AND ADDITIONS") {
            Section::Deposits
        } else if upper.contains("WITHDRAWALS") {
            Section::Withdrawals
        } else if upper.contains("CHASE SAVINGS")
            || line.contains("Beginning Balance")
            || line.contains("Ending Balance")
        {
            Section::Neutral
        } else {
            self
        }
    }

    /// Transaction lines only count inside a deposits or withdrawals
    /// section.
    pub fn in_transactions(self) -> bool {
        !matches!(self, Section::Neutral)
    }
}

/// Parse a sectioned ledger: deposits and withdrawals are listed in
/// separate sections and no per-line balance is reported.
///
/// The statement year is taken from the first standalone four-digit year
/// token anywhere in the text, falling back to the current year.
pub(crate) fn parse(text: &str, source_file: &str, today: NaiveDate) -> Vec<Transaction> {
    let statement_period = re_period()
        .captures(text)
        .map(|c| format!("{} - {}", c[1].trim(), c[2].trim()))
        .unwrap_or_default();
    let account = re_account()
        .captures(text)
        .map(|c| c[1].to_string())
        .unwrap_or_default();
    let year: i32 = re_year()
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or_else(|| today.year());

    let mut section = Section::Neutral;
    let mut transactions = Vec::new();

    for line in normalize_lines(text) {
        let next = section.transition(line);
        if next != section {
            section = next;
            if section.in_transactions() {
                // The marker line itself is not a transaction.
                continue;
            }
        }
        if !section.in_transactions() {
            continue;
        }
        if ["Page", "JPMorgan", "Total"].iter().any(|m| line.contains(m)) {
            continue;
        }
        let Some(caps) = re_txn().captures(line) else {
            continue;
        };
        let Ok(month) = caps[1].parse::<u32>() else {
            continue;
        };
        let Ok(day) = caps[2].parse::<u32>() else {
            continue;
        };
        let Some(mut amount) = Money::parse(&caps[4]) else {
            continue;
        };
        if section == Section::Withdrawals {
            amount = -amount.abs();
        }
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            continue;
        };

        let mut txn = Transaction::new(date, &caps[3], amount, source_file);
        txn.bank = BANK_NAME.to_string();
        txn.account = account.clone();
        txn.statement_period = statement_period.clone();
        transactions.push(txn);
    }
    transactions
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::TxnKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parse_doc(text: &str) -> Vec<Transaction> {
        parse(text, "stmt.txt", date(2024, 12, 20))
    }

    // ── Section state machine ────────────────────────────────────────────────

    #[test]
    fn section_markers_drive_transitions() {
        let s = Section::Neutral;
        let s = s.transition("DEPOSITS AND ADDITIONS");
        assert_eq!(s, Section::Deposits);
        let s = s.transition("12/05 Payroll $1,200.00");
        assert_eq!(s, Section::Deposits);
        let s = s.transition("ELECTRONIC WITHDRAWALS");
        assert_eq!(s, Section::Withdrawals);
        let s = s.transition("Ending Balance $300.00");
        assert_eq!(s, Section::Neutral);
    }

    #[test]
    fn savings_marker_resets_section() {
        let s = Section::Deposits.transition("CHASE SAVINGS");
        assert_eq!(s, Section::Neutral);
    }

    #[test]
    fn marker_match_is_case_insensitive_for_sections() {
        assert_eq!(Section::Neutral.transition("Deposits and Additions"), Section::Deposits);
        assert_eq!(Section::Neutral.transition("electronic withdrawals"), Section::Withdrawals);
    }

    #[test]
    fn neutral_state_accepts_no_transactions() {
        assert!(!Section::Neutral.in_transactions());
        assert!(Section::Deposits.in_transactions());
        assert!(Section::Withdrawals.in_transactions());
    }

    // ── Parsing ──────────────────────────────────────────────────────────────

    #[test]
    fn deposits_positive_withdrawals_negative() {
        let text = "DEPOSITS AND ADDITIONS\n\
                    12/05 Payroll $1,200.00\n\
                    ELECTRONIC WITHDRAWALS\n\
                    12/06 Rent $900.00";
        let txns = parse_doc(text);
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].amount, Money::from_cents(120000));
        assert_eq!(txns[0].kind, TxnKind::Income);
        assert_eq!(txns[1].amount, Money::from_cents(-90000));
        assert_eq!(txns[1].kind, TxnKind::Expense);
    }

    #[test]
    fn transaction_shaped_line_before_any_section_is_ignored() {
        let text = "12/04 Early Bird $50.00\n\
                    DEPOSITS AND ADDITIONS\n\
                    12/05 Payroll $1,200.00";
        let txns = parse_doc(text);
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].description, "Payroll");
    }

    #[test]
    fn balance_line_closes_the_section() {
        let text = "DEPOSITS AND ADDITIONS\n\
                    12/05 Payroll $1,200.00\n\
                    Ending Balance $1,300.00\n\
                    12/07 Stray Line $10.00";
        let txns = parse_doc(text);
        assert_eq!(txns.len(), 1);
    }

    #[test]
    fn totals_and_footers_inside_sections_are_skipped() {
        let text = "DEPOSITS AND ADDITIONS\n\
                    12/05 Payroll $1,200.00\n\
                    Total Deposits $1,200.00\n\
                    Page 2 of 4\n\
                    JPMorgan Chase Bank, N.A.";
        let txns = parse_doc(text);
        assert_eq!(txns.len(), 1);
    }

    #[test]
    fn year_token_in_text_dates_all_transactions() {
        let text = "December 1, 2023 through December 31, 2023\n\
                    DEPOSITS AND ADDITIONS\n\
                    12/05 Payroll $1,200.00";
        let txns = parse_doc(text);
        assert_eq!(txns[0].date, date(2023, 12, 5));
        assert_eq!(txns[0].statement_period, "December 1, 2023 - December 31, 2023");
    }

    #[test]
    fn missing_year_falls_back_to_current() {
        let text = "DEPOSITS AND ADDITIONS\n12/05 Payroll $1,200.00";
        let txns = parse_doc(text);
        assert_eq!(txns[0].date, date(2024, 12, 5));
    }

    #[test]
    fn account_number_is_extracted_when_labelled() {
        let text = "Account Number: 123456789012\n\
                    DEPOSITS AND ADDITIONS\n\
                    12/05 Payroll $1,200.00";
        let txns = parse_doc(text);
        assert_eq!(txns[0].account, "123456789012");
    }

    #[test]
    fn no_balance_is_reported() {
        let text = "DEPOSITS AND ADDITIONS\n12/05 Payroll $1,200.00";
        assert_eq!(parse_doc(text)[0].balance, None);
    }
}
