use chrono::NaiveDate;

use tabula_core::{Money, Transaction};

use crate::dates::{infer_year, month_abbr_to_num};
use crate::lines::normalize_lines;
use crate::re;

const BANK_NAME: &str = "Capital One";

// One transaction per line, with an optional Credit/Debit tag and a trailing
// running balance: "Sep 3 STARBUCKS Debit $5.25 $100.00".
re!(re_txn,
    r"(?i)^(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+(\d{1,2})\s+(.+?)(?:\s+(Credit|Debit))?\s*([+-]?\s*\$?[\d,]+\.\d{2})\s+\$?([\d,]+\.\d{2})$");

re!(re_period_labeled, r"(?i)Statement Period:?[ \t]*([^\r\n]+)");
re!(re_period_range, r"(?i)(\w+\s+\d{1,2})\s*[-–]\s*(\w+\s+\d{1,2},?\s*\d{4})");

re!(re_account_product, r"(?i)360 Checking.*?(\d{11})");
re!(re_account_labeled, r"(?i)Account.*?(\d{11})");
re!(re_account_bare, r"(\d{11})");

/// Lines that look transaction-shaped but never are.
const SKIP_MARKERS: &[&str] = &["Opening Balance", "Closing Balance", "Page", "capitalone.com"];

/// Statement period, tried most to least specific; empty when nothing hits.
fn statement_period(text: &str) -> String {
    if let Some(c) = re_period_labeled().captures(text) {
        if let Some(m) = c.get(1) {
            return m.as_str().trim().to_string();
        }
    }
    if let Some(m) = re_period_range().find(text) {
        return m.as_str().trim().to_string();
    }
    String::new()
}

/// Account-number fragment, tried most to least specific; empty on miss.
fn account_number(text: &str) -> String {
    for re in [re_account_product(), re_account_labeled(), re_account_bare()] {
        if let Some(c) = re.captures(text) {
            if let Some(m) = c.get(1) {
                return m.as_str().to_string();
            }
        }
    }
    String::new()
}

/// Parse a fixed-column ledger with a running balance on every line.
///
/// Transaction lines carry no year; `infer_year` fills it in. Unmatched
/// lines are expected noise (headers, wrapped descriptions, boilerplate)
/// and are dropped without comment.
pub(crate) fn parse(text: &str, source_file: &str, today: NaiveDate) -> Vec<Transaction> {
    let statement_period = statement_period(text);
    let account = account_number(text);

    let mut transactions = Vec::new();
    for line in normalize_lines(text) {
        if SKIP_MARKERS.iter().any(|m| line.contains(m)) {
            continue;
        }
        let Some(caps) = re_txn().captures(line) else {
            continue;
        };

        let Some(month) = month_abbr_to_num(&caps[1]) else {
            continue;
        };
        let Ok(day) = caps[2].parse::<u32>() else {
            continue;
        };
        let amount_str = &caps[5];
        let Some(mut amount) = Money::parse(amount_str) else {
            continue;
        };
        // Negative when the token itself says so, or when tagged Debit.
        let debit_tag = caps
            .get(4)
            .is_some_and(|m| m.as_str().eq_ignore_ascii_case("Debit"));
        if debit_tag || amount_str.contains('-') {
            amount = -amount.abs();
        }

        let year = infer_year(month, today);
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            continue;
        };

        let mut txn = Transaction::new(date, &caps[3], amount, source_file);
        txn.balance = Money::parse(&caps[6]);
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

    const TODAY: (i32, u32, u32) = (2025, 11, 15);

    fn parse_with_today(text: &str) -> Vec<Transaction> {
        let (y, m, d) = TODAY;
        parse(text, "stmt.txt", date(y, m, d))
    }

    #[test]
    fn debit_tagged_line_is_negative_with_balance() {
        let txns = parse_with_today("Sep 3 STARBUCKS Debit $5.25 $100.00");
        assert_eq!(txns.len(), 1);
        let t = &txns[0];
        assert_eq!(t.amount, Money::from_cents(-525));
        assert_eq!(t.kind, TxnKind::Expense);
        assert_eq!(t.balance, Some(Money::from_cents(10000)));
        assert_eq!(t.description, "STARBUCKS");
        assert_eq!(t.date, date(2025, 9, 3));
        assert_eq!(t.bank, "Capital One");
    }

    #[test]
    fn credit_tagged_line_is_positive() {
        let txns = parse_with_today("Sep 1 PAYROLL DEPOSIT Credit +$1,200.00 $1,300.00");
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].amount, Money::from_cents(120000));
        assert_eq!(txns[0].kind, TxnKind::Income);
    }

    #[test]
    fn untagged_minus_amount_is_negative() {
        let txns = parse_with_today("Sep 5 ATM WITHDRAWAL -$40.00 $60.00");
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].amount, Money::from_cents(-4000));
    }

    #[test]
    fn year_rolls_back_across_boundary() {
        let today = date(2025, 4, 15);
        let txns = parse("Dec 3 HOLIDAY REFUND Credit +$20.00 $120.00", "stmt.txt", today);
        assert_eq!(txns[0].date, date(2024, 12, 3));

        let txns = parse("Feb 10 GROCERY STORE Debit $32.10 $87.90", "stmt.txt", today);
        assert_eq!(txns[0].date, date(2025, 2, 10));
    }

    #[test]
    fn balance_markers_and_boilerplate_are_skipped() {
        let text = "Opening Balance $105.25\n\
                    Sep 3 STARBUCKS Debit $5.25 $100.00\n\
                    Closing Balance $100.00\n\
                    Page 1 of 3\n\
                    Questions? Visit capitalone.com";
        let txns = parse_with_today(text);
        assert_eq!(txns.len(), 1);
    }

    #[test]
    fn unmatched_lines_are_dropped_silently() {
        let text = "ACCOUNT SUMMARY\n\
                    Sep 3 STARBUCKS Debit $5.25 $100.00\n\
                    continued from previous page\n\
                    Thank you for banking with us";
        let txns = parse_with_today(text);
        assert_eq!(txns.len(), 1);
    }

    #[test]
    fn calendar_invalid_date_drops_the_line() {
        // OCR noise can produce impossible days; the line is noise, not an
        // error.
        let txns = parse_with_today("Feb 31 GHOST CHARGE Debit $9.99 $90.01");
        assert!(txns.is_empty());
    }

    #[test]
    fn period_and_account_attach_to_every_transaction() {
        let text = "360 Checking 12345678901\n\
                    Statement Period Sep 1 - Sep 30, 2025\n\
                    Sep 3 STARBUCKS Debit $5.25 $100.00\n\
                    Sep 4 BOOKSTORE Debit $15.00 $85.00";
        let txns = parse_with_today(text);
        assert_eq!(txns.len(), 2);
        for t in &txns {
            assert_eq!(t.account, "12345678901");
            assert_eq!(t.statement_period, "Sep 1 - Sep 30, 2025");
        }
    }

    #[test]
    fn account_extractor_falls_back_to_bare_digits() {
        let text = "statement for 98765432109\nSep 3 STARBUCKS Debit $5.25 $100.00";
        let txns = parse_with_today(text);
        assert_eq!(txns[0].account, "98765432109");
    }

    #[test]
    fn missing_period_and_account_stay_empty() {
        let txns = parse_with_today("Sep 3 STARBUCKS Debit $5.25 $100.00");
        assert_eq!(txns[0].account, "");
        assert_eq!(txns[0].statement_period, "");
    }
}
