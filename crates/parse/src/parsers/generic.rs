use chrono::{Datelike, NaiveDate};

use tabula_core::{Money, Transaction};

use crate::dates::expand_year;
use crate::lines::normalize_lines;
use crate::re;

// Loose date/description/amount shapes, most to least specific. Date
// separators may be `/`, space, or `-`; the year is optional.
re!(re_dated, r"^(\d{1,2})[/ \-](\d{1,2})[/ \-]?(\d{2,4})?\s+(.+?)\s+([+-]?\$?[\d,]+\.\d{2})$");
re!(re_undated, r"^(\d{1,2})[/ \-](\d{1,2})\s+(.+?)\s+([+-]?\$?[\d,]+\.\d{2})$");

/// Best-effort extraction for statements no dedicated parser understands.
///
/// Recall over precision: each line is tried against the pattern chain and
/// the first hit wins. No section awareness, no balance, no account or
/// period recovery. An empty result is a legitimate outcome.
pub(crate) fn parse(
    text: &str,
    source_file: &str,
    today: NaiveDate,
    bank_name: &str,
) -> Vec<Transaction> {
    let mut transactions = Vec::new();
    'lines: for line in normalize_lines(text) {
        for (re, has_year) in [(re_dated(), true), (re_undated(), false)] {
            let Some(caps) = re.captures(line) else {
                continue;
            };
            let Ok(month) = caps[1].parse::<u32>() else {
                continue;
            };
            let Ok(day) = caps[2].parse::<u32>() else {
                continue;
            };
            let year = if has_year {
                caps.get(3)
                    .and_then(|m| m.as_str().parse::<i32>().ok())
                    .map(expand_year)
                    .unwrap_or_else(|| today.year())
            } else {
                today.year()
            };
            let (desc, amount_str) = if has_year {
                (&caps[4], &caps[5])
            } else {
                (&caps[3], &caps[4])
            };
            let Some(amount) = Money::parse(amount_str) else {
                continue;
            };
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };

            let mut txn = Transaction::new(date, desc, amount, source_file);
            txn.bank = bank_name.to_string();
            transactions.push(txn);
            continue 'lines;
        }
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
        parse(text, "stmt.txt", date(2025, 9, 10), "Unknown")
    }

    #[test]
    fn slash_date_with_full_year() {
        let txns = parse_doc("09/03/2025 COFFEE SHOP $4.50");
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].date, date(2025, 9, 3));
        assert_eq!(txns[0].description, "COFFEE SHOP");
        assert_eq!(txns[0].amount, Money::from_cents(450));
    }

    #[test]
    fn two_digit_year_expands_to_2000s() {
        let txns = parse_doc("09/03/24 COFFEE SHOP $4.50");
        assert_eq!(txns[0].date, date(2024, 9, 3));
    }

    #[test]
    fn missing_year_defaults_to_current() {
        let txns = parse_doc("09/03 COFFEE SHOP $4.50");
        assert_eq!(txns[0].date, date(2025, 9, 3));
    }

    #[test]
    fn dash_and_space_separators_are_accepted() {
        assert_eq!(parse_doc("09-03-2025 COFFEE $4.50")[0].date, date(2025, 9, 3));
        assert_eq!(parse_doc("09 03 2025 COFFEE $4.50")[0].date, date(2025, 9, 3));
    }

    #[test]
    fn minus_token_makes_the_amount_negative() {
        let txns = parse_doc("09/03/2025 REFUND REVERSAL -$12.00");
        assert_eq!(txns[0].amount, Money::from_cents(-1200));
        assert_eq!(txns[0].kind, TxnKind::Expense);
    }

    #[test]
    fn unmatched_lines_yield_nothing() {
        let txns = parse_doc("TOTAL FEES CHARGED THIS PERIOD\nno dates here");
        assert!(txns.is_empty());
    }

    #[test]
    fn mixed_document_extracts_only_matching_lines() {
        let text = "SOMEBANK STATEMENT\n\
                    09/03/2025 GROCERY MART $54.10\n\
                    thank you for your business\n\
                    09/04/2025 PAYCHECK +$2,100.00";
        let txns = parse_doc(text);
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[1].amount, Money::from_cents(210000));
    }

    #[test]
    fn no_balance_account_or_period_is_recovered() {
        let t = &parse_doc("09/03/2025 COFFEE SHOP $4.50")[0];
        assert_eq!(t.balance, None);
        assert_eq!(t.account, "");
        assert_eq!(t.statement_period, "");
    }

    #[test]
    fn invalid_calendar_dates_are_dropped() {
        assert!(parse_doc("13/45/2025 NONSENSE $4.50").is_empty());
    }
}
