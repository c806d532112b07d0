//! Fixed-width rendering of the sales summary page.
//!
//! The page layout is fixed: every line is normalized to exactly
//! [`PAGE_WIDTH`] characters, blank separators included, so the output file
//! has constant dimensions regardless of content.

use chrono::{DateTime, Local};
use rust_decimal::Decimal;

use crate::domain::site::SiteId;
use crate::domain::summary::{PartnerBucket, ReportTotals, SalesBucket, SalesSummary};
use crate::domain::DateRange;

/// Width every rendered line is padded or truncated to.
pub const PAGE_WIDTH: usize = 180;

const COMPANY_NAME: &str = "APOLLO PHARMACIES LIMITED";
const REPORT_TITLE: &str = "Sales Transaction Summary Report";

/// Metadata rendered into a report's header block.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    pub site_id: SiteId,
    pub site_name: String,
    pub range: DateRange,
    /// Generation timestamp for the date/time header lines. Injected by the
    /// orchestrator so report bodies are reproducible under test.
    pub generated_at: DateTime<Local>,
}

/// Render the full fixed-width page for one site.
///
/// Lines are joined with `\n` and each line is exactly [`PAGE_WIDTH`]
/// characters. Identical summaries and metadata render to identical bytes;
/// only the timestamp header lines vary between runs.
pub fn render_report(summary: &SalesSummary, meta: &ReportMeta) -> String {
    let rule = "-".repeat(PAGE_WIDTH);
    let short_rule = "-".repeat(PAGE_WIDTH - 50);
    let totals = &summary.totals;

    let mut lines: Vec<String> = Vec::new();

    // Right-justified date/time header.
    lines.push(rjust(
        &format!("DATE: {}", meta.generated_at.format("%d/%m/%Y")),
        PAGE_WIDTH,
    ));
    lines.push(rjust(
        &format!("TIME: {}", meta.generated_at.format("%I:%M %p")),
        PAGE_WIDTH,
    ));
    lines.push(String::new());

    // Centered title block.
    lines.push(center(COMPANY_NAME, PAGE_WIDTH));
    lines.push(center(
        &format!("{} - {}", meta.site_id, meta.site_name),
        PAGE_WIDTH,
    ));
    lines.push(String::new());
    lines.push(center(REPORT_TITLE, PAGE_WIDTH));
    lines.push(center(
        &format!(
            "From Date : {}    To Date : {}",
            meta.range.from.format("%Y-%m-%d"),
            meta.range.to.format("%Y-%m-%d")
        ),
        PAGE_WIDTH,
    ));
    lines.push(rule.clone());

    // Three-group header and detail column header.
    lines.push(format!(
        "|{}|{}|{}|",
        center(" SALES ", 55),
        center(" RETURNS ", 55),
        center(" NET ", 55)
    ));
    lines.push(rule.clone());
    lines.push(format!(
        "{:<17} |{:>8} |{:>12} |{:>12} |{:>12} |{:>6} |{:>12} |{:>12} |{:>12} |{:>6} |{:>12} |{:>12} |{:>12} |",
        "BILLTYPE", "NO", "AMT", "DISC", "NET", "NO", "AMT", "DISC", "NET", "NO", "AMT", "DISC", "NET"
    ));
    lines.push(rule.clone());

    for bucket in &summary.sales {
        lines.push(sales_row(bucket));
    }
    lines.push(rule.clone());
    lines.push(totals_row(totals));
    lines.push(rule.clone());

    // Sales summary block. Paid-in and paid-out are fixed zeros; the rows
    // that would feed them are not folded in (see the aggregator).
    lines.push(String::new());
    lines.push("SALES :-".to_string());
    lines.push(String::new());
    lines.push(format!(
        "       Net Cash Sales        : {}",
        format_currency(totals.net_cash_sales)
    ));
    lines.push("       Total Paid In         :       0.00".to_string());
    lines.push("       Total Paid out        :       0.00".to_string());
    lines.push(format!(
        "       Total Sales           : {}",
        format_currency(totals.total_sales())
    ));

    // Healing-card block: fixed zero placeholders, total cash equals total
    // sales.
    lines.push("HealingCard Collections:".to_string());
    lines.push(format!("     Cash Collections        : {:>9}", 0));
    lines.push(format!("     Credit Card Collections : {:>9}", 0));
    lines.push(format!("     Total Collection        : {:>9}", 0));
    lines.push(format!(
        "Total Cash Amount            : {}",
        format_currency(totals.total_sales())
    ));
    lines.push(String::new());
    lines.push(rule.clone());

    // Partner program table.
    lines.push(String::new());
    lines.push("Partner Program Summary  :".to_string());
    lines.push(
        " slno| Name                                     |     NoInv        |    Amount    |"
            .to_string(),
    );
    lines.push(rule);

    let mut partner_bill_total: i64 = 0;
    let mut partner_amount_total = Decimal::ZERO;
    for (index, partner) in summary.partners.iter().enumerate() {
        partner_bill_total += partner.bill_count;
        partner_amount_total += partner.amount;
        lines.push(partner_row(index + 1, partner));
    }
    lines.push(short_rule.clone());
    lines.push(format!(
        "      TOTAL AMOUNT:                    {:>27} | {:>9} |",
        partner_bill_total,
        format_currency(partner_amount_total)
    ));
    lines.push(short_rule);

    let fixed: Vec<String> = lines.iter().map(|line| fix_line(line)).collect();
    fixed.join("\n")
}

fn sales_row(bucket: &SalesBucket) -> String {
    let overall_count = bucket.sale_count + bucket.ret_count;
    let overall_amt = bucket.sale_amt() + bucket.ret_amt();
    let overall_disc = bucket.sale_disc + bucket.ret_disc;
    let overall_net = bucket.sale_net + bucket.ret_net;
    format!(
        "{:<17} |{:>8} |{:>12} |{:>12} |{:>12} |{:>6} |{:>12} |{:>12} |{:>12} |{:>6} |{:>12} |{:>12} |{:>12} |",
        bucket.bill_type,
        bucket.sale_count,
        format_currency(bucket.sale_amt()),
        format_currency(bucket.sale_disc),
        format_currency(bucket.sale_net),
        bucket.ret_count,
        format_currency(bucket.ret_amt()),
        format_currency(bucket.ret_disc),
        format_currency(bucket.ret_net),
        overall_count,
        format_currency(overall_amt),
        format_currency(overall_disc),
        format_currency(overall_net)
    )
}

/// The totals row prints the grand totals, not a re-sum of the displayed
/// rows: GIFT figures appear in their own row but not here.
fn totals_row(totals: &ReportTotals) -> String {
    format!(
        "{:<17} |{:>8} |{:>12} |{:>12} |{:>12} |{:>6} |{:>12} |{:>12} |{:>12} |{:>6} |{:>12} |{:>12} |{:>12} |",
        "TOTALAMOUNT   :",
        totals.sale_count,
        format_currency(totals.sale_amt),
        format_currency(totals.sale_disc),
        format_currency(totals.sale_net),
        totals.ret_count,
        format_currency(totals.ret_amt),
        format_currency(totals.ret_disc),
        format_currency(totals.ret_net),
        totals.overall_count(),
        format_currency(totals.overall_amt()),
        format_currency(totals.overall_disc()),
        format_currency(totals.overall_net())
    )
}

fn partner_row(slno: usize, partner: &PartnerBucket) -> String {
    format!(
        "{:>6} | {:<38} |     {:>12} | {:>12} |",
        slno,
        partner.name,
        partner.bill_count,
        format_currency(partner.amount)
    )
}

/// Normalize a line to exactly [`PAGE_WIDTH`] characters: pad with spaces if
/// shorter, truncate if longer.
fn fix_line(line: &str) -> String {
    let mut fixed: String = line.chars().take(PAGE_WIDTH).collect();
    let length = fixed.chars().count();
    fixed.extend(std::iter::repeat(' ').take(PAGE_WIDTH - length));
    fixed
}

fn center(text: &str, width: usize) -> String {
    let length = text.chars().count();
    if length >= width {
        return text.to_string();
    }
    let left = (width - length) / 2;
    let right = width - length - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

fn rjust(text: &str, width: usize) -> String {
    let length = text.chars().count();
    if length >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat(width - length), text)
}

/// Format a value with two fixed decimals and comma thousands separators, no
/// currency symbol.
fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = match digits.split_once('.') {
        Some(parts) => parts,
        None => (digits.as_str(), "00"),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (offset, ch) in int_part.chars().enumerate() {
        if offset > 0 && (int_part.len() - offset) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped}.{frac_part}")
    } else {
        format!("{grouped}.{frac_part}")
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::row::{RawRow, RowKind};

    fn meta() -> ReportMeta {
        ReportMeta {
            site_id: SiteId::parse("10234").unwrap(),
            site_name: "MG ROAD".to_string(),
            range: DateRange::new(
                chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                chrono::NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            ),
            generated_at: Local.with_ymd_and_hms(2024, 4, 2, 19, 45, 0).unwrap(),
        }
    }

    fn line_at<'a>(page: &'a str, needle: &str) -> &'a str {
        page.lines()
            .find(|line| line.contains(needle))
            .unwrap_or_else(|| panic!("no line containing {needle:?}"))
    }

    #[test]
    fn every_line_is_exactly_page_width() {
        let rows = vec![
            RawRow::bill_type(
                RowKind::Sale,
                "CASH",
                dec!(1234.50),
                dec!(10.00),
                dec!(100.00),
                dec!(0.00),
                12,
                1,
            ),
            RawRow::partner(172, "ACME CORP", dec!(99.99), 3),
        ];
        let summary = SalesSummary::from_rows(&rows).unwrap();
        let page = render_report(&summary, &meta());

        for line in page.lines() {
            assert_eq!(line.chars().count(), PAGE_WIDTH, "bad line: {line:?}");
        }
    }

    #[test]
    fn empty_summary_still_renders_a_full_page() {
        let summary = SalesSummary::from_rows(&[]).unwrap();
        let page = render_report(&summary, &meta());

        for line in page.lines() {
            assert_eq!(line.chars().count(), PAGE_WIDTH);
        }
        assert!(page.contains(COMPANY_NAME));
        assert!(page.contains("10234 - MG ROAD"));
        assert!(page.contains(REPORT_TITLE));
        assert!(line_at(&page, "TOTALAMOUNT").contains("0.00"));
        assert!(page.contains("       Net Cash Sales        : 0.00"));
        assert!(page.contains("Partner Program Summary  :"));
    }

    #[test]
    fn header_carries_dates_and_generation_stamp() {
        let summary = SalesSummary::from_rows(&[]).unwrap();
        let page = render_report(&summary, &meta());

        assert!(page.contains("DATE: 02/04/2024"));
        assert!(page.contains("TIME: 07:45 PM"));
        assert!(page.contains("From Date : 2024-03-01    To Date : 2024-03-31"));
        // Header date/time lines are right-justified to the page edge.
        assert!(line_at(&page, "DATE:").ends_with("DATE: 02/04/2024"));
    }

    #[test]
    fn group_header_centers_each_group_in_55_columns() {
        let summary = SalesSummary::from_rows(&[]).unwrap();
        let page = render_report(&summary, &meta());

        let expected = format!(
            "|{}|{}|{}|",
            center(" SALES ", 55),
            center(" RETURNS ", 55),
            center(" NET ", 55)
        );
        assert_eq!(expected.chars().count(), 169);
        assert!(page.contains(&expected));
    }

    #[test]
    fn bucket_row_shows_sale_return_and_overall_groups() {
        let rows = vec![RawRow::bill_type(
            RowKind::Sale,
            "CASH",
            dec!(100.00),
            dec!(5.00),
            dec!(20.00),
            dec!(2.00),
            4,
            1,
        )];
        let summary = SalesSummary::from_rows(&rows).unwrap();
        let page = render_report(&summary, &meta());

        let row = line_at(&page, "CASH");
        // sale amt = 105.00, ret amt = 22.00, overall amt = 127.00
        assert!(row.contains("105.00"));
        assert!(row.contains("22.00"));
        assert!(row.contains("127.00"));
        assert!(row.starts_with(&format!("{:<17} |", "CASH")));
    }

    #[test]
    fn totals_row_uses_grand_totals_not_a_resum_of_rows() {
        let rows = vec![
            RawRow::bill_type(
                RowKind::Sale,
                "CASH",
                dec!(100.00),
                dec!(0.00),
                dec!(0.00),
                dec!(0.00),
                1,
                0,
            ),
            RawRow::bill_type(
                RowKind::GiftSale,
                "GIFT",
                dec!(500.00),
                dec!(0.00),
                dec!(0.00),
                dec!(0.00),
                9,
                0,
            ),
        ];
        let summary = SalesSummary::from_rows(&rows).unwrap();
        let page = render_report(&summary, &meta());

        // The GIFT row renders with its own figures.
        assert!(line_at(&page, "GIFT").contains("500.00"));
        // The totals row excludes them.
        let totals = line_at(&page, "TOTALAMOUNT");
        assert!(!totals.contains("600.00"));
        assert!(totals.contains("100.00"));
        assert!(totals.contains(&format!("{:>8} |", 1)));
    }

    #[test]
    fn sales_summary_block_prints_cash_and_fixed_placeholders() {
        let rows = vec![RawRow::bill_type(
            RowKind::Sale,
            "CASH",
            dec!(100.00),
            dec!(0.00),
            dec!(0.00),
            dec!(0.00),
            1,
            0,
        )];
        let summary = SalesSummary::from_rows(&rows).unwrap();
        let page = render_report(&summary, &meta());

        assert!(page.contains("       Net Cash Sales        : 100.00"));
        assert!(page.contains("       Total Paid In         :       0.00"));
        assert!(page.contains("       Total Paid out        :       0.00"));
        assert!(page.contains("       Total Sales           : 100.00"));
        assert!(page.contains("     Cash Collections        :         0"));
        assert!(page.contains("Total Cash Amount            : 100.00"));
    }

    #[test]
    fn collection_rows_do_not_disturb_the_placeholder_sections() {
        let rows = vec![
            RawRow::collection(RowKind::HealingCard, 7, "HEALINGCARD-CASH", dec!(500.00)),
            RawRow::collection(RowKind::OmsCollection, 0, "OMS CASH COLLECTION", dec!(250.00)),
        ];
        let summary = SalesSummary::from_rows(&rows).unwrap();
        let page = render_report(&summary, &meta());

        assert!(page.contains("     Cash Collections        :         0"));
        assert!(page.contains("     Total Collection        :         0"));
        assert!(page.contains("       Total Sales           : 0.00"));
    }

    #[test]
    fn partner_table_is_indexed_in_encounter_order_with_totals() {
        let rows = vec![
            RawRow::partner(10, "ACME CORP", dec!(1500.00), 3),
            RawRow::partner(20, "GLOBEX", dec!(250.50), 1),
        ];
        let summary = SalesSummary::from_rows(&rows).unwrap();
        let page = render_report(&summary, &meta());

        let first = line_at(&page, "ACME CORP");
        assert!(first.starts_with(&format!("{:>6} | {:<38} |", 1, "ACME CORP")));
        assert!(first.contains("1,500.00"));
        let second = line_at(&page, "GLOBEX");
        assert!(second.starts_with(&format!("{:>6} | ", 2)));

        let totals = line_at(&page, "TOTAL AMOUNT:");
        assert!(totals.contains("4 |"));
        assert!(totals.contains("1,750.50"));
    }

    #[test]
    fn long_bill_types_are_truncated_at_the_page_edge() {
        let rows = vec![RawRow::bill_type(
            RowKind::Sale,
            "A VERY LONG BILL TYPE NAME",
            dec!(1.00),
            dec!(0.00),
            dec!(0.00),
            dec!(0.00),
            1,
            0,
        )];
        let summary = SalesSummary::from_rows(&rows).unwrap();
        let page = render_report(&summary, &meta());

        for line in page.lines() {
            assert_eq!(line.chars().count(), PAGE_WIDTH);
        }
    }

    #[test]
    fn currency_formatting_groups_thousands() {
        assert_eq!(format_currency(dec!(0)), "0.00");
        assert_eq!(format_currency(dec!(1234567.891)), "1,234,567.89");
        assert_eq!(format_currency(dec!(999.9)), "999.90");
        assert_eq!(format_currency(dec!(-1234.5)), "-1,234.50");
        assert_eq!(format_currency(dec!(1000)), "1,000.00");
    }

    #[test]
    fn centering_matches_the_legacy_layout() {
        assert_eq!(center("ab", 6), "  ab  ");
        assert_eq!(center("ab", 7), "  ab   ");
        assert_eq!(center(" SALES ", 55).len(), 55);
    }
}
