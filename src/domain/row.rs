//! Raw rows returned by the site data source.
//!
//! The summary query yields a single row shape discriminated by an integer
//! kind tag. Rows arrive with the tag unvalidated; aggregation resolves it to
//! a [`RowKind`] and fails explicitly on anything unrecognized.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Validated classification of a raw row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowKind {
    /// Partner/corporate program line.
    Partner,
    /// Bill-type sale/return line.
    Sale,
    /// Healing-card collection line.
    HealingCard,
    /// Same shape as [`RowKind::Sale`], but for the GIFT bill type.
    GiftSale,
    /// OMS cash-collection line.
    OmsCollection,
    /// IP-collection line.
    IpCollection,
}

impl RowKind {
    /// Resolve a raw kind tag. Returns `None` for unknown tags; callers turn
    /// that into a malformed-row error with the row's position.
    pub fn from_tag(tag: i16) -> Option<Self> {
        match tag {
            0 => Some(RowKind::Partner),
            1 => Some(RowKind::Sale),
            2 => Some(RowKind::HealingCard),
            3 => Some(RowKind::GiftSale),
            4 => Some(RowKind::OmsCollection),
            5 => Some(RowKind::IpCollection),
            _ => None,
        }
    }

    pub fn tag(&self) -> i16 {
        match self {
            RowKind::Partner => 0,
            RowKind::Sale => 1,
            RowKind::HealingCard => 2,
            RowKind::GiftSale => 3,
            RowKind::OmsCollection => 4,
            RowKind::IpCollection => 5,
        }
    }
}

/// One row of the fixed summary query, with named fields in place of the
/// positional tuple the wire delivers.
///
/// Field meaning depends on the kind tag:
/// - kind 1/3 (bill type): `label` is the bill type, `amount_a`/`amount_b` are
///   sale net/discount, `amount_c`/`amount_d` are return net/discount,
///   `count_a`/`count_b` are sale/return bill counts.
/// - kind 0 (partner): `label` is the partner name, `amount_a` the net amount,
///   `count_a` the bill count.
/// - kind 2/4/5 (collections): `amount_a` carries the collected amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    /// Unvalidated kind tag as delivered by the data source.
    pub kind: i16,
    /// Secondary code (corporate code, payment code, tender type; -1 for bill
    /// type rows).
    pub aux_code: i64,
    pub label: String,
    pub amount_a: Decimal,
    pub amount_b: Decimal,
    pub amount_c: Decimal,
    pub amount_d: Decimal,
    pub count_a: i64,
    pub count_b: i64,
}

impl RawRow {
    /// Bill-type sale/return row (kind 1, or kind 3 for the GIFT variant).
    pub fn bill_type(
        kind: RowKind,
        label: impl Into<String>,
        sale_net: Decimal,
        sale_disc: Decimal,
        ret_net: Decimal,
        ret_disc: Decimal,
        sale_count: i64,
        ret_count: i64,
    ) -> Self {
        Self {
            kind: kind.tag(),
            aux_code: -1,
            label: label.into(),
            amount_a: sale_net,
            amount_b: sale_disc,
            amount_c: ret_net,
            amount_d: ret_disc,
            count_a: sale_count,
            count_b: ret_count,
        }
    }

    /// Partner/corporate program row (kind 0).
    pub fn partner(aux_code: i64, name: impl Into<String>, amount: Decimal, bill_count: i64) -> Self {
        Self {
            kind: RowKind::Partner.tag(),
            aux_code,
            label: name.into(),
            amount_a: amount,
            amount_b: Decimal::ZERO,
            amount_c: Decimal::ZERO,
            amount_d: Decimal::ZERO,
            count_a: bill_count,
            count_b: 0,
        }
    }

    /// Collection row (kind 2, 4 or 5).
    pub fn collection(kind: RowKind, aux_code: i64, label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            kind: kind.tag(),
            aux_code,
            label: label.into(),
            amount_a: amount,
            amount_b: Decimal::ZERO,
            amount_c: Decimal::ZERO,
            amount_d: Decimal::ZERO,
            count_a: 0,
            count_b: 0,
        }
    }
}
