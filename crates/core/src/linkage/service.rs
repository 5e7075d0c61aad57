//! Backfills explicit links on legacy transactions.

use khata_shared::types::TransactionId;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::model::{Invoice, Party, Snapshot};

/// Outcome of a relink pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LinkReport {
    /// Transactions linked to an invoice (and its party).
    pub linked_invoices: Vec<TransactionId>,
    /// Transactions linked to a party only.
    pub linked_parties: Vec<TransactionId>,
    /// Transactions whose description names no invoice or party.
    pub unresolved: Vec<TransactionId>,
    /// Transactions whose description names several candidates.
    pub ambiguous: Vec<TransactionId>,
}

impl LinkReport {
    /// Number of transactions that gained a link.
    #[must_use]
    pub fn linked(&self) -> usize {
        self.linked_invoices.len() + self.linked_parties.len()
    }
}

/// Result of searching a description for candidate keys.
enum Match<T> {
    None,
    One(T),
    Many,
}

/// Legacy linkage migration.
pub struct LinkService;

impl LinkService {
    /// Links every transaction that has neither `invoice_id` nor `party_id`.
    ///
    /// An invoice number found in the description links the transaction to
    /// that invoice as its companion, unless the invoice already has one.
    /// Otherwise a party name found in the description links it to that
    /// party. When several keys match, keys contained in a longer matching key
    /// are discarded first; if more than one is still left the transaction is
    /// reported as ambiguous and left alone.
    ///
    /// Balances are not touched: legacy balances already include these
    /// transactions.
    #[must_use]
    pub fn relink_legacy(snapshot: &Snapshot) -> (Snapshot, LinkReport) {
        let mut work = snapshot.clone();
        let mut report = LinkReport::default();

        for index in 0..work.transactions.len() {
            let transaction = &work.transactions[index];
            if transaction.invoice_id.is_some() || transaction.party_id.is_some() {
                continue;
            }
            let id = transaction.id;
            let description = transaction.description.clone();

            let invoices: Vec<&Invoice> = snapshot
                .invoices
                .iter()
                .filter(|i| work.companion_of(i.id).is_none())
                .collect();
            match Self::find(&description, &invoices, |i| i.invoice_no.as_str()) {
                Match::One(invoice) => {
                    let (invoice_id, party_id) = (invoice.id, invoice.party_id());
                    let transaction = &mut work.transactions[index];
                    transaction.invoice_id = Some(invoice_id);
                    transaction.party_id = party_id;
                    report.linked_invoices.push(id);
                    continue;
                }
                Match::Many => {
                    warn!(transaction_id = %id, "Description names several invoices");
                    report.ambiguous.push(id);
                    continue;
                }
                Match::None => {}
            }

            let parties: Vec<&Party> = snapshot.parties.iter().collect();
            match Self::find(&description, &parties, |p| p.name.as_str()) {
                Match::One(party) => {
                    work.transactions[index].party_id = Some(party.id);
                    report.linked_parties.push(id);
                }
                Match::Many => {
                    warn!(transaction_id = %id, "Description names several parties");
                    report.ambiguous.push(id);
                }
                Match::None => report.unresolved.push(id),
            }
        }

        info!(
            linked = report.linked(),
            unresolved = report.unresolved.len(),
            ambiguous = report.ambiguous.len(),
            "Legacy transactions relinked"
        );
        (work.commit(), report)
    }

    fn find<'a, T>(
        description: &str,
        candidates: &[&'a T],
        key: impl Fn(&T) -> &str,
    ) -> Match<&'a T> {
        let hits: Vec<&'a T> = candidates
            .iter()
            .copied()
            .filter(|c| {
                let k = key(c).trim();
                !k.is_empty() && description.contains(k)
            })
            .collect();
        let maximal: Vec<&'a T> = hits
            .iter()
            .copied()
            .filter(|c| {
                let k = key(c).trim();
                !hits.iter().any(|other| {
                    let o = key(other).trim();
                    o.len() > k.len() && o.contains(k)
                })
            })
            .collect();

        match maximal.as_slice() {
            [] => Match::None,
            [one] => Match::One(*one),
            _ => Match::Many,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{InvoiceInput, InvoiceLineInput, InvoiceService, PartySelection};
    use crate::model::{Direction, InvoiceKind, PartyRole, PaymentMode, Transaction};
    use chrono::NaiveDate;
    use khata_shared::EngineConfig;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 5).unwrap()
    }

    fn legacy(description: &str) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            date: date(),
            description: description.to_string(),
            amount: dec!(100),
            direction: Direction::Credit,
            category: "Payment".to_string(),
            party_id: None,
            invoice_id: None,
            payment_mode: None,
            sequence: 0,
        }
    }

    fn unpaid_sale(party: &Party, invoice_no: &str) -> InvoiceInput {
        InvoiceInput {
            invoice_no: Some(invoice_no.to_string()),
            kind: InvoiceKind::Sale,
            sub_type: None,
            date: date(),
            party: PartySelection::Existing(party.id),
            lines: vec![InvoiceLineInput {
                product_id: None,
                description: Some("Service".to_string()),
                hsn: None,
                quantity: 1,
                rate: Some(dec!(500)),
                tax_rate: None,
            }],
            tax_enabled: false,
            amount_paid: Decimal::ZERO,
            payment_mode: PaymentMode::Cash,
            remarks: None,
        }
    }

    #[test]
    fn test_relink_by_invoice_number_and_party_name() {
        let meena = Party::new(PartyRole::Customer, "Meena");
        let meena_traders = Party::new(PartyRole::Customer, "Meena Traders");
        let snapshot = Snapshot::new()
            .with_party(meena.clone())
            .with_party(meena_traders.clone());
        let config = EngineConfig::default();
        let (mut snapshot, invoice) =
            InvoiceService::create(&snapshot, &unpaid_sale(&meena, "SL-10"), &config).unwrap();
        let (next, _) =
            InvoiceService::create(&snapshot, &unpaid_sale(&meena, "SL-1"), &config).unwrap();
        snapshot = next;

        let by_invoice = legacy("Sale #SL-10 Post. Party: Meena. Ref: Direct Entry");
        let by_party = legacy("Ledger Recovery [CASH] - Meena Traders (CUSTOMER)");
        let orphan = legacy("Cash adjustment");
        snapshot.transactions = vec![by_invoice.clone(), by_party.clone(), orphan.clone()];
        let balances = snapshot.parties.clone();

        let (relinked, report) = LinkService::relink_legacy(&snapshot);

        assert_eq!(report.linked_invoices, vec![by_invoice.id]);
        assert_eq!(report.linked_parties, vec![by_party.id]);
        assert_eq!(report.unresolved, vec![orphan.id]);
        assert!(report.ambiguous.is_empty());
        assert_eq!(report.linked(), 2);

        let linked = relinked.transaction(by_invoice.id).unwrap();
        assert_eq!(linked.invoice_id, Some(invoice.id));
        assert_eq!(linked.party_id, Some(meena.id));
        assert_eq!(
            relinked.transaction(by_party.id).unwrap().party_id,
            Some(meena_traders.id)
        );
        assert_eq!(relinked.parties, balances);
    }

    #[test]
    fn test_ambiguous_party_names() {
        let first = Party::new(PartyRole::Customer, "Ravi");
        let second = Party::new(PartyRole::Supplier, "Sita");
        let mut snapshot = Snapshot::new().with_party(first).with_party(second);
        let both = legacy("Split payment Ravi and Sita");
        snapshot.transactions = vec![both.clone()];

        let (relinked, report) = LinkService::relink_legacy(&snapshot);
        assert_eq!(report.ambiguous, vec![both.id]);
        assert_eq!(relinked.transactions[0].party_id, None);
    }

    #[test]
    fn test_linked_transactions_are_left_alone() {
        let party = Party::new(PartyRole::Customer, "Ravi");
        let other = Party::new(PartyRole::Customer, "Sita");
        let mut snapshot = Snapshot::new()
            .with_party(party.clone())
            .with_party(other.clone());
        let mut linked = legacy("Paid by Sita");
        linked.party_id = Some(party.id);
        snapshot.transactions = vec![linked.clone()];

        let (relinked, report) = LinkService::relink_legacy(&snapshot);
        assert_eq!(report, LinkReport::default());
        assert_eq!(relinked.transactions, vec![linked]);
    }
}
