//! Invoice ledger manager.
//!
//! Orchestrates create, edit, and delete of invoices. Every operation works on
//! a private copy of the snapshot and commits it as a whole, so stock, balance,
//! and transaction-log changes land together or not at all.

use khata_shared::EngineConfig;
use khata_shared::types::{InvoiceId, TransactionId};
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::numbering::next_invoice_no;
use super::totals::compute_totals;
use super::types::{InvoiceInput, InvoiceLineInput, PartySelection};
use crate::ledger::{BalanceMutator, LedgerError, Sign, StockMutator};
use crate::model::{Invoice, InvoiceKind, InvoiceLine, InvoiceParty, Snapshot, Transaction};

/// Identity reused by a companion transaction when its invoice is re-posted.
#[derive(Debug, Clone, Copy)]
struct CompanionSlot {
    id: TransactionId,
    sequence: u64,
    position: usize,
}

/// Invoice ledger manager.
///
/// Stateless; all state lives in the snapshot passed in.
pub struct InvoiceService;

impl InvoiceService {
    /// Posts a new invoice.
    ///
    /// Validates the input, computes totals, applies stock (+1) and balance
    /// (+1) effects, and spawns the companion transaction for the amount paid.
    ///
    /// # Errors
    ///
    /// Validation and reference errors abort with the input snapshot untouched.
    pub fn create(
        snapshot: &Snapshot,
        input: &InvoiceInput,
        config: &EngineConfig,
    ) -> Result<(Snapshot, Invoice), LedgerError> {
        let mut work = snapshot.clone();
        let invoice_no = match &input.invoice_no {
            Some(no) => no.clone(),
            None => next_invoice_no(snapshot, input.kind, Self::prefix(input.kind, config)),
        };
        let sequence = work.take_sequence();
        let invoice = Self::build(snapshot, input, InvoiceId::new(), invoice_no, sequence, config)?;

        Self::apply_effects(&mut work, &invoice, Sign::Apply)?;
        Self::insert_companion(&mut work, &invoice, None);
        work.invoices.push(invoice.clone());

        if config.enforce_non_negative_stock {
            StockMutator::ensure_non_negative(&work.products, &StockMutator::touched(&invoice))?;
        }

        info!(
            invoice_id = %invoice.id,
            invoice_no = %invoice.invoice_no,
            kind = invoice.kind.label(),
            grand_total = %invoice.totals.grand_total,
            amount_paid = %invoice.amount_paid,
            "Invoice posted"
        );
        Ok((work.commit(), invoice))
    }

    /// Replaces a posted invoice.
    ///
    /// The old invoice's stock and balance effects are fully reversed and its
    /// companion transaction removed before the new content is posted. The
    /// invoice keeps its ID, sequence, and (unless overridden) number; a
    /// companion that survives the edit keeps its ID and position.
    ///
    /// # Errors
    ///
    /// `InvoiceNotFound` for an unknown ID, `DanglingInvoiceParty` if the old
    /// invoice's party no longer exists, plus every error of [`Self::create`].
    pub fn edit(
        snapshot: &Snapshot,
        invoice_id: InvoiceId,
        input: &InvoiceInput,
        config: &EngineConfig,
    ) -> Result<(Snapshot, Invoice), LedgerError> {
        let index = Self::position(snapshot, invoice_id)?;
        let old = &snapshot.invoices[index];
        let invoice_no = input
            .invoice_no
            .clone()
            .unwrap_or_else(|| old.invoice_no.clone());
        let invoice = Self::build(snapshot, input, old.id, invoice_no, old.sequence, config)?;

        let mut work = snapshot.clone();
        let removed = Self::reverse_effects(&mut work, old)?;
        Self::apply_effects(&mut work, &invoice, Sign::Apply)?;
        let slot = removed.map(|(position, companion)| CompanionSlot {
            id: companion.id,
            sequence: companion.sequence,
            position,
        });
        Self::insert_companion(&mut work, &invoice, slot);
        work.invoices[index] = invoice.clone();

        if config.enforce_non_negative_stock {
            let mut touched = StockMutator::touched(old);
            touched.extend(StockMutator::touched(&invoice));
            StockMutator::ensure_non_negative(&work.products, &touched)?;
        }

        info!(
            invoice_id = %invoice.id,
            invoice_no = %invoice.invoice_no,
            grand_total = %invoice.totals.grand_total,
            amount_paid = %invoice.amount_paid,
            "Invoice edited"
        );
        Ok((work.commit(), invoice))
    }

    /// Deletes a posted invoice, reversing its effects and dropping its
    /// companion transaction.
    ///
    /// # Errors
    ///
    /// `InvoiceNotFound`, `DanglingInvoiceParty`, `UnknownProduct` (a line's
    /// product was removed), or `NegativeStock` when enforced.
    pub fn delete(
        snapshot: &Snapshot,
        invoice_id: InvoiceId,
        config: &EngineConfig,
    ) -> Result<Snapshot, LedgerError> {
        let index = Self::position(snapshot, invoice_id)?;
        let mut work = snapshot.clone();
        let old = work.invoices.remove(index);
        Self::reverse_effects(&mut work, &old)?;

        if config.enforce_non_negative_stock {
            StockMutator::ensure_non_negative(&work.products, &StockMutator::touched(&old))?;
        }

        info!(
            invoice_id = %old.id,
            invoice_no = %old.invoice_no,
            "Invoice deleted"
        );
        Ok(work.commit())
    }

    fn position(snapshot: &Snapshot, invoice_id: InvoiceId) -> Result<usize, LedgerError> {
        snapshot
            .invoices
            .iter()
            .position(|i| i.id == invoice_id)
            .ok_or(LedgerError::InvoiceNotFound(invoice_id))
    }

    fn prefix(kind: InvoiceKind, config: &EngineConfig) -> &str {
        match kind {
            InvoiceKind::Sale => &config.invoice_prefix_sale,
            InvoiceKind::Purchase => &config.invoice_prefix_purchase,
        }
    }

    /// Validates `input` against `snapshot` and builds the invoice record.
    ///
    /// Runs before any mutation.
    fn build(
        snapshot: &Snapshot,
        input: &InvoiceInput,
        id: InvoiceId,
        invoice_no: String,
        sequence: u64,
        config: &EngineConfig,
    ) -> Result<Invoice, LedgerError> {
        if invoice_no.trim().is_empty() {
            return Err(LedgerError::EmptyInvoiceNumber);
        }
        if snapshot
            .invoices
            .iter()
            .any(|i| i.id != id && i.kind == input.kind && i.invoice_no == invoice_no)
        {
            return Err(LedgerError::DuplicateInvoiceNumber(invoice_no));
        }

        let party = Self::resolve_party(snapshot, input)?;
        if input.lines.is_empty() {
            return Err(LedgerError::EmptyLineItems);
        }
        let lines = input
            .lines
            .iter()
            .enumerate()
            .map(|(index, line)| Self::resolve_line(snapshot, input.kind, index, line))
            .collect::<Result<Vec<_>, _>>()?;

        if input.amount_paid < Decimal::ZERO {
            return Err(LedgerError::NegativeAmountPaid);
        }
        let sub_type = match input.kind {
            InvoiceKind::Sale => input.sub_type,
            InvoiceKind::Purchase => None,
        };
        let amount_paid = if sub_type.is_some_and(|s| s.forbids_payment()) {
            Decimal::ZERO
        } else {
            input.amount_paid
        };

        let totals = compute_totals(&lines, input.tax_enabled)?;
        if amount_paid > totals.grand_total {
            if config.reject_overpayment {
                return Err(LedgerError::Overpayment {
                    paid: amount_paid,
                    total: totals.grand_total,
                });
            }
            warn!(
                invoice_no = %invoice_no,
                paid = %amount_paid,
                total = %totals.grand_total,
                "Amount paid exceeds grand total; recording advance"
            );
        }

        Ok(Invoice {
            id,
            invoice_no,
            kind: input.kind,
            sub_type,
            date: input.date,
            party,
            lines,
            tax_enabled: input.tax_enabled,
            totals,
            amount_paid,
            payment_mode: input.payment_mode,
            remarks: input.remarks.clone(),
            sequence,
        })
    }

    fn resolve_party(
        snapshot: &Snapshot,
        input: &InvoiceInput,
    ) -> Result<InvoiceParty, LedgerError> {
        match &input.party {
            PartySelection::Existing(party_id) => {
                let party = snapshot
                    .party(*party_id)
                    .ok_or(LedgerError::UnknownParty(*party_id))?;
                let expected = input.kind.party_role();
                if party.role != expected {
                    return Err(LedgerError::PartyRoleMismatch {
                        party_id: party.id,
                        expected,
                        actual: party.role,
                    });
                }
                Ok(InvoiceParty {
                    party_id: Some(party.id),
                    name: party.name.clone(),
                    phone: party.phone.clone(),
                    address: party.address.clone(),
                    area: party.area.clone(),
                    sub_area: party.sub_area.clone(),
                })
            }
            PartySelection::Manual(manual) => {
                let name = manual.name.trim();
                if name.is_empty() {
                    return Err(LedgerError::MissingPartyIdentity);
                }
                Ok(InvoiceParty {
                    party_id: None,
                    name: name.to_string(),
                    phone: manual.phone.clone(),
                    address: manual.address.clone(),
                    area: manual.area.clone(),
                    sub_area: manual.sub_area.clone(),
                })
            }
        }
    }

    fn resolve_line(
        snapshot: &Snapshot,
        kind: InvoiceKind,
        index: usize,
        input: &InvoiceLineInput,
    ) -> Result<InvoiceLine, LedgerError> {
        if input.quantity == 0 {
            return Err(LedgerError::NonPositiveQuantity { line: index });
        }
        let product = match input.product_id {
            Some(product_id) => Some(
                snapshot
                    .product(product_id)
                    .ok_or(LedgerError::UnknownProduct(product_id))?,
            ),
            None => None,
        };

        let catalogue_rate = product.map(|p| match kind {
            InvoiceKind::Sale => p.sale_price,
            InvoiceKind::Purchase => p.purchase_price,
        });
        let rate = input.rate.or(catalogue_rate).unwrap_or(Decimal::ZERO);
        if rate < Decimal::ZERO {
            return Err(LedgerError::NegativeRate { line: index });
        }
        let tax_rate = input
            .tax_rate
            .or(product.map(|p| p.tax_rate))
            .unwrap_or(Decimal::ZERO);
        if tax_rate < Decimal::ZERO || tax_rate > Decimal::ONE_HUNDRED {
            return Err(LedgerError::InvalidTaxRate {
                line: index,
                rate: tax_rate,
            });
        }

        let description = input
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .or_else(|| product.map(|p| p.name.clone()))
            .unwrap_or_else(|| "Item".to_string());

        Ok(InvoiceLine {
            product_id: input.product_id,
            description,
            hsn: input.hsn.clone().or_else(|| product.and_then(|p| p.hsn.clone())),
            quantity: input.quantity,
            rate,
            tax_rate,
        })
    }

    /// Applies (or reverses) the stock and balance effects of `invoice`.
    fn apply_effects(
        work: &mut Snapshot,
        invoice: &Invoice,
        sign: Sign,
    ) -> Result<(), LedgerError> {
        work.products = StockMutator::apply_invoice(&work.products, invoice, sign)?;

        if let Some(party_id) = invoice.party_id() {
            let Some(party) = work.party_mut(party_id) else {
                return Err(match sign {
                    Sign::Apply => LedgerError::UnknownParty(party_id),
                    Sign::Reverse => LedgerError::DanglingInvoiceParty {
                        invoice_id: invoice.id,
                        party_id,
                    },
                });
            };
            let delta = BalanceMutator::invoice_delta(invoice);
            *party = BalanceMutator::apply_balance(party, delta, sign)?;
        }
        Ok(())
    }

    /// Reverses `invoice` and removes its companion transaction.
    ///
    /// Returns the removed companion and the log position it occupied.
    fn reverse_effects(
        work: &mut Snapshot,
        invoice: &Invoice,
    ) -> Result<Option<(usize, Transaction)>, LedgerError> {
        Self::apply_effects(work, invoice, Sign::Reverse)?;
        let removed = work
            .transactions
            .iter()
            .position(|t| t.invoice_id == Some(invoice.id))
            .map(|position| (position, work.transactions.remove(position)));
        Ok(removed)
    }

    /// Records the companion transaction for the amount paid, if any.
    ///
    /// A reused slot puts the companion back where the previous one stood;
    /// otherwise it is appended with a fresh ID and sequence.
    fn insert_companion(work: &mut Snapshot, invoice: &Invoice, slot: Option<CompanionSlot>) {
        if invoice.amount_paid <= Decimal::ZERO {
            return;
        }
        let (id, sequence, position) = match slot {
            Some(slot) => (slot.id, slot.sequence, Some(slot.position)),
            None => (TransactionId::new(), work.take_sequence(), None),
        };
        let companion = Transaction {
            id,
            date: invoice.date,
            description: format!(
                "{} #{} Post. Party: {}. Ref: {}",
                invoice.kind.label(),
                invoice.invoice_no,
                invoice.party.name,
                invoice.remarks.as_deref().unwrap_or("Direct Entry")
            ),
            amount: invoice.amount_paid,
            direction: invoice.kind.settlement_direction(),
            category: invoice.kind.label().to_string(),
            party_id: invoice.party_id(),
            invoice_id: Some(invoice.id),
            payment_mode: Some(invoice.payment_mode),
            sequence,
        };
        match position {
            Some(position) if position <= work.transactions.len() => {
                work.transactions.insert(position, companion);
            }
            _ => work.transactions.push(companion),
        }
    }
}
