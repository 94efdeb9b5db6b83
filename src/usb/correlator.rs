//! Pairs submit URBs with their completions.
//!
//! usbmon recycles URB ids, so an id only identifies the most recent
//! transaction opened under it. Requests live in an arena in the order they
//! were submitted and the open map points into it by index.

use std::collections::HashMap;

use log::{debug, warn};

use super::urb::{Urb, UrbError};

/// What the correlator did with one URB
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correlation {
    /// New transaction at this index of the transaction list
    Opened(usize),
    /// Reply attached to the transaction at this index
    Paired(usize),
    OrphanReply { id: String },
    DuplicateRequest { id: String },
    DuplicateReply { id: String },
}

impl Correlation {
    pub fn is_dropped(&self) -> bool {
        !matches!(self, Correlation::Opened(_) | Correlation::Paired(_))
    }
}

#[derive(Debug, Default)]
pub struct TransactionCorrelator {
    transactions: Vec<Urb>,
    open: HashMap<String, usize>,
    last_opened: Option<String>,
}

impl TransactionCorrelator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next URB in capture order.
    ///
    /// Anomalies are logged and reported through the returned
    /// [`Correlation`]; only a broken reply invariant is an error.
    pub fn process(&mut self, urb: Urb) -> Result<Correlation, UrbError> {
        let Some(&index) = self.open.get(&urb.id) else {
            if urb.is_request() {
                return Ok(self.open_transaction(urb));
            }
            warn!("No request found for {}. Dropping packet.", urb.id);
            return Ok(Correlation::OrphanReply { id: urb.id });
        };

        if urb.is_request() {
            let still_open = self.transactions[index].reply().is_none();
            if still_open && self.last_opened.as_deref() == Some(urb.id.as_str()) {
                warn!("Dropping duplicate request for {}.", urb.id);
                return Ok(Correlation::DuplicateRequest { id: urb.id });
            }
            // Id was recycled for a new transaction.
            return Ok(self.open_transaction(urb));
        }

        let request = &mut self.transactions[index];
        if request.reply().is_some() {
            warn!("Dropping duplicate reply for {}.", urb.id);
            return Ok(Correlation::DuplicateReply { id: urb.id });
        }
        debug!("Paired reply for {} ({} bytes)", urb.id, urb.payload.len());
        request.add_reply(urb)?;
        Ok(Correlation::Paired(index))
    }

    fn open_transaction(&mut self, urb: Urb) -> Correlation {
        let index = self.transactions.len();
        debug!(
            "Opened transaction {} for {} ({})",
            index, urb.id, urb.request_type
        );
        self.open.insert(urb.id.clone(), index);
        self.last_opened = Some(urb.id.clone());
        self.transactions.push(urb);
        Correlation::Opened(index)
    }

    pub fn transactions(&self) -> &[Urb] {
        &self.transactions
    }

    /// Consume the correlator, yielding requests in submission order.
    pub fn finish(self) -> Vec<Urb> {
        self.transactions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usb::packet_types::{URB_COMPLETE, URB_SUBMIT};
    use crate::usb::urb::tests::urb_bytes;

    fn urb(id: u64, kind: u8, payload: &[u8]) -> Urb {
        Urb::parse(&urb_bytes(id, kind, 0x09, payload)).unwrap()
    }

    #[test]
    fn pairs_submit_with_complete() {
        let mut correlator = TransactionCorrelator::new();
        assert_eq!(
            correlator.process(urb(1, URB_SUBMIT, &[1, 2])).unwrap(),
            Correlation::Opened(0)
        );
        assert_eq!(
            correlator.process(urb(1, URB_COMPLETE, &[3])).unwrap(),
            Correlation::Paired(0)
        );

        let list = correlator.finish();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].reply().map(|r| r.payload.clone()), Some(vec![3]));
    }

    #[test]
    fn recycled_id_opens_new_transaction() {
        let mut correlator = TransactionCorrelator::new();
        for packet in [
            urb(0xa, URB_SUBMIT, &[1]),
            urb(0xa, URB_COMPLETE, &[2]),
            urb(0xb, URB_SUBMIT, &[3]),
            urb(0xb, URB_COMPLETE, &[4]),
            urb(0xa, URB_SUBMIT, &[5]),
            urb(0xa, URB_COMPLETE, &[6]),
        ] {
            assert!(!correlator.process(packet).unwrap().is_dropped());
        }

        let list = correlator.finish();
        assert_eq!(list.len(), 3);
        assert!(list.iter().all(|tx| tx.reply().is_some()));
        assert_eq!(list[0].reply().unwrap().payload, vec![2]);
        assert_eq!(list[2].payload, vec![5]);
        assert_eq!(list[2].reply().unwrap().payload, vec![6]);
    }

    #[test]
    fn reuse_directly_after_close_opens_new_transaction() {
        let mut correlator = TransactionCorrelator::new();
        correlator.process(urb(0xa, URB_SUBMIT, &[1])).unwrap();
        correlator.process(urb(0xa, URB_COMPLETE, &[2])).unwrap();
        assert_eq!(
            correlator.process(urb(0xa, URB_SUBMIT, &[3])).unwrap(),
            Correlation::Opened(1)
        );
        assert_eq!(
            correlator.process(urb(0xa, URB_COMPLETE, &[4])).unwrap(),
            Correlation::Paired(1)
        );

        let list = correlator.finish();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].reply().unwrap().payload, vec![2]);
        assert_eq!(list[1].reply().unwrap().payload, vec![4]);
    }

    #[test]
    fn reopening_an_unanswered_id_after_another_request() {
        let mut correlator = TransactionCorrelator::new();
        correlator.process(urb(1, URB_SUBMIT, &[])).unwrap();
        correlator.process(urb(2, URB_SUBMIT, &[])).unwrap();
        assert_eq!(
            correlator.process(urb(1, URB_SUBMIT, &[])).unwrap(),
            Correlation::Opened(2)
        );
        assert_eq!(
            correlator.process(urb(1, URB_COMPLETE, &[])).unwrap(),
            Correlation::Paired(2)
        );
        assert!(correlator.transactions()[0].reply().is_none());
    }

    #[test]
    fn duplicate_submit_is_dropped() {
        let mut correlator = TransactionCorrelator::new();
        correlator.process(urb(1, URB_SUBMIT, &[1])).unwrap();
        let outcome = correlator.process(urb(1, URB_SUBMIT, &[2])).unwrap();

        assert!(matches!(outcome, Correlation::DuplicateRequest { .. }));
        assert!(outcome.is_dropped());
        let list = correlator.finish();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].payload, vec![1]);
    }

    #[test]
    fn orphan_complete_is_dropped() {
        let mut correlator = TransactionCorrelator::new();
        let outcome = correlator.process(urb(9, URB_COMPLETE, &[])).unwrap();

        assert_eq!(
            outcome,
            Correlation::OrphanReply { id: "0900000000000000".to_string() }
        );
        assert!(correlator.finish().is_empty());
    }

    #[test]
    fn second_reply_is_dropped() {
        let mut correlator = TransactionCorrelator::new();
        correlator.process(urb(1, URB_SUBMIT, &[])).unwrap();
        correlator.process(urb(1, URB_COMPLETE, &[1])).unwrap();
        let outcome = correlator.process(urb(1, URB_COMPLETE, &[2])).unwrap();

        assert!(matches!(outcome, Correlation::DuplicateReply { .. }));
        let list = correlator.finish();
        assert_eq!(list[0].reply().unwrap().payload, vec![1]);
    }

    #[test]
    fn interleaved_ids_pair_independently() {
        let mut correlator = TransactionCorrelator::new();
        correlator.process(urb(1, URB_SUBMIT, &[])).unwrap();
        correlator.process(urb(2, URB_SUBMIT, &[])).unwrap();
        assert_eq!(
            correlator.process(urb(1, URB_COMPLETE, &[0x11])).unwrap(),
            Correlation::Paired(0)
        );
        assert_eq!(
            correlator.process(urb(2, URB_COMPLETE, &[0x22])).unwrap(),
            Correlation::Paired(1)
        );
    }
}
