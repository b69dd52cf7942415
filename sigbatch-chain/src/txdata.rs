//! Signing data shared by every input of a transaction.

use crate::amount::Amount;

/// Per-transaction signing data, computed once before any of the
/// transaction's inputs are checked.
///
/// Every signature checker for the transaction borrows the same value.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PrecomputedTxData {
    /// The amounts of the outputs spent by each input, in input order.
    ///
    /// Empty until the spent outputs are known.
    spent_amounts: Vec<Amount>,
}

impl PrecomputedTxData {
    /// Returns signing data for a transaction whose inputs spend
    /// `spent_amounts`, in input order.
    pub fn new(spent_amounts: Vec<Amount>) -> Self {
        Self { spent_amounts }
    }

    /// Returns `true` if the spent outputs of every input are known.
    pub fn has_spent_outputs(&self) -> bool {
        !self.spent_amounts.is_empty()
    }

    /// Returns the amounts spent by each input.
    pub fn spent_amounts(&self) -> &[Amount] {
        &self.spent_amounts
    }

    /// Returns the amount spent by the input at `input_index`, if it is known.
    pub fn spent_amount(&self, input_index: usize) -> Option<Amount> {
        self.spent_amounts.get(input_index).copied()
    }
}
