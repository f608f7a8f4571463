//! Per-call execution context.

use paymentpro_types::Address;
use rust_decimal::Decimal;

/// Who is calling, and how much native currency they attached.
///
/// Only the payment entry points collect `value`; every other entry point
/// ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    pub value: Decimal,
}

impl CallContext {
    #[must_use]
    pub fn new(caller: Address) -> Self {
        Self {
            caller,
            value: Decimal::ZERO,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: Decimal) -> Self {
        self.value = value;
        self
    }
}
