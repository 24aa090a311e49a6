//! Values paired with the hashing cost of producing them.

use crate::OperationCost;

/// Wrapped operation result with associated cost.
#[must_use]
#[derive(Debug, Eq, PartialEq)]
pub struct CostContext<T> {
    /// Wrapped operation's return value.
    pub value: T,
    /// Cost of the operation.
    pub cost: OperationCost,
}

impl<T> CostContext<T> {
    /// Take the value out, adding its cost to `acc_cost`.
    pub fn unwrap_add_cost(self, acc_cost: &mut OperationCost) -> T {
        *acc_cost += self.cost;
        self.value
    }

    /// Take the value out, dropping the cost.
    pub fn unwrap(self) -> T {
        self.value
    }
}

/// `Result` wrapped into a `CostContext`.
pub type CostResult<T, E> = CostContext<Result<T, E>>;

/// Extension trait to attach a cost to any value.
pub trait CostsExt {
    /// Wraps the value into a `CostContext` carrying `cost`.
    fn wrap_with_cost(self, cost: OperationCost) -> CostContext<Self>
    where
        Self: Sized,
    {
        CostContext { value: self, cost }
    }
}

impl<T> CostsExt for T {}

/// `?` for a `CostResult` inside a function returning one.
///
/// The cost of the evaluated expression is added to the accumulator `$cost`
/// whether or not it failed; on error the function returns early with the
/// accumulated cost, on success the macro yields the unwrapped value.
#[macro_export]
macro_rules! cost_return_on_error {
    ( &mut $cost:ident, $($body:tt)+ ) => {
        {
            use $crate::CostsExt;
            let result_with_cost = { $($body)+ };
            let result = result_with_cost.unwrap_add_cost(&mut $cost);
            match result {
                Ok(x) => x,
                Err(e) => return Err(e).wrap_with_cost($cost),
            }
        }
    };
}

/// Same as `cost_return_on_error` but for a plain `Result`: on error the
/// previously accumulated cost is returned and nothing is added.
#[macro_export]
macro_rules! cost_return_on_error_no_add {
    ( &$cost:ident, $($body:tt)+ ) => {
        {
            use $crate::CostsExt;
            let result = { $($body)+ };
            match result {
                Ok(x) => x,
                Err(e) => return Err(e).wrap_with_cost($cost),
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_merges() -> OperationCost {
        OperationCost::with_hash_node_calls(2)
    }

    #[test]
    fn test_unwrap_add_cost_accumulates() {
        let mut acc = OperationCost::with_hash_byte_calls(1);
        let value = 7u8.wrap_with_cost(two_merges()).unwrap_add_cost(&mut acc);
        assert_eq!(value, 7);
        assert_eq!(
            acc,
            OperationCost {
                hash_byte_calls: 1,
                hash_node_calls: 2,
            }
        );
    }

    fn failing_after_work() -> CostResult<u8, &'static str> {
        let mut cost = OperationCost::default();
        let a = cost_return_on_error!(
            &mut cost,
            Ok::<_, &'static str>(1u8).wrap_with_cost(two_merges())
        );
        let b: u8 = cost_return_on_error_no_add!(&cost, Err("boom"));
        Ok(a + b).wrap_with_cost(cost)
    }

    #[test]
    fn test_early_return_keeps_accumulated_cost() {
        let ctx = failing_after_work();
        assert_eq!(ctx.value, Err("boom"));
        assert_eq!(ctx.cost, two_merges());
    }

    fn failing_with_cost() -> CostResult<u8, &'static str> {
        let mut cost = OperationCost::with_hash_byte_calls(1);
        let value = cost_return_on_error!(&mut cost, Err("boom").wrap_with_cost(two_merges()));
        Ok(value).wrap_with_cost(cost)
    }

    #[test]
    fn test_failed_expression_cost_is_counted() {
        let ctx = failing_with_cost();
        assert_eq!(ctx.value, Err("boom"));
        assert_eq!(ctx.cost.hash_calls(), 3);
    }
}
