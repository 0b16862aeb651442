// In crates/execution/src/simulated.rs

use core_types::Side;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::types::{Closed, Execution, OrderRequest, Portfolio, Position, SimulationSettings};
use crate::{Error, Executor, Result, to_price};

/// Fills every order in full at the given price, charging a flat commission.
pub struct SimulatedExecutor {
    position_size: Decimal,
    commission_rate: Decimal,
}

impl SimulatedExecutor {
    pub fn new(settings: SimulationSettings) -> Result<Self> {
        settings.validate()?;
        let position_size = Decimal::from_f64(settings.position_size).ok_or_else(|| {
            Error::InvalidSettings(format!("position_size {} is not representable", settings.position_size))
        })?;
        let commission_rate = Decimal::from_f64(settings.commission_rate).ok_or_else(|| {
            Error::InvalidSettings(format!("commission_rate {} is not representable", settings.commission_rate))
        })?;
        Ok(Self { position_size, commission_rate })
    }

    fn fee(&self, quantity: Decimal, price: Decimal) -> Result<Decimal> {
        quantity
            .checked_mul(price)
            .and_then(|notional| notional.checked_mul(self.commission_rate))
            .ok_or(Error::Overflow("computing a fee"))
    }
}

impl Executor for SimulatedExecutor {
    fn name(&self) -> &'static str {
        "SimulatedExecutor"
    }

    fn execute(
        &mut self,
        order: &OrderRequest,
        current_price: f64,
        day: usize,
        portfolio: &mut Portfolio,
    ) -> Result<Option<Execution>> {
        let Some(target) = order.decision.target_side() else {
            return Ok(None);
        };
        let held = portfolio.positions.get(&order.row);
        if held.is_some_and(|p| p.side == target) {
            return Ok(None);
        }
        let price = to_price(current_price, order.row, day)?;

        // --- 1. Closing leg: unwind whatever opposite position is held ---
        let (close_flow, exit_fee, close_qty, realized) = match held {
            Some(position) => {
                let fee = self.fee(position.quantity, price)?;
                let realized = position
                    .gross_pnl(price)?
                    .checked_sub(position.entry_fee)
                    .and_then(|pnl| pnl.checked_sub(fee))
                    .ok_or(Error::Overflow("realizing P&L"))?;
                (position.exposure(price)?, fee, position.quantity, realized)
            }
            None => (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        };

        // --- 2. Opening leg: a long pays for its units, a short receives the proceeds ---
        let entry_fee = self.fee(self.position_size, price)?;
        let notional = self
            .position_size
            .checked_mul(price)
            .ok_or(Error::Overflow("sizing the order"))?;
        let open_flow = match target {
            Side::Long => -notional,
            Side::Short => notional,
        };

        // --- 3. Veto anything that would leave the account with negative cash ---
        let net_flow = close_flow
            .checked_add(open_flow)
            .and_then(|flow| flow.checked_sub(exit_fee))
            .and_then(|flow| flow.checked_sub(entry_fee))
            .ok_or(Error::Overflow("netting cash flows"))?;
        let cash_after = portfolio
            .cash
            .checked_add(net_flow)
            .ok_or(Error::Overflow("updating cash"))?;
        if cash_after < Decimal::ZERO {
            return Err(Error::InsufficientCash {
                row: order.row,
                required: -net_flow,
                available: portfolio.cash,
            });
        }
        let quantity = close_qty
            .checked_add(self.position_size)
            .ok_or(Error::Overflow("sizing the order"))?;
        let fee = exit_fee
            .checked_add(entry_fee)
            .ok_or(Error::Overflow("computing a fee"))?;

        // --- 4. Update portfolio state ---
        portfolio.cash = cash_after;
        let closed = portfolio
            .positions
            .insert(
                order.row,
                Position {
                    side: target,
                    quantity: self.position_size,
                    entry_price: price,
                    entry_day: day,
                    entry_fee,
                    last_price: price,
                },
            )
            .map(|position| Closed { position, exit_fee, pnl: realized });

        tracing::debug!(row = order.row, day, side = %target, %price, "Order filled.");

        Ok(Some(Execution {
            row: order.row,
            day,
            side: target,
            price,
            quantity,
            fee,
            closed,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Decision;
    use ndarray::array;
    use rust_decimal_macros::dec;

    fn executor(commission_rate: f64) -> SimulatedExecutor {
        SimulatedExecutor::new(SimulationSettings { position_size: 10.0, commission_rate }).unwrap()
    }

    fn order(decision: Decision) -> OrderRequest {
        OrderRequest { row: 0, decision }
    }

    #[test]
    fn buy_opens_a_long_and_sell_flips_it_short() {
        let mut executor = executor(0.0);
        let mut portfolio = Portfolio::new(dec!(1000));

        let fill = executor.execute(&order(Decision::Buy), 20.0, 1, &mut portfolio).unwrap().unwrap();
        assert_eq!(fill.side, Side::Long);
        assert_eq!(fill.closed, None);
        assert_eq!(portfolio.cash, dec!(800));

        let fill = executor.execute(&order(Decision::Sell), 25.0, 4, &mut portfolio).unwrap().unwrap();
        assert_eq!(fill.side, Side::Short);
        assert_eq!(fill.quantity, dec!(20));
        let closed = fill.closed.unwrap();
        assert_eq!(closed.pnl, dec!(50));
        // +250 for selling the long, +250 for opening the short.
        assert_eq!(portfolio.cash, dec!(1300));
        assert_eq!(portfolio.mark_to_market(array![25.0].view(), 4).unwrap(), dec!(1050));
    }

    #[test]
    fn repeated_and_hold_orders_do_nothing() {
        let mut executor = executor(0.0);
        let mut portfolio = Portfolio::new(dec!(1000));

        assert!(executor.execute(&order(Decision::Hold), 20.0, 1, &mut portfolio).unwrap().is_none());
        executor.execute(&order(Decision::Sell), 20.0, 1, &mut portfolio).unwrap();
        assert!(executor.execute(&order(Decision::Sell), 18.0, 2, &mut portfolio).unwrap().is_none());
        assert_eq!(portfolio.cash, dec!(1200));
        portfolio.mark_to_market(array![18.0].view(), 2).unwrap();
        assert_eq!(portfolio.unrealized_pnl().unwrap(), dec!(20));
    }

    #[test]
    fn commission_is_charged_on_both_legs() {
        let mut executor = executor(0.01);
        let mut portfolio = Portfolio::new(dec!(1000));

        let fill = executor.execute(&order(Decision::Buy), 10.0, 0, &mut portfolio).unwrap().unwrap();
        assert_eq!(fill.fee, dec!(1));
        assert_eq!(portfolio.cash, dec!(899));

        let fill = executor.execute(&order(Decision::Sell), 10.0, 1, &mut portfolio).unwrap().unwrap();
        assert_eq!(fill.fee, dec!(2));
        assert_eq!(fill.closed.unwrap().pnl, dec!(-2));
        assert_eq!(portfolio.cash, dec!(1097));
    }

    #[test]
    fn unaffordable_orders_are_vetoed_without_side_effects() {
        let mut executor = executor(0.0);
        let mut portfolio = Portfolio::new(dec!(50));

        let err = executor.execute(&order(Decision::Buy), 20.0, 0, &mut portfolio).unwrap_err();
        assert!(matches!(err, Error::InsufficientCash { .. }));
        assert_eq!(portfolio.cash, dec!(50));
        assert!(portfolio.positions.is_empty());
    }

    #[test]
    fn non_positive_prices_are_rejected() {
        let mut executor = executor(0.0);
        let mut portfolio = Portfolio::new(dec!(50));
        let err = executor.execute(&order(Decision::Sell), 0.0, 3, &mut portfolio).unwrap_err();
        assert_eq!(err, Error::InvalidPrice { row: 0, day: 3, price: 0.0 });
        assert!(executor.execute(&order(Decision::Sell), f64::NAN, 3, &mut portfolio).is_err());
    }

    #[test]
    fn overflowing_orders_are_rejected_without_side_effects() {
        let mut executor =
            SimulatedExecutor::new(SimulationSettings { position_size: 1e9, commission_rate: 0.0 }).unwrap();
        let mut portfolio = Portfolio::new(dec!(1000));

        let err = executor.execute(&order(Decision::Sell), 1e20, 1, &mut portfolio).unwrap_err();
        assert!(matches!(err, Error::Overflow(_)));
        assert_eq!(portfolio.cash, dec!(1000));
        assert!(portfolio.positions.is_empty());
    }

    #[test]
    fn settings_are_validated() {
        let bad = SimulationSettings { position_size: 0.0, commission_rate: 0.0 };
        assert!(SimulatedExecutor::new(bad).is_err());
        let bad = SimulationSettings { position_size: 1.0, commission_rate: 1.5 };
        assert!(SimulatedExecutor::new(bad).is_err());
    }
}
