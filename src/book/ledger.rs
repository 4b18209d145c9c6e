/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::book::currency::Currency;
use crate::book::quote::{Quote, RateBoard};
use crate::book::transaction::{Side, Transaction};
use crate::store::snapshot::Snapshot;
use anyhow::{bail, Error};
use std::collections::BTreeMap;

/// The central data structure of this system: one shop's entire financial
/// state. It owns the rate board, the cash drawer balances, the trade
/// history, per-currency weighted average costs, and the running realized
/// profit, and its methods are the only way any of that mutates.
///
/// All arithmetic is plain f64 with no internal rounding; presentation is
/// where rounding happens. Balances are allowed to go negative, because the
/// drawer count is whatever it is; warning the operator about an oversell is
/// the front end's job.
///
/// Every mutation is a read-then-write over the whole state and there is no
/// interior locking, so a multi-threaded host must serialize access with its
/// own mutex or single-writer queue.
#[derive(Debug)]
pub struct Ledger {
	rates: RateBoard,

	/// Cash on hand per currency, in native units
	holdings: BTreeMap<Currency, f64>,

	/// Most recent first
	transactions: Vec<Transaction>,

	/// Cumulative THB gain or loss recognized on sells
	realized_profit: f64,

	/// THB per single unit of the currency (not per quotation basis).
	/// A missing or zero entry means "no cost history".
	average_costs: BTreeMap<Currency, f64>,

	/// THB the drawer starts with on a fresh book; kept so a hard reset
	/// can restore it
	opening_capital: f64,
}

impl Ledger {
	pub fn new(opening_capital: f64) -> Self {
		Self {
			rates: RateBoard::default(),
			holdings: Self::default_holdings(opening_capital),
			transactions: vec![],
			realized_profit: 0.0,
			average_costs: Default::default(),
			opening_capital,
		}
	}

	pub fn from_snapshot(snapshot: Snapshot, opening_capital: f64) -> Self {
		Self {
			rates: RateBoard::from_quotes(snapshot.quotes),
			holdings: snapshot.holdings,
			transactions: snapshot.transactions,
			realized_profit: snapshot.realized_profit,
			average_costs: snapshot.average_costs,
			opening_capital,
		}
	}

	/// The full persistable state, as one unit. Everything the engine
	/// mutates is in here, so writing this after any mutation is what keeps
	/// the stored copy coherent.
	pub fn snapshot(&self) -> Snapshot {
		Snapshot {
			quotes: self.rates.quotes().clone(),
			holdings: self.holdings.clone(),
			transactions: self.transactions.clone(),
			realized_profit: self.realized_profit,
			average_costs: self.average_costs.clone(),
		}
	}

	pub fn default_holdings(opening_capital: f64) -> BTreeMap<Currency, f64> {
		let mut holdings = BTreeMap::new();
		for currency in Currency::ALL {
			holdings.insert(currency, 0.0);
		}
		holdings.insert(Currency::BASE, opening_capital);
		holdings
	}

	// -----------
	// -- INPUT --
	// -----------

	/// Records one trade at the counter and applies it to the book.
	///
	/// On a buy, the weighted average cost of the currency is re-blended
	/// with this acquisition. On a sell, profit is recognized against the
	/// carried cost and the average is left alone, whatever the remaining
	/// balance ends up being. Either way the drawer moves by the THB
	/// counter-value and a record is appended.
	///
	/// The rate is authoritative as passed; the board is never consulted
	/// for it. Amount is in native units of the currency, rate is per its
	/// quotation basis.
	pub fn apply(
		&mut self,
		side: Side,
		currency: Currency,
		amount: f64,
		rate: f64,
	) -> Result<Transaction, Error> {
		if !currency.is_foreign() {
			bail!("Cannot trade {} against itself", Currency::BASE);
		}
		if !amount.is_finite() || amount <= 0.0 {
			bail!("Amount must be a positive number");
		}
		if !rate.is_finite() || rate <= 0.0 {
			bail!("Rate must be a positive number");
		}

		let basis = f64::from(currency.basis());
		let total = (amount / basis) * rate;

		match side {
			Side::Buy => {
				let unit_price = rate / basis;
				let held = self.holding(currency);

				// Value what we already hold at the carried cost, falling
				// back to the board and then to this very trade when there
				// is no history to carry.
				let carried = self.cost_basis_or(currency, unit_price);

				let new_total_amount = held + amount;
				let average = if new_total_amount > 0.0 {
					(held * carried + total) / new_total_amount
				} else {
					unit_price
				};
				self.average_costs.insert(currency, average);

				*self.holdings.entry(Currency::BASE).or_insert(0.0) -= total;
				*self.holdings.entry(currency).or_insert(0.0) += amount;
			},
			Side::Sell => {
				let unit_cost = self.cost_basis_or(currency, 0.0);
				self.realized_profit += total - amount * unit_cost;

				*self.holdings.entry(Currency::BASE).or_insert(0.0) += total;
				*self.holdings.entry(currency).or_insert(0.0) -= amount;
			},
		}

		let record = Transaction::new(side, currency, amount, rate, total);
		self.transactions.insert(0, record.clone());
		Ok(record)
	}

	/// Overwrites one balance directly, with no trade record and no effect
	/// on profit. For foreign currencies the carried average cost is thrown
	/// away and repriced at the board's current buy side: a hand-counted
	/// correction should neither inherit a stale average nor sneak in as
	/// free inventory that would inflate the next sell's profit.
	pub fn set_holding(
		&mut self,
		currency: Currency,
		amount: f64,
	) -> Result<(), Error> {
		if !amount.is_finite() {
			bail!("Amount must be a number");
		}

		self.holdings.insert(currency, amount);

		if currency.is_foreign() {
			self.average_costs
				.insert(currency, self.rates.buy_unit_price(currency));
		}

		Ok(())
	}

	/// Posts a new full board. No validation; see RateBoard.
	pub fn set_quotes(&mut self, quotes: BTreeMap<Currency, Quote>) {
		self.rates.set_quotes(quotes);
	}

	/// Clears the trade history and the realized profit counter, leaving
	/// holdings, quotes, and cost history in place. The day-close variant.
	pub fn soft_reset(&mut self) {
		self.transactions.clear();
		self.realized_profit = 0.0;
	}

	/// Puts the whole book back to its first-run state, opening capital
	/// included.
	pub fn full_reset(&mut self) {
		*self = Ledger::new(self.opening_capital);
	}

	// ------------
	// -- OUTPUT --
	// ------------

	pub fn rates(&self) -> &RateBoard {
		&self.rates
	}

	pub fn holdings(&self) -> &BTreeMap<Currency, f64> {
		&self.holdings
	}

	pub fn holding(&self, currency: Currency) -> f64 {
		self.holdings.get(&currency).copied().unwrap_or(0.0)
	}

	pub fn transactions(&self) -> &[Transaction] {
		&self.transactions
	}

	pub fn realized_profit(&self) -> f64 {
		self.realized_profit
	}

	/// The carried weighted average cost per unit, if there is one.
	pub fn average_cost(&self, currency: Currency) -> Option<f64> {
		self.average_costs
			.get(&currency)
			.copied()
			.filter(|&cost| cost > 0.0)
	}

	/// Everything in the drawer expressed in THB: the base balance plus
	/// each foreign balance valued at the board's buy side.
	pub fn total_capital(&self) -> f64 {
		let mut total = self.holding(Currency::BASE);
		for currency in Currency::FOREIGN {
			total += self.holding(currency) * self.rates.buy_unit_price(currency);
		}
		total
	}

	/// The ordered cost-basis fallback: the carried average if we have one,
	/// else the board's buy-side unit price, else the caller's last resort.
	/// Always lands on a number, so a sell can always price its cost even
	/// with no history at all.
	fn cost_basis_or(&self, currency: Currency, last_resort: f64) -> f64 {
		match self.average_costs.get(&currency) {
			Some(&cost) if cost > 0.0 => cost,
			_ => {
				let board = self.rates.buy_unit_price(currency);
				if board > 0.0 {
					board
				} else {
					last_resort
				}
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPS: f64 = 1e-9;

	fn assert_close(actual: f64, expected: f64) {
		assert!(
			(actual - expected).abs() < EPS,
			"expected {}, got {}",
			expected,
			actual
		);
	}

	fn bare_ledger() -> Ledger {
		// no quotes posted at all, so board fallbacks are exercised only
		// where a test posts them
		let mut ledger = Ledger::new(1_000_000.0);
		ledger.set_quotes(BTreeMap::new());
		ledger
	}

	#[test]
	fn test_first_buy_sets_average_to_rate() {
		let mut ledger = Ledger::new(1_000_000.0);

		ledger.apply(Side::Buy, Currency::Usd, 100.0, 34.0).unwrap();

		assert_close(ledger.holding(Currency::Usd), 100.0);
		assert_close(ledger.holding(Currency::Thb), 996_600.0);
		assert_close(ledger.average_cost(Currency::Usd).unwrap(), 34.0);
	}

	#[test]
	fn test_second_buy_blends_average() {
		let mut ledger = Ledger::new(1_000_000.0);

		ledger.apply(Side::Buy, Currency::Usd, 100.0, 34.0).unwrap();
		ledger.apply(Side::Buy, Currency::Usd, 100.0, 36.0).unwrap();

		// (100*34 + 100*36) / 200
		assert_close(ledger.average_cost(Currency::Usd).unwrap(), 35.0);
	}

	#[test]
	fn test_buy_sequence_matches_weighted_mean() {
		let mut ledger = bare_ledger();
		let buys = [(120.0, 33.5), (75.0, 34.25), (250.0, 35.1), (10.0, 32.0)];

		let mut units = 0.0;
		let mut spent = 0.0;
		for (amount, rate) in buys {
			ledger.apply(Side::Buy, Currency::Usd, amount, rate).unwrap();
			units += amount;
			spent += amount * rate;
		}

		assert_close(ledger.average_cost(Currency::Usd).unwrap(), spent / units);
	}

	#[test]
	fn test_sell_realizes_profit_against_average() {
		let mut ledger = Ledger::new(1_000_000.0);

		ledger.apply(Side::Buy, Currency::Usd, 100.0, 34.0).unwrap();
		ledger.apply(Side::Buy, Currency::Usd, 100.0, 36.0).unwrap();
		ledger.apply(Side::Sell, Currency::Usd, 50.0, 37.0).unwrap();

		// 50 * (37 - 35)
		assert_close(ledger.realized_profit(), 100.0);
		assert_close(ledger.holding(Currency::Usd), 150.0);
		// sells never touch the carried average
		assert_close(ledger.average_cost(Currency::Usd).unwrap(), 35.0);
	}

	#[test]
	fn test_sell_can_realize_a_loss() {
		let mut ledger = Ledger::new(1_000_000.0);

		ledger.apply(Side::Buy, Currency::Usd, 100.0, 36.0).unwrap();
		ledger.apply(Side::Sell, Currency::Usd, 40.0, 34.0).unwrap();

		assert_close(ledger.realized_profit(), 40.0 * (34.0 - 36.0));
	}

	#[test]
	fn test_average_survives_sell_to_zero_and_below() {
		let mut ledger = Ledger::new(1_000_000.0);

		ledger.apply(Side::Buy, Currency::Usd, 100.0, 34.0).unwrap();
		ledger.apply(Side::Sell, Currency::Usd, 100.0, 35.0).unwrap();
		assert_close(ledger.average_cost(Currency::Usd).unwrap(), 34.0);

		ledger.apply(Side::Sell, Currency::Usd, 25.0, 35.0).unwrap();
		assert_close(ledger.holding(Currency::Usd), -25.0);
		assert_close(ledger.average_cost(Currency::Usd).unwrap(), 34.0);
	}

	#[test]
	fn test_holdings_conservation_both_sides() {
		let mut ledger = Ledger::new(1_000_000.0);

		let thb_before = ledger.holding(Currency::Thb);
		let tx = ledger.apply(Side::Buy, Currency::Cny, 500.0, 4.85).unwrap();
		let total = tx.total;
		assert_close(total, 500.0 * 4.85);
		assert_close(ledger.holding(Currency::Thb), thb_before - total);
		assert_close(ledger.holding(Currency::Cny), 500.0);

		let thb_before = ledger.holding(Currency::Thb);
		let tx = ledger.apply(Side::Sell, Currency::Cny, 200.0, 4.95).unwrap();
		let total = tx.total;
		assert_close(ledger.holding(Currency::Thb), thb_before + total);
		assert_close(ledger.holding(Currency::Cny), 300.0);
	}

	#[test]
	fn test_quotation_basis_scales_total() {
		let mut ledger = Ledger::new(1_000_000.0);

		// basis 1: 100 units at 34.0 costs 3400 THB
		let tx = ledger.apply(Side::Buy, Currency::Usd, 100.0, 34.0).unwrap();
		assert_close(tx.total, 3400.0);

		// basis 100,000: 250,000 kyat at 1500 per basis costs 3750 THB
		let tx =
			ledger.apply(Side::Buy, Currency::Mmk, 250_000.0, 1500.0).unwrap();
		assert_close(tx.total, 3750.0);
		// and the carried cost is per unit, not per basis
		assert_close(ledger.average_cost(Currency::Mmk).unwrap(), 0.015);
	}

	#[test]
	fn test_sell_without_history_prices_from_board() {
		let mut ledger = Ledger::new(1_000_000.0);

		// board buy side is 34.0; selling 100 at 35.0 books 100 THB profit
		ledger.apply(Side::Sell, Currency::Usd, 100.0, 35.0).unwrap();
		assert_close(ledger.realized_profit(), 100.0);
	}

	#[test]
	fn test_sell_without_history_or_board_books_full_total() {
		let mut ledger = bare_ledger();

		ledger.apply(Side::Sell, Currency::Usd, 100.0, 35.0).unwrap();
		assert_close(ledger.realized_profit(), 3500.0);
	}

	#[test]
	fn test_buy_without_history_values_existing_at_board() {
		let mut ledger = Ledger::new(1_000_000.0);

		// inventory appeared by adjustment under an empty board, so no
		// usable cost history exists for it
		ledger.set_quotes(BTreeMap::new());
		ledger.set_holding(Currency::Usd, 100.0).unwrap();

		let mut quotes = BTreeMap::new();
		quotes.insert(Currency::Usd, Quote::new(34.0, 34.5));
		ledger.set_quotes(quotes);

		// the 100 held units get valued at the board's 34.0, blended with
		// 100 more bought at 36.0
		ledger.apply(Side::Buy, Currency::Usd, 100.0, 36.0).unwrap();
		assert_close(ledger.average_cost(Currency::Usd).unwrap(), 35.0);
	}

	#[test]
	fn test_fallback_chain_order() {
		let mut ledger = Ledger::new(1_000_000.0);

		// stored average wins over the board
		ledger.average_costs.insert(Currency::Usd, 30.0);
		assert_close(ledger.cost_basis_or(Currency::Usd, 99.0), 30.0);

		// zero average falls through to the board
		ledger.average_costs.insert(Currency::Usd, 0.0);
		assert_close(ledger.cost_basis_or(Currency::Usd, 99.0), 34.0);

		// no board quote either: the last resort
		ledger.set_quotes(BTreeMap::new());
		assert_close(ledger.cost_basis_or(Currency::Usd, 99.0), 99.0);
	}

	#[test]
	fn test_rejects_base_currency() {
		let mut ledger = Ledger::new(1_000_000.0);
		assert!(ledger.apply(Side::Buy, Currency::Thb, 100.0, 1.0).is_err());
		assert!(ledger.transactions().is_empty());
	}

	#[test]
	fn test_rejects_degenerate_numbers() {
		let mut ledger = Ledger::new(1_000_000.0);
		assert!(ledger.apply(Side::Buy, Currency::Usd, 0.0, 34.0).is_err());
		assert!(ledger.apply(Side::Buy, Currency::Usd, -5.0, 34.0).is_err());
		assert!(ledger.apply(Side::Buy, Currency::Usd, 100.0, 0.0).is_err());
		assert!(ledger.apply(Side::Sell, Currency::Usd, 100.0, -1.0).is_err());
		assert!(ledger
			.apply(Side::Buy, Currency::Usd, f64::NAN, 34.0)
			.is_err());
		assert!(ledger.transactions().is_empty());
		assert_close(ledger.holding(Currency::Thb), 1_000_000.0);
	}

	#[test]
	fn test_history_is_most_recent_first() {
		let mut ledger = Ledger::new(1_000_000.0);
		ledger.apply(Side::Buy, Currency::Usd, 1.0, 34.0).unwrap();
		ledger.apply(Side::Buy, Currency::Cny, 2.0, 4.8).unwrap();
		ledger.apply(Side::Sell, Currency::Usd, 1.0, 35.0).unwrap();

		let history = ledger.transactions();
		assert_eq!(history.len(), 3);
		assert_eq!(history[0].side, Side::Sell);
		assert_eq!(history[2].currency, Currency::Usd);
		assert_eq!(history[2].side, Side::Buy);
	}

	#[test]
	fn test_set_holding_reprices_at_board() {
		let mut ledger = Ledger::new(1_000_000.0);
		ledger.apply(Side::Buy, Currency::Usd, 100.0, 30.0).unwrap();
		assert_close(ledger.average_cost(Currency::Usd).unwrap(), 30.0);

		ledger.set_holding(Currency::Usd, 500.0).unwrap();

		assert_close(ledger.holding(Currency::Usd), 500.0);
		// prior history discarded; board buy side is 34.0
		assert_close(ledger.average_cost(Currency::Usd).unwrap(), 34.0);
		// no record, no profit movement
		assert_eq!(ledger.transactions().len(), 1);
		assert_close(ledger.realized_profit(), 0.0);
	}

	#[test]
	fn test_set_holding_on_base_keeps_costs_alone() {
		let mut ledger = Ledger::new(1_000_000.0);
		ledger.apply(Side::Buy, Currency::Usd, 100.0, 30.0).unwrap();

		ledger.set_holding(Currency::Thb, 5_000.0).unwrap();

		assert_close(ledger.holding(Currency::Thb), 5_000.0);
		assert_close(ledger.average_cost(Currency::Usd).unwrap(), 30.0);
	}

	#[test]
	fn test_soft_reset_clears_only_history_and_profit() {
		let mut ledger = Ledger::new(1_000_000.0);
		ledger.apply(Side::Buy, Currency::Usd, 100.0, 34.0).unwrap();
		ledger.apply(Side::Sell, Currency::Usd, 50.0, 36.0).unwrap();

		ledger.soft_reset();

		assert!(ledger.transactions().is_empty());
		assert_close(ledger.realized_profit(), 0.0);
		assert_close(ledger.holding(Currency::Usd), 50.0);
		assert_close(ledger.average_cost(Currency::Usd).unwrap(), 34.0);
		assert_eq!(
			ledger.rates().quote(Currency::Usd),
			Some(Quote::new(34.0, 34.5))
		);
	}

	#[test]
	fn test_full_reset_restores_defaults() {
		let mut ledger = Ledger::new(250_000.0);
		let mut quotes = ledger.rates().quotes().clone();
		quotes.insert(Currency::Usd, Quote::new(40.0, 41.0));
		ledger.set_quotes(quotes);
		ledger.apply(Side::Buy, Currency::Usd, 100.0, 40.0).unwrap();

		ledger.full_reset();

		assert!(ledger.transactions().is_empty());
		assert_close(ledger.realized_profit(), 0.0);
		assert_close(ledger.holding(Currency::Thb), 250_000.0);
		assert_close(ledger.holding(Currency::Usd), 0.0);
		assert!(ledger.average_cost(Currency::Usd).is_none());
		assert_eq!(*ledger.rates(), RateBoard::default());
	}

	#[test]
	fn test_total_capital_values_foreign_at_buy_side() {
		let mut ledger = Ledger::new(1_000_000.0);
		ledger.apply(Side::Buy, Currency::Usd, 100.0, 34.0).unwrap();

		// 996,600 THB + 100 USD at the board's 34.0
		assert_close(ledger.total_capital(), 996_600.0 + 3400.0);
	}

	#[test]
	fn test_snapshot_round_trip() {
		let mut ledger = Ledger::new(1_000_000.0);
		ledger.apply(Side::Buy, Currency::Mmk, 500_000.0, 1500.0).unwrap();
		ledger.apply(Side::Sell, Currency::Mmk, 100_000.0, 1600.0).unwrap();

		let restored = Ledger::from_snapshot(ledger.snapshot(), 1_000_000.0);

		assert_eq!(restored.holdings(), ledger.holdings());
		assert_eq!(restored.transactions(), ledger.transactions());
		assert_close(restored.realized_profit(), ledger.realized_profit());
		assert_eq!(
			restored.average_cost(Currency::Mmk),
			ledger.average_cost(Currency::Mmk)
		);
	}
}
