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
use crate::book::transaction::Side;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A posted buy/sell pair for one foreign currency, in THB per one
/// quotation basis of that currency. "Buy" is the side the shop pays when
/// taking foreign cash in; "sell" is what it charges handing it out.
///
/// Nothing here enforces buy <= sell or even positivity. The operator posts
/// whatever they post; a board with an inverted spread is their problem to
/// notice, not ours to reject.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
	pub buy: f64,
	pub sell: f64,
}

impl Quote {
	pub fn new(buy: f64, sell: f64) -> Self {
		Self { buy, sell }
	}

	pub fn side(&self, side: Side) -> f64 {
		match side {
			Side::Buy => self.buy,
			Side::Sell => self.sell,
		}
	}
}

/// The rate board: current quotes for each foreign currency. A leaf
/// component; it knows nothing about holdings or history. The engine only
/// consults it as a fallback default, since the authoritative rate for any
/// trade is whatever the caller keys in at the counter.
#[derive(Clone, Debug, PartialEq)]
pub struct RateBoard {
	quotes: BTreeMap<Currency, Quote>,
}

impl Default for RateBoard {
	fn default() -> Self {
		let mut quotes = BTreeMap::new();
		quotes.insert(Currency::Usd, Quote::new(34.0, 34.5));
		quotes.insert(Currency::Cny, Quote::new(4.8, 4.9));
		// MMK is quoted per 100,000; these match 0.015/0.016 per unit
		quotes.insert(Currency::Mmk, Quote::new(1500.0, 1600.0));
		Self { quotes }
	}
}

impl RateBoard {
	pub fn from_quotes(quotes: BTreeMap<Currency, Quote>) -> Self {
		Self { quotes }
	}

	pub fn quotes(&self) -> &BTreeMap<Currency, Quote> {
		&self.quotes
	}

	/// Replaces the whole board at once. There is no per-currency update;
	/// callers edit a copy of the full set and post it back.
	pub fn set_quotes(&mut self, quotes: BTreeMap<Currency, Quote>) {
		self.quotes = quotes;
	}

	pub fn quote(&self, currency: Currency) -> Option<Quote> {
		self.quotes.get(&currency).copied()
	}

	/// The board's buy-side price for a single unit of the currency,
	/// i.e. the posted rate divided down by its quotation basis.
	/// Zero when no quote is posted.
	pub fn buy_unit_price(&self, currency: Currency) -> f64 {
		match self.quotes.get(&currency) {
			Some(quote) => quote.buy / f64::from(currency.basis()),
			None => 0.0,
		}
	}
}
