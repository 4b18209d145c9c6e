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
use crate::book::ledger::Ledger;
use crate::book::currency::Currency;
use crate::book::quote::{Quote, RateBoard};
use crate::book::transaction::Transaction;
use anyhow::Error;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// The full persisted state, written and rewritten as one document. Five
/// fields, matching the five things the engine owns.
///
/// Decoding is deliberately forgiving per field: a snapshot that has lost or
/// mangled one field still yields a book, with only that field back at its
/// default. Losing a day's rate board should not also cost the operator
/// their transaction history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
	pub quotes: BTreeMap<Currency, Quote>,
	pub holdings: BTreeMap<Currency, f64>,
	pub transactions: Vec<Transaction>,
	pub realized_profit: f64,
	pub average_costs: BTreeMap<Currency, f64>,
}

impl Snapshot {
	/// First-run state: default board, opening capital in the drawer,
	/// nothing else.
	pub fn defaults(opening_capital: f64) -> Self {
		Self {
			quotes: RateBoard::default().quotes().clone(),
			holdings: Ledger::default_holdings(opening_capital),
			transactions: vec![],
			realized_profit: 0.0,
			average_costs: Default::default(),
		}
	}

	pub fn encode(&self) -> Result<String, Error> {
		Ok(serde_json::to_string_pretty(self)?)
	}

	/// Decodes a stored snapshot, substituting the default for any field
	/// that is missing or no longer parses. An unreadable document as a
	/// whole decodes to first-run defaults.
	pub fn decode(text: &str, opening_capital: f64) -> Self {
		let defaults = Self::defaults(opening_capital);

		let mut map = match serde_json::from_str(text) {
			Ok(serde_json::Value::Object(map)) => map,
			Ok(_) => {
				warn!("snapshot is not an object; starting from defaults");
				return defaults;
			},
			Err(err) => {
				warn!("snapshot is unreadable ({}); starting from defaults", err);
				return defaults;
			},
		};

		Self {
			quotes: field(&mut map, "quotes", defaults.quotes),
			holdings: field(&mut map, "holdings", defaults.holdings),
			transactions: field(
				&mut map,
				"transactions",
				defaults.transactions,
			),
			realized_profit: field(
				&mut map,
				"realizedProfit",
				defaults.realized_profit,
			),
			average_costs: field(
				&mut map,
				"averageCosts",
				defaults.average_costs,
			),
		}
	}
}

fn field<T: DeserializeOwned>(
	map: &mut serde_json::Map<String, serde_json::Value>,
	key: &str,
	fallback: T,
) -> T {
	match map.remove(key) {
		None => fallback,
		Some(value) => match serde_json::from_value(value) {
			Ok(parsed) => parsed,
			Err(err) => {
				warn!("discarding malformed snapshot field {}: {}", key, err);
				fallback
			},
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::book::transaction::Side;

	#[test]
	fn test_encode_decode_round_trip() {
		let mut snapshot = Snapshot::defaults(1_000_000.0);
		snapshot.transactions.push(Transaction::new(
			Side::Buy,
			Currency::Usd,
			100.0,
			34.0,
			3400.0,
		));
		snapshot.realized_profit = 123.45;
		snapshot.average_costs.insert(Currency::Usd, 34.0);

		let decoded = Snapshot::decode(&snapshot.encode().unwrap(), 1_000_000.0);
		assert_eq!(decoded, snapshot);
	}

	#[test]
	fn test_missing_fields_fall_back_independently() {
		let decoded = Snapshot::decode(
			r#"{"realizedProfit": 50.0}"#,
			1_000_000.0,
		);

		assert_eq!(decoded.realized_profit, 50.0);
		assert_eq!(decoded.quotes, Snapshot::defaults(1_000_000.0).quotes);
		assert_eq!(
			decoded.holdings.get(&Currency::Thb).copied(),
			Some(1_000_000.0)
		);
		assert!(decoded.transactions.is_empty());
	}

	#[test]
	fn test_malformed_field_does_not_poison_the_rest() {
		let decoded = Snapshot::decode(
			r#"{
				"realizedProfit": "not a number",
				"holdings": {"THB": 777.0, "USD": 0.0, "CNY": 0.0, "MMK": 0.0}
			}"#,
			1_000_000.0,
		);

		assert_eq!(decoded.realized_profit, 0.0);
		assert_eq!(decoded.holdings.get(&Currency::Thb).copied(), Some(777.0));
	}

	#[test]
	fn test_garbage_document_yields_defaults() {
		let decoded = Snapshot::decode("{{{ nope", 250_000.0);
		assert_eq!(decoded, Snapshot::defaults(250_000.0));

		let decoded = Snapshot::decode("[1, 2, 3]", 250_000.0);
		assert_eq!(decoded, Snapshot::defaults(250_000.0));
	}
}
