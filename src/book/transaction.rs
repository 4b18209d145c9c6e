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
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Trade direction from the shop's point of view. Buy means the shop takes
/// foreign cash in and pays out THB; Sell is the mirror.
#[derive(
	Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
	Buy,
	Sell,
}

impl fmt::Display for Side {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Side::Buy => write!(f, "BUY"),
			Side::Sell => write!(f, "SELL"),
		}
	}
}

/// One recorded trade. Records are append-only: once written they are never
/// edited or deleted individually, only wiped wholesale by a reset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
	pub id: Uuid,
	pub side: Side,
	pub currency: Currency,

	/// Foreign units, always positive; the side carries the sign
	pub amount: f64,

	/// As entered, per one quotation basis of the currency
	pub rate: f64,

	/// THB counter-value computed at entry time
	pub total: f64,

	pub at: DateTime<Utc>,
}

impl Transaction {
	pub fn new(
		side: Side,
		currency: Currency,
		amount: f64,
		rate: f64,
		total: f64,
	) -> Self {
		Self {
			id: Uuid::new_v4(),
			side,
			currency,
			amount,
			rate,
			total,
			at: Utc::now(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_records_get_distinct_ids() {
		let a = Transaction::new(Side::Buy, Currency::Usd, 100.0, 34.0, 3400.0);
		let b = Transaction::new(Side::Buy, Currency::Usd, 100.0, 34.0, 3400.0);
		assert_ne!(a.id, b.id);
	}

	#[test]
	fn test_serde_round_trip() {
		let tx =
			Transaction::new(Side::Sell, Currency::Mmk, 250_000.0, 1600.0, 4000.0);
		let encoded = serde_json::to_string(&tx).unwrap();
		assert!(encoded.contains("\"SELL\""));
		assert!(encoded.contains("\"MMK\""));

		let decoded: Transaction = serde_json::from_str(&encoded).unwrap();
		assert_eq!(decoded, tx);
	}
}
