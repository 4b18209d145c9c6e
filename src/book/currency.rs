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
use anyhow::{bail, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of currencies the shop deals in. THB is the home currency;
/// everything else is priced against it. There is deliberately no way to add
/// a currency at runtime, which lets the rest of the system lean on
/// exhaustive matches instead of guessing about map keys.
#[derive(
	Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
	Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
	Thb,
	Usd,
	Cny,
	Mmk,
}

impl Currency {
	pub const ALL: [Currency; 4] =
		[Currency::Thb, Currency::Usd, Currency::Cny, Currency::Mmk];

	/// Every currency the shop holds as inventory, i.e. all but THB.
	pub const FOREIGN: [Currency; 3] =
		[Currency::Usd, Currency::Cny, Currency::Mmk];

	/// The home currency all quotes are posted against and in which
	/// profit is measured.
	pub const BASE: Currency = Currency::Thb;

	pub fn is_foreign(self) -> bool {
		self != Currency::BASE
	}

	/// The unit multiple a posted rate applies to. Kyat trade in bricks of
	/// 100,000 because a single kyat is worth a fraction of a satang;
	/// quoting it per unit would force absurd decimal places onto the board.
	pub fn basis(self) -> u32 {
		match self {
			Currency::Mmk => 100_000,
			_ => 1,
		}
	}

	pub fn code(self) -> &'static str {
		match self {
			Currency::Thb => "THB",
			Currency::Usd => "USD",
			Currency::Cny => "CNY",
			Currency::Mmk => "MMK",
		}
	}
}

impl fmt::Display for Currency {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.code())
	}
}

impl FromStr for Currency {
	type Err = Error;

	fn from_str(input: &str) -> Result<Self, Error> {
		match input.to_ascii_uppercase().as_str() {
			"THB" => Ok(Currency::Thb),
			"USD" => Ok(Currency::Usd),
			"CNY" => Ok(Currency::Cny),
			"MMK" => Ok(Currency::Mmk),
			other => bail!("Unknown currency: {}", other),
		}
	}
}
