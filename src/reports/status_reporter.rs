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
use crate::book::ledger::Ledger;
use crate::reports::table::Table;

/// Read-only view over the ledger; takes a point-in-time borrow and has no
/// path to mutate anything through it.
pub struct StatusReporter<'a> {
	ledger: &'a Ledger,
}

impl<'a> StatusReporter<'a> {
	pub fn new(ledger: &'a Ledger) -> Self {
		Self { ledger }
	}

	/// The financial status card: every balance, its carried cost, its THB
	/// value at the board's buy side, then profit and total capital.
	pub fn print_status(&self) {
		let mut table = Table::new(4);
		table.numeric_columns(vec![1, 2, 3]);

		table.add_header(vec!["Currency", "Balance", "Avg Cost", "Value (THB)"]);
		table.add_separator();

		let thb = self.ledger.holding(Currency::BASE);
		table.add_row(vec![
			Currency::BASE.to_string(),
			format!("{:.2}", thb),
			String::new(),
			format!("{:.2}", thb),
		]);

		for currency in Currency::FOREIGN {
			let balance = self.ledger.holding(currency);
			let value =
				balance * self.ledger.rates().buy_unit_price(currency);

			let avg_cost = match self.ledger.average_cost(currency) {
				Some(cost) => format!("{:.4}", cost),
				None => "-".to_string(),
			};

			table.add_row(vec![
				currency.to_string(),
				format!("{:.2}", balance),
				avg_cost,
				format!("{:.2}", value),
			]);
		}

		table.add_separator();
		table.add_row(vec![
			"Realized Profit".to_string(),
			String::new(),
			String::new(),
			format!("{:.2}", self.ledger.realized_profit()),
		]);
		table.add_row(vec![
			"Total Capital".to_string(),
			String::new(),
			String::new(),
			format!("{:.2}", self.ledger.total_capital()),
		]);

		table.print();
	}
}
