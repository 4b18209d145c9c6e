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
use crate::book::quote::RateBoard;
use crate::reports::table::Table;

pub struct RateReporter<'a> {
	board: &'a RateBoard,
}

impl<'a> RateReporter<'a> {
	pub fn new(board: &'a RateBoard) -> Self {
		Self { board }
	}

	/// Prints the posted board. Currencies with no posted quote still get a
	/// row, so the operator can see what is missing.
	pub fn print_board(&self) {
		let mut table = Table::new(4);
		table.numeric_columns(vec![1, 2, 3]);

		table.add_header(vec!["Currency", "Per", "We Buy", "We Sell"]);
		table.add_separator();

		for currency in Currency::FOREIGN {
			let (buy, sell) = match self.board.quote(currency) {
				Some(quote) => (
					format!("{:.4}", quote.buy),
					format!("{:.4}", quote.sell),
				),
				None => ("-".to_string(), "-".to_string()),
			};

			table.add_row(vec![
				currency.to_string(),
				currency.basis().to_string(),
				buy,
				sell,
			]);
		}

		table.print();
	}
}
