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
use crate::book::transaction::Transaction;
use crate::reports::table::Table;
use anyhow::Error;
use std::path::Path;

/// Lists and exports the trade history. Works on a point-in-time slice of
/// records; nothing here writes back into the ledger.
pub struct HistoryReporter<'a> {
	transactions: &'a [Transaction],
}

impl<'a> HistoryReporter<'a> {
	pub fn new(transactions: &'a [Transaction]) -> Self {
		Self { transactions }
	}

	/// Prints the most recent trades first, which is the order the ledger
	/// keeps them in.
	pub fn print_history(&self, limit: Option<usize>) {
		if self.transactions.is_empty() {
			println!("No transactions recorded");
			return;
		}

		let mut table = Table::new(6);
		table.numeric_columns(vec![3, 4, 5]);

		table.add_header(vec![
			"Date", "Side", "Currency", "Amount", "Rate", "Total (THB)",
		]);
		table.add_separator();

		let shown = limit.unwrap_or(self.transactions.len());
		for tx in self.transactions.iter().take(shown) {
			table.add_row(vec![
				tx.at.format("%Y-%m-%d %H:%M").to_string(),
				tx.side.to_string(),
				tx.currency.to_string(),
				format!("{:.2}", tx.amount),
				format!("{:.4}", tx.rate),
				format!("{:.2}", tx.total),
			]);
		}

		table.print();

		if shown < self.transactions.len() {
			println!(
				"({} of {} shown)",
				shown,
				self.transactions.len()
			);
		}
	}

	/// Writes the history out as a spreadsheet-friendly CSV file and
	/// reports how many records were written.
	pub fn export_csv(&self, path: &Path) -> Result<usize, Error> {
		let mut writer = csv::Writer::from_path(path)?;

		writer.write_record([
			"id", "date", "side", "currency", "amount", "rate", "total_thb",
		])?;

		for tx in self.transactions {
			writer.write_record([
				tx.id.to_string(),
				tx.at.to_rfc3339(),
				tx.side.to_string(),
				tx.currency.to_string(),
				tx.amount.to_string(),
				tx.rate.to_string(),
				tx.total.to_string(),
			])?;
		}

		writer.flush()?;
		Ok(self.transactions.len())
	}
}
