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

/// Standard table printer for the bureau reports, which are all flat lists
/// of single-line rows. Columns carrying numbers should be declared as such
/// so they right-align under their headers.
pub struct Table {
	column_count: usize,
	rows: Vec<Row>,
	numeric: Vec<bool>, // indicates columns by index
}

enum Row {
	Header(Vec<String>),
	Data(Vec<String>),
	Separator,
}

impl Table {
	pub fn new(column_count: usize) -> Self {
		Self {
			column_count,
			rows: Vec::new(),
			numeric: vec![false; column_count],
		}
	}

	/// Declares columns that hold numbers, by index.
	pub fn numeric_columns(&mut self, cols: Vec<usize>) {
		for col in cols {
			self.numeric[col] = true;
		}
	}

	pub fn add_header(&mut self, row: Vec<&str>) {
		self.rows.push(Row::Header(
			row.into_iter().map(|s| s.to_string()).collect(),
		));
	}

	pub fn add_row(&mut self, row: Vec<String>) {
		self.rows.push(Row::Data(row));
	}

	pub fn add_separator(&mut self) {
		self.rows.push(Row::Separator);
	}

	pub fn print(&self) {
		println!();
		let widths = self.widths();

		for row in &self.rows {
			match row {
				Row::Header(cells) | Row::Data(cells) => {
					self.print_cells(&widths, cells)
				},
				Row::Separator => {
					let total: usize = widths.iter().sum::<usize>()
						+ 3 * (self.column_count - 1);
					println!("{:-<total$}", "", total = total);
				},
			}
		}
	}

	fn widths(&self) -> Vec<usize> {
		let mut widths = vec![0; self.column_count];
		for row in &self.rows {
			if let Row::Header(cells) | Row::Data(cells) = row {
				for (i, value) in cells.iter().enumerate() {
					widths[i] = widths[i].max(value.len());
				}
			}
		}
		widths
	}

	fn print_cells(&self, widths: &[usize], cells: &[String]) {
		for (i, value) in cells.iter().enumerate() {
			if self.numeric[i] {
				print!("{:>width$}", value, width = widths[i]);
			} else {
				print!("{:<width$}", value, width = widths[i]);
			}
			if i < cells.len() - 1 {
				print!("   ");
			}
		}
		println!();
	}
}
