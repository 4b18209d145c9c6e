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
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
	/// Where to keep the book instead of ~/.config/bureau/book.json
	pub data_file: Option<String>,

	/// THB the drawer opens with on a fresh or hard-reset book.
	/// Defaults to 1,000,000.
	pub opening_capital: Option<f64>,
}

impl Config {
	pub const DEFAULT_OPENING_CAPITAL: f64 = 1_000_000.0;

	pub fn opening_capital(&self) -> f64 {
		self.opening_capital
			.unwrap_or(Config::DEFAULT_OPENING_CAPITAL)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_config_uses_defaults() {
		let config: Config = toml::from_str("").unwrap();
		assert!(config.data_file.is_none());
		assert_eq!(
			config.opening_capital(),
			Config::DEFAULT_OPENING_CAPITAL
		);
	}

	#[test]
	fn test_populated_config() {
		let config: Config = toml::from_str(
			"data_file = \"/srv/bureau/book.json\"\nopening_capital = 250000.0\n",
		)
		.unwrap();
		assert_eq!(
			config.data_file.as_deref(),
			Some("/srv/bureau/book.json")
		);
		assert_eq!(config.opening_capital(), 250_000.0);
	}
}
