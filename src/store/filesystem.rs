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
use crate::config::config_file::Config;
use crate::store::snapshot::Snapshot;
use anyhow::{anyhow, Error};
use dirs::home_dir;
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct Filesystem {}

impl Filesystem {
	pub fn new() -> Self {
		Self {}
	}

	/// Fetches the config from the given path, or default path if none.
	/// An empty config file is created on first run so the operator has
	/// something to edit.
	pub fn get_config(
		&self,
		custom_config_path: Option<&String>,
	) -> Result<Config, Error> {
		let config_path = match &custom_config_path {
			None => default_dir().join("config.toml"),
			Some(p) => PathBuf::from(p),
		};

		if !config_path.exists() && custom_config_path.is_none() {
			if let Some(parent) = config_path.parent() {
				fs::create_dir_all(parent)?;
			}
			File::create(config_path.clone())?;
		}

		let content = fs::read_to_string(config_path)?;
		let config: Config = toml::from_str(&content)
			.map_err(|e| anyhow!("failed to parse config: {}", e))?;

		Ok(config)
	}

	/// Where the book lives: an explicit flag wins, then the config,
	/// then ~/.config/bureau/book.json.
	pub fn data_path(
		&self,
		custom_data_path: Option<&String>,
		config: &Config,
	) -> PathBuf {
		match custom_data_path.or(config.data_file.as_ref()) {
			Some(p) => PathBuf::from(p),
			None => default_dir().join("book.json"),
		}
	}

	/// Reads the stored snapshot, or hands back first-run defaults when
	/// there is nothing on disk yet. Decode-level damage is absorbed per
	/// field by the snapshot itself.
	pub fn load_snapshot(
		&self,
		path: &Path,
		opening_capital: f64,
	) -> Result<Snapshot, Error> {
		if !path.exists() {
			debug!("no snapshot at {}; starting fresh", path.display());
			return Ok(Snapshot::defaults(opening_capital));
		}

		let content = fs::read_to_string(path)?;
		Ok(Snapshot::decode(&content, opening_capital))
	}

	/// Writes the snapshot next to its final location and renames it into
	/// place, so the stored copy is always either the old document or the
	/// new one, never a torn half of each.
	pub fn persist_snapshot(
		&self,
		path: &Path,
		snapshot: &Snapshot,
	) -> Result<(), Error> {
		if let Some(parent) = path.parent() {
			if !parent.as_os_str().is_empty() {
				fs::create_dir_all(parent)?;
			}
		}

		let staging = path.with_extension("json.tmp");
		fs::write(&staging, snapshot.encode()?)?;
		fs::rename(&staging, path)?;

		debug!("persisted snapshot to {}", path.display());
		Ok(())
	}
}

fn default_dir() -> PathBuf {
	let home_dir = home_dir()
		.unwrap_or_else(|| panic!("Unable to determine home directory"));
	home_dir.join(".config/bureau")
}
