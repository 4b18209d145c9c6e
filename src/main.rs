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
use bureau::book::currency::Currency;
use bureau::book::ledger::Ledger;
use bureau::book::quote::Quote;
use bureau::book::transaction::Side;
use bureau::reports::history_reporter::HistoryReporter;
use bureau::reports::rate_reporter::RateReporter;
use bureau::reports::status_reporter::StatusReporter;
use bureau::store::filesystem::Filesystem;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
	name = "bureau",
	version,
	about = "Currency exchange shop ledger"
)]
struct Cli {
	#[command(subcommand)]
	command: Directive,

	// -----------
	// -- FLAGS --
	// -----------
	/// Custom book file location (default: ~/.config/bureau/book.json)
	#[arg(short, long)]
	file: Option<String>,

	/// Custom config file location (default: ~/.config/bureau/config.toml)
	#[arg(long)]
	config: Option<String>,
}

#[derive(Subcommand)]
enum Directive {
	/// Balances, realized profit, and total capital at board rates
	Status,

	/// The posted rate board
	Rates,

	/// Post a new buy/sell quote pair for one currency
	SetRate {
		currency: Currency,
		buy: f64,
		sell: f64,
	},

	/// Record buying foreign cash from a customer (THB out)
	Buy {
		#[command(flatten)]
		trade: TradeArgs,
	},

	/// Record selling foreign cash to a customer (THB in)
	Sell {
		#[command(flatten)]
		trade: TradeArgs,
	},

	/// Overwrite one balance directly, outside the trade flow
	Adjust { currency: Currency, amount: f64 },

	/// Recorded trades, most recent first
	History {
		/// Only show this many records
		#[arg(short, long)]
		limit: Option<usize>,
	},

	/// Write the full history to a CSV file
	Export { path: PathBuf },

	/// Clear history and profit; --hard restores the whole book to defaults
	Reset {
		#[arg(long)]
		hard: bool,
	},
}

#[derive(Args)]
struct TradeArgs {
	currency: Currency,

	/// Foreign units; omit when entering by --total
	#[arg(required_unless_present = "total", conflicts_with = "total")]
	amount: Option<f64>,

	/// Rate per quotation basis (default: the board's posted side)
	#[arg(short, long)]
	rate: Option<f64>,

	/// THB total to trade; the foreign amount is derived from the rate
	#[arg(short, long)]
	total: Option<f64>,
}

fn main() -> Result<(), Error> {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	let args = Cli::parse();

	let fs = Filesystem::new();
	let config = fs.get_config(args.config.as_ref())?;
	let opening_capital = config.opening_capital();
	let data_path = fs.data_path(args.file.as_ref(), &config);

	let snapshot = fs.load_snapshot(&data_path, opening_capital)?;
	let mut ledger = Ledger::from_snapshot(snapshot, opening_capital);

	let mutated = match &args.command {
		Directive::Status => {
			StatusReporter::new(&ledger).print_status();
			false
		},
		Directive::Rates => {
			RateReporter::new(ledger.rates()).print_board();
			false
		},
		Directive::SetRate {
			currency,
			buy,
			sell,
		} => {
			set_rate(&mut ledger, *currency, *buy, *sell)?;
			true
		},
		Directive::Buy { trade } => {
			record_trade(&mut ledger, Side::Buy, trade)?;
			true
		},
		Directive::Sell { trade } => {
			record_trade(&mut ledger, Side::Sell, trade)?;
			true
		},
		Directive::Adjust { currency, amount } => {
			adjust(&mut ledger, *currency, *amount)?;
			true
		},
		Directive::History { limit } => {
			HistoryReporter::new(ledger.transactions())
				.print_history(*limit);
			false
		},
		Directive::Export { path } => {
			let written = HistoryReporter::new(ledger.transactions())
				.export_csv(path)?;
			println!("Wrote {} records to {}", written, path.display());
			false
		},
		Directive::Reset { hard } => {
			if *hard {
				ledger.full_reset();
				println!("Book restored to defaults");
			} else {
				ledger.soft_reset();
				println!("History and profit cleared");
			}
			true
		},
	};

	if mutated {
		fs.persist_snapshot(&data_path, &ledger.snapshot())?;
	}

	Ok(())
}

/// Posts one pair onto the board. The board only replaces wholesale, so
/// this edits a copy of the current full set and posts that back.
fn set_rate(
	ledger: &mut Ledger,
	currency: Currency,
	buy: f64,
	sell: f64,
) -> Result<(), Error> {
	if !currency.is_foreign() {
		bail!("{} is the home currency; it takes no quote", Currency::BASE);
	}

	let mut quotes = ledger.rates().quotes().clone();
	quotes.insert(currency, Quote::new(buy, sell));
	ledger.set_quotes(quotes);

	println!("Posted {}: buy {} / sell {}", currency, buy, sell);
	Ok(())
}

fn record_trade(
	ledger: &mut Ledger,
	side: Side,
	args: &TradeArgs,
) -> Result<(), Error> {
	let rate = match args.rate {
		Some(rate) => rate,
		None => match ledger.rates().quote(args.currency) {
			Some(quote) => quote.side(side),
			None => {
				bail!("No rate given and none posted for {}", args.currency)
			},
		},
	};

	let amount = match (args.amount, args.total) {
		(Some(amount), _) => amount,
		(None, Some(total)) => {
			if rate <= 0.0 {
				bail!("Cannot derive an amount from a non-positive rate");
			}
			(total / rate) * f64::from(args.currency.basis())
		},
		// clap requires one of the two
		(None, None) => bail!("Provide an amount or --total"),
	};

	// Advisory only; the book tracks whatever the drawer actually did
	if side == Side::Sell {
		let held = ledger.holding(args.currency);
		if held < amount {
			warn!(
				"selling {} {} with only {} held",
				amount, args.currency, held
			);
		}
	}

	let tx = ledger.apply(side, args.currency, amount, rate)?;
	println!(
		"{} {:.2} {} @ {} = {:.2} THB",
		tx.side, tx.amount, tx.currency, tx.rate, tx.total
	);
	Ok(())
}

fn adjust(
	ledger: &mut Ledger,
	currency: Currency,
	amount: f64,
) -> Result<(), Error> {
	ledger.set_holding(currency, amount)?;

	if amount < 0.0 {
		warn!("{} balance adjusted below zero: {}", currency, amount);
	}

	println!("{} balance set to {:.2}", currency, amount);
	Ok(())
}
