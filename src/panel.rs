//! Cleaning of the raw county-year panel.
//!
//! The cleaner runs three stages over a frame read entirely as text:
//!
//! 1. [`filter::drop_aggregates`] canonicalises FIPS codes and keeps only
//!    genuine county rows with an integer year.
//! 2. [`rename::RenameMap`] relabels source columns from an external lookup table.
//! 3. [`rename::RenameReport`] records what changed.
//!
//! ```no_run
//! use county_panel::config::DEFAULT_CONFIG;
//! use county_panel::panel::{drop_aggregates, io, rename};
//! use std::path::Path;
//!
//! # fn example() -> county_panel::error::Result<()> {
//! let raw = io::read_panel(Path::new("county_panel_full.csv"), &DEFAULT_CONFIG)?;
//! let filtered = drop_aggregates(raw, &DEFAULT_CONFIG)?;
//! let map = rename::RenameMap::load(Path::new("bea_variable_map.csv"), &DEFAULT_CONFIG);
//! let renamed = rename::apply_rename(filtered.df, &map)?;
//! println!("{}", renamed.report().render());
//! # Ok(())
//! # }
//! ```

pub mod filter;
pub mod fips;
pub mod io;
pub mod rename;

pub use filter::{FilterOutcome, drop_aggregates};
pub use fips::{is_real_county_fips, normalize_fips};
pub use rename::{RenameMap, RenameOutcome, RenameReport, apply_rename};
