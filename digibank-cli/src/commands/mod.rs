//! CLI command implementations

pub mod accounts;
pub mod seed;
pub mod serve;
pub mod status;
pub mod users;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use digibank_core::config;
use digibank_core::{DigibankContext, ListQuery};

/// Listing flags shared by `accounts` and `users`
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Page number, 1-based
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// Page size (defaults to listing.defaultPageSize)
    #[arg(long)]
    pub size: Option<usize>,
    /// Filter as field:substring, e.g. name:ali
    #[arg(long, default_value = "")]
    pub search: String,
    /// Sort as field:direction, e.g. email:desc
    #[arg(long, default_value = "asc")]
    pub sort: String,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    pub fn to_query(&self, default_page_size: usize) -> Result<ListQuery> {
        let size = self.size.unwrap_or(default_page_size);
        Ok(ListQuery::new(self.page, size, &self.search, &self.sort)?)
    }
}

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    config::data_dir(dirs::home_dir()).with_context(|| {
        format!(
            "Could not find home directory; set {} to choose a data directory",
            config::ENV_DIR
        )
    })
}

/// Open the data directory, creating it if needed
pub fn get_context() -> Result<DigibankContext> {
    let data_dir = get_data_dir()?;
    DigibankContext::new(&data_dir)
}
