//! Status command - account and user totals

use anyhow::Result;
use colored::Colorize;
use comfy_table::Cell;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status_service.get_status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Digibank Status".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec![Cell::new("Bank accounts"), Cell::new(status.total_accounts)]);
    table.add_row(vec![Cell::new("Users"), Cell::new(status.total_users)]);
    table.add_row(vec![
        Cell::new("Total balance"),
        output::money_cell(status.total_balance),
    ]);
    println!("{}", table);

    if !status.banks.is_empty() {
        println!();
        println!("{}", "Banks".bold());
        for bank in &status.banks {
            println!("  • {}", bank);
        }
    }

    Ok(())
}
