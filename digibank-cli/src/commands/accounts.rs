//! Accounts command - list bank accounts

use anyhow::Result;
use comfy_table::Cell;

use super::{get_context, ListArgs};
use crate::output;

pub fn run(args: ListArgs) -> Result<()> {
    let ctx = get_context()?;
    let query = args.to_query(ctx.config.listing.default_page_size)?;
    let page = ctx.account_service.list(&query)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    if page.items.is_empty() {
        output::warning("Bank Account not found");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Owner", "Account Number", "Balance"]);
    for account in &page.items {
        table.add_row(vec![
            Cell::new(&account.id),
            Cell::new(&account.owner_name),
            Cell::new(&account.account_number),
            output::money_cell(account.balance),
        ]);
    }
    println!("{}", table);
    output::page_footer(page.page_number, page.total_pages, page.count());

    Ok(())
}
