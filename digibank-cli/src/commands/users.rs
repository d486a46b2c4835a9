//! Users command - list operator users

use anyhow::Result;

use super::{get_context, ListArgs};
use crate::output;

pub fn run(args: ListArgs) -> Result<()> {
    let ctx = get_context()?;
    let query = args.to_query(ctx.config.listing.default_page_size)?;
    let page = ctx.user_service.list(&query)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    if page.items.is_empty() {
        output::warning("User not found");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Name", "Email"]);
    for user in &page.items {
        table.add_row(vec![user.id.clone(), user.name.clone(), user.email.clone()]);
    }
    println!("{}", table);
    output::page_footer(page.page_number, page.total_pages, page.count());

    Ok(())
}
