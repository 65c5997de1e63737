use anyhow::Result;
use comfy_table::Table;

pub fn print_table(table: Table) -> Result<()> {
    println!("{table}");
    Ok(())
}

/// Table with the given header, or `None` after printing `empty` when
/// there are no rows.
pub fn table_or_empty(header: Vec<&str>, rows: usize, empty: &str) -> Option<Table> {
    if rows == 0 {
        println!("{empty}");
        return None;
    }
    let mut table = Table::new();
    table.set_header(header);
    Some(table)
}
