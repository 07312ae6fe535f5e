//! `gantry categories` -- list the intent taxonomy.

use comfy_table::{Table, presets::UTF8_FULL};
use gantry_core::Taxonomy;

pub fn run(json: bool) -> anyhow::Result<()> {
    let taxonomy = Taxonomy::heavy_machinery()?;
    if json {
        let categories: Vec<_> = taxonomy.categories().collect();
        println!("{}", serde_json::to_string_pretty(&categories)?);
    } else {
        println!("{}", categories_table(&taxonomy));
    }
    Ok(())
}

pub fn categories_table(taxonomy: &Taxonomy) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["ID", "NAME", "ALLOWED", "DESCRIPTION"]);
    for c in taxonomy.categories() {
        table.add_row([
            c.id.to_string(),
            c.name.clone(),
            if c.allowed { "yes" } else { "no" }.to_string(),
            c.description.clone(),
        ]);
    }
    table
}
