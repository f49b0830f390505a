//! Example: Write a small styled sheet and read it back

use gridcodec::prelude::*;
use gridcodec::{build_document, open_document};

fn main() -> XlsxResult<()> {
    let mut builder = Stylesheet::builder().reserve_defaults();
    let bold = builder.add_font(Font::default().with_bold(true));
    let header = builder.append(StyleDefinition::new().with_font(bold));
    let date = builder.append(
        StyleDefinition::new().with_number_format(NumberFormatDef::ID_DATE_SHORT),
    );
    let stylesheet = builder.build();

    let mut grid = Grid::new();

    // Header row
    grid.push_row(vec![
        GenericCell::new("Item").with_style(header),
        GenericCell::new("Price").with_style(header),
        GenericCell::new("Since").with_style(header),
        GenericCell::new("SKU").with_style(header),
    ]);

    // Data rows
    let since = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap_or_default();
    grid.push_row(vec![
        GenericCell::new("Item 1"),
        GenericCell::new(Decimal::new(1999, 2)),
        GenericCell::new(since).with_style(date),
        GenericCell::new("000417").as_text(),
    ]);
    grid.push_row(vec![
        GenericCell::new("Item 2"),
        GenericCell::empty(),
        GenericCell::new(since).with_style(date),
        GenericCell::new("000418").as_text(),
    ]);

    let path = std::env::temp_dir().join("gridcodec-example.xlsx");
    let columns = [ColumnWidth::new(1, 4, 14.0)];
    build_document(&path, "Prices", &stylesheet, &columns, &grid)?;
    println!("Created {}", path.display());

    let read = open_document(&path)?;
    println!("{}", read.report);
    for row in read.grid.iter() {
        let values: Vec<String> = row
            .iter()
            .map(|c| c.value.as_ref().map(Scalar::to_string).unwrap_or_default())
            .collect();
        println!("  {}", values.join(" | "));
    }

    Ok(())
}
