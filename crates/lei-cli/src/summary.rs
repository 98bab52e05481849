use std::collections::BTreeMap;
use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use lei_cli::pipeline::RunOutcome;
use lei_model::{DatasetType, QualitySummary, RunQualityReport};

pub fn print_run_summary(outcome: &RunOutcome) {
    println!("Version: {}", outcome.version);
    println!("Output: {}", outcome.output_dir.display());
    println!("Quality report: {}", outcome.quality_report.display());

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Source"),
        header_cell("Total"),
        header_cell("Valid"),
        header_cell("Invalid"),
        header_cell("Duplicates"),
        header_cell("RI issues"),
        header_cell("Validity %"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..8 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for dataset in &outcome.datasets {
        let source = dataset
            .source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut row = vec![dataset_cell(dataset.dataset), Cell::new(source)];
        row.extend(summary_cells(&dataset.summary));
        table.add_row(row);
    }
    println!("{table}");

    let warnings: Vec<(DatasetType, &String)> = outcome
        .datasets
        .iter()
        .flat_map(|dataset| dataset.warnings.iter().map(move |w| (dataset.dataset, w)))
        .collect();
    if !warnings.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Dataset"), header_cell("Warning")]);
        apply_table_style(&mut table);
        for (dataset, warning) in warnings {
            table.add_row(vec![
                dataset_cell(dataset),
                Cell::new(warning).fg(Color::Yellow),
            ]);
        }
        println!();
        println!("Warnings:");
        println!("{table}");
    }
}

pub fn print_quality_report(version: &str, report: &RunQualityReport) {
    println!("Quality report: {version}");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Total"),
        header_cell("Valid"),
        header_cell("Invalid"),
        header_cell("Duplicates"),
        header_cell("RI issues"),
        header_cell("Validity %"),
        header_cell("Warnings"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..8 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for dataset in DatasetType::ALL {
        let Some(summary) = report.get(dataset) else {
            continue;
        };
        let mut row = vec![dataset_cell(dataset)];
        row.extend(summary_cells(summary));
        row.push(count_cell(summary.warnings, Color::Yellow));
        table.add_row(row);
    }
    println!("{table}");

    for dataset in DatasetType::ALL {
        let Some(summary) = report.get(dataset) else {
            continue;
        };
        if summary.nulls_by_column.is_empty() {
            continue;
        }
        let mut table = Table::new();
        table.set_header(vec![header_cell("Column"), header_cell("Null %")]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        for (column, percent) in &summary.nulls_by_column {
            table.add_row(vec![Cell::new(column), Cell::new(format!("{percent:.2}"))]);
        }
        println!();
        println!("Null values ({dataset}):");
        println!("{table}");
    }
}

pub fn print_versions(root: &Path, versions: &BTreeMap<DatasetType, Vec<String>>) {
    println!("Snapshots: {}", root.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Versions"),
        header_cell("Latest"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (dataset, list) in versions {
        let latest = match list.last() {
            Some(version) => Cell::new(version).add_attribute(Attribute::Bold),
            None => dim_cell("-"),
        };
        table.add_row(vec![dataset_cell(*dataset), count_cell(list.len(), Color::Green), latest]);
    }
    println!("{table}");
    for (dataset, list) in versions {
        if list.len() > 1 {
            println!("{dataset}: {}", list.join(", "));
        }
    }
}

fn summary_cells(summary: &QualitySummary) -> Vec<Cell> {
    vec![
        Cell::new(summary.total_records),
        Cell::new(summary.valid_records),
        count_cell(summary.invalid_records, Color::Red),
        count_cell(summary.duplicate_count, Color::Yellow),
        count_cell(summary.referential_integrity_issues, Color::Red),
        validity_cell(summary.validity_rate),
    ]
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dataset_cell(dataset: DatasetType) -> Cell {
    Cell::new(dataset)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn validity_cell(rate: f64) -> Cell {
    let color = if rate >= 99.0 {
        Color::Green
    } else if rate >= 90.0 {
        Color::Yellow
    } else {
        Color::Red
    };
    Cell::new(format!("{rate:.2}")).fg(color)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
