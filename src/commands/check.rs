use crate::config::SourceConfig;
use crate::error::Result;
use crate::models::{Dataset, IndexRecord};
use crate::services::{DataStore, populate};
use crate::utils::format_indian;

pub async fn run(source: SourceConfig, preview: usize) {
    println!("🔎 Checking CSV source: {}\n", source.url);

    match check(&source, preview).await {
        Ok(()) => {}
        Err(e) => {
            eprintln!("❌ Error ({}): {}", e.kind(), e);
            std::process::exit(1);
        }
    }
}

async fn check(source: &SourceConfig, preview: usize) -> Result<()> {
    let fetcher = source.fetcher()?;
    let store = DataStore::new();
    let count = populate(&fetcher, &store).await?;

    let snapshot = store.snapshot().await;
    let dataset = &snapshot.dataset;

    println!("✅ Parsed {} records", format_indian(count as f64));
    println!("📋 Columns ({}): {}", dataset.columns().len(), dataset.columns().join(", "));

    let names = dataset.index_names();
    println!("📈 Distinct indices: {}", names.len());

    if count == 0 {
        println!("⚠️  Source has a header but no data rows");
        return Ok(());
    }

    show_preview(dataset, preview);
    Ok(())
}

fn show_preview(dataset: &Dataset, preview: usize) {
    println!("\n═══════════════════════════════════════════════════════════\n");
    for record in dataset.records().iter().take(preview) {
        show_record(record);
    }
    if dataset.len() > preview {
        println!("   … {} more", dataset.len() - preview);
    }
}

fn show_record(record: &IndexRecord) {
    let name = record.index_name().unwrap_or("?");
    let date = record.index_date().unwrap_or("?");
    let fmt = |v: Option<f64>| v.map(format_indian).unwrap_or_else(|| "N/A".to_string());

    println!("🔹 {} ({})", name, date);
    println!(
        "   O {}  H {}  L {}  C {}",
        fmt(record.open()),
        fmt(record.high()),
        fmt(record.low()),
        fmt(record.close())
    );
    println!(
        "   Volume {}  Turnover ₹{} Cr  Change {}% ({})",
        fmt(record.volume()),
        fmt(record.turnover_rs_cr()),
        fmt(record.change_percent()),
        fmt(record.points_change())
    );
}
