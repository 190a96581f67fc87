//! `copymill history` — Inspect saved runs.

use copymill_config::AppConfig;
use copymill_core::ContentRecord;

fn print_summary_line(record: &ContentRecord) {
    println!(
        "  #{:<5} {}  {:<10} {:<9} {}",
        record.id,
        record.created_at.format("%Y-%m-%d %H:%M"),
        record.channel,
        record.tone,
        record.business_name,
    );
}

pub async fn list(limit: usize) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let store = super::open_history_store(&config).await?;

    let records = store.list_recent(limit).await?;
    if records.is_empty() {
        println!("No saved runs yet. Generate something first: copymill generate --help");
        return Ok(());
    }

    println!("  id     created           channel    tone      business");
    println!("  ─────────────────────────────────────────────────────────");
    for record in &records {
        print_summary_line(record);
    }
    Ok(())
}

pub async fn show(id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let store = super::open_history_store(&config).await?;

    let Some(record) = store.find_by_id(id).await? else {
        return Err(format!("No saved run with id {id}").into());
    };

    println!("  Run #{}", record.id);
    println!("  Created:   {}", record.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Business:  {}", record.business_name);
    println!("  Customer:  {}", record.target_customer);
    println!("  Channel:   {}", record.channel);
    println!("  Tone:      {}", record.tone);
    if !record.trend_docs.is_empty() || !record.best_practice_docs.is_empty() {
        println!(
            "  Retrieved: {} trend, {} best-practice documents",
            record.trend_docs.len(),
            record.best_practice_docs.len()
        );
    }
    println!();
    println!("  ── Strategy ────────────────────────────────");
    for line in record.strategy.lines() {
        println!("  {line}");
    }
    println!();
    println!("  ── Final copy ──────────────────────────────");
    for line in record.final_content.lines() {
        println!("  {line}");
    }
    Ok(())
}

pub async fn search(name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let store = super::open_history_store(&config).await?;

    let records = store.search_by_business_name(name).await?;
    if records.is_empty() {
        println!("No saved runs match \"{name}\"");
        return Ok(());
    }

    println!("  {} match(es) for \"{name}\":", records.len());
    println!();
    for record in &records {
        print_summary_line(record);
    }
    Ok(())
}

pub async fn delete(id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let store = super::open_history_store(&config).await?;

    if store.delete(id).await? {
        println!("Deleted run #{id}");
    } else {
        println!("No saved run with id {id}; nothing deleted.");
    }
    Ok(())
}
