//! Helpers for the `iris` command-line tool: output formatting and file typing.

use clap::ValueEnum;
use iris_core::models::{AnalysisRecord, ImageRecord, ImageStats};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

/// Content type from the file extension; anything unknown is `application/octet-stream`.
pub fn guess_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("tif") | Some("tiff") => "image/tiff",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_size(size: Option<u64>) -> String {
    match size {
        Some(bytes) => format!("{:.1} KB", bytes as f64 / 1024.0),
        None => "-".to_string(),
    }
}

pub fn print_images_table(images: &[ImageRecord]) {
    println!("\n=== Images ({}) ===\n", images.len());

    if images.is_empty() {
        println!("No images found.\n");
        return;
    }

    println!(
        "{:<36} {:<30} {:>10} {:<8} {:<30} {:>20}",
        "ID", "Name", "Size", "Analyzed", "Tags", "Created At"
    );
    println!("{}", "-".repeat(140));

    for image in images {
        println!(
            "{:<36} {:<30} {:>10} {:<8} {:<30} {:>20}",
            image.id,
            truncate_string(&image.name, 30),
            format_size(image.size),
            if image.analyzed { "yes" } else { "no" },
            truncate_string(&image.ai_tags.join(", "), 30),
            image.created_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    println!();
}

pub fn print_image(image: &ImageRecord) {
    println!("ID:         {}", image.id);
    println!("Name:       {}", image.name);
    println!("Key:        {}", image.s3_key);
    println!("URL:        {}", image.s3_url);
    println!("Bucket:     {}", image.bucket);
    println!("Size:       {}", format_size(image.size));
    println!(
        "MIME type:  {}",
        image.mime_type.as_deref().unwrap_or("-")
    );
    println!("Analyzed:   {}", image.analyzed);
    if !image.ai_tags.is_empty() {
        println!("Tags:       {}", image.ai_tags.join(", "));
    }
    println!("Created at: {}", image.created_at.to_rfc3339());
}

pub fn print_analysis(analysis: &AnalysisRecord) {
    println!(
        "\n=== Analysis of {} ({}) ===",
        analysis.image_id,
        analysis.analyzed_at.format("%Y-%m-%d %H:%M:%S")
    );

    println!("\nLabels ({}):", analysis.labels.len());
    for label in &analysis.labels {
        println!("  {:<30} {:>6.1}%", label.name, label.confidence);
    }

    println!("\nFaces ({}):", analysis.faces.len());
    for (i, face) in analysis.faces.iter().enumerate() {
        let age = face
            .age_range
            .as_ref()
            .and_then(|range| Some(format!("{}-{}", range.low?, range.high?)))
            .unwrap_or_else(|| "?".to_string());
        let emotion = face
            .emotions
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
            .map(|e| e.emotion_type.as_str())
            .unwrap_or("-");
        println!(
            "  #{:<3} age {:<8} {:<10} {:>6.1}%",
            i + 1,
            age,
            emotion,
            face.confidence
        );
    }

    println!("\nText ({}):", analysis.text_detections.len());
    for text in &analysis.text_detections {
        println!(
            "  {:<40} {:<5} {:>6.1}%",
            truncate_string(&text.text, 40),
            text.detection_type,
            text.confidence
        );
    }
    println!();
}

pub fn print_stats(stats: &ImageStats) {
    println!("\n=== Image Statistics ===\n");
    println!("Total images:     {}", stats.total_images);
    println!("Analyzed:         {}", stats.analyzed);
    println!("Objects detected: {}", stats.objects_detected);
    println!("Faces found:      {}", stats.faces_found);
    println!();
}

/// Initialize tracing for the CLI. Logs go to stderr so `--format json`
/// output stays machine-readable.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
