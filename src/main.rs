use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use blogparser::{BatchReport, BlogPost};

#[derive(Parser)]
#[command(name = "blogparser", about = "Blog HTML parser and extractive summarizer")]
struct Cli {
    /// Exported HTML files to parse
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Emit posts as a JSON array instead of text
    #[arg(long)]
    json: bool,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Max files to parse (default: all)
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Suppress per-post output; print only the batch summary
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut files = cli.files;
    if let Some(limit) = cli.limit {
        files.truncate(limit);
    }

    let parser = blogparser::Parser::new();

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
            .unwrap()
            .progress_chars("#>-"),
    );

    let report = parser.parse_files(&files, |outcome| {
        if let Err(e) = &outcome.result {
            warn!(path = %outcome.path.display(), error = %e, "parse failed");
        }
        pb.inc(1);
    });
    pb.finish_and_clear();

    let rendered = if cli.json {
        render_json(&report)?
    } else if cli.quiet {
        String::new()
    } else {
        render_text(&report)
    };

    match cli.output {
        Some(path) => {
            let mut f = fs::File::create(&path)?;
            f.write_all(rendered.as_bytes())?;
            println!("Wrote {} posts to {}", report.succeeded(), path.display());
        }
        None => print!("{rendered}"),
    }

    println!(
        "Parsed {} of {} files ({} failed).",
        report.succeeded(),
        report.outcomes.len(),
        report.failed(),
    );

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("Done in {}", format_duration(elapsed));
    }

    if report.all_failed() {
        anyhow::bail!("all {} files failed to parse", report.outcomes.len());
    }
    Ok(())
}

fn render_json(report: &BatchReport) -> anyhow::Result<String> {
    let posts: Vec<&BlogPost> = report
        .outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().ok())
        .collect();
    let mut out = serde_json::to_string_pretty(&posts)?;
    out.push('\n');
    Ok(out)
}

fn render_text(report: &BatchReport) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        let Ok(post) = &outcome.result else {
            continue;
        };
        out.push_str(&format!("=== {} ===\n", post.slug));
        out.push_str(&format!("Title:      {}\n", post.title));
        out.push_str(&format!(
            "Created:    {}\n",
            post.created_at
                .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".into()),
        ));
        out.push_str(&format!("Categories: {}\n", join_or_dash(&post.categories)));
        out.push_str(&format!("Tags:       {}\n", join_or_dash(&post.tags)));
        out.push_str(&format!(
            "Image:      {}\n",
            if post.first_image.is_empty() { "-" } else { post.first_image.as_str() },
        ));
        out.push_str(&format!(
            "Content:    {} chars\n",
            post.content.chars().count()
        ));
        out.push_str(&format!("Summary:    {}\n\n", post.summary));
    }
    out
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
