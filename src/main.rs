use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use txmarkers::convert::{convert, ConvertPaths};

fn main() -> Result<()> {
    // ─── 1) init logging (stderr; stdout carries only the summary) ──
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    // ─── 2) read the extract, write both outputs ────────────────────
    let summary = convert(&ConvertPaths::default())?;

    // ─── 3) report ───────────────────────────────────────────────────
    println!("{}", summary);
    Ok(())
}
