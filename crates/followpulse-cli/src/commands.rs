use std::sync::Arc;

use chrono::SecondsFormat;
use followpulse_core::{AppConfig, Handle, HistorySnapshot};
use followpulse_scraper::Resolver;
use followpulse_store::{build_resolver, open_store, HistoryStore, Recorder};

pub(crate) struct Context {
    resolver: Resolver,
    store: Arc<dyn HistoryStore>,
}

impl Context {
    pub(crate) fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let demo = followpulse_core::load_demo_profiles(config.demo_profiles_path.as_deref())?;
        let store = open_store(
            config.firebase.as_ref(),
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        let resolver = build_resolver(config, &store, demo)?;
        Ok(Self { resolver, store })
    }
}

pub(crate) async fn run_resolve(ctx: &Context, handle: &Handle) -> anyhow::Result<()> {
    let profile = ctx.resolver.resolve(handle).await?;
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

pub(crate) async fn run_track(ctx: &Context, handle: &Handle) -> anyhow::Result<()> {
    let profile = ctx.resolver.resolve(handle).await?;
    let outcome = Recorder::new(Arc::clone(&ctx.store))
        .record(handle, &profile)
        .await;

    println!(
        "@{handle}: {} followers ({}) [{} via {}]",
        profile.follower_count,
        format_delta(outcome.previous_follower_count, profile.follower_count),
        profile.source_kind,
        profile.source,
    );
    if !outcome.persisted {
        eprintln!("warning: snapshot was not saved to the {} store", ctx.store.backend());
    }
    Ok(())
}

pub(crate) async fn run_history(ctx: &Context, handle: &Handle) -> anyhow::Result<()> {
    let history = ctx.store.history(handle).await?;
    if history.is_empty() {
        println!("no snapshots recorded for @{handle}");
        return Ok(());
    }
    for snapshot in &history {
        println!("{}", format_snapshot(snapshot));
    }
    Ok(())
}

/// `previous` of 0 means nothing was stored before (or the store was
/// unreachable), so no delta is shown.
pub(crate) fn format_delta(previous: u64, current: u64) -> String {
    if previous == 0 {
        return "first record".to_string();
    }
    let delta = i128::from(current) - i128::from(previous);
    format!("{delta:+} since last check")
}

pub(crate) fn format_snapshot(snapshot: &HistorySnapshot) -> String {
    format!(
        "{}  {}",
        snapshot.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        snapshot.followers
    )
}
