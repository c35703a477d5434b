use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use mailbox_settings::cache::QueryCache;
use mailbox_settings::config::Config;
use mailbox_settings::indicator::SaveState;
use mailbox_settings::logging::init_tracing;
use mailbox_settings::mailbox::{
    mailbox_params, InMemoryMailboxApi, Mailbox, MailboxApi, MAILBOX_QUERY,
};
use mailbox_settings::notify::{ToastQueue, TracingToasts};
use mailbox_settings::settings::{
    AutoCloseSetting, ConfettiSetting, MailboxNameSetting, SettingsContext,
};

const SETTLE_POLL: Duration = Duration::from_millis(10);

/// Edit a mailbox's settings through the debounced settings panels.
#[derive(Debug, Parser)]
#[command(name = "mailbox-settings", version)]
struct Cli {
    /// Config file (default: <config dir>/mailbox-settings/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Mailbox slug
    #[arg(long, default_value = "gumroad")]
    slug: String,

    /// New mailbox name
    #[arg(long)]
    name: Option<String>,

    /// Enable or disable auto-close
    #[arg(long)]
    auto_close: Option<bool>,

    /// Days of inactivity before auto-close, as typed
    #[arg(long)]
    days: Option<String>,

    /// Enable or disable confetti on close
    #[arg(long)]
    confetti: Option<bool>,

    /// Run the auto-close job after saving
    #[arg(long)]
    run_auto_close: bool,

    /// Quiet period before an edit is saved, overriding the config
    #[arg(long)]
    debounce_ms: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    init_tracing(&config.logging.filter);

    let api = InMemoryMailboxApi::new()
        .with_latency(config.api.latency())
        .with_mailbox(Mailbox::new(cli.slug.as_str(), "Support"))
        .with_open_conversations(&cli.slug, vec![2, 12, 45, 90]);
    let api = Arc::new(api);
    let cache = QueryCache::new();
    let toasts = ToastQueue::forwarding_to(Arc::new(TracingToasts));
    let mut ctx = SettingsContext::from_config(
        api.clone(),
        cache.clone(),
        Arc::new(toasts.clone()),
        &config,
    );
    if let Some(debounce_ms) = cli.debounce_ms {
        ctx = ctx.with_debounce(Duration::from_millis(debounce_ms));
    }

    let mailbox = api
        .get(&cli.slug)
        .await
        .with_context(|| format!("loading mailbox '{}'", cli.slug))?;
    cache
        .query(MAILBOX_QUERY)
        .set(&mailbox_params(&cli.slug), serde_json::to_value(&mailbox)?);

    let mut name_panel = MailboxNameSetting::mount(&mailbox, &ctx);
    let mut auto_close_panel = AutoCloseSetting::mount(&mailbox, &ctx);
    let mut confetti_panel = ConfettiSetting::mount(&mailbox, &ctx);

    if let Some(name) = cli.name {
        name_panel.set_name(name);
    }
    if let Some(enabled) = cli.auto_close {
        auto_close_panel.set_enabled(enabled);
    }
    if let Some(days) = cli.days {
        auto_close_panel.set_days_of_inactivity(days);
    }
    if let Some(enabled) = cli.confetti {
        confetti_panel.set_enabled(enabled).await?;
    }

    // Let debounce windows close and in-flight saves resolve.
    loop {
        let scheduled = name_panel.is_save_scheduled() || auto_close_panel.is_save_scheduled();
        let states = [name_panel.save_state(), auto_close_panel.save_state()];
        let saving = states.contains(&SaveState::Saving);
        if !scheduled && !saving {
            break;
        }
        tokio::time::sleep(SETTLE_POLL).await;
    }

    if cli.run_auto_close {
        match auto_close_panel.run_auto_close() {
            Some(run) => run.await?,
            None => tracing::warn!("Auto-close is disabled; not running it"),
        }
    }

    name_panel.teardown();
    auto_close_panel.teardown();

    tracing::info!(
        name = %name_panel.save_state(),
        auto_close = %auto_close_panel.save_state(),
        confetti = %confetti_panel.save_state(),
        stale = cache.query(MAILBOX_QUERY).is_stale(&mailbox_params(&cli.slug)),
        "Settings session finished"
    );

    for toast in toasts.drain() {
        println!("{}", serde_json::to_string(&toast)?);
    }
    let final_mailbox = api
        .mailbox(&cli.slug)
        .with_context(|| format!("mailbox '{}' disappeared", cli.slug))?;
    println!("{}", serde_json::to_string_pretty(&final_mailbox)?);

    Ok(())
}
