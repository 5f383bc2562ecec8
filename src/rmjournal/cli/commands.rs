use super::render::{print_day_plans, print_messages, print_page_map, print_update_summary};
use super::setup::{Cli, Commands};
use chrono::Local;
use clap::Parser;
use rmjournal::api::JournalApi;
use rmjournal::config::JournalConfig;
use rmjournal::error::Result;
use rmjournal::logging::init_logging;
use rmjournal::remote::rmapi::RmapiStore;
use std::path::PathBuf;

struct AppContext {
    api: JournalApi<RmapiStore>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    if let Err(err) = init_logging(cli.verbose) {
        eprintln!("warning: {}", err);
    }

    let mut ctx = init_context(&cli)?;
    match cli.command_or_default() {
        Commands::Update { output } => handle_update(&mut ctx, output),
        Commands::Items { date, days } => handle_items(&ctx, &date, days),
        Commands::Pages => handle_pages(&ctx),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let cwd = std::env::current_dir()?;
    let path = JournalConfig::locate(cli.config.as_deref(), &cwd)?;
    let config = JournalConfig::load(&path)?;

    let remote =
        RmapiStore::new(config.rmapi_path.clone()).with_leading_args(config.rmapi_args.clone());
    let today = Local::now().date_naive();

    Ok(AppContext {
        api: JournalApi::new(remote, config, today),
    })
}

fn handle_update(ctx: &mut AppContext, output: Option<PathBuf>) -> Result<()> {
    let result = ctx.api.update(output)?;
    print_messages(&result.messages);
    if let Some(summary) = &result.update {
        print_update_summary(summary);
    }
    Ok(())
}

fn handle_items(ctx: &AppContext, date: &str, days: u32) -> Result<()> {
    let result = ctx.api.items(date, days)?;
    print_day_plans(&result.day_plans);
    print_messages(&result.messages);
    Ok(())
}

fn handle_pages(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.pages()?;
    if let Some(map) = &result.page_map {
        print_page_map(map);
    }
    print_messages(&result.messages);
    Ok(())
}
