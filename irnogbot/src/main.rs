mod application;
mod callback;
mod commands;
mod config;
mod conversation;
mod handlers;
mod membership;
mod menus;
mod review;
mod storages;
mod target;
mod validation;

use std::sync::Arc;

use clap::Parser;
use commands::Command;
use config::{Args, CompanyRoster, Settings};
use handlers::{handle_callback_query, handle_text_message};
use storages::{FileAuditLog, PersistentApplicantStorage, Storage, StorageTrait};
use teloxide::{prelude::*, update_listeners::webhooks, utils::command::BotCommands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    pretty_env_logger::init();
    log::info!("Starting IRNOG membership bot...");

    let token = args.get_token()?;
    let bot = Bot::new(token);

    let companies = match &args.companies {
        Some(path) => {
            log::info!("Loading company roster from {:?}", path);
            CompanyRoster::load(path).await?
        }
        None => CompanyRoster::default(),
    };

    let me = bot.get_me().await?;
    let bot_username = me.username().to_string();
    log::info!("Running as @{}", bot_username);
    bot.set_my_commands(Command::bot_commands()).await?;

    let mut storage = Storage::new();
    if args.in_memory {
        log::info!("Using in-memory applicant storage");
    } else {
        log::info!("Using applicant storage file {:?}", args.users_file);
        storage =
            storage.applicants_storage(PersistentApplicantStorage::new(args.users_file.clone()));
    }
    if let Some(path) = &args.audit_log {
        log::info!("Writing audit log to {:?}", path);
        storage = storage.audit_log(FileAuditLog::new(path.clone()));
    }

    // Wrap storage in Arc<dyn StorageTrait> for use throughout the bot
    let storage: Arc<dyn StorageTrait> = Arc::new(storage);
    let settings = Arc::new(Settings::new(&args, bot_username, companies));
    if settings.channel.is_none() {
        log::warn!("No channel configured, registration is open to everyone");
    }

    let handler = dptree::entry()
        .branch(
            Update::filter_message().branch(
                dptree::filter(|msg: Message| msg.text().is_some()).endpoint(handle_text_message),
            ),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callback_query));

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![settings, storage])
        .enable_ctrlc_handler()
        .build();

    match args.webhook_url {
        Some(url) => {
            log::info!(
                "Receiving updates through webhook {} on {}",
                url,
                args.webhook_address
            );
            let listener =
                webhooks::axum(bot, webhooks::Options::new(args.webhook_address, url)).await?;
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await;
        }
        None => {
            log::info!("Receiving updates with long polling");
            dispatcher.dispatch().await;
        }
    }

    Ok(())
}
