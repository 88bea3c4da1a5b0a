//! # Chat Command
//!
//! Talks to the bot from the terminal. Each input line becomes one update for
//! the dispatcher and every reply is printed with its keyboard. Deliveries
//! addressed to the console user (broadcasts, global round announcements) are
//! printed after the reply that triggered them; other users count as offline.

use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex};

use ginga_bot::{
    Delivery, DeliveryError, Dispatcher, DispatcherConfig, GlobalRoundHandle, Incoming, Outbox,
    Reply, User,
};
use ginga_engine::round::PlayerId;

use crate::error::CliError;
use crate::formatters::render_reply;
use crate::io_utils::{open_ledger, read_stdin_line, resolve_settings};
use crate::ui;
use crate::validation::{parse_console_line, ConsoleInput};

#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub db: Option<std::path::PathBuf>,
    pub user: PlayerId,
    pub name: String,
    pub admin: bool,
    pub seed: Option<u64>,
}

/// Only the console user is connected.
struct ConsoleOutbox {
    user: PlayerId,
    pending: Mutex<Vec<Delivery>>,
}

impl ConsoleOutbox {
    fn drain(&self) -> Vec<Delivery> {
        match self.pending.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Outbox for ConsoleOutbox {
    fn deliver(&self, user: PlayerId, delivery: &Delivery) -> Result<(), DeliveryError> {
        if user != self.user {
            return Err(DeliveryError::NotConnected(user));
        }
        self.pending
            .lock()
            .map_err(|_| DeliveryError::Rejected {
                user,
                reason: "console outbox poisoned".to_string(),
            })?
            .push(delivery.clone());
        Ok(())
    }
}

/// Runs the chat loop until `q`/`quit` or EOF.
pub fn handle_chat_command(
    options: ChatOptions,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let ChatOptions {
        db,
        user,
        name,
        admin,
        seed,
    } = options;

    let mut settings = resolve_settings(db)?.settings;
    if admin {
        settings.admin_id = Some(user);
    }
    if seed.is_some() {
        settings.seed = seed;
    }

    let ledger = open_ledger(&settings)?;
    let outbox = Arc::new(ConsoleOutbox {
        user,
        pending: Mutex::new(Vec::new()),
    });
    let dispatcher = Dispatcher::new(
        DispatcherConfig::from_settings(&settings),
        ledger,
        Arc::new(GlobalRoundHandle::new()),
        Arc::clone(&outbox) as Arc<dyn Outbox>,
    );

    writeln!(
        out,
        "chat: user={} name={} admin={} (q to quit, /cmd, [button], #data)",
        user,
        name,
        settings.is_admin(user)
    )?;

    let me = User::new(user, name.clone());
    let mut keyboard: Option<Reply> = None;

    loop {
        ui::write_prompt(out, &name)?;
        let Some(line) = read_stdin_line(stdin) else {
            writeln!(out)?;
            break;
        };
        let event = match parse_console_line(&line, keyboard.as_ref()) {
            ConsoleInput::Quit => break,
            ConsoleInput::Invalid(msg) => {
                ui::display_warning(err, &msg)?;
                continue;
            }
            ConsoleInput::Event(event) => event,
        };

        let replies = dispatcher.handle(Incoming {
            user: me.clone(),
            event,
        });
        for reply in &replies {
            writeln!(out, "{}", render_reply(reply))?;
            writeln!(out)?;
        }
        for delivery in outbox.drain() {
            writeln!(out, "📨 {}", render_reply(&delivery.reply))?;
            writeln!(out)?;
            if !delivery.reply.buttons.is_empty() {
                keyboard = Some(delivery.reply);
            }
        }
        if let Some(last) = replies.into_iter().rev().find(|r| !r.buttons.is_empty()) {
            keyboard = Some(last);
        }
    }

    writeln!(out, "bye")?;
    Ok(())
}
