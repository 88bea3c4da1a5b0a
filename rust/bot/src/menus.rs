//! Fixed display strings and keyboards.

use ginga_engine::blackjack::{BlackjackRound, Outcome};
use ginga_engine::hand::format_hand;
use ginga_engine::slots::{classify, format_line, LineKind, Symbol, REELS};
use ginga_engine::word::{render_marks, Mark};
use ginga_store::Profile;

use crate::broadcast::BroadcastReport;
use crate::conversation::BetGame;
use crate::message::{Button, Reply};

pub const PROFILE: &str = "profile";
pub const GAMES: &str = "games";
pub const HINTS: &str = "hints";
pub const DAILY_BONUS: &str = "daily_bonus";
pub const BLACKJACK: &str = "blackjack";
pub const SLOTS: &str = "slots";
pub const WORD_GAME: &str = "word_game";
pub const HIT: &str = "hit";
pub const STAND: &str = "stand";
pub const JOIN_GLOBAL: &str = "join_global_wordly";
pub const ADD_HINT: &str = "add_desc";
pub const NO_HINT: &str = "no_desc";

/// Everything the menus need that is not per-user.
#[derive(Debug, Clone)]
pub struct MenuContext {
    pub bot_username: String,
    /// Without the leading `@`
    pub channel: String,
    pub daily_bonus: u64,
}

impl MenuContext {
    fn channel_url(&self) -> String {
        format!("https://t.me/{}", self.channel)
    }

    pub fn referral_link(&self, user_id: i64) -> String {
        format!("https://t.me/{}?start={}", self.bot_username, user_id)
    }
}

pub fn profile(ctx: &MenuContext, name: &str, p: &Profile) -> Reply {
    let text = format!(
        "👤 *Profile: {name}*\n\n\
         - 💰 Bonus balance: *{bonus:.2}*\n\
         - 🎮 Game balance: *{game}G*\n\
         - 🛒 Purchases: *{purchases}*\n\
         - 👥 Invited: *{referrals}* people\n\n\
         🔗 *Your referral link:*\n\
         `{link}`\n\n\
         ℹ️ _Invite friends and get 2 to 5 on your bonus balance for each one!_",
        bonus = p.bonus_balance,
        game = p.game_balance,
        purchases = p.purchases,
        referrals = p.referrals,
        link = ctx.referral_link(p.user_id),
    );
    Reply::text(text).with_buttons(vec![
        vec![Button::callback("🎁 Daily bonus", DAILY_BONUS)],
        vec![
            Button::callback("🎮 Games", GAMES),
            Button::callback("💡 Hints", HINTS),
        ],
        vec![Button::url("📢 Channel", ctx.channel_url())],
    ])
}

pub fn main_menu(ctx: &MenuContext) -> Reply {
    Reply::text("Use the menu below 👇").with_buttons(vec![
        vec![Button::callback("🎁 Daily bonus", DAILY_BONUS)],
        vec![
            Button::callback("👤 Profile", PROFILE),
            Button::callback("🎮 Games", GAMES),
        ],
        vec![
            Button::url("📢 Channel", ctx.channel_url()),
            Button::callback("💡 Hints", HINTS),
        ],
    ])
}

pub fn games() -> Reply {
    Reply::text("Choose a game:").with_buttons(vec![
        vec![
            Button::callback("🃏 Blackjack", BLACKJACK),
            Button::callback("🎰 Slots", SLOTS),
        ],
        vec![Button::callback("📝 Guess the word", WORD_GAME)],
        vec![back_to(PROFILE)],
    ])
}

pub fn hints(ctx: &MenuContext) -> Reply {
    let text = format!(
        "*💡 Hints and news:*\n\n\
         *🆕 What's new?*\n\
         - ✨ A *daily bonus* of {bonus}G!\n\
         - 🎮 New games: *Blackjack*, *Slots* and *Guess the word*.\n\
         - 👥 Improved referral system.\n\n\
         *🏆 How to earn?*\n\
         - 🤝 Invite friends with your referral link.\n\
         - 🎁 Claim the daily bonus.\n\
         - 🎰 Try your luck in the games!\n\n\
         *🔔 Stay in touch:*\n\
         - Follow the news in our [channel]({url}).",
        bonus = ctx.daily_bonus,
        url = ctx.channel_url(),
    );
    Reply::text(text).with_buttons(vec![vec![back_to(PROFILE)]])
}

pub fn bonus_claimed(amount: u64) -> Reply {
    Reply::text(format!("✅ You received {amount}G!"))
}

pub fn bonus_already_claimed() -> Reply {
    Reply::text("❌ You have already claimed today's bonus.")
}

pub fn bet_prompt(game: BetGame, balance: i64) -> Reply {
    let title = match game {
        BetGame::Blackjack => "🃏 *Blackjack*",
        BetGame::Slots => "🎰 *Slots*",
    };
    Reply::text(format!(
        "{title}\n\nYour game balance: *{balance}G*\nEnter your bet:"
    ))
}

pub fn not_a_number() -> Reply {
    Reply::text("Please enter a number.")
}

pub fn non_positive_bet() -> Reply {
    Reply::text("The bet must be greater than zero.")
}

pub fn insufficient_funds() -> Reply {
    Reply::text("You don't have enough funds for this bet.")
}

fn play_again(data: &str, label: &str) -> Vec<Vec<Button>> {
    vec![
        vec![Button::callback(label, data)],
        vec![Button::callback("⬅️ Back to games", GAMES)],
    ]
}

fn back_to(data: &str) -> Button {
    Button::callback("⬅️ Back", data)
}

/// The table while the player still acts: one dealer card shown.
pub fn blackjack_table(round: &BlackjackRound) -> Reply {
    let upcard = round
        .dealer_upcard()
        .map(|c| c.to_string())
        .unwrap_or_default();
    Reply::text(format!(
        "Dealer's cards: {upcard} [?]\n\
         Your cards: {hand} (Points: {points})\n\n\
         Your move:",
        hand = format_hand(round.player_hand()),
        points = round.player_value(),
    ))
    .with_buttons(vec![vec![
        Button::callback("➕ Hit", HIT),
        Button::callback("✋ Stand", STAND),
    ]])
}

pub fn blackjack_result(round: &BlackjackRound, balance: i64) -> Reply {
    let player = round.player_value();
    let dealer = round.dealer_value();
    let bet = round.bet();
    let result = match round.outcome() {
        Some(Outcome::Bust) => format!("😔 Bust! You have {player}. You lost *{bet}G*."),
        Some(Outcome::Win) => format!(
            "🎉 You won! You have {player}, the dealer has {dealer}. Your winnings: *{}G*.",
            Outcome::Win.payout(bet)
        ),
        Some(Outcome::Lose) => format!(
            "😔 You lost. You have {player}, the dealer has {dealer}. Lost *{bet}G*."
        ),
        Some(Outcome::Push) => {
            format!("🤝 Push. You and the dealer both have {player}. Your bet is returned.")
        }
        None => String::new(),
    };
    Reply::text(format!(
        "Dealer: {dealer_hand} ({dealer})\n\
         You: {player_hand} ({player})\n\n\
         {result}\n\n\
         Your new balance: *{balance}G*",
        dealer_hand = format_hand(round.dealer_hand()),
        player_hand = format_hand(round.player_hand()),
    ))
    .with_buttons(play_again(BLACKJACK, "🃏 Play again"))
}

pub fn no_blackjack() -> Reply {
    Reply::text("There is no blackjack game in progress.")
        .with_buttons(vec![vec![Button::callback("🃏 Blackjack", BLACKJACK)]])
}

pub fn slots_result(reels: &[Symbol; REELS], bet: u64, payout: u64, balance: i64) -> Reply {
    let result = match classify(reels) {
        LineKind::Jackpot => format!("🎉 Jackpot! You won *{payout}G*!"),
        LineKind::Pair => format!("👍 Not bad! You won *{payout}G*!"),
        LineKind::Miss => format!("😔 Unfortunately, you lost *{bet}G*."),
    };
    Reply::text(format!(
        "Result: {line}\n\n{result}\n\nYour new balance: *{balance}G*",
        line = format_line(reels),
    ))
    .with_buttons(play_again(SLOTS, "🎰 Play again"))
}

pub fn word_started(category: &str, letters: usize) -> Reply {
    Reply::text(format!(
        "I picked a word from the category: *{category}*.\n\
         The word has *{letters}* letters.\n\n\
         Type your guess:"
    ))
}

pub fn wrong_length(letters: usize) -> Reply {
    Reply::text(format!(
        "The word must have {letters} letters. Try again."
    ))
}

pub fn word_marks(marks: &[Mark]) -> Reply {
    Reply::text(format!("{}\n\nTry again.", render_marks(marks)))
}

pub fn word_solved(reward: u64) -> Reply {
    Reply::text(format!(
        "🎉 Congratulations! You guessed the word!\n\n\
         You get *{reward}G* on your game balance."
    ))
    .with_buttons(play_again(WORD_GAME, "📝 Play again"))
}

pub fn global_over() -> Reply {
    Reply::text("😔 The admin's game is already over.")
}

pub fn global_already_solved() -> Reply {
    Reply::text("🎉 You have already guessed this word!")
}

pub fn global_prompt() -> Reply {
    Reply::text("Type your guess:")
}

pub fn global_marks(marks: &[Mark]) -> Reply {
    Reply::text(format!("{}\n\nWrong. Try again.", render_marks(marks)))
}

pub fn global_solved(reward: u64) -> Reply {
    Reply::text(format!(
        "🏆 Congratulations! You guessed the admin's word!\n\n\
         You get *{reward}G* on your game balance."
    ))
}

/// The announcement every user receives when a global round starts.
pub fn global_announcement(letters: usize, hint: Option<&str>) -> Reply {
    let mut text = format!(
        "🔥 *Admin's game: Guess the Word!* 🔥\n\nThe word has *{letters}* letters."
    );
    if let Some(hint) = hint {
        text.push_str(&format!("\n\n*Hint from the admin:*\n_{hint}_"));
    }
    Reply::text(text).with_buttons(vec![vec![Button::callback("▶️ Play", JOIN_GLOBAL)]])
}

pub fn admin_panel() -> Reply {
    Reply::text("You are in the admin panel. Enter the message to broadcast:")
}

pub fn broadcast_started(total: usize) -> Reply {
    Reply::text(format!("Starting broadcast... Total users: {total}"))
}

pub fn broadcast_finished(report: &BroadcastReport) -> Reply {
    Reply::text(format!(
        "✅ Broadcast finished!\n\nSent: {}\nFailed: {}",
        report.sent, report.failed
    ))
}

pub fn dupe_usage() -> Reply {
    Reply::text("❌ Wrong command format. Use /dupe <number>")
}

pub fn dupe_non_positive() -> Reply {
    Reply::text("The amount must be a positive number.")
}

pub fn dupe_done(amount: u64, balance: i64) -> Reply {
    Reply::text(format!(
        "✅ Added {amount}G.\nYour new game balance: *{balance}G*"
    ))
}

pub fn ask_global_word() -> Reply {
    Reply::text("📝 Enter the word to set for everyone:")
}

pub fn invalid_global_word() -> Reply {
    Reply::text("The word must be a single word without spaces. Try again:")
}

pub fn ask_hint_decision() -> Reply {
    Reply::text("Do you want to add a hint to the word?").with_buttons(vec![vec![
        Button::callback("✅ Yes", ADD_HINT),
        Button::callback("❌ No", NO_HINT),
    ]])
}

pub fn ask_hint() -> Reply {
    Reply::text("✏️ Enter your hint:")
}

pub fn global_started(with_hint: bool, report: &BroadcastReport) -> Reply {
    let head = if with_hint {
        "✅ Game broadcast started with a hint!"
    } else {
        "✅ Game broadcast started without a hint!"
    };
    Reply::text(format!(
        "{head}\n\nSent: {}\nFailed: {}",
        report.sent, report.failed
    ))
}

pub fn try_again_later() -> Reply {
    Reply::text("⚠️ Something went wrong. Please try again later.")
}
