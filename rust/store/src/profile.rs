use chrono::NaiveDate;
use serde::Serialize;

/// Current totals of one user, as stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub user_id: i64,
    pub user_name: String,
    pub referrer_id: Option<i64>,
    /// Earned through referrals; shown but never spent by the games
    pub bonus_balance: f64,
    /// Spent and won in the mini-games (`G`)
    pub game_balance: i64,
    pub purchases: i64,
    pub referrals: i64,
    pub last_bonus_date: Option<NaiveDate>,
}

/// Bonus paid to the user who brought a newcomer in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferralCredit {
    pub referrer: i64,
    pub bonus: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Registration {
    /// False when the user was already known; nothing changed then
    pub created: bool,
    pub referral: Option<ReferralCredit>,
}
