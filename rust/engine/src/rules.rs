use crate::errors::GameError;

/// Parses a bet typed by the player and checks it against the balance.
///
/// # Arguments
///
/// * `input` - Raw text the player sent
/// * `balance` - Current game balance
///
/// # Returns
///
/// The bet amount, which is always positive and never above `balance`.
///
/// # Errors
///
/// - [`GameError::NotANumber`] - Text is not an integer
/// - [`GameError::NonPositiveBet`] - Zero or negative amount
/// - [`GameError::InsufficientFunds`] - Bet exceeds the balance
///
/// # Examples
///
/// ```
/// use ginga_engine::rules::validate_bet;
/// use ginga_engine::errors::GameError;
///
/// assert_eq!(validate_bet(" 100 ", 500), Ok(100));
/// assert_eq!(validate_bet("500", 500), Ok(500));
/// assert!(matches!(validate_bet("501", 500), Err(GameError::InsufficientFunds { .. })));
/// assert!(matches!(validate_bet("ten", 500), Err(GameError::NotANumber(_))));
/// assert_eq!(validate_bet("0", 500), Err(GameError::NonPositiveBet));
/// ```
pub fn validate_bet(input: &str, balance: i64) -> Result<u64, GameError> {
    let text = input.trim();
    let amount: i64 = text
        .parse()
        .map_err(|_| GameError::NotANumber(text.to_string()))?;
    if amount <= 0 {
        return Err(GameError::NonPositiveBet);
    }
    if amount > balance {
        return Err(GameError::InsufficientFunds {
            bet: amount as u64,
            balance,
        });
    }
    Ok(amount as u64)
}
