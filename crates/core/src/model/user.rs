use thiserror::Error;

use crate::model::ids::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UserError {
    #[error("user name cannot be empty")]
    EmptyName,
}

/// The single learner driving the player.
///
/// The coin balance only grows: the only mutation is [`User::credit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: Option<UserId>,
    name: String,
    coins: u64,
}

impl User {
    /// Display name used when no learner profile is configured.
    pub const DEFAULT_NAME: &'static str = "John Doe";

    /// Coins granted to a fresh learner.
    pub const STARTING_COINS: u64 = 25;

    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmptyName` if name is empty or whitespace-only.
    pub fn new(id: Option<UserId>, name: impl Into<String>, coins: u64) -> Result<Self, UserError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UserError::EmptyName);
        }
        Ok(Self {
            id,
            name: name.trim().to_owned(),
            coins,
        })
    }

    #[must_use]
    pub fn id(&self) -> Option<UserId> {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn coins(&self) -> u64 {
        self.coins
    }

    /// Adds coins to the balance, saturating at `u64::MAX`.
    pub fn credit(&mut self, amount: u64) {
        self.coins = self.coins.saturating_add(amount);
    }
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: None,
            name: Self::DEFAULT_NAME.to_owned(),
            coins: Self::STARTING_COINS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_user_starts_with_25_coins() {
        let user = User::default();
        assert_eq!(user.name(), "John Doe");
        assert_eq!(user.coins(), 25);
        assert!(user.id().is_none());
    }

    #[test]
    fn new_rejects_blank_name() {
        assert_eq!(User::new(None, "  ", 0).unwrap_err(), UserError::EmptyName);
    }

    #[test]
    fn credit_saturates() {
        let mut user = User::new(None, "Ada", u64::MAX - 1).unwrap();
        user.credit(10);
        assert_eq!(user.coins(), u64::MAX);
    }
}
