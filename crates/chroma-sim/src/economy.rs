//! Money, lives, and score.

use chroma_core::constants::{STARTING_LIVES, STARTING_MONEY_HARD, STARTING_MONEY_NORMAL};
use chroma_core::enums::GameMode;

#[derive(Debug, Clone, PartialEq)]
pub struct Economy {
    pub lives: i32,
    pub money: i32,
    pub score: i64,
    pub kills: u32,
}

impl Economy {
    pub fn new(mode: GameMode) -> Self {
        let money = match mode {
            GameMode::Normal => STARTING_MONEY_NORMAL,
            GameMode::Hard => STARTING_MONEY_HARD,
        };
        Self {
            lives: STARTING_LIVES,
            money,
            score: 0,
            kills: 0,
        }
    }

    /// Deduct `cost` if affordable. Leaves money untouched otherwise.
    pub fn try_spend(&mut self, cost: i32) -> bool {
        if cost < 0 || self.money < cost {
            return false;
        }
        self.money -= cost;
        true
    }

    pub fn reward_kill(&mut self, reward: i32) {
        self.money += reward;
        self.score += reward as i64;
        self.kills += 1;
    }

    /// Remove one life, never going below zero. Returns lives left.
    pub fn lose_life(&mut self) -> i32 {
        self.lives = (self.lives - 1).max(0);
        self.lives
    }

    pub fn is_defeated(&self) -> bool {
        self.lives <= 0
    }
}
