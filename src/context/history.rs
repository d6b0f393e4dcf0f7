use chrono::{DateTime, Local};
use log::debug;

/// Upper bound on how many past exchanges are replayed as context.
pub const MAX_CONTEXT_WINDOW: usize = 3;

/// One completed turn. Immutable once recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    user_text: String,
    bot_text: String,
    timestamp: DateTime<Local>,
}

impl Exchange {
    pub fn user_text(&self) -> &str {
        &self.user_text
    }

    pub fn bot_text(&self) -> &str {
        &self.bot_text
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }
}

/// Append-only log of exchanges for the lifetime of one session.
#[derive(Debug, Default)]
pub struct ConversationStore {
    exchanges: Vec<Exchange>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn stamped with the current wall-clock time.
    pub fn record(&mut self, user_text: &str, bot_text: &str) -> &Exchange {
        self.record_at(user_text, bot_text, Local::now())
    }

    /// Appends a turn at `timestamp`, clamped so the log stays chronological.
    pub fn record_at(
        &mut self,
        user_text: &str,
        bot_text: &str,
        timestamp: DateTime<Local>,
    ) -> &Exchange {
        let timestamp = match self.exchanges.last() {
            Some(last) if last.timestamp > timestamp => last.timestamp,
            _ => timestamp,
        };

        self.exchanges.push(Exchange {
            user_text: user_text.to_string(),
            bot_text: bot_text.to_string(),
            timestamp,
        });
        debug!("Recorded exchange #{}", self.exchanges.len());

        &self.exchanges[self.exchanges.len() - 1]
    }

    /// The last `n` exchanges, oldest first.
    pub fn recent(&self, n: usize) -> &[Exchange] {
        let start = self.exchanges.len().saturating_sub(n);
        &self.exchanges[start..]
    }

    pub fn all(&self) -> &[Exchange] {
        &self.exchanges
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}
