//! SQL logging via `tracing`.

use crate::statement::StatementKind;
use tracing::Level;

/// Truncate `s` to at most `max` bytes, backing off to a char boundary.
pub(crate) fn truncate_sql_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Emits every statement right before it is executed.
///
/// Events go to the `pgtable.sql` target with the statement kind, the table,
/// the number of bound parameters and the SQL text.
#[derive(Debug, Clone)]
pub struct SqlLog {
    /// Emit events at all.
    pub enabled: bool,
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for SqlLog {
    fn default() -> Self {
        Self {
            enabled: true,
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl SqlLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn statement logging off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    pub(crate) fn emit(&self, kind: StatementKind, table: &str, sql: &str, param_count: usize) {
        if !self.enabled {
            return;
        }

        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    _ => tracing::trace!($($field)*),
                }
            };
        }

        let sql = self.truncate_sql(sql);
        emit_at_level!(
            self.level,
            target: "pgtable.sql",
            kind = %kind,
            table,
            param_count,
            sql = %sql,
        );
    }
}
