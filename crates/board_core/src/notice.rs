use std::time::{Duration, Instant};

/// How long a notice stays on screen before it auto-dismisses.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Success,
    Error,
}

/// One line of command feedback, styled by severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub severity: NoticeSeverity,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: NoticeSeverity::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: NoticeSeverity::Error,
        }
    }
}

/// Single-slot message area. Showing a notice replaces whatever is on
/// screen and restarts the dismissal clock.
#[derive(Debug, Default)]
pub struct MessageArea {
    current: Option<(Notice, Instant)>,
}

impl MessageArea {
    pub fn show(&mut self, notice: Notice, now: Instant) {
        self.current = Some((notice, now + NOTICE_TTL));
    }

    /// The notice to draw this frame, if its deadline has not passed.
    pub fn visible(&mut self, now: Instant) -> Option<&Notice> {
        if self
            .current
            .as_ref()
            .is_some_and(|(_, deadline)| now >= *deadline)
        {
            self.current = None;
        }
        self.current.as_ref().map(|(notice, _)| notice)
    }
}
