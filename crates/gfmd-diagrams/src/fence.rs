//! Code fence tracking outside diagram regions.
//!
//! Region markers that appear inside an ordinary fenced code block are content,
//! not markers. The preprocessor runs every line outside a region through a
//! [`FenceTracker`] to tell the two apart.

/// A fence transition reported by [`FenceTracker::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FenceEvent {
    /// A fence opened with the given info string (trimmed, possibly empty).
    Open { info: String },
    /// The current fence closed.
    Close,
}

/// Tracks `CommonMark` code fence state line by line.
///
/// Fences use backticks or tildes (three or more). A closing fence uses the
/// same character, is at least as long as the opening one, and carries no
/// info string.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    fence_char: Option<char>,
    fence_len: usize,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn in_fence(&self) -> bool {
        self.fence_char.is_some()
    }

    /// Feed one line; returns the transition it causes, if any.
    pub(crate) fn update(&mut self, line: &str) -> Option<FenceEvent> {
        let trimmed = line.trim_start();

        if let Some(fence_char) = self.fence_char {
            if !is_closing_fence(trimmed, fence_char, self.fence_len) {
                return None;
            }
            self.fence_char = None;
            self.fence_len = 0;
            return Some(FenceEvent::Close);
        }

        let (ch, len) = detect_fence(trimmed)?;
        let info = trimmed[len..].trim();
        // Backtick fences cannot carry backticks in their info string
        if ch == '`' && info.contains('`') {
            return None;
        }
        self.fence_char = Some(ch);
        self.fence_len = len;
        Some(FenceEvent::Open {
            info: info.to_owned(),
        })
    }
}

/// Fence character and run length at the start of `trimmed`.
fn detect_fence(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }

    let count = trimmed.chars().take_while(|&c| c == first).count();
    (count >= 3).then_some((first, count))
}

fn is_closing_fence(trimmed: &str, expected: char, min_len: usize) -> bool {
    if !trimmed.starts_with(expected) {
        return false;
    }

    let count = trimmed.chars().take_while(|&c| c == expected).count();
    count >= min_len && trimmed[count..].chars().all(char::is_whitespace)
}
