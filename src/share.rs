// File: src/share.rs
use crate::error::ShareError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::Write;

pub const SHARE_TITLE: &str = "מתרגם סקיבידי";
pub const SHARE_URL: &str = "https://sigma.translate.com";

/// Something that can publish a share summary: a native share sheet or a
/// clipboard.
pub trait ShareTarget {
    fn share(&mut self, title: &str, text: &str) -> Result<(), ShareError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Copied,
    Failed,
}

impl ShareOutcome {
    pub fn succeeded(self) -> bool {
        !matches!(self, ShareOutcome::Failed)
    }
}

/// Tries the native target, then the clipboard. Failures are logged and
/// never returned.
pub fn share_with_fallback(
    native: Option<&mut dyn ShareTarget>,
    clipboard: &mut dyn ShareTarget,
    title: &str,
    text: &str,
) -> ShareOutcome {
    if let Some(target) = native {
        match target.share(title, text) {
            Ok(()) => return ShareOutcome::Shared,
            Err(e) => tracing::warn!("Native share failed, falling back to clipboard: {}", e),
        }
    }

    match clipboard.share(title, text) {
        Ok(()) => ShareOutcome::Copied,
        Err(e) => {
            tracing::warn!("Clipboard copy failed: {}", e);
            ShareOutcome::Failed
        }
    }
}

/// Summary text for sharing progress. `unlocked` is shown out of `total`.
pub fn format_summary(score: u64, unlocked: usize, total: usize) -> String {
    format!(
        "🎯 הגעתי ל-{score} נקודות במתרגם סקיבידי!\n🏆 הישגים שנפתחו: {unlocked}/{total}\n🌟 נסו גם אתם: {SHARE_URL}"
    )
}

/// Copies to the terminal's clipboard with an OSC 52 escape sequence.
#[derive(Debug)]
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ShareTarget for Osc52Clipboard<W> {
    fn share(&mut self, _title: &str, text: &str) -> Result<(), ShareError> {
        write!(self.out, "\x1b]52;c;{}\x07", STANDARD.encode(text))?;
        self.out.flush()?;
        Ok(())
    }
}

/// Stands in for a platform without a native share capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNativeShare;

impl ShareTarget for NoNativeShare {
    fn share(&mut self, _title: &str, _text: &str) -> Result<(), ShareError> {
        Err(ShareError::Unsupported)
    }
}
