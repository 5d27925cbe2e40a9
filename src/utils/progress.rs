//! Progress reporting for long bench runs
//!
//! With the `progress` feature this is an `indicatif` bar on stderr; without
//! it, [`ProgressBar`] is an inert stand-in with the same calls.

#[cfg(feature = "progress")]
pub use indicatif::ProgressBar;

#[cfg(not(feature = "progress"))]
pub use self::inert::ProgressBar;

/// Bar template: current strategy, bar, completed/total queries
#[cfg(feature = "progress")]
const TEMPLATE: &str = "{msg:>10} [{bar:30}] {pos}/{len}";

/// Bar counting `total` timed queries; hidden unless `visible`
pub fn query_bar(total: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(total);
    #[cfg(feature = "progress")]
    if let Ok(style) = indicatif::ProgressStyle::default_bar().template(TEMPLATE) {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

#[cfg(not(feature = "progress"))]
mod inert {
    use std::borrow::Cow;

    #[derive(Clone)]
    pub struct ProgressBar;

    impl ProgressBar {
        pub fn new(_total: u64) -> Self {
            ProgressBar
        }

        pub fn hidden() -> Self {
            ProgressBar
        }

        pub fn set_message(&self, _msg: impl Into<Cow<'static, str>>) {}

        pub fn inc(&self, _delta: u64) {}

        pub fn finish_and_clear(&self) {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_bar_accepts_updates() {
        let bar = query_bar(4, false);
        bar.set_message("linear");
        bar.inc(4);
        bar.finish_and_clear();
    }
}
