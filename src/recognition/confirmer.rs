//! Multi-frame confirmation over single-shot recognition results.
//!
//! The simplified variant of tracking: instead of per-track histograms, a
//! bounded window of the most recent results is majority-gated.

use std::collections::{HashMap, VecDeque};

use crate::config::ConfirmerConfig;

/// Requires an identity to appear in at least `confirm_threshold` of the
/// last `window_size` frames before reporting it as confirmed.
///
/// The window resets after every confirmation, and also when it fills
/// without any label reaching the threshold.
#[derive(Debug)]
pub struct WindowedConfirmer {
    config: ConfirmerConfig,
    history: VecDeque<Option<String>>,
}

impl WindowedConfirmer {
    pub fn new(config: ConfirmerConfig) -> Self {
        let capacity = config.window_size;
        Self {
            config,
            history: VecDeque::with_capacity(capacity),
        }
    }

    /// Record one single-shot result: a recognized name, or `None` when no
    /// face was recognized this frame.
    pub fn push(&mut self, label: Option<String>) {
        if self.history.len() == self.config.window_size {
            self.history.pop_front();
        }
        self.history.push_back(label);
    }

    /// Check whether any identity has reached the confirmation threshold.
    ///
    /// Returns the confirmed name and clears the window, or `None`. A full
    /// window with no confirmation also clears, so counting starts fresh.
    pub fn confirmed(&mut self) -> Option<String> {
        if self.history.is_empty() {
            return None;
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for label in self.history.iter().flatten() {
            *counts.entry(label.as_str()).or_insert(0) += 1;
        }

        let best = counts
            .into_iter()
            .max_by(|(a_label, a_count), (b_label, b_count)| {
                a_count.cmp(b_count).then_with(|| b_label.cmp(a_label))
            });

        match best {
            Some((label, count)) if count >= self.config.confirm_threshold => {
                let confirmed = label.to_string();
                self.reset();
                Some(confirmed)
            }
            _ => {
                if self.history.len() >= self.config.window_size {
                    self.reset();
                }
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl Default for WindowedConfirmer {
    fn default() -> Self {
        Self::new(ConfirmerConfig::default())
    }
}
