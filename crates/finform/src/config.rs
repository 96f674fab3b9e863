//! Controller configuration.

/// User-visible literals written by the controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Labels {
    /// Status while a query is in flight.
    pub querying: String,
    /// Status after a successful render.
    pub done: String,
    /// Summary placeholder when the response has none.
    pub no_summary: String,
    /// Label of the enabled download link.
    pub download: String,
    /// Prefix of every failure status.
    pub failure_marker: String,
    /// Prefix of the fallback failure message, followed by the status code.
    pub request_failed: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            querying: "Querying...".to_string(),
            done: "✅ Done".to_string(),
            no_summary: "(no summary)".to_string(),
            download: "Download Excel".to_string(),
            failure_marker: "❌".to_string(),
            request_failed: "Request failed: ".to_string(),
        }
    }
}

impl Labels {
    /// Simplified Chinese literals.
    #[must_use]
    pub fn zh_cn() -> Self {
        Self {
            querying: "正在查询...".to_string(),
            done: "✅ 完成".to_string(),
            no_summary: "（无摘要）".to_string(),
            download: "下载 Excel".to_string(),
            failure_marker: "❌".to_string(),
            request_failed: "请求失败：".to_string(),
        }
    }
}

/// What happens to a submit while another submission is in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SubmissionPolicy {
    /// Run every submission; the last response to resolve determines the
    /// final page state.
    #[default]
    Overlap,
    /// Ignore a submit while another is in flight.
    Exclusive,
}

/// Configuration for a [`FormController`](crate::FormController).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ControllerConfig {
    /// User-visible literals.
    pub labels: Labels,
    /// Overlapping submission handling.
    pub policy: SubmissionPolicy,
}

impl ControllerConfig {
    /// Create the default configuration (English labels, overlapping submissions).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the labels.
    #[must_use]
    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Set the submission policy.
    #[must_use]
    pub fn with_policy(mut self, policy: SubmissionPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ControllerConfig::new();
        assert_eq!(config.policy, SubmissionPolicy::Overlap);
        assert_eq!(config.labels.download, "Download Excel");
    }

    #[test]
    fn test_builder() {
        let config = ControllerConfig::new()
            .with_labels(Labels::zh_cn())
            .with_policy(SubmissionPolicy::Exclusive);
        assert_eq!(config.policy, SubmissionPolicy::Exclusive);
        assert_eq!(config.labels.querying, "正在查询...");
    }
}
