pub mod cli_consts {
    //! Dashboard Configuration Constants
    //!
    //! Configuration constants for the dashboard client, organized by
    //! functional area.

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Maximum event buffer size for the refresh worker channel.
    pub const EVENT_QUEUE_SIZE: usize = 100;

    /// Maximum buffered dashboard snapshots between worker and UI.
    pub const UPDATE_QUEUE_SIZE: usize = 16;

    /// Maximum buffered refresh commands between UI and worker.
    pub const COMMAND_QUEUE_SIZE: usize = 8;

    /// Record refresh scheduling configuration.
    pub mod record_fetching {
        use std::time::Duration;

        /// Interval between automatic record refreshes (seconds).
        pub const REFRESH_INTERVAL_SECS: u64 = 300;

        /// Helper function to get the refresh interval.
        pub const fn refresh_interval() -> Duration {
            Duration::from_secs(REFRESH_INTERVAL_SECS)
        }
    }

    /// Copy-to-clipboard acknowledgment configuration.
    pub mod copy_feedback {
        use std::time::Duration;

        /// How long the "copied" marker stays visible (milliseconds).
        pub const COPY_FEEDBACK_MS: u64 = 2000;

        /// Helper function to get the copy feedback duration.
        pub const fn copy_feedback() -> Duration {
            Duration::from_millis(COPY_FEEDBACK_MS)
        }
    }

    /// Record backend configuration.
    pub mod baserow {
        /// Baserow table holding the proxy records.
        pub const PROXY_TABLE_ID: u64 = 30412;

        /// Field used to filter rows down to the signed-in user.
        pub const USER_EMAIL_FIELD: &str = "user_email";
    }
}
