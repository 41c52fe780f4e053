//! Outbound application events.
//!
//! The node services emit these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them — today that is the serial log.
//! None of these carry a functional contract; the bot replies do.

/// Structured events emitted by the node services.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The node service has started.
    Started { node: &'static str },

    /// Pending motion detection is being serviced (alert path entered).
    MotionAlert,

    /// Pending flame detection is being serviced (alert path entered).
    FlameAlert,

    /// A photo upload completed; carries the raw response body (or the
    /// connect-failure sentinel).
    PhotoUploaded { response: String },

    /// An authorised command was dispatched.
    CommandHandled { text: String },

    /// A message arrived from a chat id other than the authorised one.
    UnauthorizedAccess { chat_id: String },
}
