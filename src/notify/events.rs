// Notification events and their e-mail wording.

/// Something subscribers should hear about.
#[derive(Debug, Clone, PartialEq)]
pub enum NotifyEvent {
    /// A snapshot beat the previous all-time maximum.
    RecordBroken {
        location: String,
        depth: Option<String>,
        new_value: f64,
        previous_value: Option<f64>,
    },

    /// A subscriber was added to the alert list.
    SubscriptionAck {
        location: String,
        subscriber: String,
    },
}

impl NotifyEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RecordBroken { .. } => "record_broken",
            Self::SubscriptionAck { .. } => "subscription_ack",
        }
    }

    pub fn subject(&self) -> String {
        match self {
            Self::RecordBroken { location, .. } => {
                format!("New data update and record broken at {location}!")
            }
            Self::SubscriptionAck { .. } => {
                "MMWIH: Congratulations, you are on the hotlist".to_string()
            }
        }
    }

    pub fn body(&self) -> String {
        match self {
            Self::RecordBroken {
                location,
                depth,
                new_value,
                previous_value,
            } => {
                let at_depth = depth
                    .as_deref()
                    .map(|d| format!(" at {d}"))
                    .unwrap_or_default();
                let previous = previous_value
                    .map(|v| format!("{v:.2}°C"))
                    .unwrap_or_else(|| "none on record".to_string());
                format!(
                    "Hello,\n\n\
                     You told us to message you when it is hot. And it is!\n\
                     We added new data and it shows a new temperature anomaly record for {location}{at_depth}.\n\
                     Temperature record: {new_value:.2}°C (previous: {previous})\n\n\
                     Best regards,\nYour Message Me When It's Hot Team\n"
                )
            }
            Self::SubscriptionAck { location, .. } => format!(
                "Hello,\n\n\
                 You want us to message you when it is hot at {location}.\n\n\
                 This is a notification that your email has been added to our records, \
                 and you will receive an email when it is hot.\n\n\
                 The MMWIH team\n"
            ),
        }
    }
}
