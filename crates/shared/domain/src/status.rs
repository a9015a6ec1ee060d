//! Workflow states stored as text in the database and sent verbatim over JSON.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raised when a string is not one of the known states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

macro_rules! text_status {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }

            /// Comma-separated list of every state, for error messages.
            #[must_use]
            pub fn choices() -> String {
                Self::ALL.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownStatus;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(UnknownStatus(other.to_owned())),
                }
            }
        }
    };
}

text_status! {
    /// Lifecycle of a customer's service request.
    RequestStatus {
        Pending => "Pending",
        InProgress => "In Progress",
        Completed => "Completed",
        Cancelled => "Cancelled",
    }
}

text_status! {
    /// Lifecycle of a single workshop job.
    JobStatus {
        Pending => "Pending",
        InProgress => "In Progress",
        Completed => "Completed",
    }
}

text_status! {
    PaymentStatus {
        Unpaid => "Unpaid",
        Paid => "Paid",
    }
}

text_status! {
    WorkingStatus {
        Working => "Working",
        NotWorking => "Not Working",
    }
}

/// Priority given to a new service request when none is supplied.
pub const DEFAULT_PRIORITY: &str = "Normal";
