use crate::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// Auto-confirmed account, signed in right away
    SignedIn(Session),
    /// A confirmation e-mail was sent to this address
    ConfirmationRequired { email: String },
}

impl SignUpOutcome {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::SignedIn(session) => Some(session),
            Self::ConfirmationRequired { .. } => None,
        }
    }
}
