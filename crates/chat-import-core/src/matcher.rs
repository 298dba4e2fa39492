use crate::domain::{Account, Session};
use crate::error::ImportError;

/// First account in session order whose namespace equals `namespace`.
pub fn match_account<'a>(
    session: &'a Session,
    namespace: &str,
) -> Result<&'a Account, ImportError> {
    session
        .accounts
        .iter()
        .find(|account| account.namespace == namespace)
        .ok_or_else(|| ImportError::NoMatchingAccount {
            topic: session.topic.clone(),
            namespace: namespace.to_owned(),
        })
}

/// First account of the session, whatever its chain.
pub fn first_account(session: &Session) -> Result<&Account, ImportError> {
    session
        .accounts
        .first()
        .ok_or_else(|| ImportError::NoMatchingAccount {
            topic: session.topic.clone(),
            namespace: "*".to_owned(),
        })
}
