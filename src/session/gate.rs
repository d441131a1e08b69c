use crate::app::AppScreen;
use crate::store::schema::{SessionDescriptor, UserDescriptor};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryState {
    Redirect(AppScreen),
    Ready {
        user: UserDescriptor,
        session: Option<SessionDescriptor>,
    },
}

/// Decide whether `target` can be shown with the stored descriptors.
///
/// Every screen except `SignedOut` needs a user; `Chat` also needs an active
/// session. `Ready` for `Chat` always carries `Some(session)`.
pub fn resolve_entry(
    target: AppScreen,
    user: Option<UserDescriptor>,
    session: Option<SessionDescriptor>,
) -> EntryState {
    let Some(user) = user else {
        return EntryState::Redirect(AppScreen::SignedOut);
    };
    match (target, session) {
        (AppScreen::Chat, None) => EntryState::Redirect(AppScreen::Setup),
        (_, session) => EntryState::Ready { user, session },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserDescriptor {
        UserDescriptor {
            id: "u1".to_string(),
            name: "Lea".to_string(),
            email: "lea@example.com".to_string(),
        }
    }

    fn session() -> SessionDescriptor {
        SessionDescriptor {
            session_id: "s1".to_string(),
            language: "fr".to_string(),
            level: "A1".to_string(),
            initial_response: None,
        }
    }

    #[test]
    fn test_missing_user_redirects_to_sign_in_from_any_screen() {
        for target in [AppScreen::Setup, AppScreen::Chat] {
            assert_eq!(
                resolve_entry(target, None, Some(session())),
                EntryState::Redirect(AppScreen::SignedOut)
            );
            assert_eq!(
                resolve_entry(target, None, None),
                EntryState::Redirect(AppScreen::SignedOut)
            );
        }
    }

    #[test]
    fn test_chat_without_session_redirects_to_setup() {
        assert_eq!(
            resolve_entry(AppScreen::Chat, Some(user()), None),
            EntryState::Redirect(AppScreen::Setup)
        );
    }

    #[test]
    fn test_chat_ready_with_both_descriptors() {
        assert_eq!(
            resolve_entry(AppScreen::Chat, Some(user()), Some(session())),
            EntryState::Ready {
                user: user(),
                session: Some(session()),
            }
        );
    }

    #[test]
    fn test_setup_only_needs_user() {
        assert_eq!(
            resolve_entry(AppScreen::Setup, Some(user()), None),
            EntryState::Ready {
                user: user(),
                session: None,
            }
        );
    }
}
