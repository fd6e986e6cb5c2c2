//! Role and ownership checks for every protected operation.
//!
//! All routing-level handlers funnel through [`authorize`] and
//! [`object_scope`]; none of them branch on roles themselves. The functions
//! here are pure so the whole access matrix is testable without a database.

use crate::error::AppError;
use crate::users::repo::Role;

/// Per-request identity established at login and carried by the session.
/// Passed explicitly into services; never read from ambient state.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i32,
    pub username: String,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Row filter every object query must apply server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectScope {
    /// Admins see every row regardless of assignment.
    All,
    /// Clients see only rows where client_id equals their own id.
    OwnedBy(i32),
}

/// Operation requested against a protected resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListObjects,
    ViewObject,
    CreateObject,
    UpdateObject,
    DeleteObject,
    ListUsers,
    CreateUser,
    UpdateUser,
    DeleteUser { target_id: i32 },
}

/// Allow or deny `action` for `identity`.
///
/// Clients may only read objects (the read itself is then narrowed by
/// [`object_scope`]); the users collection answers `Forbidden` rather than an
/// empty list so account existence never leaks. Admins may do everything
/// except delete their own account.
pub fn authorize(identity: &Identity, action: Action) -> Result<(), AppError> {
    match action {
        Action::ListObjects | Action::ViewObject => Ok(()),
        Action::CreateObject
        | Action::UpdateObject
        | Action::DeleteObject
        | Action::ListUsers
        | Action::CreateUser
        | Action::UpdateUser => require_admin(identity),
        Action::DeleteUser { target_id } => {
            require_admin(identity)?;
            if target_id == identity.user_id {
                return Err(AppError::SelfDeletionForbidden);
            }
            Ok(())
        }
    }
}

/// The filtering predicate for object reads, list and single-row alike.
pub fn object_scope(identity: &Identity) -> ObjectScope {
    match identity.role {
        Role::Admin => ObjectScope::All,
        Role::Client => ObjectScope::OwnedBy(identity.user_id),
    }
}

fn require_admin(identity: &Identity) -> Result<(), AppError> {
    if identity.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin(id: i32) -> Identity {
        Identity {
            user_id: id,
            username: "admin".into(),
            role: Role::Admin,
        }
    }

    fn client(id: i32) -> Identity {
        Identity {
            user_id: id,
            username: "client".into(),
            role: Role::Client,
        }
    }

    #[test]
    fn admin_is_allowed_everything_but_self_deletion() {
        let ident = admin(1);
        for action in [
            Action::ListObjects,
            Action::ViewObject,
            Action::CreateObject,
            Action::UpdateObject,
            Action::DeleteObject,
            Action::ListUsers,
            Action::CreateUser,
            Action::UpdateUser,
            Action::DeleteUser { target_id: 2 },
        ] {
            assert!(authorize(&ident, action).is_ok(), "{action:?} should pass");
        }
    }

    #[test]
    fn admin_cannot_delete_own_account() {
        let err = authorize(&admin(7), Action::DeleteUser { target_id: 7 }).unwrap_err();
        assert!(matches!(err, AppError::SelfDeletionForbidden));
    }

    #[test]
    fn client_can_only_read_objects() {
        let ident = client(3);
        assert!(authorize(&ident, Action::ListObjects).is_ok());
        assert!(authorize(&ident, Action::ViewObject).is_ok());
        for action in [
            Action::CreateObject,
            Action::UpdateObject,
            Action::DeleteObject,
        ] {
            let err = authorize(&ident, action).unwrap_err();
            assert!(matches!(err, AppError::Forbidden), "{action:?} should be denied");
        }
    }

    #[test]
    fn client_is_denied_the_entire_users_collection() {
        let ident = client(3);
        for action in [
            Action::ListUsers,
            Action::CreateUser,
            Action::UpdateUser,
            Action::DeleteUser { target_id: 9 },
        ] {
            let err = authorize(&ident, action).unwrap_err();
            assert!(matches!(err, AppError::Forbidden), "{action:?} should be denied");
        }
    }

    #[test]
    fn client_deleting_itself_is_still_forbidden_not_self_deletion() {
        // The role check runs first; a client never reaches the self check.
        let err = authorize(&client(3), Action::DeleteUser { target_id: 3 }).unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[test]
    fn scope_is_unrestricted_for_admins() {
        assert_eq!(object_scope(&admin(1)), ObjectScope::All);
    }

    #[test]
    fn scope_is_ownership_bound_for_clients() {
        assert_eq!(object_scope(&client(42)), ObjectScope::OwnedBy(42));
    }
}
