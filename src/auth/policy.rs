use uuid::Uuid;

use crate::auth::repo::Role;
use crate::error::ApiError;

/// Something a user may attempt against the movie catalog.
#[derive(Debug, Clone, Copy)]
pub enum Action {
    CreateMovie,
    EditMovie { added_by: Uuid },
    DeleteMovie { added_by: Uuid },
}

/// Why a capability check said no.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    NotAdmin,
    NotOwner,
}

impl From<Denial> for ApiError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::NotAdmin => {
                ApiError::Forbidden("You do not have permission to perform this action".into())
            }
            Denial::NotOwner => {
                ApiError::Forbidden("You can only edit/delete movies you created".into())
            }
        }
    }
}

/// The single capability check consulted by both the API handlers and the
/// client's rendering logic. Mutating a movie requires the admin role and
/// that the caller is the record's original creator.
pub fn can(role: Role, user_id: Uuid, action: Action) -> Result<(), Denial> {
    if role != Role::Admin {
        return Err(Denial::NotAdmin);
    }
    match action {
        Action::CreateMovie => Ok(()),
        Action::EditMovie { added_by } | Action::DeleteMovie { added_by } => {
            if added_by == user_id {
                Ok(())
            } else {
                Err(Denial::NotOwner)
            }
        }
    }
}

/// Role gate applied before ownership is even considered, mirroring the
/// middleware order on mutating routes.
pub fn require_role(role: Role, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&role) {
        Ok(())
    } else {
        Err(Denial::NotAdmin.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_user_cannot_create() {
        let id = Uuid::new_v4();
        assert_eq!(can(Role::User, id, Action::CreateMovie), Err(Denial::NotAdmin));
    }

    #[test]
    fn admin_can_create() {
        assert!(can(Role::Admin, Uuid::new_v4(), Action::CreateMovie).is_ok());
    }

    #[test]
    fn creator_admin_can_edit_and_delete() {
        let id = Uuid::new_v4();
        assert!(can(Role::Admin, id, Action::EditMovie { added_by: id }).is_ok());
        assert!(can(Role::Admin, id, Action::DeleteMovie { added_by: id }).is_ok());
    }

    #[test]
    fn other_admin_is_denied_as_non_owner() {
        let creator = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert_eq!(
            can(Role::Admin, other, Action::EditMovie { added_by: creator }),
            Err(Denial::NotOwner)
        );
        assert_eq!(
            can(Role::Admin, other, Action::DeleteMovie { added_by: creator }),
            Err(Denial::NotOwner)
        );
    }

    #[test]
    fn non_admin_is_denied_even_when_owner() {
        let id = Uuid::new_v4();
        assert_eq!(
            can(Role::User, id, Action::EditMovie { added_by: id }),
            Err(Denial::NotAdmin)
        );
    }

    #[test]
    fn denial_messages_match_the_api_contract() {
        let forbidden: ApiError = Denial::NotOwner.into();
        assert_eq!(
            forbidden.to_string(),
            "You can only edit/delete movies you created"
        );
        let not_admin: ApiError = Denial::NotAdmin.into();
        assert_eq!(
            not_admin.to_string(),
            "You do not have permission to perform this action"
        );
    }
}
