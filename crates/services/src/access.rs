//! Access control predicates. Pure functions; nothing here touches storage.

use domains::{Caller, DomainError, Result, Role};
use uuid::Uuid;

/// True iff the caller owns the resource or is an Admin.
pub fn is_self_or_admin(caller_id: Uuid, caller_role: Role, owner_id: Uuid) -> bool {
    caller_id == owner_id || caller_role == Role::Admin
}

/// True iff the caller holds exactly the required role.
pub fn require_role(caller_role: Role, required: Role) -> bool {
    caller_role == required
}

/// [`is_self_or_admin`] as a `ForbiddenError`.
pub fn ensure_self_or_admin(caller: &Caller, owner_id: Uuid) -> Result<()> {
    if is_self_or_admin(caller.user_id, caller.role, owner_id) {
        Ok(())
    } else {
        Err(DomainError::forbidden("Not allowed"))
    }
}

/// Gate for catalog mutations.
pub fn ensure_admin(caller: &Caller) -> Result<()> {
    if require_role(caller.role, Role::Admin) {
        Ok(())
    } else {
        Err(DomainError::forbidden("Admin access required"))
    }
}
