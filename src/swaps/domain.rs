use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::skills::repo::SkillStatus;

/// Swap request state machine. Legal edges: pending→accepted,
/// pending→rejected, accepted→rejected (the dashboard keeps its Reject
/// control on accepted swaps), accepted→completed. Rejected and completed
/// have no outgoing edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "swap_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
}

impl SwapStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Completed)
    }

    pub fn can_accept(self) -> bool {
        self == Self::Pending
    }

    pub fn can_reject(self) -> bool {
        matches!(self, Self::Pending | Self::Accepted)
    }

    pub fn can_complete(self) -> bool {
        self == Self::Accepted
    }
}

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

pub fn validate_rating(rating: i16) -> Result<(), ApiError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ApiError::validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(())
}

// Precondition guards for the engine operations. Pure over ids, flags and
// statuses; the services resolve the rows and the repo applies the guarded
// update.

/// Banned users are frozen out of every swap transition; their existing
/// rows are left as they are.
pub fn ensure_actor_not_banned(banned: bool) -> Result<(), ApiError> {
    if banned {
        return Err(ApiError::permission("Your account is banned"));
    }
    Ok(())
}

/// Creation preconditions against the skill's current owner. The self-swap
/// check comes first so it reports ValidationError for every user/skill
/// combination, rejected skills included.
pub fn ensure_new_request(
    requester: Uuid,
    owner: Uuid,
    skill_status: SkillStatus,
    owner_banned: bool,
) -> Result<(), ApiError> {
    if requester == owner {
        return Err(ApiError::validation("Cannot request a swap for your own skill"));
    }
    if skill_status == SkillStatus::Rejected {
        return Err(ApiError::conflict("Skill has been rejected"));
    }
    if owner_banned {
        return Err(ApiError::permission("Skill owner is banned"));
    }
    Ok(())
}

pub fn ensure_accept_allowed(
    caller: Uuid,
    to_user: Uuid,
    status: SwapStatus,
) -> Result<(), ApiError> {
    if caller != to_user {
        return Err(ApiError::permission("Only the target user may accept"));
    }
    if !status.can_accept() {
        return Err(ApiError::conflict("Request is not pending"));
    }
    Ok(())
}

pub fn ensure_reject_allowed(
    caller: Uuid,
    from_user: Uuid,
    to_user: Uuid,
    status: SwapStatus,
) -> Result<(), ApiError> {
    if caller != from_user && caller != to_user {
        return Err(ApiError::permission("Only a participant may reject"));
    }
    if !status.can_reject() {
        return Err(ApiError::conflict("Request is already resolved"));
    }
    Ok(())
}

pub fn ensure_complete_allowed(
    caller: Uuid,
    from_user: Uuid,
    to_user: Uuid,
    status: SwapStatus,
) -> Result<(), ApiError> {
    if caller != from_user && caller != to_user {
        return Err(ApiError::permission("Only a participant may leave feedback"));
    }
    if !status.can_complete() {
        return Err(ApiError::conflict("Request is not accepted"));
    }
    Ok(())
}

/// Withdrawal removes the row, so it is limited to the requester's own
/// still-pending requests; anything past pending stays for audit.
pub fn ensure_withdraw_allowed(
    caller: Uuid,
    from_user: Uuid,
    status: SwapStatus,
) -> Result<(), ApiError> {
    if caller != from_user {
        return Err(ApiError::permission("Only the requester may withdraw a request"));
    }
    if status != SwapStatus::Pending {
        return Err(ApiError::conflict("Only pending requests can be withdrawn"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::SwapStatus::{Accepted, Completed, Pending, Rejected};
    use super::*;

    #[test]
    fn only_pending_can_be_accepted() {
        assert!(Pending.can_accept());
        assert!(!Accepted.can_accept());
        assert!(!Rejected.can_accept());
        assert!(!Completed.can_accept());
    }

    #[test]
    fn reject_is_allowed_from_pending_and_accepted() {
        assert!(Pending.can_reject());
        assert!(Accepted.can_reject());
        assert!(!Rejected.can_reject());
        assert!(!Completed.can_reject());
    }

    #[test]
    fn only_accepted_can_be_completed() {
        assert!(Accepted.can_complete());
        assert!(!Pending.can_complete());
        assert!(!Rejected.can_complete());
        assert!(!Completed.can_complete());
    }

    #[test]
    fn terminal_states_have_no_outgoing_edges() {
        for status in [Rejected, Completed] {
            assert!(status.is_terminal());
            assert!(!status.can_accept());
            assert!(!status.can_reject());
            assert!(!status.can_complete());
        }
        assert!(!Pending.is_terminal());
        assert!(!Accepted.is_terminal());
    }

    #[test]
    fn rating_bounds() {
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
        assert!(validate_rating(-3).is_err());
        for r in MIN_RATING..=MAX_RATING {
            assert!(validate_rating(r).is_ok());
        }
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Pending).unwrap(), r#""pending""#);
        assert_eq!(serde_json::to_string(&Completed).unwrap(), r#""completed""#);
    }

    fn id() -> Uuid {
        Uuid::new_v4()
    }

    #[test]
    fn banned_actor_is_frozen_out() {
        assert!(matches!(
            ensure_actor_not_banned(true),
            Err(ApiError::Permission(_))
        ));
        assert!(ensure_actor_not_banned(false).is_ok());
    }

    #[test]
    fn self_swap_is_a_validation_error_even_on_a_rejected_skill() {
        let me = id();
        for status in [SkillStatus::Active, SkillStatus::Rejected] {
            for owner_banned in [false, true] {
                assert!(matches!(
                    ensure_new_request(me, me, status, owner_banned),
                    Err(ApiError::Validation(_))
                ));
            }
        }
    }

    #[test]
    fn rejected_skill_conflicts_for_any_other_requester() {
        assert!(matches!(
            ensure_new_request(id(), id(), SkillStatus::Rejected, false),
            Err(ApiError::Conflict(_))
        ));
    }

    #[test]
    fn banned_owner_blocks_new_requests() {
        assert!(matches!(
            ensure_new_request(id(), id(), SkillStatus::Active, true),
            Err(ApiError::Permission(_))
        ));
        assert!(ensure_new_request(id(), id(), SkillStatus::Active, false).is_ok());
    }

    #[test]
    fn only_the_target_may_accept() {
        let target = id();
        assert!(ensure_accept_allowed(target, target, Pending).is_ok());
        // The requester and a stranger get the same refusal.
        assert!(matches!(
            ensure_accept_allowed(id(), target, Pending),
            Err(ApiError::Permission(_))
        ));
    }

    #[test]
    fn accept_outside_pending_conflicts() {
        let target = id();
        for status in [Accepted, Rejected, Completed] {
            assert!(matches!(
                ensure_accept_allowed(target, target, status),
                Err(ApiError::Conflict(_))
            ));
        }
    }

    #[test]
    fn either_party_may_reject_but_strangers_may_not() {
        let (from, to) = (id(), id());
        assert!(ensure_reject_allowed(from, from, to, Pending).is_ok());
        assert!(ensure_reject_allowed(to, from, to, Accepted).is_ok());
        assert!(matches!(
            ensure_reject_allowed(id(), from, to, Pending),
            Err(ApiError::Permission(_))
        ));
        assert!(matches!(
            ensure_reject_allowed(from, from, to, Completed),
            Err(ApiError::Conflict(_))
        ));
    }

    #[test]
    fn completion_requires_a_participant_and_an_accepted_row() {
        let (from, to) = (id(), id());
        assert!(ensure_complete_allowed(from, from, to, Accepted).is_ok());
        assert!(ensure_complete_allowed(to, from, to, Accepted).is_ok());
        assert!(matches!(
            ensure_complete_allowed(id(), from, to, Accepted),
            Err(ApiError::Permission(_))
        ));
        for status in [Pending, Rejected, Completed] {
            assert!(matches!(
                ensure_complete_allowed(from, from, to, status),
                Err(ApiError::Conflict(_))
            ));
        }
    }

    #[test]
    fn only_the_requester_may_withdraw_and_only_while_pending() {
        let from = id();
        assert!(ensure_withdraw_allowed(from, from, Pending).is_ok());
        assert!(matches!(
            ensure_withdraw_allowed(id(), from, Pending),
            Err(ApiError::Permission(_))
        ));
        for status in [Accepted, Rejected, Completed] {
            assert!(matches!(
                ensure_withdraw_allowed(from, from, status),
                Err(ApiError::Conflict(_))
            ));
        }
    }
}
