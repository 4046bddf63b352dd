//! Leave allocation policy against an in-memory leave store.

mod support;

use std::sync::Arc;

use support::{clock_on, date, leave, MockLeaveRepository};
use tripdesk_core::{LeaveAllocationService, LeaveService};
use tripdesk_domain::{LeaveRequest, LeaveStatus, LeaveType, TripDeskError};
use uuid::Uuid;

fn allocation(leaves: &MockLeaveRepository) -> LeaveAllocationService {
    LeaveAllocationService::new(Arc::new(leaves.clone()), Arc::new(clock_on(2024, 6, 15)))
}

#[tokio::test]
async fn casual_request_over_budget_reports_remaining_days() {
    let user = Uuid::new_v4();
    let leaves = MockLeaveRepository::new(vec![leave(
        user,
        LeaveType::Personal,
        LeaveStatus::Approved,
        date(2024, 2, 5),
        date(2024, 2, 10),
    )]);

    let decision = allocation(&leaves)
        .can_take_leave(user, LeaveType::Emergency, date(2024, 7, 1), date(2024, 7, 2), None)
        .await
        .unwrap();

    assert!(!decision.allowed);
    assert!(decision.message.contains("Remaining: 1 days, Requested: 2 days."), "{}", decision.message);
}

#[tokio::test]
async fn total_budget_applies_even_with_type_headroom() {
    let user = Uuid::new_v4();
    let leaves = MockLeaveRepository::new(vec![
        leave(user, LeaveType::Annual, LeaveStatus::Approved, date(2024, 1, 8), date(2024, 1, 21)),
        leave(user, LeaveType::Sick, LeaveStatus::Approved, date(2024, 3, 4), date(2024, 3, 10)),
        leave(user, LeaveType::Personal, LeaveStatus::Pending, date(2024, 4, 1), date(2024, 4, 5)),
    ]);

    // 26 of 28 used; casual still has 2 days of headroom.
    let service = allocation(&leaves);
    let ok = service
        .can_take_leave(user, LeaveType::Personal, date(2024, 9, 2), date(2024, 9, 3), None)
        .await
        .unwrap();
    assert!(ok.allowed);

    let leaves = MockLeaveRepository::new(
        leaves
            .all()
            .into_iter()
            .chain([leave(
                user,
                LeaveType::Sick,
                LeaveStatus::Approved,
                date(2024, 11, 1),
                date(2024, 11, 1),
            )])
            .collect(),
    );
    // Sick is now over its own budget, casual has 2 left but only 1 total day remains.
    let denied = allocation(&leaves)
        .can_take_leave(user, LeaveType::Personal, date(2024, 9, 2), date(2024, 9, 3), None)
        .await
        .unwrap();
    assert!(!denied.allowed);
    assert!(denied.message.contains("Remaining: 1 days, Requested: 2 days."), "{}", denied.message);
}

#[tokio::test]
async fn uncounted_types_are_always_allowed() {
    let user = Uuid::new_v4();
    let leaves = MockLeaveRepository::new(vec![leave(
        user,
        LeaveType::Annual,
        LeaveStatus::Approved,
        date(2024, 1, 1),
        date(2024, 1, 28),
    )]);

    let decision = allocation(&leaves)
        .can_take_leave(user, LeaveType::Maternity, date(2024, 5, 1), date(2024, 8, 31), None)
        .await
        .unwrap();
    assert!(decision.allowed);
}

#[tokio::test]
async fn used_leaves_clip_to_the_requested_year() {
    let user = Uuid::new_v4();
    let leaves = MockLeaveRepository::new(vec![
        leave(user, LeaveType::Annual, LeaveStatus::Approved, date(2023, 12, 30), date(2024, 1, 2)),
        leave(user, LeaveType::Annual, LeaveStatus::Pending, date(2024, 2, 1), date(2024, 2, 5)),
    ]);
    let service = allocation(&leaves);

    let y2023 = service.used_leaves(user, Some(2023)).await.unwrap();
    let y2024 = service.used_leaves(user, None).await.unwrap();

    assert_eq!(y2023.annual, 2);
    assert_eq!(y2024.annual, 2, "pending leaves are not used days");
    assert_eq!(y2024.total, 2);
}

#[tokio::test]
async fn request_uses_its_own_start_year_budget() {
    let user = Uuid::new_v4();
    let leaves = MockLeaveRepository::new(vec![leave(
        user,
        LeaveType::Sick,
        LeaveStatus::Approved,
        date(2024, 3, 1),
        date(2024, 3, 7),
    )]);

    // Sick budget for 2024 is exhausted, but next year's is untouched.
    let service = allocation(&leaves);
    let this_year = service
        .can_take_leave(user, LeaveType::Sick, date(2024, 10, 1), date(2024, 10, 1), None)
        .await
        .unwrap();
    let next_year = service
        .can_take_leave(user, LeaveType::Sick, date(2025, 2, 3), date(2025, 2, 4), None)
        .await
        .unwrap();

    assert!(!this_year.allowed);
    assert!(next_year.allowed);
}

#[tokio::test]
async fn editing_does_not_double_count_the_edited_leave() {
    let user = Uuid::new_v4();
    let existing =
        leave(user, LeaveType::Personal, LeaveStatus::Pending, date(2024, 8, 5), date(2024, 8, 10));
    let existing_id = existing.id;
    let leaves = MockLeaveRepository::new(vec![existing]);
    let service = allocation(&leaves);

    // Six casual days pending; moving them by a day is still six, not twelve.
    let as_new = service
        .can_take_leave(user, LeaveType::Personal, date(2024, 8, 6), date(2024, 8, 11), None)
        .await
        .unwrap();
    let as_edit = service
        .can_take_leave(
            user,
            LeaveType::Personal,
            date(2024, 8, 6),
            date(2024, 8, 11),
            Some(existing_id),
        )
        .await
        .unwrap();

    assert!(!as_new.allowed);
    assert!(as_edit.allowed);
}

#[tokio::test]
async fn leave_lifecycle_enforces_budget_and_transitions() {
    let user = Uuid::new_v4();
    let hr = Uuid::new_v4();
    let leaves = MockLeaveRepository::default();
    let clock = Arc::new(clock_on(2024, 6, 15));
    let allocation =
        Arc::new(LeaveAllocationService::new(Arc::new(leaves.clone()), clock.clone()));
    let service = LeaveService::new(Arc::new(leaves.clone()), allocation, clock);

    let request = |start, end| LeaveRequest {
        user_id: user,
        leave_type: LeaveType::Annual,
        start_date: start,
        end_date: end,
        reason: Some("Family trip".to_string()),
    };

    let first = service.submit(request(date(2024, 7, 1), date(2024, 7, 10))).await.unwrap();
    assert_eq!(first.status, LeaveStatus::Pending);

    let over = service.submit(request(date(2024, 9, 1), date(2024, 9, 5))).await.unwrap_err();
    assert!(matches!(over, TripDeskError::Validation(ref msg) if msg.contains("Remaining: 4 days, Requested: 5 days.")));

    let approved = service.approve(first.id, hr).await.unwrap();
    assert_eq!(approved.status, LeaveStatus::Approved);
    assert_eq!(approved.approved_by, Some(hr));
    assert!(approved.approved_at.is_some());

    assert!(service.approve(first.id, hr).await.unwrap_err().is_validation());

    let edited = service.edit(first.id, request(date(2024, 7, 2), date(2024, 7, 15))).await.unwrap();
    assert_eq!(edited.span().days(), 14);

    let cancelled = service.cancel(first.id).await.unwrap();
    assert_eq!(cancelled.status, LeaveStatus::Cancelled);
    assert!(service.cancel(first.id).await.unwrap_err().is_validation());
}

#[tokio::test]
async fn rejection_requires_reason_and_pending_status() {
    let user = Uuid::new_v4();
    let hr = Uuid::new_v4();
    let leaves = MockLeaveRepository::default();
    let clock = Arc::new(clock_on(2024, 6, 15));
    let allocation =
        Arc::new(LeaveAllocationService::new(Arc::new(leaves.clone()), clock.clone()));
    let service = LeaveService::new(Arc::new(leaves.clone()), allocation, clock);

    let submitted = service
        .submit(LeaveRequest {
            user_id: user,
            leave_type: LeaveType::Sick,
            start_date: date(2024, 6, 17),
            end_date: date(2024, 6, 17),
            reason: None,
        })
        .await
        .unwrap();

    assert!(service.reject(submitted.id, hr, "   ").await.unwrap_err().is_validation());

    let rejected = service.reject(submitted.id, hr, "Peak season").await.unwrap();
    assert_eq!(rejected.status, LeaveStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("Peak season"));

    assert!(service.cancel(submitted.id).await.unwrap_err().is_validation());
}
