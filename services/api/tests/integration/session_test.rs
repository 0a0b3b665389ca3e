use chrono::Duration;

use skillshare_api::domain::types::{JoinedFilter, SessionFilter};
use skillshare_api::error::ApiError;
use skillshare_api::usecase::session::{
    CreateSessionUseCase, DeleteSessionUseCase, JoinSessionUseCase, LeaveSessionUseCase,
    ListJoinedSessionsUseCase, ListParticipantsUseCase, RecommendedSessionsUseCase,
    SearchSessionsUseCase, UpdateSessionUseCase,
};
use skillshare_domain::id::SessionId;
use skillshare_domain::notification::NotificationKind;
use skillshare_domain::pagination::PageRequest;
use skillshare_domain::user::UserRole;

use crate::helpers::{MockDb, draft, test_session, test_user};

// ── CreateSession ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_session_owned_by_caller() {
    let creator = test_user("Creator");
    let db = MockDb::with_users(vec![creator.clone()]);
    let usecase = CreateSessionUseCase {
        sessions: db.session_repo(),
    };

    let session = usecase
        .execute(creator.id, draft("Rust 101", Duration::days(2)))
        .await
        .unwrap();
    assert_eq!(session.creator_id, creator.id);
    assert_eq!(db.sessions.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_session_in_the_past_or_without_capacity() {
    let creator = test_user("Creator");
    let db = MockDb::with_users(vec![creator.clone()]);
    let usecase = CreateSessionUseCase {
        sessions: db.session_repo(),
    };

    let past = usecase
        .execute(creator.id, draft("Old", -Duration::hours(1)))
        .await;
    assert!(matches!(past, Err(ApiError::Validation(_))), "got {past:?}");

    let mut empty = draft("Empty", Duration::days(1));
    empty.max_participants = 0;
    let result = usecase.execute(creator.id, empty).await;
    assert!(matches!(result, Err(ApiError::Validation(_))), "got {result:?}");
    assert!(db.sessions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_blank_title_category_or_location() {
    let creator = test_user("Creator");
    let db = MockDb::with_users(vec![creator.clone()]);
    let usecase = CreateSessionUseCase {
        sessions: db.session_repo(),
    };

    let mut blank = draft("   ", Duration::days(1));
    let result = usecase.execute(creator.id, blank.clone()).await;
    assert!(
        matches!(&result, Err(ApiError::Validation(m)) if m == "title is required"),
        "got {result:?}"
    );

    blank.title = "Rust".into();
    blank.location = " \t".into();
    let result = usecase.execute(creator.id, blank).await;
    assert!(
        matches!(&result, Err(ApiError::Validation(m)) if m == "location is required"),
        "got {result:?}"
    );
    assert!(db.sessions.lock().unwrap().is_empty());
}

// ── UpdateSession / DeleteSession ────────────────────────────────────────────

#[tokio::test]
async fn should_update_and_notify_participants() {
    let creator = test_user("Creator");
    let member = test_user("Member");
    let db = MockDb::with_users(vec![creator.clone(), member.clone()]);
    let session = test_session(creator.id, "Rust 101", Duration::days(3));
    db.add_session(session.clone());
    db.add_participant(session.id, member.id);

    let usecase = UpdateSessionUseCase {
        sessions: db.session_repo(),
        notifications: db.notification_repo(),
    };
    let updated = usecase
        .execute(creator.id, session.id, draft("Rust 102", Duration::days(4)))
        .await
        .unwrap();
    assert_eq!(updated.title, "Rust 102");

    let notes = db.notifications_for(member.id);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::SessionUpdate);
    assert_eq!(notes[0].message, "Session 'Rust 102' has been updated.");
    assert_eq!(notes[0].related_id, Some(session.id.0));
}

#[tokio::test]
async fn should_forbid_update_by_anyone_but_the_creator() {
    let creator = test_user("Creator");
    let stranger = test_user("Stranger");
    let mut moderator = test_user("Moderator");
    moderator.role = UserRole::Moderator;
    let mut admin = test_user("Admin");
    admin.role = UserRole::Admin;
    let db = MockDb::with_users(vec![
        creator.clone(),
        stranger.clone(),
        moderator.clone(),
        admin.clone(),
    ]);
    let session = test_session(creator.id, "Rust 101", Duration::days(3));
    db.add_session(session.clone());

    let usecase = UpdateSessionUseCase {
        sessions: db.session_repo(),
        notifications: db.notification_repo(),
    };
    for actor in [&stranger, &moderator, &admin] {
        let denied = usecase
            .execute(actor.id, session.id, draft("Edited", Duration::days(3)))
            .await;
        assert!(matches!(denied, Err(ApiError::Forbidden)), "{}: got {denied:?}", actor.name);
    }

    let stored = db.session(session.id).unwrap();
    assert_eq!(stored.title, "Rust 101");
}

#[tokio::test]
async fn should_keep_unchanged_past_time_on_update() {
    let creator = test_user("Creator");
    let db = MockDb::with_users(vec![creator.clone()]);
    let session = test_session(creator.id, "Yesterday", -Duration::days(1));
    db.add_session(session.clone());

    let mut edit = draft("Yesterday (recap)", Duration::zero());
    edit.date_time = session.date_time;
    let usecase = UpdateSessionUseCase {
        sessions: db.session_repo(),
        notifications: db.notification_repo(),
    };
    let updated = usecase
        .execute(creator.id, session.id, edit)
        .await
        .unwrap();
    assert_eq!(updated.date_time, session.date_time);

    let moved = usecase
        .execute(creator.id, session.id, draft("x", -Duration::hours(2)))
        .await;
    assert!(matches!(moved, Err(ApiError::Validation(_))), "got {moved:?}");
}

#[tokio::test]
async fn should_delete_own_session_and_cascade_participants() {
    let creator = test_user("Creator");
    let member = test_user("Member");
    let db = MockDb::with_users(vec![creator.clone(), member.clone()]);
    let session = test_session(creator.id, "Rust 101", Duration::days(3));
    db.add_session(session.clone());
    db.add_participant(session.id, member.id);

    let usecase = DeleteSessionUseCase {
        sessions: db.session_repo(),
    };
    let denied = usecase.execute(member.id, UserRole::User, session.id).await;
    assert!(matches!(denied, Err(ApiError::Forbidden)), "got {denied:?}");

    usecase
        .execute(creator.id, UserRole::User, session.id)
        .await
        .unwrap();
    assert!(db.sessions.lock().unwrap().is_empty());
    assert!(db.participants.lock().unwrap().is_empty());

    let missing = usecase.execute(creator.id, UserRole::User, session.id).await;
    assert!(matches!(missing, Err(ApiError::SessionNotFound)), "got {missing:?}");
}

#[tokio::test]
async fn should_let_moderator_delete_any_session() {
    let creator = test_user("Creator");
    let moderator = test_user("Moderator");
    let db = MockDb::with_users(vec![creator.clone(), moderator.clone()]);
    let session = test_session(creator.id, "Off topic", Duration::days(2));
    db.add_session(session.clone());

    let usecase = DeleteSessionUseCase {
        sessions: db.session_repo(),
    };
    usecase
        .execute(moderator.id, UserRole::Moderator, session.id)
        .await
        .unwrap();
    assert!(db.session(session.id).is_none());
}

// ── SearchSessions ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_every_query_word() {
    let creator = test_user("Creator");
    let db = MockDb::with_users(vec![creator.clone()]);
    let async_rust = test_session(creator.id, "Async Rust", Duration::days(1));
    let rust = test_session(creator.id, "Rust basics", Duration::days(2));
    db.add_session(async_rust.clone());
    db.add_session(rust.clone());

    let usecase = SearchSessionsUseCase {
        sessions: db.session_repo(),
    };
    let filter = SessionFilter {
        query: Some("rust ASYNC".to_owned()),
        ..Default::default()
    };
    let page = usecase.execute(filter, PageRequest::default()).await.unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].id, async_rust.id);
    assert_eq!(page.meta.total_items, 1);
}

#[tokio::test]
async fn should_hide_past_sessions_unless_asked() {
    let creator = test_user("Creator");
    let db = MockDb::with_users(vec![creator.clone()]);
    db.add_session(test_session(creator.id, "Past", -Duration::days(1)));
    db.add_session(test_session(creator.id, "Future", Duration::days(1)));

    let usecase = SearchSessionsUseCase {
        sessions: db.session_repo(),
    };
    let upcoming = usecase
        .execute(SessionFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(upcoming.meta.total_items, 1);

    let all = usecase
        .execute(
            SessionFilter {
                exclude_past: false,
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(all.meta.total_items, 2);
    assert_eq!(all.data[0].title, "Past");
}

#[tokio::test]
async fn should_paginate_in_date_order_with_meta() {
    let creator = test_user("Creator");
    let db = MockDb::with_users(vec![creator.clone()]);
    for day in (1..=5).rev() {
        db.add_session(test_session(creator.id, &format!("Day {day}"), Duration::days(day)));
    }

    let usecase = SearchSessionsUseCase {
        sessions: db.session_repo(),
    };
    let page = usecase
        .execute(SessionFilter::default(), PageRequest { limit: 2, page: 2 })
        .await
        .unwrap();
    let titles: Vec<_> = page.data.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Day 3", "Day 4"]);
    assert_eq!(page.meta.total_items, 5);
    assert_eq!(page.meta.per_page, 2);
    assert_eq!(page.meta.current_page, 2);
    assert_eq!(page.meta.total_pages, 3);
}

#[tokio::test]
async fn should_clamp_oversized_page_requests() {
    let db = MockDb::new();
    let usecase = SearchSessionsUseCase {
        sessions: db.session_repo(),
    };
    let page = usecase
        .execute(SessionFilter::default(), PageRequest { limit: 1000, page: 0 })
        .await
        .unwrap();
    assert_eq!(page.meta.per_page, 100);
    assert_eq!(page.meta.current_page, 1);
    assert_eq!(page.meta.total_pages, 0);
}

// ── Joined / Participants ────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_joined_sessions_latest_first() {
    let creator = test_user("Creator");
    let member = test_user("Member");
    let db = MockDb::with_users(vec![creator.clone(), member.clone()]);
    let soon = test_session(creator.id, "Soon", Duration::days(1));
    let later = test_session(creator.id, "Later", Duration::days(5));
    let other = test_session(creator.id, "Other", Duration::days(2));
    for s in [&soon, &later, &other] {
        db.add_session(s.clone());
    }
    db.add_participant(soon.id, member.id);
    db.add_participant(later.id, member.id);

    let page = ListJoinedSessionsUseCase {
        sessions: db.session_repo(),
    }
    .execute(
        member.id,
        JoinedFilter {
            category: None,
            exclude_past: true,
        },
        PageRequest::default(),
    )
    .await
    .unwrap();
    let titles: Vec<_> = page.data.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Later", "Soon"]);
}

#[tokio::test]
async fn should_list_participants_or_404() {
    let creator = test_user("Creator");
    let member = test_user("Member");
    let db = MockDb::with_users(vec![creator.clone(), member.clone()]);
    let session = test_session(creator.id, "Rust", Duration::days(1));
    db.add_session(session.clone());

    let usecase = ListParticipantsUseCase {
        sessions: db.session_repo(),
    };
    assert!(usecase.execute(session.id).await.unwrap().is_empty());

    db.add_participant(session.id, member.id);
    let users = usecase.execute(session.id).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, member.id);

    let missing = usecase.execute(SessionId::new()).await;
    assert!(matches!(missing, Err(ApiError::SessionNotFound)), "got {missing:?}");
}

// ── Recommended ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_recommend_by_skill_excluding_own_and_joined() {
    let creator = test_user("Creator");
    let mut viewer = test_user("Viewer");
    viewer.skills = vec!["cooking".to_owned()];
    let db = MockDb::with_users(vec![creator.clone(), viewer.clone()]);

    let mut cooking = test_session(creator.id, "Pasta", Duration::days(2));
    cooking.category = "cooking".to_owned();
    let mut joined = test_session(creator.id, "Bread", Duration::days(1));
    joined.category = "cooking".to_owned();
    let mut own = test_session(viewer.id, "My soup", Duration::days(1));
    own.category = "cooking".to_owned();
    let rust = test_session(creator.id, "Rust", Duration::days(1));
    for s in [&cooking, &joined, &own, &rust] {
        db.add_session(s.clone());
    }
    db.add_participant(joined.id, viewer.id);

    let usecase = RecommendedSessionsUseCase {
        sessions: db.session_repo(),
        users: db.user_repo(),
    };
    let picks = usecase.execute(Some(viewer.id)).await.unwrap();
    let titles: Vec<_> = picks.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Pasta"]);
}

#[tokio::test]
async fn should_recommend_soonest_five_to_anonymous_callers() {
    let creator = test_user("Creator");
    let db = MockDb::with_users(vec![creator.clone()]);
    for day in 1..=7 {
        db.add_session(test_session(creator.id, &format!("Day {day}"), Duration::days(day)));
    }
    db.add_session(test_session(creator.id, "Past", -Duration::days(1)));

    let picks = RecommendedSessionsUseCase {
        sessions: db.session_repo(),
        users: db.user_repo(),
    }
    .execute(None)
    .await
    .unwrap();
    let titles: Vec<_> = picks.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Day 1", "Day 2", "Day 3", "Day 4", "Day 5"]);
}

// ── JoinSession / LeaveSession ───────────────────────────────────────────────

#[tokio::test]
async fn should_join_and_notify_creator() {
    let creator = test_user("Creator");
    let member = test_user("Member");
    let db = MockDb::with_users(vec![creator.clone(), member.clone()]);
    let session = test_session(creator.id, "Rust 101", Duration::days(1));
    db.add_session(session.clone());

    let usecase = JoinSessionUseCase {
        sessions: db.session_repo(),
        users: db.user_repo(),
        notifications: db.notification_repo(),
    };
    usecase.execute(session.id, member.id).await.unwrap();

    assert!(db.participants.lock().unwrap().contains(&(session.id, member.id)));
    let notes = db.notifications_for(creator.id);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::NewParticipant);
    assert_eq!(notes[0].message, "User 'Member' joined your session 'Rust 101'.");

    let again = usecase.execute(session.id, member.id).await;
    assert!(matches!(again, Err(ApiError::AlreadyJoined)), "got {again:?}");
}

#[tokio::test]
async fn should_refuse_joining_own_missing_or_full_session() {
    let creator = test_user("Creator");
    let first = test_user("First");
    let second = test_user("Second");
    let db = MockDb::with_users(vec![creator.clone(), first.clone(), second.clone()]);
    let mut session = test_session(creator.id, "Tiny", Duration::days(1));
    session.max_participants = 1;
    db.add_session(session.clone());

    let usecase = JoinSessionUseCase {
        sessions: db.session_repo(),
        users: db.user_repo(),
        notifications: db.notification_repo(),
    };

    let own = usecase.execute(session.id, creator.id).await;
    assert!(matches!(own, Err(ApiError::CannotJoinOwnSession)), "got {own:?}");

    let missing = usecase.execute(SessionId::new(), first.id).await;
    assert!(matches!(missing, Err(ApiError::SessionNotFound)), "got {missing:?}");

    usecase.execute(session.id, first.id).await.unwrap();
    let full = usecase.execute(session.id, second.id).await;
    assert!(matches!(full, Err(ApiError::SessionFull)), "got {full:?}");
    assert_eq!(db.participants.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_admit_only_capacity_when_joins_race() {
    let creator = test_user("Creator");
    let joiners: Vec<_> = ["A", "B", "C"].into_iter().map(test_user).collect();
    let mut users = joiners.clone();
    users.push(creator.clone());
    let db = MockDb::with_users(users);
    let mut session = test_session(creator.id, "Pair", Duration::days(1));
    session.max_participants = 2;
    db.add_session(session.clone());

    let usecase = JoinSessionUseCase {
        sessions: db.session_repo(),
        users: db.user_repo(),
        notifications: db.notification_repo(),
    };
    let (a, b, c) = tokio::join!(
        usecase.execute(session.id, joiners[0].id),
        usecase.execute(session.id, joiners[1].id),
        usecase.execute(session.id, joiners[2].id),
    );

    let results = [a, b, c];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 2);
    let rejected: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();
    assert!(matches!(rejected.as_slice(), [ApiError::SessionFull]), "got {rejected:?}");
    assert_eq!(db.participants.lock().unwrap().len(), 2);
    assert_eq!(db.notifications_for(creator.id).len(), 2);
}

#[tokio::test]
async fn should_join_even_when_notification_fails() {
    let creator = test_user("Creator");
    let member = test_user("Member");
    let db = MockDb::with_users(vec![creator.clone(), member.clone()]);
    let session = test_session(creator.id, "Rust 101", Duration::days(1));
    db.add_session(session.clone());

    JoinSessionUseCase {
        sessions: db.session_repo(),
        users: db.user_repo(),
        notifications: db.broken_notification_repo(),
    }
    .execute(session.id, member.id)
    .await
    .unwrap();

    assert!(db.participants.lock().unwrap().contains(&(session.id, member.id)));
    assert!(db.notifications.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_leave_joined_session_only() {
    let creator = test_user("Creator");
    let member = test_user("Member");
    let db = MockDb::with_users(vec![creator.clone(), member.clone()]);
    let session = test_session(creator.id, "Rust 101", Duration::days(1));
    db.add_session(session.clone());
    db.add_participant(session.id, member.id);

    let usecase = LeaveSessionUseCase {
        sessions: db.session_repo(),
    };
    usecase.execute(session.id, member.id).await.unwrap();
    assert!(db.participants.lock().unwrap().is_empty());

    let again = usecase.execute(session.id, member.id).await;
    assert!(matches!(again, Err(ApiError::NotJoined)), "got {again:?}");

    let missing = usecase.execute(SessionId::new(), member.id).await;
    assert!(matches!(missing, Err(ApiError::SessionNotFound)), "got {missing:?}");
}
