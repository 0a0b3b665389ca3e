use anyhow::{Context as _, anyhow};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, SqlErr,
    Statement, TransactionError, TransactionTrait,
    sea_query::{Expr, Query, SimpleExpr},
};

use skillshare_api_schema::{feedback, notifications, session_participants, sessions, users};
use skillshare_core::sea_ext::contains_ci;
use skillshare_domain::id::{NotificationId, SessionId, UserId};
use skillshare_domain::notification::NotificationKind;
use skillshare_domain::pagination::PageRequest;
use skillshare_domain::user::UserRole;

use crate::domain::repository::{
    FeedbackRepository, NotificationRepository, SessionRepository, UserRepository,
};
use crate::domain::types::{
    Feedback, JoinOutcome, JoinedFilter, Notification, OAuthIdentity, ProfileUpdate, Session,
    SessionDraft, SessionFilter, User,
};
use crate::error::ApiError;

const OAUTH_IDENTITY_INDEX: &str = "uq_users_oauth_identity";

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl DbUserRepository {
    async fn find_one(
        &self,
        condition: Condition,
        what: &'static str,
    ) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(condition)
            .one(&self.db)
            .await
            .context(what)?;
        model.map(user_from_model).transpose()
    }

    async fn update_columns(
        &self,
        id: UserId,
        columns: Vec<(users::Column, SimpleExpr)>,
        what: &'static str,
    ) -> Result<u64, ApiError> {
        let mut update = users::Entity::update_many()
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id.0));
        for (column, value) in columns {
            update = update.col_expr(column, value);
        }
        let result = update.exec(&self.db).await.context(what)?;
        Ok(result.rows_affected)
    }
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        self.find_one(
            Condition::all().add(users::Column::Email.eq(email)),
            "find user by email",
        )
        .await
    }

    async fn find_by_oauth(&self, identity: &OAuthIdentity) -> Result<Option<User>, ApiError> {
        self.find_one(
            Condition::all()
                .add(users::Column::OauthProvider.eq(identity.provider.as_str()))
                .add(users::Column::OauthId.eq(identity.subject.as_str())),
            "find user by oauth identity",
        )
        .await
    }

    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<User>, ApiError> {
        self.find_one(
            Condition::all().add(users::Column::JwtRefreshToken.eq(token)),
            "find user by refresh token",
        )
        .await
    }

    async fn list_all(&self) -> Result<Vec<User>, ApiError> {
        let models = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list users")?;
        models.into_iter().map(user_from_model).collect()
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        let (provider, subject) = match &user.oauth {
            Some(identity) => (
                Some(identity.provider.clone()),
                Some(identity.subject.clone()),
            ),
            None => (None, None),
        };
        let result = users::ActiveModel {
            id: Set(user.id.0),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            oauth_provider: Set(provider),
            oauth_id: Set(subject),
            name: Set(user.name.clone()),
            bio: Set(user.bio.clone()),
            skills: Set(user.skills.clone()),
            average_rating: Set(user.average_rating),
            role: Set(user.role.as_str().to_owned()),
            jwt_refresh_token: Set(user.refresh_token.clone()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(msg)) if msg.contains(OAUTH_IDENTITY_INDEX) => {
                    Err(ApiError::OAuthAccountConflict)
                }
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(ApiError::EmailAlreadyExists),
                _ => Err(anyhow::Error::new(e).context("create user").into()),
            },
        }
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, ApiError> {
        let result = users::ActiveModel {
            id: Set(id.0),
            name: Set(update.name.clone()),
            bio: Set(update.bio.clone()),
            skills: Set(update.skills.clone()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await;

        match result {
            Ok(model) => user_from_model(model).map(Some),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(anyhow::Error::new(e).context("update user profile").into()),
        }
    }

    async fn update_password_hash(&self, id: UserId, hash: &str) -> Result<(), ApiError> {
        let updated = self
            .update_columns(
                id,
                vec![(users::Column::PasswordHash, Expr::value(hash))],
                "update password hash",
            )
            .await?;
        if updated == 0 {
            return Err(ApiError::UserNotFound);
        }
        Ok(())
    }

    async fn update_role(&self, id: UserId, role: UserRole) -> Result<Option<User>, ApiError> {
        let updated = self
            .update_columns(
                id,
                vec![(users::Column::Role, Expr::value(role.as_str()))],
                "update user role",
            )
            .await?;
        if updated == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn delete(&self, id: UserId) -> Result<bool, ApiError> {
        let result = users::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }

    async fn save_refresh_token(&self, id: UserId, token: Option<&str>) -> Result<(), ApiError> {
        self.update_columns(
            id,
            vec![(
                users::Column::JwtRefreshToken,
                Expr::value(token.map(str::to_owned)),
            )],
            "save refresh token",
        )
        .await?;
        Ok(())
    }

    async fn link_oauth(&self, id: UserId, identity: &OAuthIdentity) -> Result<(), ApiError> {
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::OauthProvider,
                Expr::value(identity.provider.as_str()),
            )
            .col_expr(users::Column::OauthId, Expr::value(identity.subject.as_str()))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id.0))
            .exec(&self.db)
            .await;
        match result {
            Ok(r) if r.rows_affected == 0 => Err(ApiError::UserNotFound),
            Ok(_) => Ok(()),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(ApiError::OAuthAccountConflict)
            }
            Err(e) => Err(anyhow::Error::new(e).context("link oauth identity").into()),
        }
    }
}

fn user_from_model(model: users::Model) -> Result<User, ApiError> {
    let role = model
        .role
        .parse::<UserRole>()
        .with_context(|| format!("user {} has an unreadable role", model.id))?;
    let oauth = match (model.oauth_provider, model.oauth_id) {
        (Some(provider), Some(subject)) => Some(OAuthIdentity { provider, subject }),
        _ => None,
    };
    Ok(User {
        id: UserId(model.id),
        email: model.email,
        password_hash: model.password_hash,
        oauth,
        name: model.name,
        bio: model.bio,
        skills: model.skills,
        average_rating: model.average_rating,
        role,
        refresh_token: model.jwt_refresh_token,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Session repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSessionRepository {
    pub db: DatabaseConnection,
}

fn search_condition(filter: &SessionFilter, now: DateTime<Utc>) -> Condition {
    let mut condition = Condition::all();
    for word in filter.words() {
        condition = condition.add(
            Condition::any()
                .add(contains_ci((sessions::Entity, sessions::Column::Title), word))
                .add(contains_ci(
                    (sessions::Entity, sessions::Column::Description),
                    word,
                )),
        );
    }
    if let Some(category) = non_empty(&filter.category) {
        condition = condition.add(sessions::Column::Category.eq(category));
    }
    if let Some(location) = non_empty(&filter.location) {
        condition = condition.add(contains_ci(
            (sessions::Entity, sessions::Column::Location),
            location,
        ));
    }
    if let Some(from) = filter.date_from {
        condition = condition.add(sessions::Column::DateTime.gte(from));
    }
    if let Some(to) = filter.date_to {
        condition = condition.add(sessions::Column::DateTime.lte(to));
    }
    if filter.exclude_past {
        condition = condition.add(sessions::Column::DateTime.gt(now));
    }
    if let Some(creator) = filter.creator_id {
        condition = condition.add(sessions::Column::CreatorId.eq(creator.0));
    }
    condition
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Unordered so the same query serves both the count and the page.
fn search_query(filter: &SessionFilter, now: DateTime<Utc>) -> Select<sessions::Entity> {
    sessions::Entity::find().filter(search_condition(filter, now))
}

fn joined_query(
    user_id: UserId,
    filter: &JoinedFilter,
    now: DateTime<Utc>,
) -> Select<sessions::Entity> {
    let mut query = sessions::Entity::find()
        .inner_join(session_participants::Entity)
        .filter(session_participants::Column::UserId.eq(user_id.0));
    if let Some(category) = non_empty(&filter.category) {
        query = query.filter(sessions::Column::Category.eq(category));
    }
    if filter.exclude_past {
        query = query.filter(sessions::Column::DateTime.gt(now));
    }
    query
}

/// Upcoming sessions the user neither created nor joined. With skills, only
/// matching categories soonest first; without, the newest sessions.
fn recommended_query(
    user_id: UserId,
    skills: &[String],
    now: DateTime<Utc>,
) -> Select<sessions::Entity> {
    let joined = Query::select()
        .column(session_participants::Column::SessionId)
        .from(session_participants::Entity)
        .and_where(session_participants::Column::UserId.eq(user_id.0))
        .to_owned();

    let query = sessions::Entity::find()
        .filter(sessions::Column::DateTime.gt(now))
        .filter(sessions::Column::CreatorId.ne(user_id.0))
        .filter(sessions::Column::Id.not_in_subquery(joined));
    if skills.is_empty() {
        query
            .order_by_desc(sessions::Column::CreatedAt)
            .order_by_asc(sessions::Column::DateTime)
    } else {
        query
            .filter(sessions::Column::Category.is_in(skills.iter().cloned()))
            .order_by_asc(sessions::Column::DateTime)
    }
}

impl SessionRepository for DbSessionRepository {
    async fn find_by_id(&self, id: SessionId) -> Result<Option<Session>, ApiError> {
        let model = sessions::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find session by id")?;
        Ok(model.map(session_from_model))
    }

    async fn create(&self, session: &Session) -> Result<(), ApiError> {
        sessions::ActiveModel {
            id: Set(session.id.0),
            title: Set(session.title.clone()),
            description: Set(session.description.clone()),
            category: Set(session.category.clone()),
            date_time: Set(session.date_time),
            location: Set(session.location.clone()),
            max_participants: Set(session.max_participants),
            creator_id: Set(session.creator_id.0),
            created_at: Set(session.created_at),
            updated_at: Set(session.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create session")?;
        Ok(())
    }

    async fn update(
        &self,
        id: SessionId,
        draft: &SessionDraft,
    ) -> Result<Option<Session>, ApiError> {
        let result = sessions::ActiveModel {
            id: Set(id.0),
            title: Set(draft.title.clone()),
            description: Set(draft.description.clone()),
            category: Set(draft.category.clone()),
            date_time: Set(draft.date_time),
            location: Set(draft.location.clone()),
            max_participants: Set(draft.max_participants),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await;

        match result {
            Ok(model) => Ok(Some(session_from_model(model))),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(anyhow::Error::new(e).context("update session").into()),
        }
    }

    async fn delete(&self, id: SessionId) -> Result<bool, ApiError> {
        let result = sessions::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete session")?;
        Ok(result.rows_affected > 0)
    }

    async fn search(
        &self,
        filter: &SessionFilter,
        page: PageRequest,
    ) -> Result<(Vec<Session>, u64), ApiError> {
        let query = search_query(filter, Utc::now());

        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count sessions")?;
        let models = query
            .order_by_asc(sessions::Column::DateTime)
            .order_by_asc(sessions::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("search sessions")?;
        Ok((models.into_iter().map(session_from_model).collect(), total))
    }

    async fn list_joined(
        &self,
        user_id: UserId,
        filter: &JoinedFilter,
        page: PageRequest,
    ) -> Result<(Vec<Session>, u64), ApiError> {
        let query = joined_query(user_id, filter, Utc::now());

        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count joined sessions")?;
        let models = query
            .order_by_desc(sessions::Column::DateTime)
            .order_by_asc(sessions::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list joined sessions")?;
        Ok((models.into_iter().map(session_from_model).collect(), total))
    }

    async fn recommended_for_user(
        &self,
        user_id: UserId,
        skills: &[String],
        limit: u64,
    ) -> Result<Vec<Session>, ApiError> {
        let models = recommended_query(user_id, skills, Utc::now())
            .limit(limit)
            .all(&self.db)
            .await
            .context("recommend sessions for user")?;
        Ok(models.into_iter().map(session_from_model).collect())
    }

    async fn recommended(&self, limit: u64) -> Result<Vec<Session>, ApiError> {
        let models = sessions::Entity::find()
            .filter(sessions::Column::DateTime.gt(Utc::now()))
            .order_by_asc(sessions::Column::DateTime)
            .limit(limit)
            .all(&self.db)
            .await
            .context("recommend sessions")?;
        Ok(models.into_iter().map(session_from_model).collect())
    }

    async fn starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Session>, ApiError> {
        let models = sessions::Entity::find()
            .filter(sessions::Column::DateTime.gt(from))
            .filter(sessions::Column::DateTime.lte(to))
            .order_by_asc(sessions::Column::DateTime)
            .all(&self.db)
            .await
            .context("list sessions starting soon")?;
        Ok(models.into_iter().map(session_from_model).collect())
    }

    async fn participants(&self, id: SessionId) -> Result<Vec<User>, ApiError> {
        let models = users::Entity::find()
            .inner_join(session_participants::Entity)
            .filter(session_participants::Column::SessionId.eq(id.0))
            .order_by_asc(session_participants::Column::JoinedAt)
            .all(&self.db)
            .await
            .context("list session participants")?;
        models.into_iter().map(user_from_model).collect()
    }

    async fn count_participants(&self, id: SessionId) -> Result<u64, ApiError> {
        Ok(session_participants::Entity::find()
            .filter(session_participants::Column::SessionId.eq(id.0))
            .count(&self.db)
            .await
            .context("count session participants")?)
    }

    async fn is_participant(&self, id: SessionId, user_id: UserId) -> Result<bool, ApiError> {
        let row = session_participants::Entity::find_by_id((id.0, user_id.0))
            .one(&self.db)
            .await
            .context("check session participation")?;
        Ok(row.is_some())
    }

    async fn join(&self, id: SessionId, user_id: UserId) -> Result<JoinOutcome, ApiError> {
        let outcome = self
            .db
            .transaction::<_, JoinOutcome, DbErr>(|txn| {
                Box::pin(async move {
                    // Row lock serialises concurrent joins on the same session.
                    let Some(session) = sessions::Entity::find_by_id(id.0)
                        .lock_exclusive()
                        .one(txn)
                        .await?
                    else {
                        return Ok(JoinOutcome::NotFound);
                    };

                    let taken = session_participants::Entity::find()
                        .filter(session_participants::Column::SessionId.eq(id.0))
                        .count(txn)
                        .await?;
                    if taken >= u64::try_from(session.max_participants).unwrap_or(0) {
                        return Ok(JoinOutcome::Full);
                    }

                    let existing = session_participants::Entity::find_by_id((id.0, user_id.0))
                        .one(txn)
                        .await?;
                    if existing.is_some() {
                        return Ok(JoinOutcome::AlreadyJoined);
                    }

                    session_participants::ActiveModel {
                        session_id: Set(id.0),
                        user_id: Set(user_id.0),
                        joined_at: Set(Utc::now()),
                    }
                    .insert(txn)
                    .await?;
                    Ok(JoinOutcome::Joined)
                })
            })
            .await
            .context("join session")?;
        Ok(outcome)
    }

    async fn leave(&self, id: SessionId, user_id: UserId) -> Result<bool, ApiError> {
        let result = session_participants::Entity::delete_by_id((id.0, user_id.0))
            .exec(&self.db)
            .await
            .context("leave session")?;
        Ok(result.rows_affected > 0)
    }
}

fn session_from_model(model: sessions::Model) -> Session {
    Session {
        id: SessionId(model.id),
        title: model.title,
        description: model.description,
        category: model.category,
        date_time: model.date_time,
        location: model.location,
        max_participants: model.max_participants,
        creator_id: UserId(model.creator_id),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Feedback repository ──────────────────────────────────────────────────────

/// Mean rating across every session the creator of `$1` has run.
const REFRESH_CREATOR_RATING: &str = r#"
    UPDATE users
       SET average_rating = COALESCE((
               SELECT AVG(f.rating)::float8
                 FROM feedback f
                 JOIN sessions s ON s.id = f.session_id
                WHERE s.creator_id = users.id
           ), 0),
           updated_at = NOW()
     WHERE id = (SELECT creator_id FROM sessions WHERE id = $1)
"#;

#[derive(Clone)]
pub struct DbFeedbackRepository {
    pub db: DatabaseConnection,
}

impl FeedbackRepository for DbFeedbackRepository {
    async fn create(&self, feedback: &Feedback) -> Result<(), ApiError> {
        let row = feedback::ActiveModel {
            id: Set(feedback.id.0),
            session_id: Set(feedback.session_id.0),
            user_id: Set(feedback.user_id.0),
            rating: Set(feedback.rating),
            comment: Set(feedback.comment.clone()),
            created_at: Set(feedback.created_at),
        };
        let session_id = feedback.session_id.0;

        let result = self
            .db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    row.insert(txn).await?;
                    txn.execute(Statement::from_sql_and_values(
                        txn.get_database_backend(),
                        REFRESH_CREATOR_RATING,
                        [session_id.into()],
                    ))
                    .await?;
                    Ok(())
                })
            })
            .await;

        match result {
            Ok(()) => Ok(()),
            Err(TransactionError::Transaction(e)) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(ApiError::FeedbackAlreadyExists),
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => Err(anyhow::Error::new(e)
                    .context("create feedback: session or author no longer exists")
                    .into()),
                _ => Err(anyhow::Error::new(e).context("create feedback").into()),
            },
            Err(e) => Err(anyhow::Error::new(e).context("create feedback").into()),
        }
    }

    async fn list_by_session(&self, session_id: SessionId) -> Result<Vec<Feedback>, ApiError> {
        let models = feedback::Entity::find()
            .filter(feedback::Column::SessionId.eq(session_id.0))
            .order_by_desc(feedback::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list feedback by session")?;
        Ok(models.into_iter().map(feedback_from_model).collect())
    }
}

fn feedback_from_model(model: feedback::Model) -> Feedback {
    Feedback {
        id: model.id.into(),
        session_id: SessionId(model.session_id),
        user_id: UserId(model.user_id),
        rating: model.rating,
        comment: model.comment,
        created_at: model.created_at,
    }
}

// ── Notification repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbNotificationRepository {
    pub db: DatabaseConnection,
}

impl NotificationRepository for DbNotificationRepository {
    async fn create(&self, notification: &Notification) -> Result<(), ApiError> {
        notifications::ActiveModel {
            id: Set(notification.id.0),
            user_id: Set(notification.user_id.0),
            message: Set(notification.message.clone()),
            kind: Set(notification.kind.as_str().to_owned()),
            is_read: Set(notification.is_read),
            created_at: Set(notification.created_at),
            related_id: Set(notification.related_id),
            related_type: Set(notification.related_type.clone()),
        }
        .insert(&self.db)
        .await
        .context("create notification")?;
        Ok(())
    }

    async fn list_unread(
        &self,
        user_id: UserId,
        limit: u64,
    ) -> Result<Vec<Notification>, ApiError> {
        let models = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id.0))
            .filter(notifications::Column::IsRead.eq(false))
            .order_by_desc(notifications::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list unread notifications")?;
        models.into_iter().map(notification_from_model).collect()
    }

    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> Result<bool, ApiError> {
        let result = notifications::Entity::update_many()
            .col_expr(notifications::Column::IsRead, Expr::value(true))
            .filter(notifications::Column::Id.eq(id.0))
            .filter(notifications::Column::UserId.eq(user_id.0))
            .exec(&self.db)
            .await
            .context("mark notification read")?;
        Ok(result.rows_affected > 0)
    }

    async fn mark_all_read(&self, user_id: UserId) -> Result<u64, ApiError> {
        let result = notifications::Entity::update_many()
            .col_expr(notifications::Column::IsRead, Expr::value(true))
            .filter(notifications::Column::UserId.eq(user_id.0))
            .filter(notifications::Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .context("mark all notifications read")?;
        Ok(result.rows_affected)
    }

    async fn has_reminder(&self, user_id: UserId, session_id: SessionId) -> Result<bool, ApiError> {
        let count = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id.0))
            .filter(notifications::Column::RelatedId.eq(session_id.0))
            .filter(notifications::Column::Kind.eq(NotificationKind::SessionReminder.as_str()))
            .count(&self.db)
            .await
            .context("check existing reminder")?;
        Ok(count > 0)
    }
}

fn notification_from_model(model: notifications::Model) -> Result<Notification, ApiError> {
    let kind = model
        .kind
        .parse::<NotificationKind>()
        .map_err(|e| anyhow!("notification {}: {e}", model.id))?;
    Ok(Notification {
        id: NotificationId(model.id),
        user_id: UserId(model.user_id),
        message: model.message,
        kind,
        is_read: model.is_read,
        created_at: model.created_at,
        related_id: model.related_id,
        related_type: model.related_type,
    })
}
