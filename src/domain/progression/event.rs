//! XP events - the immutable, append-only ledger records.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::foundation::{BountyId, Timestamp, UserId, ValidationError, XpEventId};

use super::GrantDate;

/// Event kind with its dedup payload.
///
/// Each variant carries exactly the fields that define "the same occurrence"
/// for that kind, so idempotency is checkable without an open metadata bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum XpEventKind {
    /// First login of a calendar day.
    DailyLogin { date: GrantDate },

    /// A GitHub contribution day picked up by the sync.
    ContributionDay { date: GrantDate },

    /// Submitting work on a bounty (once per bounty per user).
    BountySubmission { bounty_id: BountyId },

    /// Winning a bounty.
    BountyWin { bounty_id: BountyId },

    /// One-time reward for reaching a login-streak length.
    StreakMilestone { streak_days: u32 },

    /// Completing the developer profile.
    ProfileCompletion,

    /// Asking a community question.
    QuestionAsked { question_id: Uuid },

    /// Answering a community question.
    QuestionAnswered { answer_id: Uuid },

    /// Having an answer accepted by the asker.
    AnswerAccepted { answer_id: Uuid },

    /// Receiving an upvote on a question or answer.
    UpvoteReceived { vote_id: Uuid },

    /// Moderator adjustment; the only kind allowed a negative amount.
    /// `adjustment_id` is caller-supplied so retries stay idempotent.
    ManualAdjustment { adjustment_id: Uuid, reason: String },
}

impl XpEventKind {
    /// The plain discriminant, used as the storage column.
    pub fn event_type(&self) -> XpEventType {
        match self {
            XpEventKind::DailyLogin { .. } => XpEventType::DailyLogin,
            XpEventKind::ContributionDay { .. } => XpEventType::ContributionDay,
            XpEventKind::BountySubmission { .. } => XpEventType::BountySubmission,
            XpEventKind::BountyWin { .. } => XpEventType::BountyWin,
            XpEventKind::StreakMilestone { .. } => XpEventType::StreakMilestone,
            XpEventKind::ProfileCompletion => XpEventType::ProfileCompletion,
            XpEventKind::QuestionAsked { .. } => XpEventType::QuestionAsked,
            XpEventKind::QuestionAnswered { .. } => XpEventType::QuestionAnswered,
            XpEventKind::AnswerAccepted { .. } => XpEventType::AnswerAccepted,
            XpEventKind::UpvoteReceived { .. } => XpEventType::UpvoteReceived,
            XpEventKind::ManualAdjustment { .. } => XpEventType::ManualAdjustment,
        }
    }

    /// The metadata-derived part of the uniqueness key.
    ///
    /// Two events with the same user, event type, and dedup key are the same
    /// logical occurrence; the store's uniqueness constraint spans all three.
    pub fn dedup_key(&self) -> String {
        match self {
            XpEventKind::DailyLogin { date } => date.to_string(),
            XpEventKind::ContributionDay { date } => date.to_string(),
            XpEventKind::BountySubmission { bounty_id } => bounty_id.to_string(),
            XpEventKind::BountyWin { bounty_id } => bounty_id.to_string(),
            XpEventKind::StreakMilestone { streak_days } => streak_days.to_string(),
            XpEventKind::ProfileCompletion => "once".to_string(),
            XpEventKind::QuestionAsked { question_id } => question_id.to_string(),
            XpEventKind::QuestionAnswered { answer_id } => answer_id.to_string(),
            XpEventKind::AnswerAccepted { answer_id } => answer_id.to_string(),
            XpEventKind::UpvoteReceived { vote_id } => vote_id.to_string(),
            XpEventKind::ManualAdjustment { adjustment_id, .. } => adjustment_id.to_string(),
        }
    }

    /// Whether this kind may carry a negative amount.
    pub fn allows_negative_amount(&self) -> bool {
        matches!(self, XpEventKind::ManualAdjustment { .. })
    }
}

/// Plain event-type discriminant (storage column, queries).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XpEventType {
    DailyLogin,
    ContributionDay,
    BountySubmission,
    BountyWin,
    StreakMilestone,
    ProfileCompletion,
    QuestionAsked,
    QuestionAnswered,
    AnswerAccepted,
    UpvoteReceived,
    ManualAdjustment,
}

impl XpEventType {
    /// Stable string form used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            XpEventType::DailyLogin => "daily_login",
            XpEventType::ContributionDay => "contribution_day",
            XpEventType::BountySubmission => "bounty_submission",
            XpEventType::BountyWin => "bounty_win",
            XpEventType::StreakMilestone => "streak_milestone",
            XpEventType::ProfileCompletion => "profile_completion",
            XpEventType::QuestionAsked => "question_asked",
            XpEventType::QuestionAnswered => "question_answered",
            XpEventType::AnswerAccepted => "answer_accepted",
            XpEventType::UpvoteReceived => "upvote_received",
            XpEventType::ManualAdjustment => "manual_adjustment",
        }
    }
}

impl fmt::Display for XpEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable XP ledger record.
///
/// Created once, never mutated or deleted. The aggregate is the fold of a
/// user's events; the ledger is the source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpEvent {
    id: XpEventId,
    user_id: UserId,
    kind: XpEventKind,
    amount: i64,
    created_at: Timestamp,
}

impl XpEvent {
    /// Creates a new event, validating the amount against the kind.
    ///
    /// Only manual adjustments may be negative; every other kind is a
    /// non-negative reward.
    pub fn new(user_id: UserId, kind: XpEventKind, amount: i64) -> Result<Self, ValidationError> {
        if amount < 0 && !kind.allows_negative_amount() {
            return Err(ValidationError::out_of_range(
                "xp_amount",
                0,
                i64::MAX,
                amount,
            ));
        }
        Ok(Self {
            id: XpEventId::new(),
            user_id,
            kind,
            amount,
            created_at: Timestamp::now(),
        })
    }

    /// Reconstructs an event from stored fields.
    pub fn from_parts(
        id: XpEventId,
        user_id: UserId,
        kind: XpEventKind,
        amount: i64,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            kind,
            amount,
            created_at,
        }
    }

    pub fn id(&self) -> XpEventId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn kind(&self) -> &XpEventKind {
        &self.kind
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}
