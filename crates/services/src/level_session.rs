use std::sync::Arc;

use finlingo_core::emergency::Decision;
use finlingo_core::lessons;
use finlingo_core::model::{
    ChallengeId, CompletionGuard, LevelCatalog, LevelCompletion, LevelDefinition, LevelId,
    LevelSignals, RewardError, RewardLedger, RewardOutcome, SessionId, StarRating, Username,
    is_level_complete,
};
use tracing::{debug, info};

use crate::error::LevelSessionError;
use crate::progress_store::ProgressStore;

/// What a completion did to persisted progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionReport {
    pub level: LevelId,
    /// Rating earned by this play-through.
    pub earned_stars: StarRating,
    /// Rating now stored; never lower than an earlier attempt.
    pub stored_stars: StarRating,
    pub bonus_coins: u32,
    pub total_coins: u64,
}

/// Result of one challenge submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    pub challenge: ChallengeId,
    pub outcome: RewardOutcome,
    /// Coin total after crediting, when this submission paid out.
    pub total_coins: Option<u64>,
    /// Present only on the submission that completed the level.
    pub completion: Option<CompletionReport>,
}

/// In-memory state of one playing of one level.
///
/// Dropped when the learner returns home; a fresh session starts with an
/// empty ledger, so replaying a level pays its challenges again.
#[derive(Debug, Clone)]
pub struct LevelSession {
    id: SessionId,
    user: Username,
    definition: LevelDefinition,
    ledger: RewardLedger,
    guard: CompletionGuard,
    signals: LevelSignals,
    completion: Option<CompletionReport>,
}

impl LevelSession {
    fn new(user: Username, definition: LevelDefinition) -> Self {
        let ledger = definition.new_ledger();
        Self {
            id: SessionId::new_random(),
            user,
            definition,
            ledger,
            guard: CompletionGuard::new(),
            signals: LevelSignals::default(),
            completion: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn user(&self) -> &Username {
        &self.user
    }

    #[must_use]
    pub fn level(&self) -> LevelId {
        self.definition.id()
    }

    #[must_use]
    pub fn definition(&self) -> &LevelDefinition {
        &self.definition
    }

    #[must_use]
    pub fn ledger(&self) -> &RewardLedger {
        &self.ledger
    }

    #[must_use]
    pub fn signals(&self) -> LevelSignals {
        self.signals
    }

    /// Completed and required challenge counts.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        let required = self.definition.challenges().len();
        let done = self
            .definition
            .required_challenges()
            .filter(|id| self.ledger.is_completed(id))
            .count();
        (done, required)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        is_level_complete(self.ledger.completed(), self.definition.required_challenges())
    }

    #[must_use]
    pub fn completion(&self) -> Option<&CompletionReport> {
        self.completion.as_ref()
    }

    /// Records the emergency-fund balance used by savings-based star rules.
    pub fn set_ending_savings(&mut self, savings: i64) {
        self.signals.ending_savings = Some(savings);
    }
}

/// Runs level sessions and pushes their effects into persisted progress.
#[derive(Clone)]
pub struct LevelSessionService {
    catalog: Arc<LevelCatalog>,
    progress: ProgressStore,
}

impl LevelSessionService {
    #[must_use]
    pub fn new(catalog: Arc<LevelCatalog>, progress: ProgressStore) -> Self {
        Self { catalog, progress }
    }

    #[must_use]
    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    /// Start a fresh session for `level`.
    ///
    /// A level with no challenges is complete immediately and fires here.
    ///
    /// # Errors
    ///
    /// Returns `LevelSessionError::UnknownLevel` if the catalog lacks the
    /// level, or a storage error if an immediate completion cannot be saved.
    pub async fn start(
        &self,
        user: &Username,
        level: LevelId,
    ) -> Result<LevelSession, LevelSessionError> {
        let definition = self
            .catalog
            .get(level)
            .cloned()
            .ok_or(LevelSessionError::UnknownLevel(level))?;

        let mut session = LevelSession::new(user.clone(), definition);
        debug!(%user, %level, session = %session.id, "level session started");
        self.complete_if_done(&mut session).await?;
        Ok(session)
    }

    /// Submit one challenge answer.
    ///
    /// First correct answers credit the challenge reward immediately; the
    /// submission that finishes the level also applies the completion.
    ///
    /// # Errors
    ///
    /// Returns `LevelSessionError::UnknownChallenge` for ids outside the
    /// level, or a storage error if progress cannot be saved.
    pub async fn submit(
        &self,
        session: &mut LevelSession,
        challenge: &ChallengeId,
        is_correct: bool,
    ) -> Result<SubmitReport, LevelSessionError> {
        let level = session.level();
        let unknown = |_: RewardError| LevelSessionError::UnknownChallenge {
            level,
            challenge: challenge.clone(),
        };
        let outcome = session
            .ledger
            .classify(challenge, is_correct)
            .map_err(unknown)?;

        // The reward is locked only once the credit is saved.
        let mut total_coins = None;
        if let RewardOutcome::FirstTimeReward(coins) = outcome {
            let total = self
                .progress
                .credit_coins(&session.user, u64::from(coins))
                .await?;
            debug!(user = %session.user, %challenge, coins, total, "challenge rewarded");
            session.signals.coins_earned = session.signals.coins_earned.saturating_add(coins);
            total_coins = Some(total);
        }
        session
            .ledger
            .evaluate(challenge, is_correct)
            .map_err(unknown)?;
        if outcome == RewardOutcome::Incorrect {
            session.signals.mistakes = session.signals.mistakes.saturating_add(1);
        }

        let completion = self.complete_if_done(session).await?;
        if let Some(report) = completion {
            total_coins = Some(report.total_coins);
        }

        Ok(SubmitReport {
            challenge: challenge.clone(),
            outcome,
            total_coins,
            completion,
        })
    }

    /// Check a typed answer and submit the verdict.
    ///
    /// # Errors
    ///
    /// Returns `LevelSessionError::Answer` for challenges that are not judged
    /// from a typed answer, otherwise the same as
    /// [`LevelSessionService::submit`].
    pub async fn answer(
        &self,
        session: &mut LevelSession,
        challenge: &ChallengeId,
        answer: &str,
    ) -> Result<SubmitReport, LevelSessionError> {
        if session.definition.challenge(challenge).is_none() {
            return Err(LevelSessionError::UnknownChallenge {
                level: session.level(),
                challenge: challenge.clone(),
            });
        }
        let is_correct = lessons::grade_answer(challenge, answer)?;
        debug!(user = %session.user, %challenge, is_correct, "answer checked");
        self.submit(session, challenge, is_correct).await
    }

    /// Feed one emergency-fund decision into the session.
    ///
    /// Every decision resolves its week, so its challenge counts as answered
    /// and the savings left after it become the ending savings.
    ///
    /// # Errors
    ///
    /// Same as [`LevelSessionService::submit`].
    pub async fn record_decision(
        &self,
        session: &mut LevelSession,
        decision: &Decision,
    ) -> Result<SubmitReport, LevelSessionError> {
        session.set_ending_savings(decision.savings_after);
        self.submit(session, &decision.challenge, true).await
    }

    /// Leave the level. Nothing is written; the next home visit performs the
    /// unlock.
    pub fn return_home(&self, session: LevelSession) {
        debug!(
            user = %session.user,
            level = %session.level(),
            completed = session.completion.is_some(),
            "returning home"
        );
    }

    async fn complete_if_done(
        &self,
        session: &mut LevelSession,
    ) -> Result<Option<CompletionReport>, LevelSessionError> {
        if session.guard.has_fired() || !session.is_complete() {
            return Ok(None);
        }

        let completion = LevelCompletion::compute(&session.definition, &session.signals);
        let (stored_stars, total_coins) = self
            .progress
            .update(&session.user, |record| {
                let stored = completion.apply_to(record);
                (stored, record.total_coins())
            })
            .await?;
        session.guard.try_fire(true);

        let report = CompletionReport {
            level: completion.level,
            earned_stars: completion.earned_stars,
            stored_stars,
            bonus_coins: completion.bonus_coins,
            total_coins,
        };
        info!(
            user = %session.user,
            level = %report.level,
            stars = report.earned_stars.value(),
            bonus = report.bonus_coins,
            total = report.total_coins,
            "level complete"
        );
        session.completion = Some(report);
        Ok(Some(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finlingo_core::emergency::{Choice, EmergencyFundGame, standard_scenarios};
    use finlingo_core::model::{ChallengeSpec, StarRule};
    use storage::repository::InMemoryStore;

    fn level(n: u8) -> LevelId {
        LevelId::new(n).unwrap()
    }

    fn challenge(raw: &str) -> ChallengeId {
        ChallengeId::new(raw).unwrap()
    }

    fn service() -> (LevelSessionService, ProgressStore) {
        let progress = ProgressStore::new(Arc::new(InMemoryStore::new()));
        let service = LevelSessionService::new(
            Arc::new(LevelCatalog::standard()),
            progress.clone(),
        );
        (service, progress)
    }

    #[tokio::test]
    async fn first_correct_answer_credits_once() {
        let (service, progress) = service();
        let guest = Username::guest();
        let mut session = service.start(&guest, level(1)).await.unwrap();

        let first = service
            .submit(&mut session, &challenge("barter"), true)
            .await
            .unwrap();
        assert_eq!(first.outcome, RewardOutcome::FirstTimeReward(10));
        assert_eq!(first.total_coins, Some(10));

        let again = service
            .submit(&mut session, &challenge("barter"), true)
            .await
            .unwrap();
        assert_eq!(again.outcome, RewardOutcome::AlreadyRewarded);
        assert_eq!(again.total_coins, None);
        assert_eq!(progress.load(&guest).await.unwrap().total_coins(), 10);
    }

    #[tokio::test]
    async fn wrong_answers_count_as_mistakes() {
        let (service, progress) = service();
        let guest = Username::guest();
        let mut session = service.start(&guest, level(1)).await.unwrap();

        let report = service
            .submit(&mut session, &challenge("coinCount"), false)
            .await
            .unwrap();
        assert_eq!(report.outcome, RewardOutcome::Incorrect);
        assert_eq!(session.signals().mistakes, 1);
        assert_eq!(progress.load(&guest).await.unwrap().total_coins(), 0);
    }

    #[tokio::test]
    async fn unknown_challenge_is_rejected() {
        let (service, _) = service();
        let mut session = service.start(&Username::guest(), level(1)).await.unwrap();
        let err = service
            .submit(&mut session, &challenge("rateCalc"), true)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LevelSessionError::UnknownChallenge { .. }
        ));
    }

    #[tokio::test]
    async fn typed_answers_are_checked() {
        let (service, progress) = service();
        let guest = Username::guest();
        let mut session = service.start(&guest, level(2)).await.unwrap();
        let rate = challenge("rateCalc");

        let wrong = service.answer(&mut session, &rate, "24").await.unwrap();
        assert_eq!(wrong.outcome, RewardOutcome::Incorrect);
        assert_eq!(session.signals().mistakes, 1);

        let right = service.answer(&mut session, &rate, "36").await.unwrap();
        assert_eq!(right.outcome, RewardOutcome::FirstTimeReward(18));
        assert_eq!(progress.load(&guest).await.unwrap().total_coins(), 18);

        let mut first = service.start(&guest, level(1)).await.unwrap();
        assert!(matches!(
            service.answer(&mut first, &challenge("barter"), "yes").await,
            Err(LevelSessionError::Answer(_))
        ));
        assert!(matches!(
            service.answer(&mut first, &rate, "36").await,
            Err(LevelSessionError::UnknownChallenge { .. })
        ));
    }

    #[tokio::test]
    async fn completion_fires_once_and_records_progress() {
        let (service, progress) = service();
        let guest = Username::guest();
        let mut session = service.start(&guest, level(2)).await.unwrap();

        let ids: Vec<ChallengeId> = session
            .definition()
            .required_challenges()
            .cloned()
            .collect();
        let (last, rest) = ids.split_last().unwrap();
        for id in rest {
            let report = service.submit(&mut session, id, true).await.unwrap();
            assert!(report.completion.is_none());
        }
        assert_eq!(session.progress(), (4, 5));

        let report = service.submit(&mut session, last, true).await.unwrap();
        let completion = report.completion.unwrap();
        assert_eq!(completion.bonus_coins, 60);
        // 18 + 22 + 20 + 25 + 30 = 115 challenge coins, then the bonus.
        assert_eq!(completion.total_coins, 175);
        assert_eq!(completion.earned_stars, StarRating::TWO);

        let again = service.submit(&mut session, last, true).await.unwrap();
        assert!(again.completion.is_none());

        let record = progress.load(&guest).await.unwrap();
        assert_eq!(record.total_coins(), 175);
        assert_eq!(record.stars_for(level(2)), StarRating::TWO);
        assert_eq!(record.last_completed_level(), Some(level(2)));
    }

    #[tokio::test]
    async fn replay_never_lowers_stars() {
        let (service, progress) = service();
        let guest = Username::guest();
        progress
            .set_level_stars(&guest, level(1), StarRating::THREE)
            .await
            .unwrap();

        let mut session = service.start(&guest, level(1)).await.unwrap();
        let ids: Vec<ChallengeId> = session
            .definition()
            .required_challenges()
            .cloned()
            .collect();
        for id in &ids {
            service.submit(&mut session, id, false).await.unwrap();
            service.submit(&mut session, id, false).await.unwrap();
            service.submit(&mut session, id, true).await.unwrap();
        }

        let completion = *session.completion().unwrap();
        assert_eq!(completion.earned_stars, StarRating::ONE);
        assert_eq!(completion.stored_stars, StarRating::THREE);
    }

    #[tokio::test]
    async fn empty_level_completes_on_start() {
        let catalog = LevelCatalog::new(vec![LevelDefinition::new(
            level(1),
            "Warm-up",
            Vec::<ChallengeSpec>::new(),
            5,
            StarRule::CoinThresholds { three: 0, two: 0 },
        )]);
        let progress = ProgressStore::new(Arc::new(InMemoryStore::new()));
        let service = LevelSessionService::new(Arc::new(catalog), progress.clone());

        let session = service.start(&Username::guest(), level(1)).await.unwrap();
        assert_eq!(session.completion().map(|c| c.total_coins), Some(5));
        assert_eq!(
            service.start(&Username::guest(), level(2)).await.unwrap_err().to_string(),
            "level 2 is not configured"
        );
    }

    #[tokio::test]
    async fn emergency_decisions_drive_level_five() {
        let (service, progress) = service();
        let guest = Username::guest();
        let mut session = service.start(&guest, level(5)).await.unwrap();
        let mut game = EmergencyFundGame::default();

        let mut last = None;
        for choice in [Choice::Alternative, Choice::Alternative, Choice::UseSavings] {
            let decision = game.choose(choice).unwrap();
            last = Some(service.record_decision(&mut session, &decision).await.unwrap());
        }

        assert_eq!(session.signals().ending_savings, Some(125));
        let completion = last.unwrap().completion.unwrap();
        assert_eq!(completion.earned_stars, StarRating::THREE);
        assert_eq!(progress.load(&guest).await.unwrap().total_coins(), 80);
    }

    #[tokio::test]
    async fn unaffordable_savings_choice_still_finishes_level_five() {
        let (service, progress) = service();
        let guest = Username::guest();
        let mut session = service.start(&guest, level(5)).await.unwrap();
        let mut scenarios = standard_scenarios();
        scenarios[0].cost = 500;
        let mut game = EmergencyFundGame::new(scenarios);

        let first = game.choose(Choice::UseSavings).unwrap();
        assert!(!first.covered);
        let report = service.record_decision(&mut session, &first).await.unwrap();
        assert_eq!(report.outcome, RewardOutcome::FirstTimeReward(10));

        let mut last = None;
        for choice in [Choice::UseSavings, Choice::UseSavings] {
            let decision = game.choose(choice).unwrap();
            last = Some(service.record_decision(&mut session, &decision).await.unwrap());
        }
        // 100 untouched, +20, -20, +20, -15.
        assert_eq!(session.signals().ending_savings, Some(105));
        let completion = last.unwrap().completion.unwrap();
        assert_eq!(completion.earned_stars, StarRating::THREE);
        assert_eq!(progress.load(&guest).await.unwrap().total_coins(), 80);
    }
}
