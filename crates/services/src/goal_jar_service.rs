use std::sync::Arc;

use finlingo_core::model::{SavingsGoal, Username};
use storage::keys;
use storage::repository::KeyValueStore;
use tracing::{info, warn};

use crate::Clock;
use crate::error::GoalJarError;

/// Result of a deposit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositReport {
    pub goal: SavingsGoal,
    /// True only on the deposit that first reaches the price.
    pub just_reached: bool,
}

/// Savings-goal jar, one goal per user, stored as a JSON document.
#[derive(Clone)]
pub struct GoalJarService {
    clock: Clock,
    kv: Arc<dyn KeyValueStore>,
}

impl GoalJarService {
    #[must_use]
    pub fn new(clock: Clock, kv: Arc<dyn KeyValueStore>) -> Self {
        Self { clock, kv }
    }

    /// Current goal. Unreadable documents read as no goal.
    ///
    /// # Errors
    ///
    /// Returns `GoalJarError::Storage` on backend failure.
    pub async fn get(&self, user: &Username) -> Result<Option<SavingsGoal>, GoalJarError> {
        let Some(raw) = self.kv.get(&keys::goal(user)).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<SavingsGoal>(&raw) {
            Ok(goal) => Ok(Some(goal)),
            Err(err) => {
                warn!(%user, error = %err, "ignoring unreadable savings goal");
                Ok(None)
            }
        }
    }

    /// Create or replace the goal; money already in the jar carries over.
    ///
    /// # Errors
    ///
    /// Returns `GoalJarError::Goal` for an empty name or zero price.
    pub async fn create(
        &self,
        user: &Username,
        name: &str,
        price: u64,
    ) -> Result<SavingsGoal, GoalJarError> {
        let saved = self.get(user).await?.map_or(0, |goal| goal.saved());
        let goal = SavingsGoal::new(name, price, saved, self.clock.now())?;
        self.store(user, &goal).await?;
        info!(%user, name = goal.name(), price, "savings goal created");
        Ok(goal)
    }

    /// # Errors
    ///
    /// Returns `GoalJarError::NoGoal` without a goal, or `GoalJarError::Goal`
    /// for a zero or overfilling deposit.
    pub async fn deposit(
        &self,
        user: &Username,
        amount: u64,
    ) -> Result<DepositReport, GoalJarError> {
        let mut goal = self.get(user).await?.ok_or(GoalJarError::NoGoal)?;
        let just_reached = goal.deposit(amount)?;
        self.store(user, &goal).await?;
        if just_reached {
            info!(%user, name = goal.name(), "savings goal reached");
        }
        Ok(DepositReport { goal, just_reached })
    }

    /// # Errors
    ///
    /// Returns `GoalJarError::Storage` on backend failure.
    pub async fn reset(&self, user: &Username) -> Result<(), GoalJarError> {
        self.kv.remove(&keys::goal(user)).await?;
        Ok(())
    }

    async fn store(&self, user: &Username, goal: &SavingsGoal) -> Result<(), GoalJarError> {
        let raw = serde_json::to_string(goal)?;
        self.kv.put(&keys::goal(user), &raw).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finlingo_core::model::GoalError;
    use finlingo_core::time::fixed_now;
    use storage::repository::InMemoryStore;

    fn service() -> (InMemoryStore, GoalJarService) {
        let kv = InMemoryStore::new();
        let service = GoalJarService::new(Clock::fixed(fixed_now()), Arc::new(kv.clone()));
        (kv, service)
    }

    #[tokio::test]
    async fn create_deposit_reach() {
        let (_, jar) = service();
        let guest = Username::guest();
        assert_eq!(jar.get(&guest).await.unwrap(), None);

        let goal = jar.create(&guest, "Skateboard", 5_000).await.unwrap();
        assert_eq!(goal.created_at(), fixed_now());

        let report = jar.deposit(&guest, 2_000).await.unwrap();
        assert!(!report.just_reached);
        let report = jar.deposit(&guest, 3_000).await.unwrap();
        assert!(report.just_reached);
        assert!(report.goal.is_reached());

        assert!(matches!(
            jar.deposit(&guest, 1).await,
            Err(GoalJarError::Goal(GoalError::WouldOverfill { .. }))
        ));
    }

    #[tokio::test]
    async fn deposit_requires_goal() {
        let (_, jar) = service();
        assert!(matches!(
            jar.deposit(&Username::guest(), 100).await,
            Err(GoalJarError::NoGoal)
        ));
    }

    #[tokio::test]
    async fn recreate_keeps_saved_amount() {
        let (_, jar) = service();
        let guest = Username::guest();
        jar.create(&guest, "Book", 2_000).await.unwrap();
        jar.deposit(&guest, 500).await.unwrap();

        let goal = jar.create(&guest, "Bike", 10_000).await.unwrap();
        assert_eq!(goal.name(), "Bike");
        assert_eq!(goal.saved(), 500);
    }

    #[tokio::test]
    async fn zero_price_goal_is_ignored() {
        let (kv, jar) = service();
        let guest = Username::guest();
        kv.put(
            "goal:guest",
            r#"{"name":"Kite","price":0,"saved":0,"createdAt":"2024-01-01T00:00:00Z"}"#,
        )
        .await
        .unwrap();
        assert_eq!(jar.get(&guest).await.unwrap(), None);
        assert!(matches!(
            jar.deposit(&guest, 100).await,
            Err(GoalJarError::NoGoal)
        ));
    }

    #[tokio::test]
    async fn unreadable_goal_is_ignored() {
        let (kv, jar) = service();
        kv.put("goal:guest", "{\"name\":").await.unwrap();
        assert_eq!(jar.get(&Username::guest()).await.unwrap(), None);

        jar.reset(&Username::guest()).await.unwrap();
        assert_eq!(kv.get("goal:guest").await.unwrap(), None);
    }
}
