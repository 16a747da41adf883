//! Role-based follower thresholds.

use guardiq_types::{Platform, Role};

/// Decides whether a claim qualifies as VIP.
pub trait Classifier: Send + Sync {
    fn classify(&self, role: Role, platform: Platform, followers: u64) -> bool;
}

/// Fixed per-role follower threshold table.
///
/// Platform is accepted for the audit trail only and never affects the verdict.
#[derive(Clone, Copy, Debug, Default)]
pub struct TierClassifier;

impl TierClassifier {
    /// Threshold applied to role names outside the table.
    pub const DEFAULT_THRESHOLD: u64 = 100_000;

    pub fn threshold(role: Role) -> u64 {
        match role {
            Role::Celebrity => 100_000,
            Role::Influencer => 50_000,
            Role::Vip => 25_000,
            Role::Executive => 10_000,
            Role::ContentCreator => 75_000,
            Role::PublicFigure => 30_000,
        }
    }

    /// Threshold by free-form role name, falling back to [`Self::DEFAULT_THRESHOLD`].
    pub fn threshold_for_name(name: &str) -> u64 {
        name.trim()
            .parse::<Role>()
            .map(Self::threshold)
            .unwrap_or(Self::DEFAULT_THRESHOLD)
    }
}

impl Classifier for TierClassifier {
    fn classify(&self, role: Role, _platform: Platform, followers: u64) -> bool {
        followers >= Self::threshold(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn boundaries_for_every_role() {
        let c = TierClassifier;
        for role in Role::ALL {
            let t = TierClassifier::threshold(role);
            assert!(!c.classify(role, Platform::Twitter, t - 1), "{role} at t-1");
            assert!(c.classify(role, Platform::Twitter, t), "{role} at t");
            assert!(c.classify(role, Platform::Twitter, t + 1), "{role} at t+1");
        }
    }

    #[test]
    fn table_values() {
        assert_eq!(TierClassifier::threshold(Role::Celebrity), 100_000);
        assert_eq!(TierClassifier::threshold(Role::Influencer), 50_000);
        assert_eq!(TierClassifier::threshold(Role::Vip), 25_000);
        assert_eq!(TierClassifier::threshold(Role::Executive), 10_000);
        assert_eq!(TierClassifier::threshold(Role::ContentCreator), 75_000);
        assert_eq!(TierClassifier::threshold(Role::PublicFigure), 30_000);
    }

    #[test]
    fn unknown_role_names_use_the_default() {
        assert_eq!(TierClassifier::threshold_for_name("astronaut"), 100_000);
        assert_eq!(TierClassifier::threshold_for_name("Executive"), 10_000);
    }

    proptest! {
        #[test]
        fn verdict_ignores_platform(
            role in prop::sample::select(Role::ALL.to_vec()),
            followers in 0u64..200_000,
        ) {
            let c = TierClassifier;
            let verdicts: Vec<bool> = Platform::ALL
                .iter()
                .map(|&p| c.classify(role, p, followers))
                .collect();
            prop_assert!(verdicts.iter().all(|&v| v == verdicts[0]));
            prop_assert_eq!(verdicts[0], followers >= TierClassifier::threshold(role));
        }
    }
}
